// src/model/star.rs
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::dimension::Dimension;
use super::measure::{Measure, Metric};
use super::table::Table;

/// Opaque identity of a [`Star`], copied into every member it adopts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarId(Uuid);

impl StarId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fact table plus the dimensions, metrics and measures reported over it.
///
/// `add_*` skips elements already present, where "present" means an equal
/// value (same name, column and table key), not the same instance. The
/// `set_*` bulk setters replace the whole collection as given and re-own
/// every element without that check.
///
/// A clone is a new star: it gets its own [`StarId`] and owns its copies of
/// the members, so members of one never pass the other's membership check.
#[derive(Debug)]
pub struct Star {
    id: StarId,
    fact: Arc<Table>,
    dimensions: Vec<Dimension>,
    metrics: Vec<Metric>,
    measures: Vec<Measure>,
}

impl Clone for Star {
    fn clone(&self) -> Self {
        let mut star = Star::new(&self.fact);
        star.set_dimensions(self.dimensions.clone());
        star.set_metrics(self.metrics.clone());
        star.set_measures(self.measures.clone());
        star
    }
}

impl Star {
    pub fn new(fact: &Arc<Table>) -> Self {
        Self {
            id: StarId::new(),
            fact: Arc::clone(fact),
            dimensions: Vec::new(),
            metrics: Vec::new(),
            measures: Vec::new(),
        }
    }

    pub fn id(&self) -> StarId {
        self.id
    }

    pub fn fact(&self) -> &Arc<Table> {
        &self.fact
    }

    pub fn set_fact(&mut self, fact: &Arc<Table>) {
        self.fact = Arc::clone(fact);
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension with exactly this name.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name() == name)
    }

    /// Adopt `dimension`. Returns `false` if an equal one is already here.
    pub fn add_dimension(&mut self, mut dimension: Dimension) -> bool {
        if self.dimensions.contains(&dimension) {
            return false;
        }
        dimension.set_star(self.id);
        self.dimensions.push(dimension);
        true
    }

    pub fn set_dimensions(&mut self, dimensions: Vec<Dimension>) {
        self.dimensions = dimensions;
        for dimension in &mut self.dimensions {
            dimension.set_star(self.id);
        }
    }

    // =========================================================================
    // Metrics
    // =========================================================================

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn add_metric(&mut self, mut metric: Metric) -> bool {
        if self.metrics.contains(&metric) {
            return false;
        }
        metric.set_star(self.id);
        self.metrics.push(metric);
        true
    }

    pub fn set_metrics(&mut self, metrics: Vec<Metric>) {
        self.metrics = metrics;
        for metric in &mut self.metrics {
            metric.set_star(self.id);
        }
    }

    // =========================================================================
    // Measures
    // =========================================================================

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Measure with exactly this name.
    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name() == name)
    }

    /// Adopt `measure`, taking ownership of its metric.
    pub fn add_measure(&mut self, mut measure: Measure) -> bool {
        if self.measures.contains(&measure) {
            return false;
        }
        measure.set_star(self.id);
        self.measures.push(measure);
        true
    }

    pub fn set_measures(&mut self, measures: Vec<Measure>) {
        self.measures = measures;
        for measure in &mut self.measures {
            measure.set_star(self.id);
        }
    }
}

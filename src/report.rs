//! Report generation over a single [`Star`].
//!
//! ```ignore
//! use stargen::report::ReportGenerator;
//!
//! let mut report = ReportGenerator::new(&star);
//! report.add_dimension(star.dimension("Store Name").unwrap())?;
//! report.add_measure(star.measure("Products Sold").unwrap())?;
//! println!("{}", report.sql()?);
//! ```

use std::fmt;

use tracing::debug;

use crate::model::{Dimension, Measure, Star, StarId};
use crate::sql::{GenerateError, SqlGenerator};

/// Which kind of star member was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Dimension,
    Measure,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Dimension => f.write_str("Dimension"),
            MemberKind::Measure => f.write_str("Measure"),
        }
    }
}

/// Errors that can occur while building a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{kind} [{name}] is not part of star {star}")]
    MembershipMismatch {
        kind: MemberKind,
        name: String,
        star: StarId,
    },

    #[error("SQL generation failed: {0}")]
    Generate(#[from] GenerateError),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Selection of dimensions and measures bound to one star.
#[derive(Debug, Clone)]
pub struct ReportGenerator<'s> {
    star: &'s Star,
    dimensions: Vec<&'s Dimension>,
    measures: Vec<&'s Measure>,
    case_sensitive: bool,
}

impl<'s> ReportGenerator<'s> {
    pub fn new(star: &'s Star) -> Self {
        Self {
            star,
            dimensions: Vec::new(),
            measures: Vec::new(),
            case_sensitive: false,
        }
    }

    pub fn star(&self) -> &'s Star {
        self.star
    }

    pub fn dimensions(&self) -> &[&'s Dimension] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[&'s Measure] {
        &self.measures
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Select `dimension`. Selecting it again is a no-op.
    pub fn add_dimension(&mut self, dimension: &'s Dimension) -> ReportResult<()> {
        if dimension.star() != Some(self.star.id()) {
            return Err(ReportError::MembershipMismatch {
                kind: MemberKind::Dimension,
                name: dimension.name().to_string(),
                star: self.star.id(),
            });
        }

        if !self.dimensions.contains(&dimension) {
            self.dimensions.push(dimension);
        }
        Ok(())
    }

    /// Select `measure`. Selecting it again is a no-op.
    pub fn add_measure(&mut self, measure: &'s Measure) -> ReportResult<()> {
        if measure.star() != Some(self.star.id()) {
            return Err(ReportError::MembershipMismatch {
                kind: MemberKind::Measure,
                name: measure.name().to_string(),
                star: self.star.id(),
            });
        }

        if !self.measures.contains(&measure) {
            self.measures.push(measure);
        }
        Ok(())
    }

    /// Compile the current selection.
    ///
    /// Grouping is always requested, so a dimension-only selection still
    /// gets a GROUP BY.
    pub fn sql(&self) -> ReportResult<String> {
        let mut generator = SqlGenerator::new();
        generator.set_case_sensitive(self.case_sensitive);
        generator.set_force_group_by(true);
        generator.add_table(self.star.fact());

        for dimension in self.dimensions.iter().copied() {
            generator.add_select_as(dimension.column(), dimension.table(), dimension.name());
        }

        for measure in self.measures.iter().copied() {
            let metric = measure.metric();
            generator.add_aggregate_as(
                measure.function().clone(),
                metric.column(),
                metric.table(),
                measure.name(),
            );
        }

        let sql = generator.sql()?;
        debug!(
            dimensions = self.dimensions.len(),
            measures = self.measures.len(),
            "compiled report SQL"
        );
        Ok(sql)
    }
}

//! Name-based request binding.
//!
//! Callers outside the crate talk in names: a list of dimension labels and a
//! list of measure labels. This module resolves them against a [`Star`],
//! drives a [`ReportGenerator`], and describes what a star offers.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{AggregateFunction, Star};
use crate::report::{ReportError, ReportGenerator};

/// Errors that can occur while binding a request to a star.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("Dimension [{0}] not found")]
    DimensionNotFound(String),

    #[error("Measure [{0}] not found")]
    MeasureNotFound(String),

    #[error(transparent)]
    Report(#[from] ReportError),
}

pub type BindingResult<T> = Result<T, BindingError>;

/// The dimensions and measures a caller asked for, by name, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub measures: Vec<String>,
}

impl ReportRequest {
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty()
    }
}

/// Options for binding a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Quote table and column identifiers.
    pub case_sensitive: bool,
    /// Log every compiled query at info level.
    pub log_query: bool,
}

impl BindingOptions {
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_log_query(mut self, log_query: bool) -> Self {
        self.log_query = log_query;
        self
    }
}

/// Compile `request` against `star`.
///
/// An empty request selects nothing and yields `None`.
pub fn bind_report(
    star: &Star,
    request: &ReportRequest,
    options: BindingOptions,
) -> BindingResult<Option<String>> {
    if request.is_empty() {
        return Ok(None);
    }

    let mut generator = ReportGenerator::new(star);
    generator.set_case_sensitive(options.case_sensitive);

    for name in &request.dimensions {
        let dimension = star
            .dimension(name)
            .ok_or_else(|| BindingError::DimensionNotFound(name.clone()))?;
        generator.add_dimension(dimension)?;
    }

    for name in &request.measures {
        let measure = star
            .measure(name)
            .ok_or_else(|| BindingError::MeasureNotFound(name.clone()))?;
        generator.add_measure(measure)?;
    }

    let sql = generator.sql()?;
    if options.log_query {
        info!("{}", sql);
    }
    Ok(Some(sql))
}

/// One entry in a star's metadata listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StarField {
    Dimension {
        name: String,
    },
    Measure {
        name: String,
        function: AggregateFunction,
    },
}

/// List the star's dimensions, then its measures, in declaration order.
pub fn describe_star(star: &Star) -> Vec<StarField> {
    let dimensions = star.dimensions().iter().map(|d| StarField::Dimension {
        name: d.name().to_string(),
    });
    let measures = star.measures().iter().map(|m| StarField::Measure {
        name: m.name().to_string(),
        function: m.function().clone(),
    });

    dimensions.chain(measures).collect()
}

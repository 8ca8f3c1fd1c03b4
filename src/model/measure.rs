// src/model/measure.rs
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::star::StarId;
use super::table::Table;

/// SQL aggregate applied by a [`Measure`].
///
/// Only the exact lowercase names map to the known variants. Any other
/// spelling is kept verbatim in `Other` and rendered as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregateFunction {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    Other(String),
}

impl AggregateFunction {
    pub fn as_str(&self) -> &str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Count => "count",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::Other(name) => name,
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateFunction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "sum" => AggregateFunction::Sum,
            "avg" => AggregateFunction::Avg,
            "count" => AggregateFunction::Count,
            "min" => AggregateFunction::Min,
            "max" => AggregateFunction::Max,
            _ => AggregateFunction::Other(s.to_string()),
        })
    }
}

impl From<&str> for AggregateFunction {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(function) => function,
            Err(never) => match never {},
        }
    }
}

impl From<String> for AggregateFunction {
    fn from(s: String) -> Self {
        AggregateFunction::from(s.as_str())
    }
}

impl From<AggregateFunction> for String {
    fn from(function: AggregateFunction) -> Self {
        function.as_str().to_string()
    }
}

/// A raw numeric column available for aggregation.
#[derive(Debug, Clone)]
pub struct Metric {
    table: Arc<Table>,
    column: String,
    star: Option<StarId>,
}

impl Metric {
    pub fn new(table: &Arc<Table>, column: impl Into<String>) -> Self {
        Self {
            table: Arc::clone(table),
            column: column.into(),
            star: None,
        }
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn star(&self) -> Option<StarId> {
        self.star
    }

    pub(crate) fn set_star(&mut self, star: StarId) {
        self.star = Some(star);
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column && self.table.is_same(&other.table)
    }
}

/// A named aggregation of a [`Metric`].
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    name: String,
    metric: Metric,
    function: AggregateFunction,
}

impl Measure {
    pub fn new(
        name: impl Into<String>,
        metric: Metric,
        function: impl Into<AggregateFunction>,
    ) -> Self {
        Self {
            name: name.into(),
            metric,
            function: function.into(),
        }
    }

    pub fn sum(name: impl Into<String>, metric: Metric) -> Self {
        Self::new(name, metric, AggregateFunction::Sum)
    }

    pub fn avg(name: impl Into<String>, metric: Metric) -> Self {
        Self::new(name, metric, AggregateFunction::Avg)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn function(&self) -> &AggregateFunction {
        &self.function
    }

    /// Owning star, taken from the metric.
    pub fn star(&self) -> Option<StarId> {
        self.metric.star()
    }

    pub(crate) fn set_star(&mut self, star: StarId) {
        self.metric.set_star(star);
    }
}

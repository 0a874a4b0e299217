//! Billing record model and the numeric field capability trait.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Typed accessor for named numeric fields.
///
/// Replaces per-access dynamic column lookup: the matrix builder
/// validates every configured field once, at build time, and fails
/// with a named error instead of scoring partial rows.
pub trait NumericFieldSource {
    /// Look up a numeric field by exact name.
    fn numeric(&self, field: &str) -> Option<f64>;

    /// Stable identifier of the entity this record belongs to.
    fn entity_id(&self) -> &str;
}

/// One billing line for one entity (e.g. a provider NPI).
///
/// `fields` holds the regression and response values; `metadata`
/// carries reporting columns (name, address, cost, rate) through the
/// pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub entity_id: String,
    pub fields: HashMap<String, f64>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Record {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            fields: HashMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

impl NumericFieldSource for Record {
    fn numeric(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

//! # fraudscope-core
//!
//! Foundation crate for the fraudscope anomaly detection system.
//! Defines the record model, detector configuration, errors, and
//! report types. The scoring pipeline lives in `fraudscope-anomaly`.

pub mod config;
pub mod errors;
pub mod record;
pub mod report;

// Re-export the most commonly used types at the crate root.
pub use config::{DetectorConfig, InitMethod, ScorerKind};
pub use errors::{AnomalyError, AnomalyResult};
pub use record::{NumericFieldSource, Record};
pub use report::{EntitySummary, RankedReport};

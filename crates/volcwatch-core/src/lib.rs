//! Domain types, field-alias handling, and the volcano record reconciler.

pub mod app_config;
pub mod color;
pub mod config;
pub mod error;
pub mod fields;
pub mod reconcile;
pub mod volcano;

pub use app_config::{AppConfig, Environment};
pub use color::ColorCode;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use reconcile::{
    classify_baseline, reconcile, reconcile_sources, ColorPolicy, DetailFetcher, PhaseReport,
    Reconciliation, SourceList,
};
pub use volcano::{DisplayPayload, ReconciledRecord, RecordSource, VolcanoDetail, VolcanoSummary};

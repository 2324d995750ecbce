//! HTTP clients for the public volcano status APIs.
//!
//! [`HansClient`] talks to the USGS HANS public API and implements
//! [`volcwatch_core::DetailFetcher`] so it can feed the reconciler directly.
//! [`AmbeeClient`] reads the Ambee disasters feed.

pub mod ambee;
pub mod envelope;
pub mod error;
pub mod hans;
pub mod http;

mod retry;

pub use ambee::{volcano_events, AmbeeClient, AmbeeEvent, EruptionStatus, VolcanoEvent};
pub use error::SourceError;
pub use hans::HansClient;
pub use http::HttpSettings;

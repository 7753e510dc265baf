//! Client for the AgroSmart backend
//!
//! Two endpoints, both treated as black boxes:
//! - `POST /login` (form-encoded credentials, answers with a redirect on success)
//! - `POST /predict` (JSON parameter record, answers with a fertilizer label)
//!
//! The client keeps a cookie store, so a session established by `login` is
//! reused by later `predict` calls on the same client.
//!
//! # Environment Variable
//! Set `AGROSMART_SERVER=host:port` to point at a different backend.

mod internal;

use std::time::Duration;

pub use internal::{Client, LoginOutcome, Prediction, PredictResponse, ServiceError};

use crate::config::Config;

/// Create a client for the configured backend
pub fn connect(config: &Config) -> Result<Client, ServiceError> {
    Client::new(config.server.as_str(), Duration::from_secs(config.timeout_secs))
}

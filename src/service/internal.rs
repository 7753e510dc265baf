//! Internal HTTP client implementation for the backend

use reqwest::blocking::Client as HttpClient;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::fields::Inputs;
use crate::history::DEFAULT_CONFIDENCE;

/// Body marker the login page renders when credentials are refused
const LOGIN_FAILURE_MARKER: &str = "Invalid";

/// Remote failure talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Connection error. Please try again. ({url}: {source})")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status; `message` is the service's own error text when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status but no usable answer
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw `/predict` response body
#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
    /// How the backend matched ("Exact Match", "Closest Match")
    #[serde(default)]
    pub method: Option<String>,
}

/// Successful prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub fertilizer: String,
    /// Percentage in [0, 100]; 100 when the service omits it
    pub confidence: f64,
    pub method: Option<String>,
}

impl PredictResponse {
    /// Interpret a response body given whether the status was a success
    pub fn into_prediction(self, success: bool, status: u16) -> Result<Prediction, ServiceError> {
        if !success {
            return Err(ServiceError::Status {
                status,
                message: self.error.unwrap_or_else(|| "Prediction failed".to_string()),
            });
        }

        match self.recommendation.filter(|r| !r.trim().is_empty()) {
            Some(fertilizer) => Ok(Prediction {
                fertilizer,
                confidence: normalize_confidence(self.confidence),
                method: self.method,
            }),
            None => Err(ServiceError::Rejected(
                self.error
                    .unwrap_or_else(|| "No recommendation available".to_string()),
            )),
        }
    }
}

// Zero and NaN count as "not reported", like an absent value
fn normalize_confidence(reported: Option<f64>) -> f64 {
    match reported {
        Some(c) if c.is_finite() && c != 0.0 => c.clamp(0.0, 100.0),
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The backend redirected; `location` is where it sent us
    Authenticated { location: String },
    /// The login page came back carrying the failure marker
    Rejected,
    /// No redirect and no failure marker
    Unconfirmed,
}

/// Backend client
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    /// Create a new client for the given address (host:port or full URL)
    pub fn new(address: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let address = address.into();
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address
        } else {
            format!("http://{}", address)
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(concat!("agrosmart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServiceError::Client)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the prediction service for a fertilizer recommendation
    pub fn predict(&self, inputs: &Inputs) -> Result<Prediction, ServiceError> {
        let url = format!("{}/predict", self.base_url);
        debug!(%url, fields = inputs.len(), "requesting prediction");

        let response = self
            .http
            .post(&url)
            .json(inputs)
            .send()
            .map_err(|source| ServiceError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ServiceError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(status = status.as_u16(), "prediction response");

        let parsed = match serde_json::from_str::<PredictResponse>(&body) {
            Ok(parsed) => parsed,
            // An error page that is not JSON still reports as a status failure
            Err(_) if !status.is_success() => PredictResponse::default(),
            Err(source) => return Err(ServiceError::Decode { url, source }),
        };

        parsed.into_prediction(status.is_success(), status.as_u16())
    }

    /// Submit credentials to the auth service
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ServiceError> {
        let url = format!("{}/login", self.base_url);
        let username = username.trim();
        debug!(%url, username, "logging in");

        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password.trim())])
            .send()
            .map_err(|source| ServiceError::Transport {
                url: url.clone(),
                source,
            })?;

        let requested = Url::parse(&url).ok();
        if requested.as_ref() != Some(response.url()) {
            let location = response.url().to_string();
            info!(username, %location, "login accepted");
            return Ok(LoginOutcome::Authenticated { location });
        }

        let status = response.status();
        let body = response.text().map_err(|source| ServiceError::Transport {
            url: url.clone(),
            source,
        })?;

        if body.contains(LOGIN_FAILURE_MARKER) {
            info!(username, "login rejected");
            return Ok(LoginOutcome::Rejected);
        }
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message: "Login failed".to_string(),
            });
        }
        Ok(LoginOutcome::Unconfirmed)
    }
}

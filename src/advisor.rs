//! Form handlers: validate, submit, record.
//!
//! An [`Advisor`] borrows the backend client and the history store for the
//! lifetime of one session. Submissions take `&self`, so one advisor can be
//! shared across threads. Each form has its own [`SubmitGate`], so a form
//! cannot be submitted again while its previous submission is in flight.

use chrono::Utc;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::fields::{self, Inputs, ValidationError};
use crate::history::{HistoryError, HistoryStore, Recommendation};
use crate::service::{Client, LoginOutcome, ServiceError};

/// Forms that talk to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Login,
    Recommendation,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Recommendation => f.write_str("recommendation"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("A {0} request is already in progress")]
    Busy(Form),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Busy flag for one form
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: AtomicBool,
}

impl SubmitGate {
    /// Mark the form busy; `None` if it already is
    pub fn try_acquire(&self) -> Option<SubmitGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears the busy flag when dropped, whatever path the submission took
#[derive(Debug)]
pub struct SubmitGuard<'a> {
    gate: &'a SubmitGate,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// A recorded recommendation plus how the backend matched it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    #[serde(flatten)]
    pub record: Recommendation,
    /// Matching strategy reported by the backend, e.g. "Exact Match"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

pub struct Advisor<'a> {
    client: &'a Client,
    history: Mutex<&'a mut HistoryStore>,
    login_gate: SubmitGate,
    recommend_gate: SubmitGate,
}

impl<'a> Advisor<'a> {
    pub fn new(client: &'a Client, history: &'a mut HistoryStore) -> Self {
        Self {
            client,
            history: Mutex::new(history),
            login_gate: SubmitGate::default(),
            recommend_gate: SubmitGate::default(),
        }
    }

    pub fn is_busy(&self, form: Form) -> bool {
        self.gate(form).is_busy()
    }

    /// Submit credentials
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AdvisorError> {
        let _guard = self
            .login_gate
            .try_acquire()
            .ok_or(AdvisorError::Busy(Form::Login))?;
        Ok(self.client.login(username, password)?)
    }

    /// Validate `inputs`, ask for a recommendation and record it in history
    pub fn recommend(&self, inputs: Inputs) -> Result<Advice, AdvisorError> {
        let _guard = self
            .recommend_gate
            .try_acquire()
            .ok_or(AdvisorError::Busy(Form::Recommendation))?;

        fields::validate(&inputs)?;
        let prediction = self.client.predict(&inputs)?;

        let now = Utc::now();
        let mut history = self.history.lock();
        let record = Recommendation::new(
            history.next_id(now),
            now,
            inputs,
            prediction.fertilizer,
            prediction.confidence,
        );
        history.append(record.clone())?;
        debug!(id = record.id, fertilizer = %record.fertilizer, "recommendation recorded");

        Ok(Advice {
            record,
            method: prediction.method,
        })
    }

    /// Locked view of the history; release it before submitting again
    pub fn history(&self) -> MappedMutexGuard<'_, HistoryStore> {
        MutexGuard::map(self.history.lock(), |history| &mut **history)
    }

    fn gate(&self, form: Form) -> &SubmitGate {
        match form {
            Form::Login => &self.login_gate,
            Form::Recommendation => &self.recommend_gate,
        }
    }
}

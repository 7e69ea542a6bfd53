//! Bookkeeping for the remote explanation collaborator.
//!
//! The call itself happens outside the core. Each request is tagged with
//! the id of the settled session that produced it; when a response comes
//! back, only the most recently settled session may be displayed.

use crate::equilibrium::Equilibrium;
use crate::params::{FieldId, ParameterSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a settled session; strictly increasing per change session.
pub type SessionId = u64;

/// Why the collaborator could not produce an explanation.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrativeError {
    #[error("explanation service unreachable: {0}")]
    Network(String),
    #[error("explanation quota exhausted")]
    QuotaExhausted,
    #[error("explanation service failed: {0}")]
    Service(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub session_id: SessionId,
    pub baseline: ParameterSet,
    pub current: ParameterSet,
    pub changed_field: FieldId,
    pub baseline_equilibrium: Equilibrium,
    pub current_equilibrium: Equilibrium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplanationOutcome {
    /// Show this text.
    Display { session_id: SessionId, text: String },
    /// The latest session has no explanation; show local fallback content.
    Unavailable {
        session_id: SessionId,
        reason: NarrativeError,
    },
    /// The response belongs to a superseded session and was dropped.
    Stale { session_id: SessionId },
}

/// Tracks which settled session currently owns the explanation panel.
#[derive(Debug, Clone, Default)]
pub struct ExplanationTracker {
    latest: Option<SessionId>,
    resolved: bool,
}

impl ExplanationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `session_id` as the newest settlement. Every earlier session
    /// becomes stale, whether or not it issued a request. A settlement that
    /// issued no request (`expects_response == false`) is never pending.
    pub fn supersede(&mut self, session_id: SessionId, expects_response: bool) {
        if self.latest.map_or(true, |latest| session_id > latest) {
            self.latest = Some(session_id);
            self.resolved = !expects_response;
        }
    }

    pub fn latest(&self) -> Option<SessionId> {
        self.latest
    }

    /// True while the latest session still waits for its response.
    pub fn is_pending(&self) -> bool {
        self.latest.is_some() && !self.resolved
    }

    /// Treats every outstanding response as stale. Used on teardown.
    pub fn abandon(&mut self) {
        self.resolved = true;
    }

    pub fn resolve(
        &mut self,
        session_id: SessionId,
        response: Result<String, NarrativeError>,
    ) -> ExplanationOutcome {
        if self.latest != Some(session_id) || self.resolved {
            log::debug!(
                "dropping explanation for session {} (latest is {:?})",
                session_id,
                self.latest
            );
            return ExplanationOutcome::Stale { session_id };
        }
        self.resolved = true;
        match response {
            Ok(text) => ExplanationOutcome::Display { session_id, text },
            Err(reason) => {
                log::warn!("explanation unavailable for session {}: {}", session_id, reason);
                ExplanationOutcome::Unavailable { session_id, reason }
            }
        }
    }
}

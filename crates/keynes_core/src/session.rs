//! Change-session coalescer.
//!
//! Turns bursts of parameter edits (a dragged slider fires dozens per
//! second) into exactly one settlement with a stable baseline:
//!
//! - `Idle --edit--> Active`: baseline := set before the edit, current :=
//!   set after it, quiescence timer armed.
//! - `Active --edit--> Active`: current replaced, baseline kept, timer
//!   re-armed.
//! - `Active --timer--> Idle`: the burst settles; delta, equilibria and
//!   chart are computed for (baseline, current).
//! - A regime toggle settles at once with baseline := pre-toggle set.
//!
//! The session never owns a real timer. It hands out [`QuiescenceTimer`]s
//! carrying a token and a deadline; the host schedules them and reports back
//! through [`ChangeSession::fire`] or [`ChangeSession::poll`]. Re-arming
//! invalidates the previous token, so a callback that slips through after
//! cancellation is a no-op.

use crate::analysis::{compare, synchronize_toggle, Comparison};
use crate::curves::{chart_frame, ChartFrame};
use crate::equilibrium::{solve, Equilibrium};
use crate::error::ModelResult;
use crate::narrative::{
    ExplanationOutcome, ExplanationRequest, ExplanationTracker, NarrativeError, SessionId,
};
use crate::params::{FieldId, InvestmentRegime, ParameterSet, TaxRegime};
use crate::settings::SessionSettings;
use serde::{Deserialize, Serialize};

pub type TimerToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Active,
}

/// An armed quiescence timer. Only the most recently armed token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuiescenceTimer {
    pub token: TimerToken,
    pub deadline_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    Value { field: FieldId, value: f64 },
    TaxRegime { regime: TaxRegime },
    InvestmentRegime { regime: InvestmentRegime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettleCause {
    Quiescence,
    RegimeToggle,
}

/// The single downstream event emitted per editing burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub session_id: SessionId,
    pub cause: SettleCause,
    pub baseline: ParameterSet,
    pub current: ParameterSet,
    pub comparison: Comparison,
    pub chart: ChartFrame,
}

impl Settlement {
    pub fn changed_field(&self) -> Option<FieldId> {
        self.comparison.changed_field
    }

    /// Request for the narrative collaborator; `None` when nothing
    /// meaningful changed.
    pub fn explanation_request(&self) -> Option<ExplanationRequest> {
        self.changed_field().map(|changed_field| ExplanationRequest {
            session_id: self.session_id,
            baseline: self.baseline,
            current: self.current,
            changed_field,
            baseline_equilibrium: self.comparison.baseline,
            current_equilibrium: self.comparison.current,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The edit was absorbed into the burst; `cancelled` is the token the
    /// host should unschedule, if any.
    Debounced {
        timer: QuiescenceTimer,
        cancelled: Option<TimerToken>,
    },
    Settled {
        settlement: Box<Settlement>,
        cancelled: Option<TimerToken>,
    },
}

#[derive(Debug, Clone)]
pub struct ChangeSession {
    settings: SessionSettings,
    status: SessionStatus,
    baseline: Option<ParameterSet>,
    current: ParameterSet,
    timer: Option<QuiescenceTimer>,
    next_token: TimerToken,
    next_session: SessionId,
    explanations: ExplanationTracker,
}

impl ChangeSession {
    pub fn new(initial: ParameterSet, settings: SessionSettings) -> ModelResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            status: SessionStatus::Idle,
            baseline: None,
            current: initial,
            timer: None,
            next_token: 1,
            next_session: 1,
            explanations: ExplanationTracker::new(),
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn current(&self) -> &ParameterSet {
        &self.current
    }

    /// Baseline of the active burst, or of the last settled one while idle.
    pub fn baseline(&self) -> Option<&ParameterSet> {
        self.baseline.as_ref()
    }

    pub fn pending_timer(&self) -> Option<QuiescenceTimer> {
        self.timer
    }

    pub fn equilibrium(&self) -> Equilibrium {
        solve(&self.current)
    }

    pub fn chart_frame(&self) -> ModelResult<ChartFrame> {
        chart_frame(&self.current, self.baseline.as_ref(), &self.settings)
    }

    /// Host notification that the user grabbed a control.
    ///
    /// Captures the baseline when idle so a press-and-release without a
    /// value change still settles (with no delta). Returns the armed timer,
    /// or `None` when a burst is already running.
    pub fn begin_burst(&mut self, now_ms: u64) -> Option<QuiescenceTimer> {
        if self.status == SessionStatus::Active {
            return None;
        }
        self.capture_baseline();
        let (timer, _) = self.arm(now_ms);
        Some(timer)
    }

    pub fn apply(&mut self, edit: Edit, now_ms: u64) -> ModelResult<EditOutcome> {
        match edit {
            Edit::Value { field, value } => {
                let next = self.current.with_value(field, value)?;
                Ok(self.absorb(next, now_ms))
            }
            Edit::TaxRegime { regime } => {
                if regime == self.current.tax_regime() {
                    return Ok(self.absorb(self.current, now_ms));
                }
                let toggled = self.current.with_tax_regime(regime);
                self.settle_toggle(toggled)
            }
            Edit::InvestmentRegime { regime } => {
                let toggled = self.current.with_investment_regime(regime)?;
                if toggled == self.current {
                    return Ok(self.absorb(toggled, now_ms));
                }
                self.settle_toggle(toggled)
            }
        }
    }

    /// Settles if the armed timer's deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> ModelResult<Option<Settlement>> {
        match self.timer {
            Some(timer) if now_ms >= timer.deadline_ms => {
                self.settle(SettleCause::Quiescence).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Host timer callback. Tokens that are no longer armed are ignored.
    pub fn fire(&mut self, token: TimerToken) -> ModelResult<Option<Settlement>> {
        match self.timer {
            Some(timer) if timer.token == token => self.settle(SettleCause::Quiescence).map(Some),
            _ => {
                log::debug!("ignoring stale quiescence timer {}", token);
                Ok(None)
            }
        }
    }

    /// Releases the timer and abandons any outstanding explanation.
    /// Returns the token the host must unschedule, if one was armed.
    pub fn teardown(&mut self) -> Option<TimerToken> {
        self.status = SessionStatus::Idle;
        self.explanations.abandon();
        let cancelled = self.timer.take().map(|timer| timer.token);
        if let Some(token) = cancelled {
            log::debug!("teardown cancelled quiescence timer {}", token);
        }
        cancelled
    }

    /// Tears down and starts over from `initial` with no baseline.
    pub fn reset(&mut self, initial: ParameterSet) -> Option<TimerToken> {
        let cancelled = self.teardown();
        self.current = initial;
        self.baseline = None;
        cancelled
    }

    pub fn resolve_explanation(
        &mut self,
        session_id: SessionId,
        response: Result<String, NarrativeError>,
    ) -> ExplanationOutcome {
        self.explanations.resolve(session_id, response)
    }

    pub fn explanation_pending(&self) -> bool {
        self.explanations.is_pending()
    }

    fn capture_baseline(&mut self) {
        self.baseline = Some(self.current);
        self.status = SessionStatus::Active;
    }

    fn absorb(&mut self, next: ParameterSet, now_ms: u64) -> EditOutcome {
        if self.status == SessionStatus::Idle {
            self.capture_baseline();
        }
        self.current = next;
        let (timer, cancelled) = self.arm(now_ms);
        EditOutcome::Debounced { timer, cancelled }
    }

    fn arm(&mut self, now_ms: u64) -> (QuiescenceTimer, Option<TimerToken>) {
        let timer = QuiescenceTimer {
            token: self.next_token,
            deadline_ms: now_ms.saturating_add(self.settings.quiescence_ms),
        };
        self.next_token += 1;
        let cancelled = self.timer.replace(timer).map(|old| old.token);
        log::debug!(
            "armed quiescence timer {} for {}ms (replaced {:?})",
            timer.token,
            timer.deadline_ms,
            cancelled
        );
        (timer, cancelled)
    }

    fn settle_toggle(&mut self, toggled: ParameterSet) -> ModelResult<EditOutcome> {
        let before = self.current;
        let toggled = if self.settings.sync_on_regime_toggle {
            synchronize_toggle(&before, toggled)?
        } else {
            toggled
        };
        let cancelled = self.timer.take().map(|timer| timer.token);
        self.baseline = Some(before);
        self.current = toggled;
        self.status = SessionStatus::Active;
        let settlement = self.settle(SettleCause::RegimeToggle)?;
        Ok(EditOutcome::Settled {
            settlement: Box::new(settlement),
            cancelled,
        })
    }

    fn settle(&mut self, cause: SettleCause) -> ModelResult<Settlement> {
        self.timer = None;
        self.status = SessionStatus::Idle;
        let baseline = self.baseline.unwrap_or(self.current);
        let comparison = compare(&baseline, &self.current)?;
        let chart = chart_frame(&self.current, Some(&baseline), &self.settings)?;

        let session_id = self.next_session;
        self.next_session += 1;
        self.explanations
            .supersede(session_id, comparison.changed_field.is_some());
        log::debug!(
            "session {} settled ({:?}), changed field {:?}",
            session_id,
            cause,
            comparison.changed_field
        );

        Ok(Settlement {
            session_id,
            cause,
            baseline,
            current: self.current,
            comparison,
            chart,
        })
    }
}

//! Timed reveal state machine.
//!
//! A reveal draws a fresh weighted pick on every timer tick and shows it, so
//! the display flickers through options like a slot machine before settling
//! on the final pick.
//!
//! ```text
//!          start()              last tick / cancel()
//!   Idle ───────────► Running ─────────────────────► Settled
//!    ▲                                                  │
//!    └──────────────── start() is allowed again ────────┘
//! ```
//!
//! This type only tracks state.  The timer itself lives in the application
//! crate (`run_reveal`), which calls [`RevealMachine::on_sample`] once per
//! tick with a label drawn by the selector.

use std::time::Duration;

use thiserror::Error;

/// Interval between two samples.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Shortest interval a reveal will tick at.  Shorter ticks are raised to
/// this, and the sample count is computed from the raised value.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Total reveal length when the user has not configured one.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Errors raised by invalid state transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("a reveal is already running")]
    AlreadyRunning,

    #[error("no reveal is running")]
    NotRunning,
}

/// Timing parameters of one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealPlan {
    /// Total time the reveal runs for.
    pub duration: Duration,
    /// Time between two samples.
    pub tick: Duration,
}

impl RevealPlan {
    /// A plan for `duration`, sampling every `tick` (at least [`MIN_TICK`]).
    pub fn new(duration: Duration, tick: Duration) -> Self {
        Self {
            duration,
            tick: tick.max(MIN_TICK),
        }
    }

    /// Plan for a whole number of seconds at the default tick rate.
    pub fn from_secs(secs: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(secs)), DEFAULT_TICK)
    }

    /// The timer period: `tick`, raised to [`MIN_TICK`] if a plan was
    /// built field by field with a shorter one.
    pub fn period(&self) -> Duration {
        self.tick.max(MIN_TICK)
    }

    /// Number of samples drawn: `ceil(duration / period)`, never less than 1.
    pub fn total_ticks(&self) -> u32 {
        let ticks = self
            .duration
            .as_nanos()
            .div_ceil(self.period().as_nanos())
            .max(1);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

impl Default for RevealPlan {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, DEFAULT_TICK)
    }
}

/// Where a reveal currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealState {
    /// No reveal has run yet.
    Idle,
    /// Samples are being drawn.
    Running {
        /// Samples drawn so far.
        ticks_done: u32,
        /// The label currently on display.
        current: Option<String>,
    },
    /// The reveal finished; `result` stays on display.
    Settled { result: String },
}

/// What the display should show after a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealFrame {
    /// An intermediate sample.
    Showing { label: String, tick: u32, total: u32 },
    /// The final sample.
    Settled { label: String },
}

/// Tracks one reveal from start to settled result.
#[derive(Debug, Clone)]
pub struct RevealMachine {
    plan: RevealPlan,
    state: RevealState,
}

impl RevealMachine {
    pub fn new(plan: RevealPlan) -> Self {
        Self {
            plan,
            state: RevealState::Idle,
        }
    }

    pub fn plan(&self) -> RevealPlan {
        self.plan
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RevealState::Running { .. })
    }

    /// The settled result, if the last reveal finished.
    pub fn result(&self) -> Option<&str> {
        match &self.state {
            RevealState::Settled { result } => Some(result),
            _ => None,
        }
    }

    /// Enters `Running`.  Allowed from `Idle` and `Settled`.
    ///
    /// # Errors
    ///
    /// [`RevealError::AlreadyRunning`] if a reveal is in progress.
    pub fn start(&mut self) -> Result<(), RevealError> {
        if self.is_running() {
            return Err(RevealError::AlreadyRunning);
        }
        self.state = RevealState::Running {
            ticks_done: 0,
            current: None,
        };
        Ok(())
    }

    /// Records one sample.  The sample that completes the plan settles the
    /// reveal.
    ///
    /// # Errors
    ///
    /// [`RevealError::NotRunning`] outside of `Running`.
    pub fn on_sample(&mut self, label: &str) -> Result<RevealFrame, RevealError> {
        let total = self.plan.total_ticks();
        let RevealState::Running {
            ticks_done,
            current,
        } = &mut self.state
        else {
            return Err(RevealError::NotRunning);
        };

        *ticks_done += 1;
        if *ticks_done >= total {
            self.state = RevealState::Settled {
                result: label.to_string(),
            };
            return Ok(RevealFrame::Settled {
                label: label.to_string(),
            });
        }

        *current = Some(label.to_string());
        Ok(RevealFrame::Showing {
            label: label.to_string(),
            tick: *ticks_done,
            total,
        })
    }

    /// Stops a running reveal early.
    ///
    /// The label on display becomes the settled result and is returned.  If
    /// nothing has been displayed yet the machine returns to `Idle` and
    /// `None` is returned.
    ///
    /// # Errors
    ///
    /// [`RevealError::NotRunning`] outside of `Running`.
    pub fn cancel(&mut self) -> Result<Option<String>, RevealError> {
        let RevealState::Running { current, .. } = &mut self.state else {
            return Err(RevealError::NotRunning);
        };

        match current.take() {
            Some(result) => {
                self.state = RevealState::Settled {
                    result: result.clone(),
                };
                Ok(Some(result))
            }
            None => {
                self.state = RevealState::Idle;
                Ok(None)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

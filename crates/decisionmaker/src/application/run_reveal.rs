//! RunRevealUseCase: the timed "slot machine" reveal.
//!
//! On every tick of a Tokio interval timer (100 ms by default) a fresh
//! weighted pick is drawn and handed to a [`RevealDisplay`].  When the
//! configured duration has elapsed the last pick is shown as the settled
//! result.
//!
//! # Timeline
//!
//! ```text
//! t=0      start, nothing shown yet
//! t=100ms  show(sample 1)
//! t=200ms  show(sample 2)
//! ...
//! t=5s     settle(sample 50)
//! ```
//!
//! The timer runs on the calling task; there is no background thread and no
//! shared state apart from the optional cancel flag.

use std::sync::atomic::{AtomicBool, Ordering};

use decisionmaker_core::{
    RevealError, RevealFrame, RevealMachine, RevealPlan, SelectError, WeightedOption,
    WeightedSelector,
};
use rand::Rng;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Receives reveal frames.
///
/// The terminal implementation redraws a single line; tests use a mock.
#[cfg_attr(test, mockall::automock)]
pub trait RevealDisplay {
    /// An intermediate sample (`tick` of `total`).
    fn show(&mut self, label: &str, tick: u32, total: u32);
    /// The final result.
    fn settle(&mut self, label: &str);
    /// The option list is empty; nothing can be drawn.
    fn no_options(&mut self);
}

/// How a reveal ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The reveal finished (or was cancelled after showing something) with
    /// this result.
    Settled(String),
    /// The option list was empty.
    NoOptions,
    /// Cancelled before the first sample was shown.
    Cancelled,
}

/// Runs one reveal to completion.
///
/// `cancel` is polled on every tick; setting it stops the reveal early and
/// settles on whatever is currently displayed.
///
/// # Errors
///
/// Only [`RevealError`] from an inconsistent state machine, which does not
/// happen when this function owns the machine.
pub async fn run_reveal<R: Rng + ?Sized>(
    options: &[WeightedOption],
    plan: RevealPlan,
    display: &mut dyn RevealDisplay,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<RevealOutcome, RevealError> {
    let selector = match WeightedSelector::new(options) {
        Ok(selector) => selector,
        Err(SelectError::Empty) => {
            debug!("reveal requested with no options");
            display.no_options();
            return Ok(RevealOutcome::NoOptions);
        }
    };

    let mut machine = RevealMachine::new(plan);
    machine.start()?;
    debug!(
        "reveal started: {} ticks of {:?}",
        plan.total_ticks(),
        plan.period()
    );

    // `interval` panics on a zero period; `period()` is never below MIN_TICK.
    let mut ticker = interval(plan.period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first `tick()` resolves immediately; the first sample is shown one
    // tick after start.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if cancel.load(Ordering::Relaxed) {
            return match machine.cancel()? {
                Some(label) => {
                    info!("reveal cancelled, settled on '{label}'");
                    display.settle(&label);
                    Ok(RevealOutcome::Settled(label))
                }
                None => {
                    info!("reveal cancelled before first sample");
                    Ok(RevealOutcome::Cancelled)
                }
            };
        }

        let sample = selector.sample(rng).label();
        match machine.on_sample(sample)? {
            RevealFrame::Showing { label, tick, total } => display.show(&label, tick, total),
            RevealFrame::Settled { label } => {
                info!("reveal settled on '{label}'");
                display.settle(&label);
                return Ok(RevealOutcome::Settled(label));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

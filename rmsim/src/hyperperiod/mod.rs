//! Hyperperiod calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of all their periods.  It is the smallest window after which the
//! release pattern repeats, and the simulation horizon: the engine steps
//! ticks `0..hyperperiod`.
//!
//! Only **active** templates (`period > 0`) contribute.  A task set without
//! any active template has no hyperperiod, which the engine reports as a
//! configuration error.
//!
//! # Failure cases
//!
//! | Case | Variant |
//! |------|---------|
//! | empty input, or every period `<= 0` | [`HyperperiodError::NoValidPeriods`] |
//! | LCM does not fit in a `u64` | [`HyperperiodError::Overflow`] |
//! | LCM above the configured horizon limit | [`HyperperiodError::TooLarge`] |

pub mod math;

use tracing::{debug, info, warn};

use crate::task::{TaskTemplate, Tick};
use math::lcm_all;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Default upper limit on the simulation horizon, in ticks.
///
/// The engine produces one slot per tick, so this bounds both run time and
/// the size of the returned schedule.  Override with
/// [`HyperperiodCalculator::with_limit`].
pub const DEFAULT_HYPERPERIOD_LIMIT: Tick = 10_000_000;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperperiodError {
    /// No template had a positive period (or there were no templates).
    NoValidPeriods,

    /// LCM calculation overflowed `u64`.
    ///
    /// Contains the two operands that caused the overflow.
    Overflow { a: Tick, b: Tick },

    /// The hyperperiod exceeded the configured limit.
    TooLarge { value: Tick, limit: Tick },
}

impl std::fmt::Display for HyperperiodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HyperperiodError::NoValidPeriods => {
                write!(f, "no task template has a positive period")
            }
            HyperperiodError::Overflow { a, b } => {
                write!(f, "LCM overflow computing lcm({a}, {b})")
            }
            HyperperiodError::TooLarge { value, limit } => write!(
                f,
                "hyperperiod of {value} ticks exceeds the limit of {limit} ticks"
            ),
        }
    }
}

impl std::error::Error for HyperperiodError {}

// ── HyperperiodInfo ───────────────────────────────────────────────────────────

/// Calculated hyperperiod for one task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperperiodInfo {
    /// Hyperperiod in ticks (LCM of all unique active periods).
    pub hyperperiod: Tick,

    /// Unique active periods (sorted, deduplicated).
    pub unique_periods: Vec<Tick>,

    /// Number of active templates that contributed.
    pub task_count: usize,
}

// ── HyperperiodCalculator ─────────────────────────────────────────────────────

/// Computes the simulation horizon for a task set.
///
/// # Example
/// ```rust
/// use rmsim::hyperperiod::HyperperiodCalculator;
/// use rmsim::task::TaskTemplate;
///
/// let templates = vec![
///     TaskTemplate::new("fast", 4, 0, 1),
///     TaskTemplate::new("slow", 6, 0, 2),
///     TaskTemplate::new("off", 0, 0, 1), // disabled, ignored
/// ];
///
/// let info = HyperperiodCalculator::new().calculate(&templates).unwrap();
/// assert_eq!(info.hyperperiod, 12);
/// assert_eq!(info.task_count, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HyperperiodCalculator {
    /// Upper bound on the hyperperiod.  A larger value is
    /// [`HyperperiodError::TooLarge`].
    limit: Tick,
}

impl HyperperiodCalculator {
    /// Calculator with [`DEFAULT_HYPERPERIOD_LIMIT`].
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }

    /// Calculator with a custom limit (in ticks).
    pub fn with_limit(limit: Tick) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Tick {
        self.limit
    }

    /// Calculate the hyperperiod of the active templates in `templates`.
    ///
    /// Disabled templates (`period <= 0`) are filtered out first.
    ///
    /// # Errors
    /// * [`HyperperiodError::NoValidPeriods`] – nothing left to schedule.
    /// * [`HyperperiodError::Overflow`] – LCM exceeded `u64`.
    /// * [`HyperperiodError::TooLarge`] – result exceeds the limit.
    pub fn calculate(&self, templates: &[TaskTemplate]) -> Result<HyperperiodInfo, HyperperiodError> {
        let active: Vec<Tick> = templates
            .iter()
            .filter(|t| t.is_active())
            .map(|t| t.period as Tick)
            .collect();

        if active.is_empty() {
            warn!(
                template_count = templates.len(),
                "No task template with a positive period"
            );
            return Err(HyperperiodError::NoValidPeriods);
        }

        let unique_periods: Vec<Tick> = {
            let mut v = active.clone();
            v.sort_unstable();
            v.dedup();
            v
        };

        let hyperperiod = lcm_all(unique_periods.iter().copied())?;

        if hyperperiod > self.limit {
            warn!(hyperperiod, limit = self.limit, "Hyperperiod exceeds configured limit");
            return Err(HyperperiodError::TooLarge {
                value: hyperperiod,
                limit: self.limit,
            });
        }

        info!(
            task_count = active.len(),
            unique_count = unique_periods.len(),
            hyperperiod,
            "Calculated hyperperiod"
        );
        for p in &unique_periods {
            debug!(period = p, releases = hyperperiod / p, "  unique period");
        }

        Ok(HyperperiodInfo {
            hyperperiod,
            unique_periods,
            task_count: active.len(),
        })
    }
}

impl Default for HyperperiodCalculator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

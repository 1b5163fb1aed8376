//! Rate-Monotonic simulation engine.
//!
//! [`RmSimulator`] turns a set of periodic [`TaskTemplate`]s into a
//! [`Schedule`] covering exactly one hyperperiod on a single processor.
//!
//! # Pipeline
//!
//! ```text
//! templates ─► validate ─► hyperperiod ─► RM ranking ─► instances ─► clock loop ─► overload report
//!                              │              │
//!                              └──► utilisation check (warning only)
//! ```
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `simulate()`; the pool lives only inside one call |
//! | Selection | Re-evaluated every tick, so preemption needs no explicit event |
//! | Tie-break | [`PriorityKey`]: period, release, declaration index |
//! | Instance ids | Monotonic counter, diagnostics only |
//! | Overload | `U > 1` is logged and flagged; the horizon always runs to the end |
//! | Deadlines | Informational; drops are decided at the horizon only |
//!
//! # Example
//! ```rust
//! use rmsim::scheduler::RmSimulator;
//! use rmsim::task::TaskTemplate;
//!
//! let templates = vec![
//!     TaskTemplate::new("fast", 4, 0, 1),
//!     TaskTemplate::new("slow", 6, 0, 2),
//! ];
//!
//! let schedule = RmSimulator::new().simulate(&templates).unwrap();
//! assert_eq!(schedule.hyperperiod, 12);
//! assert_eq!(schedule.slots[0].task(), Some("fast"));
//! assert!(schedule.is_feasible());
//! ```

pub mod error;
pub mod feasibility;
pub mod instances;
pub mod overload;
pub mod pool;
pub mod priority;

pub use error::{ConfigurationError, MalformedReason, SimulationError};
pub use priority::PriorityKey;

use tracing::{debug, info, warn};

use crate::hyperperiod::{HyperperiodCalculator, DEFAULT_HYPERPERIOD_LIMIT};
use crate::schedule::{Completion, Schedule, Slot};
use crate::task::{TaskInstance, TaskTemplate, Tick};

use feasibility::check_utilization;
use instances::generate_instances;
use overload::report_dropped;
use pool::InstancePool;
use priority::{assign_priorities, RankedTemplate};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Processor time granted per tick.  There is no finer preemption
/// granularity, so usage always advances by one full tick.
pub const CLOCK_STEP: Tick = 1;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Largest hyperperiod (in ticks) the engine agrees to simulate.
    pub hyperperiod_limit: Tick,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            hyperperiod_limit: DEFAULT_HYPERPERIOD_LIMIT,
        }
    }
}

// ── Clock loop output ─────────────────────────────────────────────────────────

/// Everything the clock loop produces before overload reporting.
struct Timeline {
    slots: Vec<Slot>,
    completions: Vec<Completion>,
    remaining: Vec<TaskInstance>,
}

// ── RmSimulator ───────────────────────────────────────────────────────────────

/// The RM simulation engine.
///
/// Holds only immutable configuration.  All per-run state (the instance
/// pool, the schedule being built) is created inside
/// [`simulate()`](Self::simulate) and dropped or returned at the end, so one
/// simulator can be shared and reused freely.
#[derive(Debug, Clone, Default)]
pub struct RmSimulator {
    config: SimulatorConfig,
}

impl RmSimulator {
    /// Simulator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Simulate RM scheduling of `templates` over one hyperperiod.
    ///
    /// Disabled templates (`period <= 0`) are ignored.  Overload never fails
    /// the call: it shows up as `schedule.utilization.overloaded` and as
    /// entries in `schedule.dropped`.
    ///
    /// # Errors
    /// * [`ConfigurationError::EmptyTaskSet`] – `templates` is empty.
    /// * [`ConfigurationError::Hyperperiod`] – no active template, LCM
    ///   overflow, or hyperperiod above the configured limit.
    /// * [`SimulationError::MalformedTemplate`] – an active template has a
    ///   non-positive execution or a negative release.
    pub fn simulate(&self, templates: &[TaskTemplate]) -> Result<Schedule, SimulationError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        if templates.is_empty() {
            return Err(ConfigurationError::EmptyTaskSet.into());
        }
        Self::validate(templates)?;

        let info = HyperperiodCalculator::with_limit(self.config.hyperperiod_limit)
            .calculate(templates)?;
        let hyperperiod = info.hyperperiod;

        // ── Priorities and utilisation ────────────────────────────────────────
        let ranked = assign_priorities(templates);
        let utilization = check_utilization(&ranked, hyperperiod);

        info!(
            template_count = templates.len(),
            active_count = ranked.len(),
            hyperperiod,
            utilization = utilization.utilization,
            "=== RmSimulator::simulate() ==="
        );

        if utilization.overloaded {
            warn!(
                utilization = utilization.utilization,
                demand = utilization.demand,
                capacity = utilization.capacity,
                "Utilization exceeds 1, instances will be dropped; simulating anyway"
            );
        }

        // ── Instances and clock ───────────────────────────────────────────────
        let instances = generate_instances(&ranked, hyperperiod);
        let instance_count = instances.len();
        let timeline = Self::run_clock(InstancePool::new(instances), hyperperiod);

        // ── Overload report ───────────────────────────────────────────────────
        let dropped = report_dropped(timeline.remaining, hyperperiod);

        info!(
            instances = instance_count,
            completed = timeline.completions.len(),
            dropped = dropped.len(),
            "=== Simulation complete ==="
        );

        Ok(Schedule {
            hyperperiod,
            utilization,
            task_order: Self::task_order(&ranked),
            slots: timeline.slots,
            completions: timeline.completions,
            dropped,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Reject malformed active templates before anything is generated.
    fn validate(templates: &[TaskTemplate]) -> Result<(), SimulationError> {
        for (index, template) in templates.iter().enumerate() {
            if !template.is_active() {
                debug!(index, task = %template.name, period = template.period, "template disabled");
                continue;
            }
            if let Err(reason) = template.validate() {
                warn!(index, task = %template.name, %reason, "✗ malformed template");
                return Err(SimulationError::MalformedTemplate { index, reason });
            }
        }
        Ok(())
    }

    /// Step the clock over `[0, hyperperiod)`.
    ///
    /// Each tick releases due instances, then gives the tick to the
    /// highest-priority released one.  Because the choice is made from
    /// scratch every tick, a newly released higher-priority instance
    /// preempts the running one at the tick it is released.
    fn run_clock(mut pool: InstancePool, hyperperiod: Tick) -> Timeline {
        let mut slots = Vec::with_capacity(usize::try_from(hyperperiod).unwrap_or_default());
        let mut completions = Vec::new();

        let mut tick: Tick = 0;
        while tick < hyperperiod {
            pool.release(tick);

            match pool.dispatch(CLOCK_STEP) {
                None => {
                    debug!(tick, "No task uses the processor");
                    slots.push(Slot::Idle);
                }
                Some(dispatch) => {
                    debug!(
                        tick,
                        task = %dispatch.task,
                        instance = %dispatch.instance,
                        completed = dispatch.completed,
                        "uses the processor"
                    );
                    if dispatch.completed {
                        completions.push(Completion {
                            task: dispatch.task.clone(),
                            instance: dispatch.instance,
                            tick: tick + CLOCK_STEP,
                        });
                    }
                    slots.push(Slot::Running {
                        task: dispatch.task,
                        instance: dispatch.instance,
                    });
                }
            }

            tick += CLOCK_STEP;
        }

        Timeline {
            slots,
            completions,
            remaining: pool.into_remaining(),
        }
    }

    /// Active task names in RM order, first occurrence wins.
    fn task_order(ranked: &[RankedTemplate]) -> Vec<String> {
        let mut order: Vec<String> = Vec::with_capacity(ranked.len());
        for t in ranked {
            if !order.contains(&t.name) {
                order.push(t.name.clone());
            }
        }
        order
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperperiod::HyperperiodError;
    use crate::task::InstanceId;

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn simulate(templates: &[TaskTemplate]) -> Schedule {
        RmSimulator::new().simulate(templates).unwrap()
    }

    /// Task name per tick, `"-"` for idle.
    fn timeline(schedule: &Schedule) -> Vec<&str> {
        schedule
            .slots
            .iter()
            .map(|s| s.task().unwrap_or("-"))
            .collect()
    }

    /// Naive reference: scan every instance each tick and pick the smallest
    /// priority key, the straightforward way.
    fn reference_timeline(templates: &[TaskTemplate]) -> Vec<Option<InstanceId>> {
        let h = HyperperiodCalculator::new().calculate(templates).unwrap().hyperperiod;
        let mut pool = generate_instances(&assign_priorities(templates), h);
        let mut out = Vec::new();
        for tick in 0..h {
            let pos = pool
                .iter()
                .enumerate()
                .filter(|(_, i)| i.start <= tick)
                .min_by_key(|(_, i)| i.priority_key())
                .map(|(pos, _)| pos);
            match pos {
                None => out.push(None),
                Some(pos) => {
                    out.push(Some(pool[pos].id));
                    if pool[pos].run(1) {
                        pool.remove(pos);
                    }
                }
            }
        }
        out
    }

    fn instance_timeline(schedule: &Schedule) -> Vec<Option<InstanceId>> {
        schedule
            .slots
            .iter()
            .map(|s| match s {
                Slot::Idle => None,
                Slot::Running { instance, .. } => Some(*instance),
            })
            .collect()
    }

    // ── Scenario A: feasible two-task set ─────────────────────────────────────

    #[test]
    fn scenario_a_hyperperiod_and_coverage() {
        let s = simulate(&[
            TaskTemplate::new("T4", 4, 0, 1),
            TaskTemplate::new("T6", 6, 0, 2),
        ]);
        assert_eq!(s.hyperperiod, 12);
        assert_eq!(s.len(), 12);
        assert!(s.dropped.is_empty());
        assert!(!s.is_overloaded());
        assert_eq!(s.slots[0].task(), Some("T4"), "period-4 task must win tick 0");
    }

    #[test]
    fn scenario_a_exact_timeline() {
        let s = simulate(&[
            TaskTemplate::new("T4", 4, 0, 1),
            TaskTemplate::new("T6", 6, 0, 2),
        ]);
        assert_eq!(
            timeline(&s),
            vec!["T4", "T6", "T6", "-", "T4", "-", "T6", "T6", "T4", "-", "-", "-"]
        );
        let done: Vec<(&str, Tick)> = s
            .completions
            .iter()
            .map(|c| (c.task.as_str(), c.tick))
            .collect();
        assert_eq!(
            done,
            vec![("T4", 1), ("T6", 3), ("T4", 5), ("T6", 8), ("T4", 9)]
        );
    }

    // ── Scenario B: overload ──────────────────────────────────────────────────

    #[test]
    fn scenario_b_overload_is_flagged_and_drops_instances() {
        let s = simulate(&[
            TaskTemplate::new("T2", 2, 0, 2),
            TaskTemplate::new("T3", 3, 0, 2),
        ]);
        assert!(s.is_overloaded());
        assert_eq!(s.hyperperiod, 6);
        assert_eq!(s.len(), 6, "overload must not cut the horizon short");
        assert!(!s.dropped.is_empty());
        assert!(s.dropped.iter().all(|d| d.dropped_at == 6));
        // T2 needs the whole processor, so T3 never runs
        assert!(s.slots.iter().all(|slot| slot.task() == Some("T2")));
        assert_eq!(s.dropped.len(), 2);
        assert!(s.dropped.iter().all(|d| d.task == "T3" && d.usage == 0));
    }

    // ── Preemption ────────────────────────────────────────────────────────────

    #[test]
    fn higher_priority_release_preempts_running_instance() {
        // "long" starts at 0; "short" is released at 2 and takes over at once
        let s = simulate(&[
            TaskTemplate::new("long", 10, 0, 4),
            TaskTemplate::new("short", 5, 2, 1),
        ]);
        assert_eq!(&timeline(&s)[..6], &["long", "long", "short", "long", "long", "-"]);
        assert!(s.is_feasible());
    }

    #[test]
    fn running_slot_is_always_the_best_released_instance() {
        let sets = vec![
            vec![
                TaskTemplate::new("a", 4, 0, 1),
                TaskTemplate::new("b", 6, 1, 2),
                TaskTemplate::new("c", 12, 0, 3),
            ],
            vec![
                TaskTemplate::new("a", 3, 0, 2),
                TaskTemplate::new("b", 4, 0, 2),
                TaskTemplate::new("c", 6, 2, 1),
            ],
            vec![
                TaskTemplate::new("x", 5, 0, 2),
                TaskTemplate::new("y", 5, 1, 2),
                TaskTemplate::new("z", 10, 3, 3),
            ],
        ];
        for templates in sets {
            let s = simulate(&templates);
            assert_eq!(
                instance_timeline(&s),
                reference_timeline(&templates),
                "engine diverged from naive RM selection for {templates:?}"
            );
        }
    }

    #[test]
    fn equal_periods_run_in_release_then_declaration_order() {
        let s = simulate(&[
            TaskTemplate::new("second", 4, 0, 1),
            TaskTemplate::new("first", 4, 0, 1),
        ]);
        // Same period and release: declaration order decides
        assert_eq!(&timeline(&s)[..2], &["second", "first"]);
    }

    // ── Feasible sets ─────────────────────────────────────────────────────────

    #[test]
    fn feasible_harmonic_set_has_no_drops() {
        // U = 1/4 + 2/8 + 4/16 = 0.75
        let s = simulate(&[
            TaskTemplate::new("a", 4, 0, 1),
            TaskTemplate::new("b", 8, 0, 2),
            TaskTemplate::new("c", 16, 0, 4),
        ]);
        assert!(s.is_feasible());
        assert_eq!(s.busy_ticks(), 12);
    }

    #[test]
    fn feasible_classic_set_has_no_drops() {
        // U = 1/4 + 2/6 + 3/12 = 0.833
        let s = simulate(&[
            TaskTemplate::new("a", 4, 0, 1),
            TaskTemplate::new("b", 6, 0, 2),
            TaskTemplate::new("c", 12, 0, 3),
        ]);
        assert_eq!(s.hyperperiod, 12);
        assert!(!s.is_overloaded());
        assert!(s.is_feasible());
        assert_eq!(s.completions.len(), 3 + 2 + 1);
    }

    #[test]
    fn fully_utilised_harmonic_set_has_no_drops() {
        // U = 1/2 + 2/4 = 1.0 exactly
        let s = simulate(&[
            TaskTemplate::new("a", 2, 0, 1),
            TaskTemplate::new("b", 4, 0, 2),
        ]);
        assert!(!s.is_overloaded());
        assert!(s.is_feasible());
        assert_eq!(s.idle_ticks(), 0);
    }

    // ── Boundaries ────────────────────────────────────────────────────────────

    #[test]
    fn release_offset_delays_first_instance() {
        let s = simulate(&[TaskTemplate::new("late", 5, 3, 1)]);
        assert_eq!(s.hyperperiod, 5);
        assert_eq!(timeline(&s), vec!["-", "-", "-", "late", "-"]);
        assert_eq!(s.completions[0].tick, 4);
    }

    #[test]
    fn release_beyond_horizon_only_idles() {
        let s = simulate(&[TaskTemplate::new("never", 4, 9, 1)]);
        assert_eq!(s.len(), 4);
        assert_eq!(s.idle_ticks(), 4);
        assert!(s.completions.is_empty());
        assert!(s.dropped.is_empty());
    }

    #[test]
    fn disabled_template_contributes_nothing() {
        let s = simulate(&[
            TaskTemplate::new("on", 3, 0, 1),
            TaskTemplate::new("off", 0, 0, 1),
            TaskTemplate::new("neg", -7, 0, 1),
        ]);
        assert_eq!(s.hyperperiod, 3);
        assert_eq!(s.task_order, vec!["on".to_string()]);
        assert!(s.slots.iter().all(|slot| slot.task() != Some("off")));
        assert!(s.slots.iter().all(|slot| slot.task() != Some("neg")));
    }

    #[test]
    fn disabled_template_is_not_validated() {
        // execution 0 would be malformed, but the template is disabled
        let s = simulate(&[
            TaskTemplate::new("on", 2, 0, 1),
            TaskTemplate::new("off", -1, 0, 0),
        ]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn deadline_is_not_enforced() {
        // Deadline of 1 is missed by the second task, but nothing is dropped
        let s = simulate(&[
            TaskTemplate::new("a", 4, 0, 2),
            TaskTemplate::new("b", 8, 0, 2).with_deadline(1),
        ]);
        assert!(s.is_feasible());
        let b_done = s.completions.iter().find(|c| c.task == "b").unwrap();
        assert_eq!(b_done.tick, 4);
    }

    // ── Determinism ───────────────────────────────────────────────────────────

    #[test]
    fn simulation_is_idempotent() {
        let templates = vec![
            TaskTemplate::new("a", 3, 0, 1),
            TaskTemplate::new("b", 5, 1, 2),
            TaskTemplate::new("c", 15, 0, 4),
        ];
        let sim = RmSimulator::new();
        let reference = sim.simulate(&templates).unwrap();
        for _ in 0..10 {
            assert_eq!(sim.simulate(&templates).unwrap(), reference);
        }
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn empty_task_set_is_a_configuration_error() {
        let err = RmSimulator::new().simulate(&[]).unwrap_err();
        assert_eq!(
            err,
            SimulationError::Configuration(ConfigurationError::EmptyTaskSet)
        );
    }

    #[test]
    fn only_disabled_templates_is_a_configuration_error() {
        let err = RmSimulator::new()
            .simulate(&[TaskTemplate::new("off", 0, 0, 1)])
            .unwrap_err();
        assert_eq!(err, SimulationError::from(HyperperiodError::NoValidPeriods));
    }

    #[test]
    fn non_positive_execution_is_malformed() {
        let err = RmSimulator::new()
            .simulate(&[
                TaskTemplate::new("ok", 4, 0, 1),
                TaskTemplate::new("bad", 4, 0, -2),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::MalformedTemplate {
                index: 1,
                reason: MalformedReason::NonPositiveExecution { execution: -2 },
            }
        );
    }

    #[test]
    fn negative_release_is_malformed() {
        let err = RmSimulator::new()
            .simulate(&[TaskTemplate::new("bad", 4, -1, 1)])
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::MalformedTemplate {
                index: 0,
                reason: MalformedReason::NegativeRelease { release: -1 }
            }
        ));
    }

    #[test]
    fn hyperperiod_limit_is_configurable() {
        let sim = RmSimulator::with_config(SimulatorConfig {
            hyperperiod_limit: 10,
        });
        let err = sim
            .simulate(&[
                TaskTemplate::new("a", 4, 0, 1),
                TaskTemplate::new("b", 6, 0, 1),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::from(HyperperiodError::TooLarge { value: 12, limit: 10 })
        );
    }

    #[test]
    fn task_order_follows_rm_ranking_without_duplicates() {
        let s = simulate(&[
            TaskTemplate::new("slow", 12, 0, 1),
            TaskTemplate::new("fast", 3, 0, 1),
            TaskTemplate::new("fast", 6, 0, 1),
        ]);
        assert_eq!(s.task_order, vec!["fast".to_string(), "slow".to_string()]);
    }
}

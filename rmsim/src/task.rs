/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core task data structures for the RM simulator.
//!
//! Two distinct types model the two sides of the simulation pipeline:
//!
//! ```text
//! task file  ──(config)──►  TaskTemplate  ──(instance generator)──►  TaskInstance  ──(engine)──►  Schedule
//!                            ↑ input                                   ↑ working state
//!                            immutable, raw signed values              usage mutated per tick
//! ```
//!
//! # Ownership model
//! `TaskTemplate`s are **borrowed** by the simulator; the caller keeps them.
//! `TaskInstance`s are created once per run and **owned** by the engine's
//! pool until they complete or the horizon ends.  Nothing else ever holds a
//! reference to an instance, so the usage counters need no synchronisation.

use std::fmt;

use serde::Serialize;

use crate::scheduler::error::MalformedReason;

/// Discrete simulation time, in ticks.
///
/// The unit is left to the caller (ms, µs, abstract slots); the engine only
/// requires that every timing value is an integral number of ticks.
pub type Tick = u64;

// ── TaskTemplate (input) ──────────────────────────────────────────────────────

/// A periodic task specification.
///
/// Timing fields are kept as signed integers exactly as they arrive from the
/// input.  A template with `period <= 0` is **disabled**: it contributes no
/// instances, no utilisation and no hyperperiod factor.  That is a normal
/// state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskTemplate {
    /// Task identifier.  Expected to be unique, but not validated.
    pub name: String,

    /// Time between consecutive releases.
    pub period: i64,

    /// Offset of the first release from tick 0.
    pub release: i64,

    /// Processor time each instance needs to complete.
    pub execution: i64,

    /// Relative deadline.  Informational only; the engine never enforces it.
    pub deadline: i64,
}

impl TaskTemplate {
    /// Build a template with an implicit deadline (equal to `period`).
    pub fn new(name: impl Into<String>, period: i64, release: i64, execution: i64) -> Self {
        Self {
            name: name.into(),
            period,
            release,
            execution,
            deadline: period,
        }
    }

    /// Returns the template with a new `deadline`.
    pub fn with_deadline(self, deadline: i64) -> Self {
        Self { deadline, ..self }
    }

    /// `true` when the template takes part in scheduling (`period > 0`).
    pub fn is_active(&self) -> bool {
        self.period > 0
    }

    /// Processor utilisation fraction: `execution / period`.
    ///
    /// Returns `0.0` for disabled templates.
    pub fn utilization(&self) -> f64 {
        if self.is_active() {
            self.execution as f64 / self.period as f64
        } else {
            0.0
        }
    }

    /// Check the fields an active template needs before instances can be
    /// generated from it.
    pub fn validate(&self) -> Result<(), MalformedReason> {
        if self.execution <= 0 {
            return Err(MalformedReason::NonPositiveExecution {
                execution: self.execution,
            });
        }
        if self.release < 0 {
            return Err(MalformedReason::NegativeRelease {
                release: self.release,
            });
        }
        Ok(())
    }
}

// ── InstanceId ────────────────────────────────────────────────────────────────

/// Diagnostic identifier of a [`TaskInstance`].
///
/// Assigned from a monotonic counter by the instance generator, so identical
/// input always yields identical ids.  Never used for priority comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── TaskInstance (working state) ──────────────────────────────────────────────

/// One concrete release of a [`TaskTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInstance {
    /// Diagnostic id, unique within one simulation run.
    pub id: InstanceId,

    /// Declaration index of the originating template in the caller's input.
    pub template: usize,

    /// Name inherited from the template.
    pub name: String,

    /// Release time: `release + k * period`.
    pub start: Tick,

    /// Execution budget copied from the template.
    pub execution: Tick,

    /// Processor time granted so far.  Never exceeds `execution`.
    pub usage: Tick,

    /// RM priority, represented directly as the period (smaller is higher).
    pub priority: Tick,
}

impl TaskInstance {
    /// `true` once the instance has been released at `tick`.
    pub fn is_released(&self, tick: Tick) -> bool {
        self.start <= tick
    }

    /// Remaining budget: `execution - usage`.
    pub fn remaining(&self) -> Tick {
        self.execution.saturating_sub(self.usage)
    }

    pub fn is_complete(&self) -> bool {
        self.usage >= self.execution
    }

    /// Grant `amount` ticks of processor time.  Returns `true` when the
    /// instance has completed.
    ///
    /// Usage is clamped at `execution`.
    pub fn run(&mut self, amount: Tick) -> bool {
        self.usage = self.usage.saturating_add(amount).min(self.execution);
        self.is_complete()
    }
}

impl fmt::Display for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} - start: {} priority: {} budget: {}/{}",
            self.name, self.id, self.start, self.priority, self.usage, self.execution
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(start: Tick, execution: Tick) -> TaskInstance {
        TaskInstance {
            id: InstanceId(7),
            template: 0,
            name: "t1".into(),
            start,
            execution,
            usage: 0,
            priority: 10,
        }
    }

    // ── TaskTemplate ──────────────────────────────────────────────────────────

    #[test]
    fn new_template_has_implicit_deadline() {
        let t = TaskTemplate::new("t1", 10, 0, 3);
        assert_eq!(t.deadline, 10);
        assert_eq!(t.with_deadline(8).deadline, 8);
    }

    #[test]
    fn non_positive_period_is_disabled() {
        assert!(TaskTemplate::new("t", 1, 0, 1).is_active());
        assert!(!TaskTemplate::new("t", 0, 0, 1).is_active());
        assert!(!TaskTemplate::new("t", -4, 0, 1).is_active());
    }

    #[test]
    fn template_utilization_is_correct() {
        let t = TaskTemplate::new("t", 4, 0, 1);
        assert!((t.utilization() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn disabled_template_utilization_is_zero() {
        assert_eq!(TaskTemplate::new("t", 0, 0, 5).utilization(), 0.0);
    }

    #[test]
    fn validate_rejects_non_positive_execution() {
        let err = TaskTemplate::new("t", 4, 0, 0).validate().unwrap_err();
        assert_eq!(err, MalformedReason::NonPositiveExecution { execution: 0 });
    }

    #[test]
    fn validate_rejects_negative_release() {
        let err = TaskTemplate::new("t", 4, -1, 1).validate().unwrap_err();
        assert_eq!(err, MalformedReason::NegativeRelease { release: -1 });
    }

    #[test]
    fn validate_accepts_well_formed_template() {
        assert!(TaskTemplate::new("t", 4, 2, 1).validate().is_ok());
    }

    // ── TaskInstance ──────────────────────────────────────────────────────────

    #[test]
    fn instance_is_released_from_its_start_tick() {
        let inst = instance(3, 1);
        assert!(!inst.is_released(2));
        assert!(inst.is_released(3));
        assert!(inst.is_released(4));
    }

    #[test]
    fn run_reports_completion_once_budget_is_used() {
        let mut inst = instance(0, 2);
        assert!(!inst.run(1));
        assert_eq!(inst.remaining(), 1);
        assert!(inst.run(1));
        assert!(inst.is_complete());
        assert_eq!(inst.remaining(), 0);
    }

    #[test]
    fn usage_never_exceeds_execution() {
        let mut inst = instance(0, 2);
        assert!(inst.run(5));
        assert_eq!(inst.usage, 2);
    }

    #[test]
    fn display_includes_name_id_and_budget() {
        let mut inst = instance(4, 3);
        inst.run(1);
        assert_eq!(inst.to_string(), "t1#7 - start: 4 priority: 10 budget: 1/3");
    }
}

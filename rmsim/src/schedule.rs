/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The simulation result.
//!
//! A [`Schedule`] is a plain value: one [`Slot`] per tick of the hyperperiod,
//! the completion events, the dropped instances and the utilisation
//! diagnostic.  It derives `Serialize` so callers can export it as-is; the
//! text rendering lives in [`crate::report`].

use serde::Serialize;

use crate::scheduler::feasibility::UtilizationCheck;
use crate::task::{InstanceId, Tick};

/// What the processor did during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Slot {
    /// No released instance was waiting.
    Idle,
    /// `instance` of `task` held the processor.
    Running { task: String, instance: InstanceId },
}

impl Slot {
    /// Name of the running task, `None` when idle.
    pub fn task(&self) -> Option<&str> {
        match self {
            Slot::Idle => None,
            Slot::Running { task, .. } => Some(task),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Slot::Idle)
    }
}

/// An instance reached its execution budget at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub task: String,
    pub instance: InstanceId,
    /// End of the tick in which the last unit of work ran (`i + 1`).
    pub tick: Tick,
}

/// An instance still incomplete when the horizon ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedInstance {
    pub task: String,
    pub instance: InstanceId,
    pub start: Tick,
    /// Partial usage at the end of the horizon, for diagnostics only.
    pub usage: Tick,
    pub execution: Tick,
    /// Always the hyperperiod.
    pub dropped_at: Tick,
}

/// Full timeline of one RM simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    /// Simulation horizon; `slots.len() == hyperperiod`.
    pub hyperperiod: Tick,

    pub utilization: UtilizationCheck,

    /// Names of the active templates in RM order, without duplicates.
    pub task_order: Vec<String>,

    pub slots: Vec<Slot>,

    /// In completion order.
    pub completions: Vec<Completion>,

    /// In priority order.
    pub dropped: Vec<DroppedInstance>,
}

impl Schedule {
    /// Number of simulated ticks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` when utilisation exceeded 1 (diagnostic flag).
    pub fn is_overloaded(&self) -> bool {
        self.utilization.overloaded
    }

    /// `true` when every instance completed inside the hyperperiod.
    pub fn is_feasible(&self) -> bool {
        self.dropped.is_empty()
    }

    pub fn idle_ticks(&self) -> usize {
        self.slots.iter().filter(|s| s.is_idle()).count()
    }

    pub fn busy_ticks(&self) -> usize {
        self.len() - self.idle_ticks()
    }

    /// Ticks on which `task` held the processor.
    pub fn ticks_for<'a>(&'a self, task: &'a str) -> impl Iterator<Item = Tick> + 'a {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.task() == Some(task))
            .map(|(tick, _)| tick as Tick)
    }

    /// Number of context switches: ticks where the running instance differs
    /// from the previous tick's, idle ticks excluded.
    pub fn context_switches(&self) -> usize {
        let mut previous: Option<InstanceId> = None;
        let mut switches = 0;
        for slot in &self.slots {
            if let Slot::Running { instance, .. } = slot {
                if previous.is_some_and(|p| p != *instance) {
                    switches += 1;
                }
                previous = Some(*instance);
            }
        }
        switches
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

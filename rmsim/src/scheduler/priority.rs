/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Rate-Monotonic priority assignment.
//!
//! RM gives the highest priority to the shortest period.  Priorities are
//! represented directly as the period, so "smaller is higher" everywhere.
//!
//! # Tie-break
//! Equal periods mean equal RM priority.  The order between them is fixed
//! explicitly instead of relying on sort stability:
//!
//! * templates: declaration index ascending;
//! * instances ([`PriorityKey`]): period, then release time (earlier first),
//!   then template declaration index.
//!
//! Instance ids never take part in the comparison.

use tracing::debug;

use crate::task::{TaskInstance, TaskTemplate, Tick};

/// Total order used to pick the instance that runs on a tick.
///
/// The derived `Ord` compares fields in declaration order, so the smallest
/// key is the highest-priority instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityKey {
    pub period: Tick,
    pub start: Tick,
    pub template: usize,
}

impl TaskInstance {
    pub fn priority_key(&self) -> PriorityKey {
        PriorityKey {
            period: self.priority,
            start: self.start,
            template: self.template,
        }
    }
}

/// An active template with validated timing, in RM order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTemplate {
    /// Position in RM order (0 = highest priority).
    pub rank: usize,
    /// Declaration index in the caller's template list.
    pub index: usize,
    pub name: String,
    pub period: Tick,
    pub release: Tick,
    pub execution: Tick,
}

/// Order the active templates by RM priority.
///
/// Disabled templates (`period <= 0`) are left out.  Callers must have
/// validated the active templates first (non-negative release, positive
/// execution).
pub fn assign_priorities(templates: &[TaskTemplate]) -> Vec<RankedTemplate> {
    let mut active: Vec<(usize, &TaskTemplate)> = templates
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_active())
        .collect();

    active.sort_by_key(|&(index, t)| (t.period, index));

    active
        .into_iter()
        .enumerate()
        .map(|(rank, (index, t))| {
            debug!(rank, task = %t.name, period = t.period, "RM priority assigned");
            RankedTemplate {
                rank,
                index,
                name: t.name.clone(),
                period: t.period as Tick,
                release: t.release as Tick,
                execution: t.execution as Tick,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

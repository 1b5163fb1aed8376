/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! End-of-horizon overload reporting.

use tracing::warn;

use crate::schedule::DroppedInstance;
use crate::task::{TaskInstance, Tick};

/// Turn every instance left in the pool after the last tick into a
/// [`DroppedInstance`] at time `horizon`.
///
/// Partial usage is carried over for diagnostics only.  The result is in
/// priority order.
pub fn report_dropped(mut remaining: Vec<TaskInstance>, horizon: Tick) -> Vec<DroppedInstance> {
    remaining.sort_by_key(TaskInstance::priority_key);

    remaining
        .into_iter()
        .map(|inst| {
            warn!(
                task = %inst.name,
                instance = %inst.id,
                start = inst.start,
                usage = inst.usage,
                execution = inst.execution,
                "{} is dropped due to overload at time: {}",
                inst.name,
                horizon
            );
            DroppedInstance {
                task: inst.name,
                instance: inst.id,
                start: inst.start,
                usage: inst.usage,
                execution: inst.execution,
                dropped_at: horizon,
            }
        })
        .collect()
}

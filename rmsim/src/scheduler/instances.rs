/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Expansion of periodic templates into concrete task instances.

use std::iter;

use tracing::debug;

use super::priority::RankedTemplate;
use crate::task::{InstanceId, TaskInstance, Tick};

/// Release times of `template` inside `[0, hyperperiod)`.
///
/// `release, release + period, release + 2·period, …` while below the
/// horizon.  Empty when the first release is already at or past it.
pub fn release_times(template: &RankedTemplate, hyperperiod: Tick) -> impl Iterator<Item = Tick> {
    let period = template.period;
    iter::successors(Some(template.release), move |start| start.checked_add(period))
        .take_while(move |&start| start < hyperperiod)
}

/// Generate one instance per release of every ranked template.
///
/// Ids come from a counter starting at 0, assigned in RM order then release
/// order, so identical input always produces identical ids.  The order of
/// the returned pool carries no meaning; the engine selects by
/// [`PriorityKey`](super::priority::PriorityKey).
pub fn generate_instances(ranked: &[RankedTemplate], hyperperiod: Tick) -> Vec<TaskInstance> {
    let mut next_id = 0u64;
    let mut pool = Vec::new();

    for template in ranked {
        let before = pool.len();
        for start in release_times(template, hyperperiod) {
            pool.push(TaskInstance {
                id: InstanceId(next_id),
                template: template.index,
                name: template.name.clone(),
                start,
                execution: template.execution,
                usage: 0,
                priority: template.period,
            });
            next_id += 1;
        }
        debug!(
            task = %template.name,
            instances = pool.len() - before,
            first_release = template.release,
            "instances generated"
        );
    }

    pool
}

// ── Tests ─────────────────────────────────────────────────────────────────────

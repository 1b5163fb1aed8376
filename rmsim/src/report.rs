/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plain-text and YAML rendering of a [`Schedule`].
//!
//! The text form is a Gantt chart with one lane per task in RM order plus an
//! idle lane, followed by a per-tick processor log:
//!
//! ```text
//! tick  0  1  2  3  4  5  6  7  8  9  10 11
//! T4    #  .  .  .  #  .  .  .  #  .  .  .
//! T6    .  #  #  .  .  .  #  #  .  .  .  .
//! idle  .  .  .  #  .  #  .  .  .  #  #  #
//! ```

use std::fmt::Write;

use crate::schedule::{Schedule, Slot};

const RUNNING: char = '#';
const WAITING: char = '.';
const IDLE_LABEL: &str = "idle";

/// Render `schedule` as a text Gantt chart followed by the completion and
/// drop lists.
pub fn render_gantt(schedule: &Schedule) -> String {
    let mut out = String::new();
    let u = &schedule.utilization;

    // writeln! into a String cannot fail
    let _ = writeln!(
        out,
        "RM schedule over hyperperiod {} (utilization {:.3}, {}/{} busy ticks)",
        schedule.hyperperiod,
        u.utilization,
        schedule.busy_ticks(),
        schedule.len()
    );
    if u.overloaded {
        let _ = writeln!(
            out,
            "warning: utilization {:.3} exceeds 1, instances may be dropped",
            u.utilization
        );
    }
    out.push('\n');

    let label_width = schedule
        .task_order
        .iter()
        .map(String::len)
        .chain([IDLE_LABEL.len(), "tick".len()])
        .max()
        .unwrap_or(0)
        + 2;
    let cell_width = schedule.len().saturating_sub(1).to_string().len();

    let _ = write!(out, "{:<label_width$}", "tick");
    for tick in 0..schedule.len() {
        let _ = write!(out, "{tick:<cell_width$} ");
    }
    out.push('\n');

    for task in &schedule.task_order {
        let _ = write!(out, "{task:<label_width$}");
        for slot in &schedule.slots {
            let mark = if slot.task() == Some(task.as_str()) {
                RUNNING
            } else {
                WAITING
            };
            let _ = write!(out, "{mark:<cell_width$} ");
        }
        out.push('\n');
    }

    let _ = write!(out, "{:<label_width$}", IDLE_LABEL);
    for slot in &schedule.slots {
        let mark = if slot.is_idle() { RUNNING } else { WAITING };
        let _ = write!(out, "{mark:<cell_width$} ");
    }
    out.push('\n');

    out.push_str("\nprocessor:\n");
    for (tick, slot) in schedule.slots.iter().enumerate() {
        match slot {
            Slot::Idle => {
                let _ = writeln!(out, "  {}-{}  no task uses the processor", tick, tick + 1);
            }
            Slot::Running { task, instance } => {
                let _ = writeln!(out, "  {}-{}  {}{} uses the processor", tick, tick + 1, task, instance);
            }
        }
    }

    if !schedule.completions.is_empty() {
        out.push_str("\ncompleted:\n");
        for c in &schedule.completions {
            let _ = writeln!(out, "  {}{} finished at {}", c.task, c.instance, c.tick);
        }
    }

    if !schedule.dropped.is_empty() {
        out.push_str("\ndropped:\n");
        for d in &schedule.dropped {
            let _ = writeln!(
                out,
                "  {}{} is dropped due to overload at time: {} (ran {}/{})",
                d.task, d.instance, d.dropped_at, d.usage, d.execution
            );
        }
    }

    out
}

/// Serialize `schedule` as YAML.
pub fn render_yaml(schedule: &Schedule) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(schedule)
}

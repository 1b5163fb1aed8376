/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! rmsim – offline Rate-Monotonic schedule simulator
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task.rs         – TaskTemplate / TaskInstance
//! ├── hyperperiod/    – LCM horizon + GCD/LCM helpers
//! ├── scheduler/      – RM ranking, instance generation, clock loop, overload report
//! ├── schedule.rs     – simulation result (slots, completions, drops)
//! ├── config/         – YAML / text task-set loading
//! └── report.rs       – text Gantt chart and YAML export
//! ```

pub mod config;
pub mod hyperperiod;
pub mod report;
pub mod schedule;
pub mod scheduler;
pub mod task;

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Processor utilisation check.
//!
//! # Status: diagnostic only
//!
//! The total utilisation `U = Σ execution / period` is computed once before
//! the clock starts.  `U > 1` means the single processor is asked for more
//! time than exists, so some instances will be dropped.  It is **reported,
//! never enforced**: the engine still simulates the full hyperperiod and the
//! caller decides how to present the flag.
//!
//! `U ≤ 1` is necessary but not sufficient for an RM schedule without drops.
//! No finer schedulability test is attempted here.
//!
//! The overload decision uses exact integer arithmetic over the hyperperiod:
//! `Σ execution · (H / period) > H`, which avoids floating-point rounding
//! right at `U = 1` (e.g. three tasks of `1/3` each).

use serde::Serialize;

use super::priority::RankedTemplate;
use crate::task::Tick;

/// Result of the utilisation check for one task set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilizationCheck {
    /// `Σ execution / period` over the active templates.
    pub utilization: f64,

    /// Processor time requested by all instances in one hyperperiod.
    pub demand: Tick,

    /// Processor time available in one hyperperiod (the hyperperiod itself).
    pub capacity: Tick,

    /// `true` when utilisation exceeds 1.
    pub overloaded: bool,
}

/// `Σ execution / period` over `templates`.
pub fn total_utilization(templates: &[RankedTemplate]) -> f64 {
    templates
        .iter()
        .map(|t| t.execution as f64 / t.period as f64)
        .sum()
}

/// Compare the demand of one hyperperiod against its capacity.
///
/// `hyperperiod` must be a common multiple of every period in `templates`.
pub fn check_utilization(templates: &[RankedTemplate], hyperperiod: Tick) -> UtilizationCheck {
    let demand: u128 = templates
        .iter()
        .map(|t| t.execution as u128 * (hyperperiod / t.period) as u128)
        .sum();

    UtilizationCheck {
        utilization: total_utilization(templates),
        demand: Tick::try_from(demand).unwrap_or(Tick::MAX),
        capacity: hyperperiod,
        overloaded: demand > hyperperiod as u128,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Integer helpers for the hyperperiod: GCD and overflow-checked LCM.
//!
//! Free functions so they can be tested without building any templates.

use super::HyperperiodError;
use crate::task::Tick;

/// Iterative Euclidean GCD.  `gcd(0, n) == n`.
pub fn gcd(mut a: Tick, mut b: Tick) -> Tick {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// LCM of two positive periods.
///
/// Divides before multiplying (`a / gcd(a, b) * b`) and checks the final
/// multiplication, returning [`HyperperiodError::Overflow`] with both
/// operands when the result does not fit in a [`Tick`].
pub fn checked_lcm(a: Tick, b: Tick) -> Result<Tick, HyperperiodError> {
    debug_assert!(a > 0 && b > 0, "periods must be positive");
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// Fold a sequence of positive periods into their LCM.
///
/// An empty sequence has no hyperperiod: [`HyperperiodError::NoValidPeriods`].
pub fn lcm_all<I>(periods: I) -> Result<Tick, HyperperiodError>
where
    I: IntoIterator<Item = Tick>,
{
    let mut periods = periods.into_iter();
    let first = periods.next().ok_or(HyperperiodError::NoValidPeriods)?;
    periods.try_fold(first, checked_lcm)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

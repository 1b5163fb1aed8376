/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the RM simulator.
//!
//! Two layers:
//!
//! * [`MalformedReason`]: why a single template cannot be turned into
//!   instances (carries the offending value).
//! * [`SimulationError`]: top-level failure returned from
//!   [`RmSimulator::simulate()`](super::RmSimulator::simulate).
//!
//! Only these conditions are errors.  Utilisation above 1, idle ticks and
//! dropped instances are ordinary simulation output and are reported inside
//! the [`Schedule`](crate::schedule::Schedule).

use thiserror::Error;

use crate::hyperperiod::HyperperiodError;

// ── Malformed templates ───────────────────────────────────────────────────────

/// Detailed reason why a template was rejected.
///
/// The first two variants are raised by the engine's own validation, the
/// last two by the task-file parser in [`crate::config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Every instance needs at least one tick of processor time.
    NonPositiveExecution { execution: i64 },

    /// The first release cannot lie before tick 0.
    NegativeRelease { release: i64 },

    /// A text record did not have 4 or 5 whitespace-separated fields.
    WrongFieldCount { found: usize },

    /// A numeric field of a text record is not an integer.
    NotAnInteger { field: &'static str, value: String },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::NonPositiveExecution { execution } => {
                write!(f, "execution must be positive, got {}", execution)
            }

            MalformedReason::NegativeRelease { release } => {
                write!(f, "release must not be negative, got {}", release)
            }

            MalformedReason::WrongFieldCount { found } => write!(
                f,
                "expected 'period release execution deadline [name]', found {} field(s)",
                found
            ),

            MalformedReason::NotAnInteger { field, value } => {
                write!(f, "field '{}' is not an integer: '{}'", field, value)
            }
        }
    }
}

// ── Configuration errors ──────────────────────────────────────────────────────

/// The task set as a whole cannot be simulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `simulate()` was called with an empty template list.
    #[error("no task templates provided, task set is empty")]
    EmptyTaskSet,

    /// No simulation horizon could be derived from the templates.
    #[error("cannot determine the hyperperiod: {0}")]
    Hyperperiod(#[from] HyperperiodError),
}

// ── Top-level simulation errors ───────────────────────────────────────────────

/// Top-level error type returned by
/// [`RmSimulator::simulate()`](super::RmSimulator::simulate).
///
/// Both variants abort before any instance is generated; there is never a
/// partial schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A template's fields cannot describe a schedulable task.
    ///
    /// `index` is the template's position in its source: the declaration
    /// index for the engine, the 0-based line index for text task files.
    #[error("task template #{index} is malformed: {reason}")]
    MalformedTemplate {
        index: usize,
        reason: MalformedReason,
    },
}

impl From<HyperperiodError> for SimulationError {
    fn from(e: HyperperiodError) -> Self {
        SimulationError::Configuration(ConfigurationError::Hyperperiod(e))
    }
}

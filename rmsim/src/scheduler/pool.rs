/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The engine's instance pool.
//!
//! Instances wait in `pending` (sorted by release time) until the clock
//! reaches their start, then move to `ready`, a min-heap on
//! [`PriorityKey`].  Picking the highest-priority released instance is a
//! heap peek instead of a scan and sort of the whole pool on every tick.

use std::cmp::Ordering;
use std::collections::binary_heap::PeekMut;
use std::collections::{BinaryHeap, VecDeque};

use super::priority::PriorityKey;
use crate::task::{InstanceId, TaskInstance, Tick};

/// Heap entry ordered so the smallest [`PriorityKey`] is the heap maximum.
#[derive(Debug)]
struct Ready {
    key: PriorityKey,
    instance: TaskInstance,
}

impl PartialEq for Ready {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Ready {}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ready {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key)
    }
}

/// Outcome of granting one tick to the highest-priority instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub task: String,
    pub instance: InstanceId,
    pub completed: bool,
}

/// Not-yet-complete instances of one simulation run.
#[derive(Debug, Default)]
pub struct InstancePool {
    pending: VecDeque<TaskInstance>,
    ready: BinaryHeap<Ready>,
}

impl InstancePool {
    pub fn new(mut instances: Vec<TaskInstance>) -> Self {
        instances.sort_by_key(|i| (i.start, i.priority_key()));
        Self {
            pending: instances.into(),
            ready: BinaryHeap::new(),
        }
    }

    /// Number of instances that have not completed.
    pub fn len(&self) -> usize {
        self.pending.len() + self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every instance with `start <= tick` into the ready set.
    ///
    /// Returns how many were released.
    pub fn release(&mut self, tick: Tick) -> usize {
        let mut released = 0;
        while self.pending.front().is_some_and(|i| i.is_released(tick)) {
            if let Some(instance) = self.pending.pop_front() {
                self.ready.push(Ready {
                    key: instance.priority_key(),
                    instance,
                });
                released += 1;
            }
        }
        released
    }

    /// Highest-priority released instance, if any.
    pub fn peek(&self) -> Option<&TaskInstance> {
        self.ready.peek().map(|r| &r.instance)
    }

    /// Grant `amount` ticks to the highest-priority released instance and
    /// retire it if that completes it.  `None` when nothing is ready.
    pub fn dispatch(&mut self, amount: Tick) -> Option<Dispatch> {
        let mut top = self.ready.peek_mut()?;
        let completed = top.instance.run(amount);
        let dispatch = Dispatch {
            task: top.instance.name.clone(),
            instance: top.instance.id,
            completed,
        };
        if completed {
            PeekMut::pop(top);
        }
        Some(dispatch)
    }

    /// Consume the pool, returning every instance that never completed.
    pub fn into_remaining(self) -> Vec<TaskInstance> {
        self.ready
            .into_vec()
            .into_iter()
            .map(|r| r.instance)
            .chain(self.pending)
            .collect()
    }
}

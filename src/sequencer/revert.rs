// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Wall-clock timers that switch a fixture back off.
//!
//! Reverts are scheduled in wall-clock time, not beats: a tempo change
//! after scheduling does not move them.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::fixture::{FixtureClass, FixturePatch};

/// A one-shot patch applied to a single instance at `fires_at`
#[derive(Debug, Clone)]
pub struct PendingRevert {
    /// When the revert is due
    pub fires_at: Instant,
    /// Instance within the patch's class
    pub instance_index: usize,
    /// Patch to apply, e.g. `{active: false}`
    pub revert_patch: FixturePatch,
    /// Insertion order, breaks ties between equal `fires_at`
    seq: u64,
}

impl PendingRevert {
    /// Class the revert targets
    pub fn target_class(&self) -> FixtureClass {
        self.revert_patch.class()
    }
}

// For BinaryHeap - we want earliest fire time first
impl Eq for PendingRevert {}

impl PartialEq for PendingRevert {
    fn eq(&self, other: &Self) -> bool {
        self.fires_at == other.fires_at && self.seq == other.seq
    }
}

impl Ord for PendingRevert {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .fires_at
            .cmp(&self.fires_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingRevert {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending reverts owned by the scheduler
#[derive(Debug, Default)]
pub struct RevertQueue {
    queue: BinaryHeap<PendingRevert>,
    next_seq: u64,
}

impl RevertQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a revert
    pub fn schedule(&mut self, fires_at: Instant, instance_index: usize, revert_patch: FixturePatch) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(PendingRevert {
            fires_at,
            instance_index,
            revert_patch,
            seq,
        });
    }

    /// Remove and return every revert due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingRevert> {
        let mut due = Vec::new();
        while let Some(revert) = self.queue.peek() {
            if revert.fires_at > now {
                break;
            }
            if let Some(revert) = self.queue.pop() {
                due.push(revert);
            }
        }
        due
    }

    /// Drop every pending revert, returning how many were cancelled
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.queue.len();
        self.queue.clear();
        cancelled
    }

    /// Earliest pending fire time
    pub fn next_due(&self) -> Option<Instant> {
        self.queue.peek().map(|revert| revert.fires_at)
    }

    /// Number of pending reverts
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

//! `EventQueue` — pending process resumptions ordered by virtual time.
//!
//! # Ordering
//!
//! Events are ordered by `(at, seq)` where `seq` is a per-queue counter
//! stamped at push time.  Two events for the same instant therefore pop in
//! the order they were pushed, independent of which processes they belong
//! to.  Together with the seeded variate stream this is what makes replays
//! bit-identical.
//!
//! The queue also remembers the time of the last popped event and refuses
//! any push earlier than that, so the clock driven from it can never run
//! backwards.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use qn_core::{ProcessId, SimTime};

use crate::{EngineError, EngineResult};

/// A scheduled resumption of one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub at:  SimTime,
    pub seq: u64,
    pub pid: ProcessId,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap on (at, seq).
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of [`Event`]s.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap:        BinaryHeap<Event>,
    next_seq:    u64,
    last_popped: SimTime,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `pid` to resume at `at`.  Returns the sequence number
    /// assigned to the event.
    pub fn push(&mut self, at: SimTime, pid: ProcessId) -> EngineResult<u64> {
        if at < self.last_popped {
            return Err(EngineError::TimeTravel { at, last: self.last_popped });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Event { at, seq, pid });
        Ok(seq)
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        let event = self.heap.pop()?;
        self.last_popped = event.at;
        Some(event)
    }

    /// Fire time of the earliest event without removing it.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|e| e.at)
    }

    /// Time of the most recently popped event (`SimTime::ZERO` before the
    /// first pop).
    pub fn last_popped(&self) -> SimTime {
        self.last_popped
    }

    /// Drop every pending event.  Sequence numbering continues.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

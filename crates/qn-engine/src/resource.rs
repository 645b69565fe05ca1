//! `ResourcePool` — bounded mutual exclusion with a FIFO wait list.
//!
//! A pool hands out at most `capacity` slots.  A request either takes a free
//! slot immediately or joins the back of the wait list.  On release the freed
//! slot is transferred straight to the head of the wait list, never put back
//! as "free" first, so a requester arriving at the same instant cannot jump
//! ahead of someone who has been waiting.
//!
//! The pool only does bookkeeping.  Suspending and resuming the processes
//! involved is the simulation's job (see [`Simulation`][crate::Simulation]).

use std::collections::{BTreeSet, VecDeque};

use qn_core::{ConfigError, ConfigResult, ProcessId, ResourceId};

use crate::{EngineError, EngineResult};

/// Outcome of [`ResourcePool::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A slot was free and now belongs to the requester.
    Granted,
    /// All slots are taken; the requester is at position `position` (0-based)
    /// of the wait list.
    Queued { position: usize },
}

/// A bounded set of identical servers.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    id:       ResourceId,
    capacity: usize,
    holders:  BTreeSet<ProcessId>,
    waiting:  VecDeque<ProcessId>,
    /// Membership index over `waiting`.
    queued:   BTreeSet<ProcessId>,
}

impl ResourcePool {
    /// Create an empty pool.  Fails if `capacity` is zero.
    pub fn new(id: ResourceId, capacity: usize) -> ConfigResult<Self> {
        if capacity < 1 {
            return Err(ConfigError::CapacityTooSmall(capacity));
        }
        Ok(Self {
            id,
            capacity,
            holders: BTreeSet::new(),
            waiting: VecDeque::new(),
            queued:  BTreeSet::new(),
        })
    }

    /// Ask for a slot on behalf of `pid`.
    pub fn request(&mut self, pid: ProcessId) -> EngineResult<Request> {
        if self.holders.contains(&pid) || self.queued.contains(&pid) {
            return Err(EngineError::DuplicateRequest { pid, resource: self.id });
        }
        if self.holders.len() < self.capacity {
            self.holders.insert(pid);
            self.check_capacity()?;
            return Ok(Request::Granted);
        }
        self.waiting.push_back(pid);
        self.queued.insert(pid);
        Ok(Request::Queued { position: self.waiting.len() - 1 })
    }

    /// Return `pid`'s slot.  If someone is waiting, the slot goes to the
    /// longest waiter, whose id is returned so the caller can wake it.
    pub fn release(&mut self, pid: ProcessId) -> EngineResult<Option<ProcessId>> {
        if !self.holders.remove(&pid) {
            return Err(EngineError::NotHolder { pid, resource: self.id });
        }
        let Some(next) = self.waiting.pop_front() else {
            return Ok(None);
        };
        self.queued.remove(&next);
        self.holders.insert(next);
        self.check_capacity()?;
        Ok(Some(next))
    }

    /// Withdraw `pid` from the wait list.  Returns `false` if it was not
    /// waiting.
    pub fn cancel(&mut self, pid: ProcessId) -> bool {
        if !self.queued.remove(&pid) {
            return false;
        }
        self.waiting.retain(|&w| w != pid);
        true
    }

    fn check_capacity(&self) -> EngineResult<()> {
        if self.holders.len() > self.capacity {
            return Err(EngineError::CapacityExceeded {
                resource: self.id,
                holders:  self.holders.len(),
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held.
    pub fn in_use(&self) -> usize {
        self.holders.len()
    }

    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.holders.len())
    }

    /// Number of blocked requesters.
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_holder(&self, pid: ProcessId) -> bool {
        self.holders.contains(&pid)
    }

    pub fn is_waiting(&self, pid: ProcessId) -> bool {
        self.queued.contains(&pid)
    }
}

//! The `Simulation` struct and its event loop.

use qn_core::{ConfigResult, ProcessId, ResourceId, SimTime};
use tracing::{debug, trace, warn};

use crate::{
    EngineError, EngineResult, EventQueue, Process, ProcessContext, Request, ResourcePool, Step,
};

// ── Process table ─────────────────────────────────────────────────────────────

struct Slot<S> {
    /// `None` while the process is running (taken out for the `resume` call)
    /// and after it has been retired.
    process:    Option<Box<dyn Process<S>>>,
    alive:      bool,
    /// Resources this process holds a slot of, in acquisition order.
    held:       Vec<ResourceId>,
    /// Resource whose wait list this process is parked on.
    blocked_on: Option<ResourceId>,
}

/// Everything in a run except the world state.  Split out so that a running
/// process can borrow it mutably alongside `&mut S`.
pub(crate) struct Core<S> {
    pub(crate) now: SimTime,
    queue:          EventQueue,
    pools:          Vec<ResourcePool>,
    slots:          Vec<Slot<S>>,
    live:           usize,
    torn_down:      bool,
}

impl<S> Core<S> {
    fn new() -> Self {
        Self {
            now:       SimTime::ZERO,
            queue:     EventQueue::new(),
            pools:     Vec::new(),
            slots:     Vec::new(),
            live:      0,
            torn_down: false,
        }
    }

    fn ensure_open(&self) -> EngineResult<()> {
        if self.torn_down {
            return Err(EngineError::ClockTornDown);
        }
        Ok(())
    }

    fn is_alive(&self, pid: ProcessId) -> bool {
        self.slots.get(pid.index()).is_some_and(|s| s.alive)
    }

    fn slot_mut(&mut self, pid: ProcessId) -> EngineResult<&mut Slot<S>> {
        self.slots
            .get_mut(pid.index())
            .filter(|s| s.alive)
            .ok_or(EngineError::UnknownProcess(pid))
    }

    fn pool_mut(&mut self, resource: ResourceId) -> EngineResult<&mut ResourcePool> {
        self.pools
            .get_mut(resource.index())
            .ok_or(EngineError::UnknownResource(resource))
    }

    pub(crate) fn resource(&self, resource: ResourceId) -> Option<&ResourcePool> {
        self.pools.get(resource.index())
    }

    pub(crate) fn schedule(&mut self, pid: ProcessId, delay: f64) -> EngineResult<()> {
        self.ensure_open()?;
        if let Some(resource) = self.slot_mut(pid)?.blocked_on {
            return Err(EngineError::Blocked { pid, resource });
        }
        let at = self.now.after(delay).ok_or(EngineError::InvalidDelay(delay))?;
        let seq = self.queue.push(at, pid)?;
        trace!(%pid, %at, seq, "scheduled");
        Ok(())
    }

    pub(crate) fn spawn(&mut self, process: Box<dyn Process<S>>) -> EngineResult<ProcessId> {
        self.ensure_open()?;
        let pid = ProcessId(self.slots.len() as u64);
        self.slots.push(Slot {
            process:    Some(process),
            alive:      true,
            held:       Vec::new(),
            blocked_on: None,
        });
        self.live += 1;
        self.schedule(pid, 0.0)?;
        Ok(pid)
    }

    /// Returns `true` if the slot was granted immediately.
    fn acquire(&mut self, pid: ProcessId, resource: ResourceId) -> EngineResult<bool> {
        match self.pool_mut(resource)?.request(pid)? {
            Request::Granted => {
                self.slot_mut(pid)?.held.push(resource);
                Ok(true)
            }
            Request::Queued { position } => {
                self.slot_mut(pid)?.blocked_on = Some(resource);
                trace!(%pid, %resource, position, "blocked");
                Ok(false)
            }
        }
    }

    pub(crate) fn release(&mut self, pid: ProcessId, resource: ResourceId) -> EngineResult<()> {
        let granted = self.pool_mut(resource)?.release(pid)?;
        self.slot_mut(pid)?.held.retain(|&r| r != resource);
        if let Some(next) = granted {
            let waiter = self.slot_mut(next)?;
            waiter.blocked_on = None;
            waiter.held.push(resource);
            // Direct push: teardown hands slots along while the clock is
            // already closing, and the waiter is retired right after.
            let seq = self.queue.push(self.now, next)?;
            trace!(pid = %next, %resource, seq, "granted");
        }
        Ok(())
    }

    /// Remove `pid` from the run, giving back every slot it holds and
    /// withdrawing it from any wait list.  Returns how many slots had to be
    /// released on its behalf.
    fn retire(&mut self, pid: ProcessId) -> EngineResult<usize> {
        let slot = self.slot_mut(pid)?;
        let blocked = slot.blocked_on.take();
        let held = std::mem::take(&mut slot.held);
        if let Some(resource) = blocked {
            self.pool_mut(resource)?.cancel(pid);
        }
        for &resource in &held {
            self.release(pid, resource)?;
        }
        let slot = self.slot_mut(pid)?;
        slot.alive = false;
        slot.process = None;
        self.live -= 1;
        Ok(held.len())
    }

    fn take_process(&mut self, pid: ProcessId) -> EngineResult<Box<dyn Process<S>>> {
        self.slot_mut(pid)?
            .process
            .take()
            .ok_or(EngineError::UnknownProcess(pid))
    }

    fn put_back(&mut self, pid: ProcessId, process: Box<dyn Process<S>>) -> EngineResult<()> {
        self.slot_mut(pid)?.process = Some(process);
        Ok(())
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One simulation run: virtual clock, event queue, resource pools, process
/// table, and the world state `S` the processes share.
///
/// A `Simulation` is single-threaded by construction; it is `Send` whenever
/// `S` is, so independent runs can each live on their own worker thread.
pub struct Simulation<S> {
    core:     Core<S>,
    state:    S,
    executed: u64,
}

impl<S: 'static> Simulation<S> {
    /// Create an empty run at `t = 0` owning `state`.
    pub fn new(state: S) -> Self {
        Self {
            core: Core::new(),
            state,
            executed: 0,
        }
    }

    /// Register a resource pool with `capacity` slots.
    pub fn add_resource(&mut self, capacity: usize) -> ConfigResult<ResourceId> {
        let id = ResourceId(self.core.pools.len() as u32);
        self.core.pools.push(ResourcePool::new(id, capacity)?);
        Ok(id)
    }

    /// Register a process; it first runs at the current instant.
    pub fn spawn<P: Process<S>>(&mut self, process: P) -> EngineResult<ProcessId> {
        self.core.spawn(Box::new(process))
    }

    /// Schedule an extra resumption of `pid` after `delay`.
    ///
    /// Processes normally reschedule themselves through [`Step::Timeout`];
    /// this is for drivers that need to poke a process from outside.  A
    /// process parked on a resource wait list cannot be poked: it resumes
    /// only once the slot is handed to it.
    pub fn schedule(&mut self, delay: f64, pid: ProcessId) -> EngineResult<()> {
        self.core.schedule(pid, delay)
    }

    /// Execute every event with fire time ≤ `until`, in `(time, seq)` order.
    /// `until` must be finite.
    ///
    /// Events later than `until` stay queued and are simply never executed
    /// unless `run` is called again with a later horizon.  On return the
    /// clock reads `max(now, until)`.  Returns the number of resumptions
    /// executed by this call.
    pub fn run(&mut self, until: f64) -> EngineResult<u64> {
        self.core.ensure_open()?;
        let horizon = SimTime::new(until)
            .filter(|h| h.is_finite())
            .ok_or(EngineError::InvalidHorizon(until))?;

        let mut executed = 0u64;
        while let Some(at) = self.core.queue.peek_time() {
            if at > horizon {
                break;
            }
            let Some(event) = self.core.queue.pop() else {
                break;
            };
            if event.at < self.core.now {
                return Err(EngineError::TimeTravel { at: event.at, last: self.core.now });
            }
            self.core.now = event.at;

            // Killed or finished since this event was queued.
            if !self.core.is_alive(event.pid) {
                continue;
            }
            trace!(pid = %event.pid, at = %event.at, seq = event.seq, "resume");
            self.resume(event.pid)?;
            executed += 1;
        }

        self.core.now = self.core.now.max(horizon);
        self.executed += executed;
        debug!(
            executed,
            now = %self.core.now,
            pending = self.core.queue.len(),
            live = self.core.live,
            "run reached horizon"
        );
        Ok(executed)
    }

    /// Abort `pid`: withdraw it from any wait list and release every slot it
    /// holds (waking the next waiters).  Its pending events are discarded.
    pub fn kill(&mut self, pid: ProcessId) -> EngineResult<()> {
        self.core.ensure_open()?;
        let released = self.core.retire(pid)?;
        debug!(%pid, released, now = %self.core.now, "process killed");
        Ok(())
    }

    /// End the run: abort every live process, drop all pending events, and
    /// close the clock.  Afterwards `spawn`, `schedule`, and `run` fail with
    /// [`EngineError::ClockTornDown`].  Returns the number of processes
    /// aborted.  Calling it twice is harmless.
    pub fn teardown(&mut self) -> EngineResult<usize> {
        if self.core.torn_down {
            return Ok(0);
        }
        let live: Vec<ProcessId> = (0..self.core.slots.len() as u64)
            .map(ProcessId)
            .filter(|&pid| self.core.is_alive(pid))
            .collect();
        for &pid in &live {
            self.core.retire(pid)?;
        }
        self.core.queue.clear();
        self.core.torn_down = true;
        debug!(aborted = live.len(), now = %self.core.now, "clock torn down");
        Ok(live.len())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.core.now
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consume the run and keep only the world state.
    pub fn into_state(self) -> S {
        self.state
    }

    pub fn resource(&self, resource: ResourceId) -> Option<&ResourcePool> {
        self.core.resource(resource)
    }

    pub fn is_alive(&self, pid: ProcessId) -> bool {
        self.core.is_alive(pid)
    }

    /// Number of processes spawned and not yet finished or killed.
    pub fn live_processes(&self) -> usize {
        self.core.live
    }

    /// Number of queued events, including stale ones for dead processes.
    pub fn pending_events(&self) -> usize {
        self.core.queue.len()
    }

    /// Total resumptions executed across all `run` calls.
    pub fn executed_events(&self) -> u64 {
        self.executed
    }

    pub fn is_torn_down(&self) -> bool {
        self.core.torn_down
    }

    // ── Process stepping ──────────────────────────────────────────────────

    /// Drive `pid` from its current suspension point to the next one that
    /// actually suspends (a timeout, a blocked acquire, or completion).
    fn resume(&mut self, pid: ProcessId) -> EngineResult<()> {
        loop {
            let mut process = self.core.take_process(pid)?;
            let step = {
                let mut ctx = ProcessContext {
                    pid,
                    core:  &mut self.core,
                    state: &mut self.state,
                };
                process.resume(&mut ctx)
            };

            let step = match step {
                Ok(step) => step,
                Err(err) => {
                    drop(process);
                    if let Err(cleanup) = self.core.retire(pid) {
                        warn!(%pid, %cleanup, "cleanup after process failure also failed");
                    }
                    return Err(err);
                }
            };

            match step {
                Step::Timeout(delay) => {
                    self.core.put_back(pid, process)?;
                    return self.core.schedule(pid, delay);
                }
                Step::Acquire(resource) => {
                    self.core.put_back(pid, process)?;
                    if !self.core.acquire(pid, resource)? {
                        return Ok(());
                    }
                }
                Step::Done => {
                    drop(process);
                    let leaked = self.core.retire(pid)?;
                    if leaked > 0 {
                        debug!(%pid, leaked, "released slots held at completion");
                    }
                    return Ok(());
                }
            }
        }
    }
}

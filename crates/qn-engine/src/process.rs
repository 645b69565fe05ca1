//! The `Process` trait — the extension point for model code.

use qn_core::{ProcessId, ResourceId, SimTime};

use crate::sim::Core;
use crate::{EngineResult, ResourcePool};

/// Where a process suspends after a call to [`Process::resume`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Sleep for this many time units, then resume.  Must be ≥ 0;
    /// `f64::INFINITY` parks the process past every finite horizon.
    Timeout(f64),
    /// Take one slot of the resource.  If one is free the process is resumed
    /// again at the same instant; otherwise it waits in FIFO order and is
    /// resumed once a slot has been handed to it.
    Acquire(ResourceId),
    /// The process is finished.  Any slot it still holds is released.
    Done,
}

/// A resumable unit of logical execution.
///
/// Implementations are state machines: each call to [`resume`][Self::resume]
/// runs from the previous suspension point to the next one and reports it as
/// a [`Step`].  The engine never calls `resume` on two processes at once and
/// never re-enters a process that is already running.
///
/// `S` is the per-run world state (random source, metrics, …) owned by the
/// [`Simulation`][crate::Simulation] and lent to the process for the duration
/// of one `resume` call.
///
/// # Example
///
/// ```rust,ignore
/// enum Phase { Start, Holding }
///
/// struct Borrow { res: ResourceId, phase: Phase }
///
/// impl Process<Stats> for Borrow {
///     fn resume(&mut self, ctx: &mut ProcessContext<'_, Stats>) -> EngineResult<Step> {
///         match self.phase {
///             Phase::Start => {
///                 self.phase = Phase::Holding;
///                 Ok(Step::Acquire(self.res))
///             }
///             Phase::Holding => {
///                 ctx.release(self.res)?;
///                 ctx.state().borrowed += 1;
///                 Ok(Step::Done)
///             }
///         }
///     }
/// }
/// ```
pub trait Process<S>: Send + 'static {
    fn resume(&mut self, ctx: &mut ProcessContext<'_, S>) -> EngineResult<Step>;
}

/// The view of the simulation a process gets while it runs.
pub struct ProcessContext<'a, S> {
    pub(crate) pid:   ProcessId,
    pub(crate) core:  &'a mut Core<S>,
    pub(crate) state: &'a mut S,
}

impl<S> ProcessContext<'_, S> {
    /// Id of the running process.
    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.core.now
    }

    /// Mutable access to the run's world state.
    #[inline]
    pub fn state(&mut self) -> &mut S {
        &mut *self.state
    }

    /// Register a new process.  It first runs at the current instant, after
    /// every event already queued for this instant.
    pub fn spawn<P: Process<S>>(&mut self, process: P) -> EngineResult<ProcessId> {
        self.core.spawn(Box::new(process))
    }

    /// Give back a slot of `resource`.  The next waiter, if any, is granted
    /// the slot and scheduled to resume now.
    pub fn release(&mut self, resource: ResourceId) -> EngineResult<()> {
        self.core.release(self.pid, resource)
    }

    /// Whether the running process currently holds a slot of `resource`.
    pub fn holds(&self, resource: ResourceId) -> bool {
        self.core.resource(resource).is_some_and(|p| p.is_holder(self.pid))
    }

    /// Read-only view of a resource pool.
    pub fn resource(&self, resource: ResourceId) -> Option<&ResourcePool> {
        self.core.resource(resource)
    }
}

//! Unit and integration tests for qn-engine.

use qn_core::{ProcessId, ResourceId, SimTime};

use crate::{EngineError, EngineResult, Process, ProcessContext, Simulation, Step};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// World state for most tests: `(label, time)` pairs in execution order.
type Trace = Vec<(&'static str, f64)>;

fn t(x: f64) -> SimTime {
    SimTime::new(x).unwrap()
}

/// Sleeps through `delays` in order, logging its label after each wake-up.
struct Sleeper {
    label:  &'static str,
    delays: Vec<f64>,
    next:   usize,
}

impl Sleeper {
    fn new(label: &'static str, delays: &[f64]) -> Self {
        Self { label, delays: delays.to_vec(), next: 0 }
    }
}

impl Process<Trace> for Sleeper {
    fn resume(&mut self, ctx: &mut ProcessContext<'_, Trace>) -> EngineResult<Step> {
        if self.next > 0 {
            let now = ctx.now().as_f64();
            ctx.state().push((self.label, now));
        }
        let step = match self.delays.get(self.next) {
            Some(&d) => Step::Timeout(d),
            None => Step::Done,
        };
        self.next += 1;
        Ok(step)
    }
}

enum Phase {
    Arrive,
    Serve,
    Leave,
}

/// Takes one slot of `res`, logs when service starts, holds it for
/// `service`, then releases it (unless `keep` is set).
struct Customer {
    label:   &'static str,
    res:     ResourceId,
    service: f64,
    keep:    bool,
    phase:   Phase,
}

impl Customer {
    fn new(label: &'static str, res: ResourceId, service: f64) -> Self {
        Self { label, res, service, keep: false, phase: Phase::Arrive }
    }
}

impl Process<Trace> for Customer {
    fn resume(&mut self, ctx: &mut ProcessContext<'_, Trace>) -> EngineResult<Step> {
        match self.phase {
            Phase::Arrive => {
                self.phase = Phase::Serve;
                Ok(Step::Acquire(self.res))
            }
            Phase::Serve => {
                assert!(ctx.holds(self.res));
                let now = ctx.now().as_f64();
                ctx.state().push((self.label, now));
                self.phase = Phase::Leave;
                Ok(Step::Timeout(self.service))
            }
            Phase::Leave => {
                if !self.keep {
                    ctx.release(self.res)?;
                }
                Ok(Step::Done)
            }
        }
    }
}

// ── EventQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue_tests {
    use super::*;
    use crate::EventQueue;

    #[test]
    fn pops_in_time_order() {
        let mut q = EventQueue::new();
        q.push(t(10.0), ProcessId(0)).unwrap();
        q.push(t(5.0), ProcessId(1)).unwrap();
        q.push(t(20.0), ProcessId(2)).unwrap();

        assert_eq!(q.pop().unwrap().at, t(5.0));
        assert_eq!(q.last_popped(), t(5.0));
        assert_eq!(q.pop().unwrap().at, t(10.0));
        assert_eq!(q.pop().unwrap().at, t(20.0));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn equal_times_pop_in_push_order() {
        let mut q = EventQueue::new();
        // Push higher pids first so identity ordering would give the wrong answer.
        for pid in [9u64, 3, 7, 1] {
            q.push(t(4.0), ProcessId(pid)).unwrap();
        }
        let order: Vec<u64> = std::iter::from_fn(|| q.pop()).map(|e| e.pid.0).collect();
        assert_eq!(order, vec![9, 3, 7, 1]);
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut q = EventQueue::new();
        let a = q.push(t(1.0), ProcessId(0)).unwrap();
        let b = q.push(t(0.5), ProcessId(0)).unwrap();
        assert!(b > a);
    }

    #[test]
    fn push_before_last_pop_is_time_travel() {
        let mut q = EventQueue::new();
        q.push(t(8.0), ProcessId(0)).unwrap();
        q.pop().unwrap();
        let err = q.push(t(3.0), ProcessId(1)).unwrap_err();
        assert_eq!(err, EngineError::TimeTravel { at: t(3.0), last: t(8.0) });
        // Same instant is fine.
        q.push(t(8.0), ProcessId(1)).unwrap();
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = EventQueue::new();
        assert!(q.peek_time().is_none());
        q.push(t(2.0), ProcessId(0)).unwrap();
        assert_eq!(q.peek_time(), Some(t(2.0)));
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
    }
}

// ── ResourcePool bookkeeping ──────────────────────────────────────────────────

#[cfg(test)]
mod pool_tests {
    use super::*;
    use crate::{Request, ResourcePool};
    use qn_core::ConfigError;

    fn pool(capacity: usize) -> ResourcePool {
        ResourcePool::new(ResourceId(0), capacity).unwrap()
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ResourcePool::new(ResourceId(0), 0).unwrap_err();
        assert_eq!(err, ConfigError::CapacityTooSmall(0));
    }

    #[test]
    fn grants_up_to_capacity_then_queues() {
        let mut p = pool(2);
        assert_eq!(p.request(ProcessId(0)).unwrap(), Request::Granted);
        assert_eq!(p.request(ProcessId(1)).unwrap(), Request::Granted);
        assert_eq!(p.request(ProcessId(2)).unwrap(), Request::Queued { position: 0 });
        assert_eq!(p.request(ProcessId(3)).unwrap(), Request::Queued { position: 1 });
        assert_eq!(p.in_use(), 2);
        assert_eq!(p.available(), 0);
        assert_eq!(p.queue_len(), 2);
    }

    #[test]
    fn release_hands_slot_to_longest_waiter() {
        let mut p = pool(1);
        p.request(ProcessId(0)).unwrap();
        p.request(ProcessId(5)).unwrap();
        p.request(ProcessId(2)).unwrap();

        assert_eq!(p.release(ProcessId(0)).unwrap(), Some(ProcessId(5)));
        assert!(p.is_holder(ProcessId(5)));
        assert!(!p.is_waiting(ProcessId(5)));
        assert_eq!(p.release(ProcessId(5)).unwrap(), Some(ProcessId(2)));
        assert_eq!(p.release(ProcessId(2)).unwrap(), None);
        assert_eq!(p.in_use(), 0);
    }

    #[test]
    fn transferred_slot_is_never_free() {
        let mut p = pool(1);
        p.request(ProcessId(0)).unwrap();
        p.request(ProcessId(1)).unwrap();
        p.release(ProcessId(0)).unwrap();
        // A newcomer at the same instant finds no free slot.
        assert_eq!(p.request(ProcessId(2)).unwrap(), Request::Queued { position: 0 });
    }

    #[test]
    fn double_request_is_rejected() {
        let mut p = pool(1);
        p.request(ProcessId(0)).unwrap();
        p.request(ProcessId(1)).unwrap();
        assert!(matches!(p.request(ProcessId(0)), Err(EngineError::DuplicateRequest { .. })));
        assert!(matches!(p.request(ProcessId(1)), Err(EngineError::DuplicateRequest { .. })));
    }

    #[test]
    fn release_without_holding_is_rejected() {
        let mut p = pool(1);
        let err = p.release(ProcessId(3)).unwrap_err();
        assert_eq!(err, EngineError::NotHolder { pid: ProcessId(3), resource: ResourceId(0) });
    }

    #[test]
    fn cancelled_or_granted_waiter_may_request_again() {
        let mut p = pool(1);
        p.request(ProcessId(0)).unwrap();
        p.request(ProcessId(1)).unwrap();
        p.request(ProcessId(2)).unwrap();

        assert!(p.cancel(ProcessId(1)));
        assert!(!p.is_waiting(ProcessId(1)));
        assert!(!p.cancel(ProcessId(1)));
        assert_eq!(p.request(ProcessId(1)).unwrap(), Request::Queued { position: 1 });

        // Granted waiters leave the wait list and count as holders.
        assert_eq!(p.release(ProcessId(0)).unwrap(), Some(ProcessId(2)));
        assert!(!p.is_waiting(ProcessId(2)));
        assert!(matches!(p.request(ProcessId(2)), Err(EngineError::DuplicateRequest { .. })));
        assert_eq!(p.release(ProcessId(2)).unwrap(), Some(ProcessId(1)));
        assert_eq!(p.request(ProcessId(2)).unwrap(), Request::Queued { position: 0 });
        assert_eq!(p.queue_len(), 1);
    }

    #[test]
    fn cancel_removes_waiter_only() {
        let mut p = pool(1);
        p.request(ProcessId(0)).unwrap();
        p.request(ProcessId(1)).unwrap();
        assert!(!p.cancel(ProcessId(0)));
        assert!(p.cancel(ProcessId(1)));
        assert_eq!(p.queue_len(), 0);
        assert_eq!(p.release(ProcessId(0)).unwrap(), None);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn same_time_events_run_in_scheduling_order() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("c", &[5.0])).unwrap();
        sim.spawn(Sleeper::new("a", &[5.0])).unwrap();
        sim.spawn(Sleeper::new("b", &[5.0])).unwrap();
        sim.run(10.0).unwrap();
        assert_eq!(sim.state(), &vec![("c", 5.0), ("a", 5.0), ("b", 5.0)]);
    }

    #[test]
    fn interleaves_by_time() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("slow", &[3.0, 3.0])).unwrap();
        sim.spawn(Sleeper::new("fast", &[1.0, 1.0, 1.0])).unwrap();
        sim.run(100.0).unwrap();
        assert_eq!(
            sim.state(),
            &vec![("fast", 1.0), ("fast", 2.0), ("slow", 3.0), ("fast", 3.0), ("slow", 6.0)]
        );
        assert_eq!(sim.live_processes(), 0);
    }

    #[test]
    fn horizon_is_inclusive_and_later_events_never_fire() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("edge", &[10.0])).unwrap();
        sim.spawn(Sleeper::new("late", &[10.001])).unwrap();
        sim.run(10.0).unwrap();
        assert_eq!(sim.state(), &vec![("edge", 10.0)]);
        assert_eq!(sim.now(), t(10.0));
        assert_eq!(sim.pending_events(), 1);
        assert_eq!(sim.live_processes(), 1);
    }

    #[test]
    fn run_resumes_from_previous_horizon() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("p", &[4.0, 4.0, 4.0])).unwrap();
        sim.run(5.0).unwrap();
        assert_eq!(sim.state().len(), 1);
        sim.run(12.0).unwrap();
        assert_eq!(sim.state(), &vec![("p", 4.0), ("p", 8.0), ("p", 12.0)]);
        assert_eq!(sim.executed_events(), 4);
    }

    #[test]
    fn clock_advances_to_horizon_when_queue_empties() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("p", &[2.0])).unwrap();
        sim.run(50.0).unwrap();
        assert_eq!(sim.now(), t(50.0));
        // An earlier horizon never moves the clock back.
        sim.run(10.0).unwrap();
        assert_eq!(sim.now(), t(50.0));
    }

    #[test]
    fn infinite_timeout_never_fires() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("never", &[f64::INFINITY])).unwrap();
        sim.run(1e12).unwrap();
        assert!(sim.state().is_empty());
        assert_eq!(sim.pending_events(), 1);
    }

    #[test]
    fn negative_delay_fails_immediately() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("bad", &[-1.0])).unwrap();
        assert_eq!(sim.run(10.0), Err(EngineError::InvalidDelay(-1.0)));

        let mut sim = Simulation::new(Trace::new());
        let pid = sim.spawn(Sleeper::new("p", &[1.0])).unwrap();
        assert_eq!(sim.schedule(-0.5, pid), Err(EngineError::InvalidDelay(-0.5)));
        assert!(matches!(sim.schedule(f64::NAN, pid), Err(EngineError::InvalidDelay(_))));
    }

    #[test]
    fn invalid_horizon_rejected() {
        let mut sim = Simulation::new(Trace::new());
        assert_eq!(sim.run(-1.0), Err(EngineError::InvalidHorizon(-1.0)));
        assert!(matches!(sim.run(f64::NAN), Err(EngineError::InvalidHorizon(_))));
        assert_eq!(sim.run(f64::INFINITY), Err(EngineError::InvalidHorizon(f64::INFINITY)));
    }

    #[test]
    fn infinite_horizon_rejected_before_running_anything() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Sleeper::new("forever", &[1.0; 64])).unwrap();
        assert!(matches!(sim.run(f64::INFINITY), Err(EngineError::InvalidHorizon(_))));
        assert!(sim.state().is_empty());
        assert_eq!(sim.executed_events(), 0);
        assert_eq!(sim.now(), SimTime::ZERO);
    }

    #[test]
    fn scheduling_unknown_process_fails() {
        let mut sim = Simulation::new(Trace::new());
        assert_eq!(sim.schedule(1.0, ProcessId(3)), Err(EngineError::UnknownProcess(ProcessId(3))));
    }

    #[test]
    fn external_schedule_adds_a_resumption() {
        let mut sim = Simulation::new(Trace::new());
        let pid = sim.spawn(Sleeper::new("p", &[100.0])).unwrap();
        sim.run(0.0).unwrap();
        sim.schedule(2.0, pid).unwrap();
        sim.run(5.0).unwrap();
        assert_eq!(sim.state(), &vec![("p", 2.0)]);
    }

    #[test]
    fn waiting_process_cannot_be_scheduled() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        sim.spawn(Customer::new("holder", desk, 5.0)).unwrap();
        let waiter = sim.spawn(Customer::new("waiter", desk, 1.0)).unwrap();
        sim.run(0.0).unwrap();
        assert!(sim.resource(desk).unwrap().is_waiting(waiter));

        assert_eq!(
            sim.schedule(1.0, waiter),
            Err(EngineError::Blocked { pid: waiter, resource: desk })
        );
        assert_eq!(sim.pending_events(), 1);

        // The waiter still starts only when the holder hands the slot over.
        sim.run(20.0).unwrap();
        assert_eq!(sim.state(), &vec![("holder", 0.0), ("waiter", 5.0)]);
        let pool = sim.resource(desk).unwrap();
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.queue_len(), 0);
    }

    #[test]
    fn spawned_child_runs_after_queued_same_time_events() {
        struct Parent;
        impl Process<Trace> for Parent {
            fn resume(&mut self, ctx: &mut ProcessContext<'_, Trace>) -> EngineResult<Step> {
                let now = ctx.now().as_f64();
                ctx.state().push(("parent", now));
                ctx.spawn(Sleeper::new("child", &[0.0]))?;
                Ok(Step::Done)
            }
        }

        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Parent).unwrap();
        sim.spawn(Sleeper::new("sibling", &[0.0])).unwrap();
        sim.run(1.0).unwrap();
        assert_eq!(sim.state(), &vec![("parent", 0.0), ("sibling", 0.0), ("child", 0.0)]);
    }

    #[test]
    fn teardown_closes_the_clock() {
        let mut sim = Simulation::new(Trace::new());
        let pid = sim.spawn(Sleeper::new("p", &[1.0, 1.0])).unwrap();
        sim.run(1.5).unwrap();
        assert_eq!(sim.teardown().unwrap(), 1);
        assert!(sim.is_torn_down());
        assert_eq!(sim.pending_events(), 0);
        assert_eq!(sim.run(10.0), Err(EngineError::ClockTornDown));
        assert_eq!(sim.schedule(1.0, pid), Err(EngineError::ClockTornDown));
        assert!(matches!(sim.spawn(Sleeper::new("q", &[])), Err(EngineError::ClockTornDown)));
        assert_eq!(sim.teardown().unwrap(), 0);
    }

    #[test]
    fn process_error_aborts_run() {
        struct Broken;
        impl Process<Trace> for Broken {
            fn resume(&mut self, _ctx: &mut ProcessContext<'_, Trace>) -> EngineResult<Step> {
                Err(EngineError::InvalidDelay(-3.0))
            }
        }

        let mut sim = Simulation::new(Trace::new());
        let pid = sim.spawn(Broken).unwrap();
        assert_eq!(sim.run(1.0), Err(EngineError::InvalidDelay(-3.0)));
        assert!(!sim.is_alive(pid));
    }

    #[test]
    fn simulation_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Simulation<Trace>>();
    }
}

// ── Resource pools inside a run ───────────────────────────────────────────────

#[cfg(test)]
mod resource_tests {
    use super::*;

    #[test]
    fn add_resource_validates_capacity() {
        let mut sim = Simulation::new(Trace::new());
        assert!(sim.add_resource(0).is_err());
        let r = sim.add_resource(3).unwrap();
        assert_eq!(sim.resource(r).unwrap().capacity(), 3);
    }

    #[test]
    fn single_server_serves_in_arrival_order() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        sim.spawn(Customer::new("first", desk, 10.0)).unwrap();
        sim.spawn(Customer::new("second", desk, 10.0)).unwrap();
        sim.spawn(Customer::new("third", desk, 10.0)).unwrap();
        sim.run(100.0).unwrap();
        assert_eq!(sim.state(), &vec![("first", 0.0), ("second", 10.0), ("third", 20.0)]);
        let pool = sim.resource(desk).unwrap();
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.queue_len(), 0);
    }

    #[test]
    fn capacity_two_serves_pairs() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(2).unwrap();
        for label in ["a", "b", "c", "d"] {
            sim.spawn(Customer::new(label, desk, 5.0)).unwrap();
        }
        sim.run(100.0).unwrap();
        assert_eq!(sim.state(), &vec![("a", 0.0), ("b", 0.0), ("c", 5.0), ("d", 5.0)]);
    }

    #[test]
    fn newcomer_does_not_jump_a_waiter() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        sim.spawn(Customer::new("holder", desk, 4.0)).unwrap();
        sim.spawn(Customer::new("waiter", desk, 1.0)).unwrap();
        // Arrives exactly when the holder leaves.
        struct LateArrival(ResourceId);
        impl Process<Trace> for LateArrival {
            fn resume(&mut self, ctx: &mut ProcessContext<'_, Trace>) -> EngineResult<Step> {
                if ctx.now() == SimTime::ZERO {
                    return Ok(Step::Timeout(4.0));
                }
                ctx.spawn(Customer::new("newcomer", self.0, 1.0))?;
                Ok(Step::Done)
            }
        }
        sim.spawn(LateArrival(desk)).unwrap();
        sim.run(20.0).unwrap();
        assert_eq!(sim.state(), &vec![("holder", 0.0), ("waiter", 4.0), ("newcomer", 5.0)]);
    }

    #[test]
    fn finishing_without_release_frees_the_slot() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        let mut forgetful = Customer::new("forgetful", desk, 2.0);
        forgetful.keep = true;
        sim.spawn(forgetful).unwrap();
        sim.spawn(Customer::new("next", desk, 2.0)).unwrap();
        sim.run(10.0).unwrap();
        assert_eq!(sim.state(), &vec![("forgetful", 0.0), ("next", 2.0)]);
        assert_eq!(sim.resource(desk).unwrap().in_use(), 0);
    }

    #[test]
    fn killing_a_holder_grants_the_next_waiter() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        let holder = sim.spawn(Customer::new("holder", desk, 100.0)).unwrap();
        let waiter = sim.spawn(Customer::new("waiter", desk, 1.0)).unwrap();
        sim.run(5.0).unwrap();
        assert!(sim.resource(desk).unwrap().is_waiting(waiter));

        sim.kill(holder).unwrap();
        assert!(!sim.is_alive(holder));
        assert!(sim.resource(desk).unwrap().is_holder(waiter));

        sim.run(10.0).unwrap();
        assert_eq!(sim.state(), &vec![("holder", 0.0), ("waiter", 5.0)]);
        assert_eq!(sim.resource(desk).unwrap().in_use(), 0);
        assert_eq!(sim.live_processes(), 0);
    }

    #[test]
    fn killing_a_waiter_removes_it_from_the_queue() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(1).unwrap();
        sim.spawn(Customer::new("holder", desk, 3.0)).unwrap();
        let waiter = sim.spawn(Customer::new("waiter", desk, 1.0)).unwrap();
        sim.run(1.0).unwrap();
        sim.kill(waiter).unwrap();
        assert_eq!(sim.resource(desk).unwrap().queue_len(), 0);
        sim.run(10.0).unwrap();
        assert_eq!(sim.state(), &vec![("holder", 0.0)]);
        assert_eq!(sim.kill(waiter), Err(EngineError::UnknownProcess(waiter)));
    }

    #[test]
    fn teardown_releases_every_slot() {
        let mut sim = Simulation::new(Trace::new());
        let desk = sim.add_resource(2).unwrap();
        for label in ["a", "b", "c", "d", "e"] {
            sim.spawn(Customer::new(label, desk, 50.0)).unwrap();
        }
        sim.run(10.0).unwrap();
        assert_eq!(sim.resource(desk).unwrap().in_use(), 2);
        assert_eq!(sim.resource(desk).unwrap().queue_len(), 3);

        assert_eq!(sim.teardown().unwrap(), 5);
        let pool = sim.resource(desk).unwrap();
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.queue_len(), 0);
        assert_eq!(sim.live_processes(), 0);
    }

    #[test]
    fn unknown_resource_is_an_error() {
        let mut sim = Simulation::new(Trace::new());
        sim.spawn(Customer::new("lost", ResourceId(7), 1.0)).unwrap();
        assert_eq!(sim.run(1.0), Err(EngineError::UnknownResource(ResourceId(7))));
    }
}

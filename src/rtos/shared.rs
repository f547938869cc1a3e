//! Scheduler shared between the timer ISR and the main loop
//!
//! Only two call sites touch the queues concurrently: the timer ISR
//! (`tick`, which appends to the ready queue) and the main line
//! (`schedule` and `run_once`). Every access happens inside a critical
//! section, so on a single-core MCU the ISR can never observe a half-done
//! update. `run_once` detaches the task under the critical section and
//! runs it with interrupts enabled, so ticks keep arriving during long
//! tasks and the task itself may call back into the scheduler.

use crate::atomic::{atomic, AtomicGuard, CriticalSection, ForceOn, Shared};
use crate::config::Ticks;
use crate::error::Error;
use crate::storage::Storage;
use crate::task::Task;

use super::delay_queue::Entry;
use super::scheduler::Scheduler;

pub struct SharedScheduler<T, R, S>
where
    R: Storage<T>,
    S: Storage<Entry<T>>,
{
    inner: Shared<Scheduler<T, R, S>>,
}

impl<T, R, S> SharedScheduler<T, R, S>
where
    R: Storage<T>,
    S: Storage<Entry<T>>,
{
    pub const fn new(scheduler: Scheduler<T, R, S>) -> Self {
        Self {
            inner: Shared::new(scheduler),
        }
    }

    /// Schedule from any context; overflow is fatal.
    pub fn schedule(&self, task: T, delay: Ticks) {
        self.inner.lock(|s| s.schedule(task, delay))
    }

    pub fn try_schedule(&self, task: T, delay: Ticks) -> Result<(), Error> {
        self.inner.lock(|s| s.try_schedule(task, delay))
    }

    /// One logical tick, from outside an interrupt handler.
    pub fn tick(&self) {
        atomic(|cs| self.tick_in(cs))
    }

    /// One logical tick from the timer ISR, which already runs with
    /// interrupts masked.
    pub fn tick_in(&self, cs: CriticalSection<'_>) {
        self.inner.borrow_mut(cs).tick()
    }

    /// Run the next ready task, if any, with interrupts enabled.
    ///
    /// Must not be called from inside an ISR.
    pub fn run_once(&self) -> bool
    where
        T: Task,
    {
        let task = self.inner.lock(|s| s.take_ready());
        match task {
            Some(task) => {
                task.run();
                true
            }
            None => false,
        }
    }

    /// Run the next ready task, or call `idle` if there is none.
    ///
    /// The ready queue is checked again with interrupts masked, and `idle`
    /// is entered still masked. It must enable interrupts and sleep in one
    /// step (`sei` followed directly by `sleep`), so a tick promoting a task
    /// after the check wakes it instead of being slept through. Interrupts
    /// are enabled on return either way.
    pub fn run_or_idle(&self, idle: impl FnOnce()) -> bool
    where
        T: Task,
    {
        if self.run_once() {
            return true;
        }
        let guard = AtomicGuard::<ForceOn>::enter();
        let nothing_ready = self.inner.borrow_mut(guard.token()).ready_len() == 0;
        if nothing_ready {
            idle();
        }
        drop(guard);
        false
    }

    /// Run ready tasks until none is left; returns how many ran.
    ///
    /// Tasks made ready meanwhile (by ticks or by the tasks themselves)
    /// are run too.
    pub fn run_pending(&self) -> usize
    where
        T: Task,
    {
        let mut ran = 0;
        while self.run_once() {
            ran += 1;
        }
        if ran > 0 {
            debug!("ran {} tasks", ran);
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.inner.lock(|s| s.pending())
    }

    pub fn is_idle(&self) -> bool {
        self.inner.lock(|s| s.is_idle())
    }

    pub fn next_due(&self) -> Option<Ticks> {
        self.inner.lock(|s| s.next_due())
    }

    /// Inspect the scheduler inside a critical section.
    pub fn with<U>(&self, f: impl FnOnce(&Scheduler<T, R, S>) -> U) -> U {
        self.inner.lock(|s| f(s))
    }

    pub fn into_inner(self) -> Scheduler<T, R, S> {
        self.inner.into_inner()
    }
}

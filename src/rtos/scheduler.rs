//! Cooperative tick scheduler
//!
//! Tasks enter through [`Scheduler::schedule`] with a delay in ticks. A
//! zero delay goes straight to the ready queue; anything else waits in the
//! delay queue. Every [`tick`](Scheduler::tick) takes one tick off the
//! head of the delay queue and then moves every entry that has reached
//! zero to the ready queue (decrement, then promote). The main loop
//! executes ready tasks one at a time with [`run_once`](Scheduler::run_once).
//!
//! Ordering: tasks run in order of absolute fire time, ties in the order
//! they were scheduled, and zero-delay tasks behind everything already
//! ready.
//!
//! This type needs `&mut self` for everything. Sharing it between the
//! timer ISR and the main loop is the job of
//! [`SharedScheduler`](super::SharedScheduler).

use crate::config::{Ticks, READY_CAPACITY, SCHEDULED_CAPACITY};
use crate::error::{fatal, Error};
use crate::storage::{Arena, Storage};
use crate::task::Task;

use super::delay_queue::{DelayQueue, Entry};
use super::fifo::Fifo;

#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
use crate::storage::Heap;

pub struct Scheduler<T, R, S>
where
    R: Storage<T>,
    S: Storage<Entry<T>>,
{
    scheduled: DelayQueue<T, S>,
    ready: Fifo<T, R>,
}

/// Scheduler on fixed arenas: `R` ready slots, `S` delayed slots.
pub type BoundedScheduler<T, const R: usize = READY_CAPACITY, const S: usize = SCHEDULED_CAPACITY> =
    Scheduler<T, Arena<T, R>, Arena<Entry<T>, S>>;

/// Scheduler whose queues grow on the global allocator.
#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
pub type HeapScheduler<T> = Scheduler<T, Heap<T>, Heap<Entry<T>>>;

impl<T, const R: usize, const S: usize> Scheduler<T, Arena<T, R>, Arena<Entry<T>, S>> {
    pub const fn new() -> Self {
        Self::with_storage(Arena::new(), Arena::new())
    }
}

#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
impl<T> Scheduler<T, Heap<T>, Heap<Entry<T>>> {
    pub const fn new() -> Self {
        Self::with_storage(Heap::new(), Heap::new())
    }
}

impl<T, R, S> Scheduler<T, R, S>
where
    R: Storage<T>,
    S: Storage<Entry<T>>,
{
    pub const fn with_storage(ready: R, scheduled: S) -> Self {
        Self {
            scheduled: DelayQueue::with_storage(scheduled),
            ready: Fifo::with_storage(ready),
        }
    }

    /// Queue `task` to become ready after `delay` ticks.
    ///
    /// Running out of storage is fatal; see [`try_schedule`](Self::try_schedule)
    /// for the fallible form.
    pub fn schedule(&mut self, task: T, delay: Ticks) {
        if let Err(error) = self.try_schedule(task, delay) {
            fatal(error);
        }
    }

    pub fn try_schedule(&mut self, task: T, delay: Ticks) -> Result<(), Error> {
        trace!("schedule: delay={}", delay);
        if delay == 0 {
            self.ready.push(task)
        } else {
            self.scheduled.insert(delay, task)
        }
    }

    /// Advance logical time by one tick.
    ///
    /// Decrements the head of the delay queue, then promotes the whole
    /// chain of entries that are now due. Never fails: when the ready queue
    /// has no room, the remaining due entries stay at the head with delay
    /// zero and are promoted by a later tick, in order.
    pub fn tick(&mut self) {
        if self.scheduled.is_empty() {
            return;
        }
        self.scheduled.advance_one_tick();
        while self.scheduled.next_due() == Some(0) {
            if !self.ready.ensure_room() {
                debug!("tick: ready queue full, {} due left", self.scheduled.len());
                break;
            }
            let Some(task) = self.scheduled.pop_due() else {
                break;
            };
            if let Err(error) = self.ready.push(task) {
                fatal(error);
            }
            trace!("tick: promoted, ready={}", self.ready.len());
        }
    }

    /// Detach the next ready task without running it.
    #[inline]
    pub fn take_ready(&mut self) -> Option<T> {
        self.ready.pop()
    }

    /// Run the next ready task. Returns `false` if nothing was ready.
    pub fn run_once(&mut self) -> bool
    where
        T: Task,
    {
        match self.take_ready() {
            Some(task) => {
                task.run();
                true
            }
            None => false,
        }
    }

    /// Tasks scheduled but not yet executed.
    pub fn pending(&self) -> usize {
        self.ready.len() + self.scheduled.len()
    }

    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Nothing ready and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.ready.is_empty() && self.scheduled.is_empty()
    }

    /// Ticks until the next delayed task becomes ready.
    pub fn next_due(&self) -> Option<Ticks> {
        self.scheduled.next_due()
    }

    pub fn scheduled(&self) -> &DelayQueue<T, S> {
        &self.scheduled
    }

    pub fn ready(&self) -> &Fifo<T, R> {
        &self.ready
    }
}

impl<T, R, S> Default for Scheduler<T, R, S>
where
    R: Storage<T> + Default,
    S: Storage<Entry<T>> + Default,
{
    fn default() -> Self {
        Self::with_storage(R::default(), S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    type Sched = BoundedScheduler<char, 4, 4>;

    fn ready<const R: usize, const S: usize>(s: &BoundedScheduler<char, R, S>) -> Vec<char> {
        s.ready().iter().copied().collect()
    }

    #[test]
    fn zero_delay_bypasses_the_delay_queue() {
        let mut s = Sched::new();
        s.schedule('f', 0);
        assert_eq!(s.scheduled_len(), 0);
        assert_eq!(ready(&s), ['f']);
    }

    #[test]
    fn tick_on_empty_queue_is_a_no_op() {
        let mut s = Sched::new();
        for _ in 0..5 {
            s.tick();
        }
        assert!(s.is_idle());
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn co_due_chain_is_promoted_in_one_tick() {
        let mut s = Sched::new();
        s.schedule('P', 4);
        s.schedule('Q', 4);
        s.schedule('R', 4);
        for _ in 0..3 {
            s.tick();
        }
        assert!(ready(&s).is_empty());
        s.tick();
        assert_eq!(ready(&s), ['P', 'Q', 'R']);
        assert!(s.scheduled().is_empty());
    }

    #[test]
    fn pending_counts_both_queues() {
        let mut s = Sched::new();
        s.schedule('a', 0);
        s.schedule('b', 2);
        assert_eq!(s.pending(), 2);
        assert_eq!(s.take_ready(), Some('a'));
        assert_eq!(s.pending(), 1);
        assert_eq!(s.next_due(), Some(2));
    }

    #[test]
    fn try_schedule_reports_full_arena() {
        let mut s = BoundedScheduler::<char, 1, 1>::new();
        s.try_schedule('a', 0).unwrap();
        s.try_schedule('b', 3).unwrap();
        assert_eq!(s.try_schedule('c', 0), Err(Error::CapacityExhausted));
        assert_eq!(s.try_schedule('d', 1), Err(Error::CapacityExhausted));
        assert_eq!(s.pending(), 2);
    }

    #[test]
    #[should_panic(expected = "capacity exhausted")]
    fn schedule_overflow_is_fatal() {
        let mut s = BoundedScheduler::<char, 1, 1>::new();
        s.schedule('a', 2);
        s.schedule('b', 5);
    }

    #[test]
    fn full_ready_queue_defers_promotion_in_order() {
        let mut s = BoundedScheduler::<char, 2, 8>::new();
        for c in ['a', 'b', 'c', 'd', 'e'] {
            s.schedule(c, 1);
        }
        s.schedule('f', 3);

        s.tick();
        assert_eq!(ready(&s), ['a', 'b']);
        assert_eq!(s.next_due(), Some(0));
        assert_eq!(s.pending(), 6);

        // nothing drained: the due heads keep waiting at zero
        s.tick();
        assert_eq!(ready(&s), ['a', 'b']);
        assert_eq!(s.scheduled_len(), 4);

        let mut order = Vec::new();
        while s.pending() > 0 {
            while let Some(c) = s.take_ready() {
                order.push(c);
            }
            s.tick();
        }
        assert_eq!(order, ['a', 'b', 'c', 'd', 'e', 'f']);
    }

    #[test]
    fn default_capacities_survive_a_burst_of_co_due_tasks() {
        let mut s = BoundedScheduler::<u8, READY_CAPACITY, SCHEDULED_CAPACITY>::new();
        for n in 0..(READY_CAPACITY + 1) as u8 {
            s.schedule(n, 1);
        }
        s.tick();
        assert_eq!(s.ready_len(), READY_CAPACITY);
        assert_eq!(s.next_due(), Some(0));

        s.take_ready();
        s.tick();
        assert_eq!(s.ready_len(), READY_CAPACITY);
        assert!(s.scheduled().is_empty());
    }

    #[cfg(any(feature = "alloc", not(target_arch = "avr")))]
    #[test]
    fn heap_configuration_has_the_same_semantics() {
        let mut s = HeapScheduler::<char>::new();
        for (i, c) in ('a'..='z').enumerate() {
            s.schedule(c, (26 - i) as Ticks);
        }
        s.tick();
        assert_eq!(s.take_ready(), Some('z'));
        assert_eq!(s.scheduled_len(), 25);
    }
}

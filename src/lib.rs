//! Cooperative scheduling for ATmega128 firmware
//!
//! The pieces, from the bottom up:
//!
//! - [`atomic`]: interrupt-masking critical sections and the [`Shared`]
//!   cell for data touched by ISRs and the main loop.
//! - [`observer`]: single-slot [`Subject`]s that let peripherals publish
//!   events to one consumer.
//! - [`storage`]: fixed-capacity and heap-backed sequences for the queues.
//!   The heap variant needs the `alloc` feature on target and is always
//!   present off-target.
//! - [`rtos`]: the delay queue, the ready queue and the tick [`Scheduler`].
//! - [`task`]: what the scheduler stores and runs.
//! - [`drivers`]: encoder and ADC glue built on `embedded-hal`.
//!
//! A timer ISR calls `tick`, the main loop calls `run_once`:
//!
//! ```
//! use avr_coop::rtos::{BoundedScheduler, SharedScheduler};
//! use avr_coop::task::InlineTask;
//!
//! let sched: SharedScheduler<InlineTask, _, _> =
//!     SharedScheduler::new(BoundedScheduler::<InlineTask, 4, 4>::new());
//! sched.schedule(InlineTask::from_fn(|| {}), 2);
//! sched.tick();
//! assert!(!sched.run_once());
//! sched.tick();
//! assert!(sched.run_once());
//! ```

#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
extern crate alloc;

#[macro_use]
mod log;

pub mod atomic;
pub mod config;
pub mod drivers;
pub mod error;
pub mod observer;
pub mod rtos;
pub mod storage;
pub mod task;

#[cfg(target_arch = "avr")]
pub mod hal;

pub use atomic::{atomic, AtomicGuard, CriticalSection, Shared};
pub use error::Error;
pub use observer::{Observer, Subject};
pub use rtos::{Scheduler, SharedScheduler};
pub use task::{InlineTask, Task};

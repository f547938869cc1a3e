//! Cooperative run-to-completion scheduling

mod delay_queue;
mod fifo;
mod scheduler;
mod shared;

pub use delay_queue::{DelayQueue, Entry};
pub use fifo::Fifo;
#[cfg(any(feature = "alloc", not(target_arch = "avr")))]
pub use scheduler::HeapScheduler;
pub use scheduler::{BoundedScheduler, Scheduler};
pub use shared::SharedScheduler;

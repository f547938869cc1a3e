//! Configuration constants for ATmega128 firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Scheduler tick rate in Hz (one `tick()` per period)
pub const TICK_HZ: u32 = 1_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Slots in the ready queue of a bounded scheduler
pub const READY_CAPACITY: usize = 8;

/// Slots in the delay queue of a bounded scheduler
pub const SCHEDULED_CAPACITY: usize = 16;

/// Machine words of captured state an inline task may carry
pub const TASK_WORDS: usize = 4;

/// Logical ticks are counted in 16 bits; delays beyond ~65 s at 1 kHz
/// must be chained by the application.
pub type Ticks = u16;

/// Number of ticks in `ms` milliseconds at `TICK_HZ`, rounded up.
pub const fn ms_to_ticks(ms: u32) -> Ticks {
    let ticks = (ms as u64 * TICK_HZ as u64 + 999) / 1000;
    if ticks > Ticks::MAX as u64 {
        Ticks::MAX
    } else {
        ticks as Ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millisecond_conversion_rounds_up_and_saturates() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(250), 250);
        assert_eq!(ms_to_ticks(70_000), Ticks::MAX);
        assert_eq!(ms_to_ticks(5_000_000), Ticks::MAX);
        assert_eq!(ms_to_ticks(u32::MAX), Ticks::MAX);
    }
}

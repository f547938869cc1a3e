use avr_device::atmega128a::CPU;

// MCUCR: sleep enable, and SM2..0 cleared selects idle
const MCUCR_SE: u8 = 0x20;
const MCUCR_SM_MASK: u8 = 0x1C;

/// Idle sleep between ticks; timers and the USART keep running.
pub struct Power {
    _private: (),
}

impl Power {
    pub fn new() -> Self {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr.modify(|r, w| w.bits(r.bits() & !MCUCR_SM_MASK));
        }
        Self { _private: () }
    }

    /// Enable interrupts and sleep until the next one.
    ///
    /// Call with interrupts disabled. `sei` takes effect after the
    /// following instruction, so an interrupt already pending wakes the
    /// `sleep` rather than running ahead of it.
    #[inline]
    pub fn idle(&mut self) {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr.modify(|r, w| w.bits(r.bits() | MCUCR_SE));
            core::arch::asm!("sei", "sleep");
            (*p).mcucr.modify(|r, w| w.bits(r.bits() & !MCUCR_SE));
        }
    }
}

impl Default for Power {
    fn default() -> Self {
        Self::new()
    }
}

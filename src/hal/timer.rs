use avr_device::atmega128a::TC0;

use crate::config::{CPU_FREQ_HZ, TICK_HZ};

// TCCR0: WGM01 selects clear-timer-on-compare
const TCCR0_CTC: u8 = 1 << 3;
// TCCR0: CS02 alone is clk/64 on timer 0 of the ATmega128
const TCCR0_DIV64: u8 = 0b100;
const TCCR0_CS_MASK: u8 = 0b111;
// TIMSK: output compare 0 interrupt enable
const TIMSK_OCIE0: u8 = 1 << 1;

const PRESCALE: u32 = 64;
const COMPARE: u32 = CPU_FREQ_HZ / PRESCALE / TICK_HZ - 1;

const _: () = assert!(COMPARE > 0 && COMPARE <= 0xFF, "TICK_HZ out of range for TC0");

/// Timer 0 in CTC mode, raising `TIMER0_COMP` once per scheduler tick.
///
/// The application owns the vector and calls
/// [`SharedScheduler::tick_in`](crate::rtos::SharedScheduler::tick_in)
/// from it.
pub struct TickTimer {
    _tc0: TC0,
}

impl TickTimer {
    pub fn new(tc0: TC0) -> Self {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0.write(|w| w.bits(TCCR0_CTC));
            (*p).tcnt0.write(|w| w.bits(0));
            (*p).ocr0.write(|w| w.bits(COMPARE as u8));
        }
        Self { _tc0: tc0 }
    }

    pub fn start(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).timsk.modify(|r, w| w.bits(r.bits() | TIMSK_OCIE0));
            (*p).tccr0.modify(|r, w| w.bits((r.bits() & !TCCR0_CS_MASK) | TCCR0_DIV64));
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0.modify(|r, w| w.bits(r.bits() & !TCCR0_CS_MASK));
            (*p).timsk.modify(|r, w| w.bits(r.bits() & !TIMSK_OCIE0));
        }
    }
}

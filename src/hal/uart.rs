use avr_device::atmega128a::USART0;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

// UCSR0A: data register empty
const UDRE0: u8 = 1 << 5;
// UCSR0B: transmitter enable
const TXEN0: u8 = 1 << 3;
// UCSR0C: 8 data bits
const UCSZ_8BIT: u8 = 0b11 << 1;

/// Polled transmitter on USART0, 8N1.
///
/// Used for log output from the main loop only; it busy-waits on the
/// data register and must not be called from an ISR.
pub struct Serial {
    _usart: USART0,
}

impl Serial {
    pub fn new(usart: USART0) -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0h.write(|w| w.bits((UBRR >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(UBRR as u8));
            (*p).ucsr0c.write(|w| w.bits(UCSZ_8BIT));
            (*p).ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { _usart: usart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let p = USART0::ptr();
            while (*p).ucsr0a.read().bits() & UDRE0 == 0 {}
            (*p).udr0.write(|w| w.bits(byte));
        }
    }
}

impl ufmt::uWrite for Serial {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

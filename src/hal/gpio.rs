use avr_device::atmega128a::{PORTA, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin, ToggleableOutputPin};

pub struct Input;
pub struct Output;

pub struct Pin<PORT, const P: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE> Pin<PORT, P, MODE> {
    // Only `board` hands these out, one per physical pin
    const fn new() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident, $pin:ident) => {
        impl<const P: u8, MODE> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            /// Input with the internal pull-up enabled.
            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }
        }

        impl<const P: u8> InputPin for Pin<$PORT, P, Input> {
            type Error = Infallible;

            #[inline]
            fn is_high(&self) -> Result<bool, Infallible> {
                Ok(unsafe { (*$PORT::ptr()).$pin.read().bits() & (1 << P) != 0 })
            }

            #[inline]
            fn is_low(&self) -> Result<bool, Infallible> {
                self.is_high().map(|high| !high)
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }

        impl<const P: u8> ToggleableOutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn toggle(&mut self) -> Result<(), Infallible> {
                // writing 1 to PINx flips PORTx
                unsafe {
                    (*$PORT::ptr()).$pin.write(|w| w.bits(1 << P));
                }
                Ok(())
            }
        }
    };
}

impl_port!(PORTA, porta, ddra, pina);
impl_port!(PORTD, portd, ddrd, pind);

// BigAVR2 board wiring
pub mod board {
    use super::*;

    pub type Led0 = Pin<PORTA, 0, Output>;
    pub type EncoderA = Pin<PORTD, 0, Input>;
    pub type EncoderB = Pin<PORTD, 1, Input>;

    pub struct Pins {
        pub led0: Led0,
        pub encoder_a: EncoderA,
        pub encoder_b: EncoderB,
    }

    impl Pins {
        /// Configure the board pins, consuming the port peripherals.
        pub fn new(_porta: PORTA, _portd: PORTD) -> Self {
            Self {
                led0: Pin::<PORTA, 0, Input>::new().into_output(),
                encoder_a: Pin::<PORTD, 0, Output>::new().into_pull_up_input(),
                encoder_b: Pin::<PORTD, 1, Output>::new().into_pull_up_input(),
            }
        }
    }
}

//! Peripheral glue that publishes events through a `Subject`

pub mod adc;
pub mod encoder;

pub use adc::AdcSampler;
pub use encoder::{Direction, RotaryEncoder};

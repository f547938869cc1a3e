//! ATmega128 peripheral bindings used by the firmware

pub mod gpio;
pub mod power;
pub mod timer;
pub mod uart;

pub use gpio::board;
pub use power::Power;
pub use timer::TickTimer;
pub use uart::Serial;

//! Error kinds raised by the scheduler storage

use core::fmt;

/// Storage failure while scheduling a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Every slot of a fixed-capacity arena is occupied
    CapacityExhausted,
    /// The heap allocator refused to grow a queue
    OutOfMemory,
    /// A storage cursor outlived its element
    StaleCursor,
}

impl Error {
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::CapacityExhausted => "scheduler capacity exhausted",
            Error::OutOfMemory => "scheduler out of memory",
            Error::StaleCursor => "stale storage cursor",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ufmt::uDisplay for Error {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

/// Terminate on an unrecoverable scheduling failure.
///
/// Losing a task the application considers essential is a programming
/// error; the firmware's panic handler halts the MCU.
#[cold]
#[inline(never)]
pub fn fatal(error: Error) -> ! {
    warn!("fatal: {}", error);
    panic!("{}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    struct Sink(String);

    impl ufmt::uWrite for Sink {
        type Error = core::convert::Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn renders_through_ufmt() {
        let mut sink = Sink(String::new());
        ufmt::uwrite!(sink, "{}", Error::CapacityExhausted).unwrap();
        assert_eq!(sink.0, "scheduler capacity exhausted");
    }

    #[test]
    #[should_panic(expected = "out of memory")]
    fn fatal_panics() {
        fatal(Error::OutOfMemory);
    }
}

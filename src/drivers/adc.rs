use embedded_hal::adc::{Channel, OneShot};

use crate::observer::Subject;

/// Non-blocking sampler for one ADC channel.
///
/// [`poll`](AdcSampler::poll) starts or continues a conversion and yields
/// `WouldBlock` until it completes. A finished sample is handed to the
/// observer when it differs from the last reported one by at least the
/// hysteresis, which keeps a noisy potentiometer from flooding the
/// consumer.
pub struct AdcSampler<'a, ADC, P> {
    pin: P,
    hysteresis: u16,
    last: Option<u16>,
    subject: Subject<'a, u16>,
    _adc: core::marker::PhantomData<ADC>,
}

impl<'a, ADC, P> AdcSampler<'a, ADC, P>
where
    P: Channel<ADC>,
{
    pub fn new(pin: P) -> Self {
        Self::with_hysteresis(pin, 0)
    }

    pub fn with_hysteresis(pin: P, hysteresis: u16) -> Self {
        Self {
            pin,
            hysteresis,
            last: None,
            subject: Subject::new(),
            _adc: core::marker::PhantomData,
        }
    }

    pub fn subject(&mut self) -> &mut Subject<'a, u16> {
        &mut self.subject
    }

    /// Last sample reported to the observer.
    pub fn last(&self) -> Option<u16> {
        self.last
    }

    pub fn poll<A>(&mut self, adc: &mut A) -> nb::Result<u16, A::Error>
    where
        A: OneShot<ADC, u16, P>,
    {
        let sample = adc.read(&mut self.pin)?;
        let changed = match self.last {
            Some(last) => last.abs_diff(sample) >= self.hysteresis.max(1),
            None => true,
        };
        if changed {
            self.last = Some(sample);
            self.subject.notify(sample);
        }
        Ok(sample)
    }

    /// Spin until the conversion completes.
    pub fn sample<A>(&mut self, adc: &mut A) -> Result<u16, A::Error>
    where
        A: OneShot<ADC, u16, P>,
    {
        nb::block!(self.poll(adc))
    }

    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::Shared;
    use core::convert::Infallible;
    use std::vec::Vec;

    struct FakeAdc {
        busy_polls: u8,
        samples: Vec<u16>,
    }

    struct Pot;

    impl Channel<FakeAdc> for Pot {
        type ID = u8;

        fn channel() -> u8 {
            3
        }
    }

    impl OneShot<FakeAdc, u16, Pot> for FakeAdc {
        type Error = Infallible;

        fn read(&mut self, _pin: &mut Pot) -> nb::Result<u16, Infallible> {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                return Err(nb::Error::WouldBlock);
            }
            Ok(self.samples.remove(0))
        }
    }

    #[test]
    fn conversion_in_progress_would_block() {
        let mut adc = FakeAdc {
            busy_polls: 2,
            samples: std::vec![700],
        };
        let mut sampler = AdcSampler::new(Pot);

        assert_eq!(sampler.poll(&mut adc), Err(nb::Error::WouldBlock));
        assert_eq!(sampler.sample(&mut adc), Ok(700));
        assert_eq!(sampler.last(), Some(700));
    }

    #[test]
    fn hysteresis_filters_small_changes() {
        let mut adc = FakeAdc {
            busy_polls: 0,
            samples: std::vec![500, 503, 520, 519],
        };
        let seen = Shared::new(Vec::new());
        let observer = |v: u16| seen.lock(|seen| seen.push(v));

        let mut sampler = AdcSampler::with_hysteresis(Pot, 8);
        sampler.subject().register(&observer);
        for _ in 0..4 {
            sampler.sample(&mut adc).unwrap();
        }

        assert_eq!(seen.into_inner(), [500, 520]);
    }
}

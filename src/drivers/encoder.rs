use embedded_hal::digital::v2::InputPin;

use crate::observer::Subject;

// Quadrature transitions per mechanical detent
const STEPS_PER_DETENT: i8 = 4;

// Indexed by (previous AB << 2) | current AB; 0 for no-move or glitches
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

// Both lines high with the pull-ups enabled
const IDLE: u8 = 0b11;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

/// Polled quadrature decoder.
///
/// Call [`poll`](RotaryEncoder::poll) from a pin-change ISR or a fast
/// periodic task. Each completed detent is reported to the observer
/// registered on [`subject`](RotaryEncoder::subject) and returned.
pub struct RotaryEncoder<'a, A, B> {
    pin_a: A,
    pin_b: B,
    state: u8,
    steps: i8,
    position: i16,
    subject: Subject<'a, Direction>,
}

impl<'a, A, B, E> RotaryEncoder<'a, A, B>
where
    A: InputPin<Error = E>,
    B: InputPin<Error = E>,
{
    pub fn new(pin_a: A, pin_b: B) -> Self {
        Self {
            pin_a,
            pin_b,
            state: IDLE,
            steps: 0,
            position: 0,
            subject: Subject::new(),
        }
    }

    pub fn subject(&mut self) -> &mut Subject<'a, Direction> {
        &mut self.subject
    }

    /// Detents counted so far, clockwise positive.
    pub fn position(&self) -> i16 {
        self.position
    }

    pub fn poll(&mut self) -> Result<Option<Direction>, E> {
        let a = self.pin_a.is_high()? as u8;
        let b = self.pin_b.is_high()? as u8;
        let current = (a << 1) | b;

        let index = ((self.state << 2) | current) as usize;
        self.state = current;
        self.steps += TRANSITIONS[index];

        let direction = if self.steps >= STEPS_PER_DETENT {
            Direction::Clockwise
        } else if self.steps <= -STEPS_PER_DETENT {
            Direction::CounterClockwise
        } else {
            return Ok(None);
        };

        self.steps = 0;
        self.position = match direction {
            Direction::Clockwise => self.position.wrapping_add(1),
            Direction::CounterClockwise => self.position.wrapping_sub(1),
        };
        self.subject.notify(direction);
        Ok(Some(direction))
    }

    pub fn release(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}

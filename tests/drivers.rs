use std::sync::{Arc, Mutex};

use avr_coop::drivers::{Direction, RotaryEncoder};
use avr_coop::rtos::{BoundedScheduler, Entry, SharedScheduler};
use avr_coop::storage::Arena;
use avr_coop::task::Task;
use embedded_hal_mock::pin::{Mock, State, Transaction};

struct Step {
    direction: Direction,
    trail: Arc<Mutex<Vec<Direction>>>,
}

impl Task for Step {
    fn run(self) {
        self.trail.lock().unwrap().push(self.direction);
    }
}

fn pin(levels: &[u8]) -> Mock {
    let expectations: Vec<_> = levels
        .iter()
        .map(|&l| Transaction::get(if l == 1 { State::High } else { State::Low }))
        .collect();
    Mock::new(&expectations)
}

#[test]
fn encoder_detents_become_scheduled_tasks() {
    // one clockwise detent, then one counter-clockwise detent
    let a_levels = [0, 0, 1, 1, 1, 0, 0, 1];
    let b_levels = [1, 0, 0, 1, 0, 0, 1, 1];
    let mut a = pin(&a_levels);
    let mut b = pin(&b_levels);

    let sched: SharedScheduler<Step, Arena<Step, 4>, Arena<Entry<Step>, 4>> =
        SharedScheduler::new(BoundedScheduler::<Step, 4, 4>::new());
    let trail = Arc::new(Mutex::new(Vec::new()));
    let on_turn = |direction: Direction| {
        let step = Step {
            direction,
            trail: trail.clone(),
        };
        sched.schedule(step, 1);
    };

    let mut encoder = RotaryEncoder::new(a.clone(), b.clone());
    encoder.subject().register(&on_turn);
    for _ in 0..a_levels.len() {
        encoder.poll().unwrap();
    }
    assert_eq!(encoder.position(), 0);
    assert_eq!(sched.pending(), 2);

    sched.tick();
    assert_eq!(sched.run_pending(), 2);
    assert_eq!(
        *trail.lock().unwrap(),
        [Direction::Clockwise, Direction::CounterClockwise]
    );

    a.done();
    b.done();
}

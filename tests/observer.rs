use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use avr_coop::observer::{Observer, Subject};
use avr_coop::rtos::{BoundedScheduler, Entry, SharedScheduler};
use avr_coop::storage::Arena;
use avr_coop::task::Task;

/// Stateful observer implemented by hand rather than as a closure.
struct Threshold {
    limit: u16,
    crossings: AtomicU8,
}

impl Observer<u16> for Threshold {
    fn notify(&self, sample: u16) {
        if sample > self.limit {
            self.crossings.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[test]
fn struct_observer_keeps_its_own_state() {
    let threshold = Threshold {
        limit: 800,
        crossings: AtomicU8::new(0),
    };
    let mut subject: Subject<'_, u16> = Subject::new();
    subject.register(&threshold);

    for sample in [100, 900, 750, 1000] {
        subject.notify(sample);
    }
    assert_eq!(threshold.crossings.load(Ordering::Relaxed), 2);
}

struct Refresh {
    row: u8,
    drawn: Arc<Mutex<Vec<u8>>>,
}

impl Task for Refresh {
    fn run(self) {
        self.drawn.lock().unwrap().push(self.row);
    }
}

type Sched = SharedScheduler<Refresh, Arena<Refresh, 4>, Arena<Entry<Refresh>, 4>>;

#[test]
fn notification_defers_work_to_the_scheduler() {
    let sched: Sched = SharedScheduler::new(BoundedScheduler::<Refresh, 4, 4>::new());
    let drawn = Arc::new(Mutex::new(Vec::new()));

    // what an ISR-side producer would do: enqueue, never run inline
    let observer = |row: u8| {
        sched.schedule(
            Refresh {
                row,
                drawn: drawn.clone(),
            },
            u16::from(row),
        )
    };
    let mut lcd_tick: Subject<'_, u8> = Subject::new();
    lcd_tick.register(&observer);

    lcd_tick.notify(2);
    lcd_tick.notify(1);
    assert!(drawn.lock().unwrap().is_empty());

    for _ in 0..2 {
        sched.tick();
        sched.run_pending();
    }
    assert_eq!(*drawn.lock().unwrap(), [1, 2]);

    lcd_tick.unregister();
    lcd_tick.notify(0);
    assert_eq!(sched.pending(), 0);
}

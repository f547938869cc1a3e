#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_coop::config::{ms_to_ticks, READY_CAPACITY, SCHEDULED_CAPACITY};
    use avr_coop::drivers::{Direction, RotaryEncoder};
    use avr_coop::hal::board::{Led0, Pins};
    use avr_coop::hal::{Power, Serial, TickTimer};
    use avr_coop::rtos::{BoundedScheduler, Entry, SharedScheduler};
    use avr_coop::storage::Arena;
    use avr_coop::{CriticalSection, InlineTask, Shared};
    use avr_device::atmega128a::Peripherals;
    use embedded_hal::digital::v2::ToggleableOutputPin;

    type Sched = SharedScheduler<
        InlineTask,
        Arena<InlineTask, READY_CAPACITY>,
        Arena<Entry<InlineTask>, SCHEDULED_CAPACITY>,
    >;

    static SCHEDULER: Sched = SharedScheduler::new(BoundedScheduler::<
        InlineTask,
        READY_CAPACITY,
        SCHEDULED_CAPACITY,
    >::new());
    static LED: Shared<Option<Led0>> = Shared::new(None);
    static SERIAL: Shared<Option<Serial>> = Shared::new(None);

    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_COMP() {
        // vectors run with I cleared
        let cs = unsafe { CriticalSection::new() };
        SCHEDULER.tick_in(cs);
    }

    fn heartbeat() {
        LED.lock(|led| {
            if let Some(led) = led {
                let _ = led.toggle();
            }
        });
        SCHEDULER.schedule(InlineTask::from_fn(heartbeat), ms_to_ticks(500));
    }

    fn report(direction: Direction) {
        let pending = SCHEDULER.pending() as u16;
        let name = match direction {
            Direction::Clockwise => "cw",
            Direction::CounterClockwise => "ccw",
        };
        SERIAL.lock(|serial| {
            if let Some(serial) = serial {
                let _ = ufmt::uwriteln!(*serial, "turn {} pending={}\r", name, pending);
            }
        });
    }

    // Runs in the main loop, which is where the encoder is polled
    fn on_turn(direction: Direction) {
        SCHEDULER.schedule(InlineTask::new(move || report(direction)), 0);
    }

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let pins = Pins::new(dp.PORTA, dp.PORTD);
        LED.lock(|led| *led = Some(pins.led0));
        SERIAL.lock(|serial| {
            let mut usart = Serial::new(dp.USART0);
            let _ = ufmt::uwriteln!(usart, "ATmega128 scheduler v0.1.0\r");
            *serial = Some(usart);
        });

        let mut encoder = RotaryEncoder::new(pins.encoder_a, pins.encoder_b);
        encoder.subject().register_fn(on_turn);

        SCHEDULER.schedule(InlineTask::from_fn(heartbeat), 0);

        let mut timer = TickTimer::new(dp.TC0);
        timer.start();
        let mut power = Power::new();

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        loop {
            let _ = encoder.poll();
            SCHEDULER.run_or_idle(|| power.idle());
        }
    }
}

/// Off-target the firmware runs as a simulation: ticks are driven by the
/// loop below instead of TC0.
#[cfg(not(target_arch = "avr"))]
fn main() {
    use avr_coop::config::ms_to_ticks;
    use avr_coop::rtos::{BoundedScheduler, SharedScheduler};
    use avr_coop::InlineTask;

    let sched: SharedScheduler<InlineTask, _, _> =
        SharedScheduler::new(BoundedScheduler::<InlineTask, 8, 16>::new());

    for (name, ms) in [("adc", 5u32), ("lcd", 3), ("led", 3), ("uart", 0)] {
        let delay = ms_to_ticks(ms);
        sched.schedule(InlineTask::new(move || println!("{name} due at {delay}")), delay);
    }

    let mut now = 0u16;
    while !sched.is_idle() {
        let ran = sched.run_pending();
        if ran > 0 {
            println!("t={now}: ran {ran}");
        }
        sched.tick();
        now += 1;
    }
}

//! Scripted hardware and a recording sink shared by the host tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use core::cell::{Cell, RefCell};

use button_stages::button::{Button, ButtonEvent, EventSink, PinReader};
use button_stages::ticks::TickSource;
use heapless::Vec;

/// A pin whose raw level the test sets directly.
pub struct FakePin {
    level: Cell<bool>,
    reads: Cell<u32>,
}

impl FakePin {
    pub const fn new(level: bool) -> Self {
        Self {
            level: Cell::new(level),
            reads: Cell::new(0),
        }
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl PinReader for FakePin {
    fn read_level(&self, _pin: u32) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.level.get()
    }
}

/// A tick counter the test advances by hand.
pub struct FakeClock {
    now: Cell<u32>,
}

impl FakeClock {
    pub const fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }

    pub fn get(&self) -> u32 {
        self.now.get()
    }
}

impl TickSource for FakeClock {
    fn now(&self) -> u32 {
        self.now.get()
    }
}

pub const CAPACITY: usize = 512;

/// Records every event with the tick at which it was delivered.
pub struct Recorder<'c> {
    clock: &'c FakeClock,
    events: RefCell<Vec<(u32, ButtonEvent), CAPACITY>>,
}

impl<'c> Recorder<'c> {
    pub const fn new(clock: &'c FakeClock) -> Self {
        Self {
            clock,
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn timeline(&self) -> Vec<(u32, ButtonEvent), CAPACITY> {
        self.events.borrow().clone()
    }

    pub fn events(&self) -> Vec<ButtonEvent, CAPACITY> {
        self.events.borrow().iter().map(|&(_, event)| event).collect()
    }

    /// Events other than [`ButtonEvent::Hold`], which repeats too often to list.
    pub fn without_holds(&self) -> Vec<(u32, ButtonEvent), CAPACITY> {
        self.events
            .borrow()
            .iter()
            .copied()
            .filter(|&(_, event)| event != ButtonEvent::Hold)
            .collect()
    }

    pub fn ticks_of(&self, wanted: ButtonEvent) -> Vec<u32, CAPACITY> {
        self.events
            .borrow()
            .iter()
            .filter(|&&(_, event)| event == wanted)
            .map(|&(tick, _)| tick)
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for Recorder<'_> {
    fn on_event(&self, event: ButtonEvent) {
        self.events
            .borrow_mut()
            .push((self.clock.get(), event))
            .expect("recorder capacity exceeded");
    }
}

/// Polls once at `tick`.
pub fn poll_at(button: &mut Button<'_, FakePin, FakeClock>, clock: &FakeClock, tick: u32) {
    clock.set(tick);
    button.update().expect("button is initialized");
}

/// Polls once per tick from `from` through `to`, inclusive.
pub fn poll_range(button: &mut Button<'_, FakePin, FakeClock>, clock: &FakeClock, from: u32, to: u32) {
    for tick in from..=to {
        poll_at(button, clock, tick);
    }
}

#![allow(missing_docs)]
#![cfg(feature = "host")]
//! Prints the event timeline of one simulated five-second press.

use core::cell::Cell;
use std::process::ExitCode;

use button_stages::{
    Result,
    button::{Button, ButtonEvent, PressedTo, Stage, StageSet},
};

// Two extra steps after the long press: 2 s and 3 s past it.
const STAGES: [Stage; 2] = [
    Stage::new(2_000, ButtonEvent::Custom(1)),
    Stage::new(3_000, ButtonEvent::Custom(2)),
];

const RELEASE_AT: u32 = 5_000;

fn main() -> ExitCode {
    match inner_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn inner_main() -> Result<()> {
    // Active-low wiring: the pin reads low while the button is held.
    let level = Cell::new(false);
    let now = Cell::new(0_u32);
    let read_pin = |_pin: u32| level.get();
    let ticks = || now.get();

    let holds = Cell::new(0_u32);
    let sink = |event: ButtonEvent| match event {
        // Hold repeats every 50 ticks; print a summary instead.
        ButtonEvent::Hold => holds.set(holds.get().wrapping_add(1)),
        _ => println!("t={:>5}  {event:?}", now.get()),
    };

    let mut latches = [false; STAGES.len()];
    let mut button = Button::new(13, PressedTo::Ground, &read_pin, &ticks);
    button.configure_stages(StageSet::new(&STAGES, &mut latches)?);
    button.register_sink(&sink);

    for tick in 0..=RELEASE_AT {
        now.set(tick);
        level.set(tick == RELEASE_AT);
        button.update()?;
    }

    println!("hold events while held: {}", holds.get());
    Ok(())
}

//! A polled button engine with debouncing, long press, hold repeat and
//! multi-stage long press.
//!
//! See [`Button`] for usage example.

mod event_sink;
mod stages;

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::InputPin;

pub use event_sink::{ChannelSink, EventSink, SignalSink};
pub use stages::{MAX_STAGES, Stage, StageSet};

use self::event_sink::Dispatcher;
use crate::ticks::{TickSource, Timing, elapsed};
use crate::{Error, Result};

// ============================================================================
// PressedTo - How the button is wired
// ============================================================================

/// Describes how the button is physically wired, i.e. which electrical level
/// means "pressed".
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressedTo {
    /// Button connects pin to ground (GND) when pressed.
    /// Pin is pulled up and reads LOW when pressed (active low).
    #[default]
    Ground = 0,

    /// Button connects pin to voltage when pressed.
    /// Pin is pulled down and reads HIGH when pressed (active high).
    Voltage = 1,
}

impl PressedTo {
    /// Converts a raw polarity code: `0` is active low, `1` is active high.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other value.
    pub const fn from_raw(raw: u8) -> Result<Self> {
        match raw {
            0 => Ok(Self::Ground),
            1 => Ok(Self::Voltage),
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Whether a raw pin level means the button is pressed.
    #[must_use]
    pub const fn is_pressed(self, level: bool) -> bool {
        match self {
            Self::Voltage => level,
            Self::Ground => !level,
        }
    }
}

// ============================================================================
// ButtonEvent - What the application sees
// ============================================================================

/// Events produced by a [`Button`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// No event. Reported by [`Button::last_event`] before anything happened.
    #[default]
    None,
    /// The press survived debouncing.
    Pressed,
    /// The button was let go, after either a short or a long press.
    Released,
    /// The press lasted the long-press threshold.
    LongPressed,
    /// Repeats every hold period while a long press is sustained.
    Hold,
    /// Reserved tag; never produced by the state machine, but usable as a
    /// [`Stage`] event.
    SuperLongPressed,
    /// Application-defined tag, typically used as a [`Stage`] event.
    Custom(u8),
}

// ============================================================================
// ButtonState - State machine
// ============================================================================

/// State of the press state machine.
///
/// [`raw`](Self::raw) and [`from_raw`](Self::from_raw) are for callers that
/// persist or exchange the state as a byte; the state machine itself never
/// goes through them.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    /// Not pressed.
    #[default]
    Idle,
    /// A press was seen; waiting out the debounce time.
    Debounce,
    /// Debounced press, not yet long.
    Pressed,
    /// Long press in progress; stages and hold repeat are active.
    LongPressed,
}

impl ButtonState {
    /// Decodes a state stored as a raw byte.
    ///
    /// Unknown values decode as [`Idle`](Self::Idle), so corrupted storage
    /// heals to a quiet state instead of emitting spurious events.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Debounce,
            2 => Self::Pressed,
            3 => Self::LongPressed,
            _ => Self::Idle,
        }
    }

    /// Encodes the state as a raw byte, the inverse of [`from_raw`](Self::from_raw).
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Debounce => 1,
            Self::Pressed => 2,
            Self::LongPressed => 3,
        }
    }
}

// ============================================================================
// PinReader - where levels come from
// ============================================================================

/// Reads the raw electrical level of a pin.
///
/// The reader reports the level only; [`PressedTo`] decides what "pressed"
/// means. Any `Fn(u32) -> bool` closure is a reader.
pub trait PinReader {
    /// Raw level of `pin`: `true` for high.
    fn read_level(&self, pin: u32) -> bool;
}

impl<F> PinReader for F
where
    F: Fn(u32) -> bool,
{
    #[inline]
    fn read_level(&self, pin: u32) -> bool {
        self(pin)
    }
}

/// Adapts a single `embedded-hal` input pin into a [`PinReader`].
///
/// The pin id passed to [`read_level`](PinReader::read_level) is ignored: the
/// wrapped pin is the one that gets read. Infallible pins only, which covers
/// the GPIO inputs of the common HALs.
pub struct HalPin<P> {
    input: RefCell<P>,
}

impl<P> HalPin<P> {
    /// Wraps `input`.
    #[must_use]
    pub const fn new(input: P) -> Self {
        Self {
            input: RefCell::new(input),
        }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.input.into_inner()
    }
}

impl<P> PinReader for HalPin<P>
where
    P: InputPin<Error = Infallible>,
{
    fn read_level(&self, _pin: u32) -> bool {
        match self.input.borrow_mut().is_high() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

// ============================================================================
// Button
// ============================================================================

struct Hardware<'a, R, T> {
    reader: &'a R,
    ticks: &'a T,
}

/// A polled button with debouncing, long press, hold repeat and multi-stage
/// long press.
///
/// Call [`update`](Self::update) at a steady cadence (a timer tick or the main
/// loop). Each call samples the pin once, reads the tick source once, advances
/// the state machine one step and dispatches any resulting events to the
/// registered [`EventSink`] before returning.
///
/// # Events
///
/// | When | Event |
/// |---|---|
/// | press held for the debounce time | [`ButtonEvent::Pressed`] |
/// | press held for the long-press time after that | [`ButtonEvent::LongPressed`] |
/// | every hold period after the long press | [`ButtonEvent::Hold`] |
/// | each [`Stage`] threshold after the long press | the stage's event |
/// | release after a debounced press | [`ButtonEvent::Released`] |
///
/// A press shorter than the debounce time produces nothing. Within one call,
/// stage events come before the hold event.
///
/// # Borrowed resources
///
/// The pin reader, tick source, stage table, latches and sink are all
/// borrowed for `'a`; the button never allocates or copies them.
///
/// # Example
///
/// ```
/// use core::cell::{Cell, RefCell};
/// use button_stages::button::{Button, ButtonEvent, PressedTo, Stage, StageSet};
///
/// let level = Cell::new(true); // pulled up, not pressed
/// let now = Cell::new(0_u32);
/// let read_pin = |_pin: u32| level.get();
/// let ticks = || now.get();
///
/// const STAGES: [Stage; 1] = [Stage::new(2_000, ButtonEvent::Custom(7))];
/// let mut latches = [false; 1];
///
/// let seen = RefCell::new(Vec::new());
/// let sink = |event: ButtonEvent| seen.borrow_mut().push(event);
///
/// let mut button = Button::new(13, PressedTo::Ground, &read_pin, &ticks);
/// button.configure_stages(StageSet::new(&STAGES, &mut latches)?);
/// button.register_sink(&sink);
///
/// level.set(false); // pressed
/// for tick in 0..=3_050 {
///     now.set(tick);
///     button.update()?;
/// }
/// level.set(true);
/// now.set(3_051);
/// button.update()?;
///
/// let seen = seen.borrow();
/// assert_eq!(seen.first(), Some(&ButtonEvent::Pressed));
/// assert!(seen.contains(&ButtonEvent::LongPressed));
/// assert!(seen.contains(&ButtonEvent::Custom(7)));
/// assert_eq!(seen.last(), Some(&ButtonEvent::Released));
/// # Ok::<(), button_stages::Error>(())
/// ```
pub struct Button<'a, R, T> {
    hardware: Option<Hardware<'a, R, T>>,
    pin: u32,
    pressed_to: PressedTo,
    state: ButtonState,
    last_change: u32,
    press_start: u32,
    last_hold: u32,
    long_press_triggered: bool,
    timing: Timing,
    stages: Option<StageSet<'a>>,
    dispatcher: Dispatcher<'a>,
}

impl<'a, R, T> Button<'a, R, T>
where
    R: PinReader,
    T: TickSource,
{
    /// An uninitialized button, suitable for `static` storage.
    ///
    /// [`update`](Self::update) fails until [`init`](Self::init) is called.
    #[must_use]
    pub const fn uninit() -> Self {
        Self {
            hardware: None,
            pin: 0,
            pressed_to: PressedTo::Ground,
            state: ButtonState::Idle,
            last_change: 0,
            press_start: 0,
            last_hold: 0,
            long_press_triggered: false,
            timing: Timing::DEFAULT,
            stages: None,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Creates an idle button on `pin`.
    ///
    /// Reads the tick source once to seed the timestamps. No stages and no
    /// sink are attached.
    #[must_use]
    pub fn new(pin: u32, pressed_to: PressedTo, reader: &'a R, ticks: &'a T) -> Self {
        let mut button = Self::uninit();
        button.init(pin, pressed_to, reader, ticks);
        button
    }

    /// Re-initializes this button in place, discarding stages, sink, timing
    /// and state.
    pub fn init(&mut self, pin: u32, pressed_to: PressedTo, reader: &'a R, ticks: &'a T) {
        let now = ticks.now();
        *self = Self {
            hardware: Some(Hardware { reader, ticks }),
            pin,
            pressed_to,
            last_change: now,
            press_start: now,
            last_hold: now,
            ..Self::uninit()
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("Button::init: pin {} {} at {}", pin, pressed_to, now);
    }

    /// Returns the button to its uninitialized state.
    ///
    /// Every borrowed resource is released. [`update`](Self::update) fails
    /// until [`init`](Self::init) is called again.
    pub fn deinit(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::debug!("Button::deinit: pin {}", self.pin);
        *self = Self::uninit();
    }

    /// Attaches a validated multi-stage long-press table, replacing any
    /// previous one.
    ///
    /// Build `stage_set` with [`StageSet::new`]. A rejected table never
    /// reaches the button, so the latch buffer is free to be passed again
    /// with a corrected table.
    ///
    /// ```
    /// use core::cell::Cell;
    /// use button_stages::Error;
    /// use button_stages::button::{Button, ButtonEvent, PressedTo, Stage, StageSet};
    ///
    /// let now = Cell::new(0_u32);
    /// let read_pin = |_pin: u32| true;
    /// let ticks = || now.get();
    /// let mut button = Button::new(13, PressedTo::Ground, &read_pin, &ticks);
    ///
    /// let unordered = [
    ///     Stage::new(3_000, ButtonEvent::Custom(1)),
    ///     Stage::new(2_000, ButtonEvent::Custom(2)),
    /// ];
    /// let ordered = [
    ///     Stage::new(2_000, ButtonEvent::Custom(1)),
    ///     Stage::new(3_000, ButtonEvent::Custom(2)),
    /// ];
    /// let mut latches = [false; 2];
    ///
    /// assert_eq!(
    ///     StageSet::new(&unordered, &mut latches).map(|_| ()),
    ///     Err(Error::InvalidStages)
    /// );
    /// button.configure_stages(StageSet::new(&ordered, &mut latches)?);
    /// assert!(button.stage_set().is_some());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn configure_stages(&mut self, stage_set: StageSet<'a>) {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Button::configure_stages: pin {} attached {} stages",
            self.pin,
            stage_set.stages().len()
        );
        self.stages = Some(stage_set);
    }

    /// Detaches the stage table, returning it so its latch buffer can be
    /// reused.
    pub const fn clear_stages(&mut self) -> Option<StageSet<'a>> {
        self.stages.take()
    }

    /// Replaces the timing thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `timing` fails
    /// [`Timing::validate`]; the current thresholds are kept.
    pub fn set_timing(&mut self, timing: Timing) -> Result<()> {
        timing.validate()?;
        self.timing = timing;
        Ok(())
    }

    /// Sets the event sink, replacing any previous one.
    pub fn register_sink(&mut self, sink: &'a dyn EventSink) {
        self.dispatcher.register(sink);
    }

    /// Removes the event sink. Later events are dropped.
    pub fn unregister_sink(&mut self) {
        self.dispatcher.unregister();
    }

    /// Advances the state machine by one poll.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the button is not initialized.
    /// Nothing is read or changed in that case.
    pub fn update(&mut self) -> Result<()> {
        let Some(hardware) = self.hardware.as_ref() else {
            return Err(Error::InvalidArgument);
        };
        let level = hardware.reader.read_level(self.pin);
        let now = hardware.ticks.now();
        let is_pressed = self.pressed_to.is_pressed(level);

        match self.state {
            ButtonState::Idle => self.on_idle(is_pressed, now),
            ButtonState::Debounce => self.on_debounce(is_pressed, now),
            ButtonState::Pressed => self.on_pressed(is_pressed, now),
            ButtonState::LongPressed => self.on_long_pressed(is_pressed, now),
        }
        Ok(())
    }

    fn on_idle(&mut self, is_pressed: bool, now: u32) {
        if is_pressed {
            self.enter(ButtonState::Debounce);
            self.last_change = now;
        }
    }

    // The level is not re-sampled during the window: a bounce inside it does
    // not restart the timer.
    fn on_debounce(&mut self, is_pressed: bool, now: u32) {
        if elapsed(now, self.last_change) < self.timing.debounce {
            return;
        }
        if is_pressed {
            self.enter(ButtonState::Pressed);
            self.last_change = now;
            self.dispatcher.dispatch(ButtonEvent::Pressed);
        } else {
            self.enter(ButtonState::Idle);
        }
    }

    fn on_pressed(&mut self, is_pressed: bool, now: u32) {
        if !is_pressed {
            self.enter(ButtonState::Idle);
            self.dispatcher.dispatch(ButtonEvent::Released);
        } else if elapsed(now, self.last_change) >= self.timing.long_press {
            self.enter(ButtonState::LongPressed);
            self.last_change = now;
            self.press_start = now;
            self.last_hold = now;
            self.dispatcher.dispatch(ButtonEvent::LongPressed);
        }
    }

    fn on_long_pressed(&mut self, is_pressed: bool, now: u32) {
        if !is_pressed {
            self.enter(ButtonState::Idle);
            if let Some(stage_set) = self.stages.as_mut() {
                stage_set.reset_latches();
            }
            self.dispatcher.dispatch(ButtonEvent::Released);
            return;
        }

        let held = elapsed(now, self.press_start);
        if let Some(stage_set) = self.stages.as_mut() {
            stage_set.fire_due(held, &mut self.dispatcher);
        }

        if elapsed(now, self.last_hold) >= self.timing.hold {
            self.last_hold = now;
            self.dispatcher.dispatch(ButtonEvent::Hold);
        }
    }

    fn enter(&mut self, next: ButtonState) {
        #[cfg(feature = "defmt")]
        defmt::trace!("button pin {}: {} -> {}", self.pin, self.state, next);
        self.state = next;
    }

    /// Whether [`init`](Self::init) has been called since creation or the
    /// last [`deinit`](Self::deinit).
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.hardware.is_some()
    }

    /// Current state of the state machine.
    #[must_use]
    pub const fn state(&self) -> ButtonState {
        self.state
    }

    /// Pin id handed to the [`PinReader`].
    #[must_use]
    pub const fn pin(&self) -> u32 {
        self.pin
    }

    /// How the button is wired.
    #[must_use]
    pub const fn pressed_to(&self) -> PressedTo {
        self.pressed_to
    }

    /// Active timing thresholds.
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// The most recently dispatched event, whether or not a sink received it.
    #[must_use]
    pub const fn last_event(&self) -> ButtonEvent {
        self.dispatcher.last_event()
    }

    /// Whether an event sink is registered.
    #[must_use]
    pub const fn has_sink(&self) -> bool {
        self.dispatcher.has_sink()
    }

    /// The attached stage table, if any.
    #[must_use]
    pub const fn stage_set(&self) -> Option<&StageSet<'a>> {
        self.stages.as_ref()
    }

    /// Tick of the last Idle to Debounce, Debounce to Pressed or Pressed to
    /// LongPressed transition. Hold events do not move it.
    #[must_use]
    pub const fn last_change_tick(&self) -> u32 {
        self.last_change
    }

    /// Tick at which the current long press began.
    #[must_use]
    pub const fn press_start_tick(&self) -> u32 {
        self.press_start
    }

    /// Tick of the last hold event, or of the long-press instant before the
    /// first one.
    #[must_use]
    pub const fn last_hold_tick(&self) -> u32 {
        self.last_hold
    }

    /// Reserved one-shot long-press latch. Always `false`: the state machine
    /// reports long presses through its state instead.
    #[must_use]
    pub const fn long_press_triggered(&self) -> bool {
        self.long_press_triggered
    }
}

//! Tick arithmetic, the tick-source capability, and timing thresholds.
//!
//! All durations are measured in ticks of a free-running `u32` counter. What
//! one tick means in real time is up to the [`TickSource`]; the defaults below
//! assume a 1 kHz counter, so they read as milliseconds.

use crate::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Time a new level must settle before it is trusted as a press.
pub const DEBOUNCE_TICKS: u32 = 50;

/// Time from the debounced press until the press counts as a long press.
pub const LONG_PRESS_TICKS: u32 = 1000;

/// Period of the repeating hold event while a long press is sustained.
pub const HOLD_TICKS: u32 = 50;

/// Reserved super-long-press threshold. The state machine does not read it;
/// use a [`Stage`](crate::button::Stage) to react to very long presses.
pub const SUPER_LONG_PRESS_TICKS: u32 = 5000;

// ============================================================================
// Elapsed time
// ============================================================================

/// Ticks elapsed from `mark` to `now`, correct across counter wraparound.
///
/// Spans longer than the full `u32` range (about 49.7 days at 1 kHz) alias to
/// shorter spans.
///
/// ```
/// use button_stages::ticks::elapsed;
///
/// assert_eq!(elapsed(1_050, 50), 1_000);
/// assert_eq!(elapsed(10, u32::MAX - 9), 20);
/// ```
#[must_use]
#[inline]
pub const fn elapsed(now: u32, mark: u32) -> u32 {
    now.wrapping_sub(mark)
}

// ============================================================================
// TickSource - where time comes from
// ============================================================================

/// A monotonic tick counter that wraps at `u32::MAX`.
///
/// [`Button::update`](crate::button::Button::update) calls [`now`](Self::now)
/// exactly once per evaluation.
///
/// Any `Fn() -> u32` closure is a tick source:
///
/// ```
/// use button_stages::ticks::TickSource;
///
/// let clock = || 42_u32;
/// assert_eq!(clock.now(), 42);
/// ```
pub trait TickSource {
    /// Current value of the counter.
    fn now(&self) -> u32;
}

impl<F> TickSource for F
where
    F: Fn() -> u32,
{
    #[inline]
    fn now(&self) -> u32 {
        self()
    }
}

/// Milliseconds since boot from the `embassy-time` driver.
///
/// The 64-bit embassy instant is truncated to 32 bits, which wraps the same
/// way a hardware millisecond counter would.
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyTicks;

#[cfg(feature = "embassy")]
impl TickSource for EmbassyTicks {
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the counter is meant to wrap at u32"
    )]
    fn now(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}

// ============================================================================
// Timing - configurable thresholds
// ============================================================================

/// Thresholds that drive the press state machine.
///
/// [`Timing::DEFAULT`] uses [`DEBOUNCE_TICKS`], [`LONG_PRESS_TICKS`],
/// [`HOLD_TICKS`] and [`SUPER_LONG_PRESS_TICKS`].
///
/// ```
/// use button_stages::ticks::Timing;
///
/// let timing = Timing::new(20, 500, 100)?;
/// assert_eq!(timing.long_press, 500);
///
/// // A zero hold period would repeat on every poll.
/// assert!(Timing::new(20, 500, 0).is_err());
/// # Ok::<(), button_stages::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Settle time before a press is accepted. Zero disables debouncing.
    pub debounce: u32,
    /// Press duration, measured from the debounced press, that counts as long.
    pub long_press: u32,
    /// Hold-repeat period once a long press is reached.
    pub hold: u32,
    /// Reserved; carried for configuration parity, never read by the engine.
    pub super_long_press: u32,
}

impl Timing {
    /// The default thresholds.
    pub const DEFAULT: Self = Self {
        debounce: DEBOUNCE_TICKS,
        long_press: LONG_PRESS_TICKS,
        hold: HOLD_TICKS,
        super_long_press: SUPER_LONG_PRESS_TICKS,
    };

    /// Creates validated thresholds, keeping the default super-long-press value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `long_press` or `hold` is zero.
    pub const fn new(debounce: u32, long_press: u32, hold: u32) -> Result<Self> {
        let timing = Self {
            debounce,
            long_press,
            hold,
            super_long_press: SUPER_LONG_PRESS_TICKS,
        };
        match timing.validate() {
            Ok(()) => Ok(timing),
            Err(err) => Err(err),
        }
    }

    /// Checks the thresholds without constructing anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `long_press` or `hold` is zero.
    pub const fn validate(&self) -> Result<()> {
        if self.long_press == 0 || self.hold == 0 {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

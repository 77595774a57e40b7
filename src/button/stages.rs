//! Multi-stage long press: ordered thresholds with one-shot latches.
//!
//! See [`StageSet`] for the rules and an example.

use super::ButtonEvent;
use super::event_sink::Dispatcher;
use crate::{Error, Result};

/// Largest number of stages a [`StageSet`] accepts.
pub const MAX_STAGES: usize = 255;

/// One step of a multi-stage long press.
///
/// The stage fires its `event` once the button has been held for `threshold`
/// ticks past the long-press instant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stage {
    /// Ticks after the long-press instant at which the stage fires.
    pub threshold: u32,
    /// Event dispatched when the threshold is reached.
    pub event: ButtonEvent,
}

impl Stage {
    /// Creates a stage. Usable in `const` tables.
    #[must_use]
    pub const fn new(threshold: u32, event: ButtonEvent) -> Self {
        Self { threshold, event }
    }
}

/// An ordered stage table plus the latches that remember which stages fired.
///
/// Both slices are borrowed from the caller: the table can live in a `const`
/// (flash), and the latches in a `static` or on the stack. Nothing is copied.
///
/// # Rules
///
/// - Thresholds are strictly increasing and the first is greater than zero.
/// - There is exactly one latch per stage.
/// - Each stage fires at most once per press. All latches clear together
///   when the button returns to idle.
/// - When several thresholds were crossed between two polls, all of them fire
///   in that poll, lowest threshold first.
///
/// # Example
///
/// ```
/// use button_stages::button::{ButtonEvent, Stage, StageSet};
/// use button_stages::Error;
///
/// const STAGES: [Stage; 2] = [
///     Stage::new(2_000, ButtonEvent::Custom(1)),
///     Stage::new(3_000, ButtonEvent::Custom(2)),
/// ];
///
/// let mut latches = [false; 2];
/// let stage_set = StageSet::new(&STAGES, &mut latches)?;
/// assert_eq!(stage_set.latches(), &[false, false]);
///
/// // Thresholds must be strictly increasing.
/// let unordered = [
///     Stage::new(3_000, ButtonEvent::Custom(1)),
///     Stage::new(2_000, ButtonEvent::Custom(2)),
/// ];
/// assert_eq!(StageSet::validate(&unordered), Err(Error::InvalidStages));
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug)]
pub struct StageSet<'a> {
    stages: &'a [Stage],
    latches: &'a mut [bool],
}

impl<'a> StageSet<'a> {
    /// Validates the table and binds it to its latches, clearing them.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if either slice is empty or the table
    ///   exceeds [`MAX_STAGES`].
    /// - [`Error::InvalidStages`] if the thresholds break the ordering rules
    ///   or the slice lengths differ.
    ///
    /// On error the latches are left untouched.
    pub fn new(stages: &'a [Stage], latches: &'a mut [bool]) -> Result<Self> {
        let checked = if latches.is_empty() {
            Err(Error::InvalidArgument)
        } else if let Err(err) = Self::validate(stages) {
            Err(err)
        } else if latches.len() != stages.len() {
            Err(Error::InvalidStages)
        } else {
            Ok(())
        };
        if let Err(err) = checked {
            #[cfg(feature = "defmt")]
            defmt::warn!("StageSet::new: rejected {} stages: {}", stages.len(), err);
            return Err(err);
        }

        latches.fill(false);
        Ok(Self { stages, latches })
    }

    /// Checks a stage table against the ordering rules.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the table is empty or exceeds
    ///   [`MAX_STAGES`].
    /// - [`Error::InvalidStages`] if the first threshold is zero or any
    ///   threshold is not greater than its predecessor.
    pub fn validate(stages: &[Stage]) -> Result<()> {
        let Some(first) = stages.first() else {
            return Err(Error::InvalidArgument);
        };
        if stages.len() > MAX_STAGES {
            return Err(Error::InvalidArgument);
        }
        if first.threshold == 0 {
            return Err(Error::InvalidStages);
        }
        let increasing = stages
            .windows(2)
            .all(|pair| matches!(pair, [earlier, later] if later.threshold > earlier.threshold));
        if !increasing {
            return Err(Error::InvalidStages);
        }
        Ok(())
    }

    /// The stage table.
    #[must_use]
    pub const fn stages(&self) -> &[Stage] {
        self.stages
    }

    /// Which stages have fired during the current press.
    #[must_use]
    pub fn latches(&self) -> &[bool] {
        &*self.latches
    }

    /// Fires every due stage whose latch is still open, in table order.
    pub(crate) fn fire_due(&mut self, held: u32, dispatcher: &mut Dispatcher<'_>) {
        for (stage, latch) in self.stages.iter().zip(self.latches.iter_mut()) {
            if held < stage.threshold {
                break; // later thresholds are larger
            }
            if !*latch {
                *latch = true;
                dispatcher.dispatch(stage.event);
            }
        }
    }

    /// Re-arms every stage for the next press.
    pub(crate) fn reset_latches(&mut self) {
        self.latches.fill(false);
    }
}

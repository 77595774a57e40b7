//! Error type shared by every fallible entry point.
//!
//! Every operation validates its arguments before touching any state, so an
//! `Err` always leaves the [`Button`](crate::button::Button) exactly as it was.

use derive_more::{Display, Error};

/// Errors reported by the button engine.
///
/// Only [`InvalidArgument`](Self::InvalidArgument) and
/// [`InvalidStages`](Self::InvalidStages) are produced today. The remaining
/// kinds are kept so callers can match on them once a reader or tick source
/// learns to report faults.
#[derive(Clone, Copy, Debug, Display, Eq, Error, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A required argument was empty or out of range, or the button is not
    /// initialized.
    #[display("invalid argument")]
    InvalidArgument,

    /// Reserved: the pin reader reported a hardware fault.
    #[display("hardware failure")]
    HardwareFailure,

    /// Stage thresholds are zero, not strictly increasing, or the latch slice
    /// does not match the stage slice.
    #[display("invalid stage configuration")]
    InvalidStages,

    /// Reserved: the button has not been initialized.
    #[display("button not initialized")]
    NotInitialized,

    /// Reserved: an unclassified failure.
    #[display("unknown error")]
    Unknown,
}

impl Error {
    /// Numeric code of this error, `0` being reserved for success.
    ///
    /// Useful when reporting across an FFI or logging boundary that only
    /// carries integers.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::InvalidArgument => 1,
            Self::HardwareFailure => 2,
            Self::InvalidStages => 3,
            Self::NotInitialized => 4,
            Self::Unknown => 5,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

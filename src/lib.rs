//! Polled, allocation-free button handling for control surfaces.
//!
//! A [`Button`](button::Button) turns a noisy pin, sampled at a fixed cadence,
//! into debounced press, release, long-press, hold-repeat and multi-stage
//! events. There are no interrupts and no allocation: the pin reader, tick
//! source, stage table, latch storage and event sink are all borrowed from the
//! caller.
//!
//! # Glossary
//!
//! - **Tick:** one unit of the monotonic counter supplied by a
//!   [`TickSource`](ticks::TickSource). Its real-time meaning is up to the caller.
//! - **Debounce:** the wait after a level change before it is trusted as a press.
//! - **Stage:** a (threshold, event) pair; one step of a multi-level long press.
//! - **Latch:** a one-shot flag that keeps a stage from firing twice in one press.
//! - **Hold repeat:** the event that repeats while a long press is sustained.
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` on all public types, plus state-transition logging.
//! - `embassy`: [`EmbassyTicks`](ticks::EmbassyTicks), a tick source backed by
//!   `embassy-time`.
//! - `host`: builds against `std` for host-side tests and the demo.
#![cfg_attr(not(feature = "host"), no_std)]

pub mod button;
mod error;
pub mod ticks;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

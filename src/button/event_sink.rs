//! Event delivery from the state machine to application code.
//!
//! Events are handed over synchronously, inside the
//! [`Button::update`](super::Button::update) call that produced them. Plain
//! closures work as sinks; [`ChannelSink`] and [`SignalSink`] forward events to
//! an async task instead.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use super::ButtonEvent;

// ============================================================================
// EventSink - the callback target
// ============================================================================

/// Receives button events.
///
/// Called from inside [`Button::update`](super::Button::update), possibly
/// several times per call. Implementations must not block.
///
/// Any `Fn(ButtonEvent)` closure is a sink; whatever it captures plays the role
/// of a callback context.
///
/// ```
/// use core::cell::Cell;
/// use button_stages::button::{ButtonEvent, EventSink};
///
/// let presses = Cell::new(0);
/// let sink = |event: ButtonEvent| {
///     if event == ButtonEvent::Pressed {
///         presses.set(presses.get() + 1);
///     }
/// };
/// sink.on_event(ButtonEvent::Pressed);
/// assert_eq!(presses.get(), 1);
/// ```
pub trait EventSink {
    /// Handles one event.
    fn on_event(&self, event: ButtonEvent);
}

impl<F> EventSink for F
where
    F: Fn(ButtonEvent),
{
    #[inline]
    fn on_event(&self, event: ButtonEvent) {
        self(event);
    }
}

// ============================================================================
// Dispatcher - owned by each Button
// ============================================================================

/// Routes events to the registered sink and remembers the last one.
pub(crate) struct Dispatcher<'a> {
    sink: Option<&'a dyn EventSink>,
    last_event: ButtonEvent,
}

impl<'a> Dispatcher<'a> {
    pub(crate) const fn new() -> Self {
        Self {
            sink: None,
            last_event: ButtonEvent::None,
        }
    }

    pub(crate) fn register(&mut self, sink: &'a dyn EventSink) {
        self.sink = Some(sink);
    }

    pub(crate) fn unregister(&mut self) {
        self.sink = None;
    }

    pub(crate) const fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub(crate) const fn last_event(&self) -> ButtonEvent {
        self.last_event
    }

    /// Delivers `event` now. With no sink registered the event is dropped.
    pub(crate) fn dispatch(&mut self, event: ButtonEvent) {
        self.last_event = event;
        if let Some(sink) = self.sink {
            sink.on_event(event);
        }
    }
}

// ============================================================================
// ChannelSink - queue events for an async task
// ============================================================================

/// Forwards events into an [`embassy_sync`] channel without blocking.
///
/// When the channel is full the event is dropped and counted, so a slow
/// consumer can never stall the polling loop.
///
/// ```
/// use button_stages::button::{ButtonEvent, ChannelSink, EventSink};
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
/// use embassy_sync::channel::Channel;
///
/// let channel: Channel<NoopRawMutex, ButtonEvent, 4> = Channel::new();
/// let sink = ChannelSink::new(&channel);
///
/// sink.on_event(ButtonEvent::Pressed);
/// assert_eq!(channel.try_receive().ok(), Some(ButtonEvent::Pressed));
/// ```
pub struct ChannelSink<'c, M: RawMutex, const N: usize> {
    channel: &'c Channel<M, ButtonEvent, N>,
    dropped: Cell<u32>,
}

impl<'c, M: RawMutex, const N: usize> ChannelSink<'c, M, N> {
    /// Creates a sink that feeds `channel`.
    #[must_use]
    pub const fn new(channel: &'c Channel<M, ButtonEvent, N>) -> Self {
        Self {
            channel,
            dropped: Cell::new(0),
        }
    }

    /// Number of events lost because the channel was full. Wraps at `u32::MAX`.
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped.get()
    }
}

impl<M: RawMutex, const N: usize> EventSink for ChannelSink<'_, M, N> {
    fn on_event(&self, event: ButtonEvent) {
        if self.channel.try_send(event).is_err() {
            self.dropped.set(self.dropped.get().wrapping_add(1));
            #[cfg(feature = "defmt")]
            defmt::warn!("ChannelSink: channel full, dropped {}", event);
        }
    }
}

// ============================================================================
// SignalSink - latest event wins
// ============================================================================

/// Publishes each event to an [`embassy_sync`] signal.
///
/// A waiting task sees only the most recent event; earlier ones are
/// overwritten. Use [`ChannelSink`] when every event matters.
///
/// ```
/// use button_stages::button::{ButtonEvent, EventSink, SignalSink};
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
/// use embassy_sync::signal::Signal;
///
/// let signal: Signal<NoopRawMutex, ButtonEvent> = Signal::new();
/// let sink = SignalSink::new(&signal);
///
/// sink.on_event(ButtonEvent::Pressed);
/// sink.on_event(ButtonEvent::Released);
/// assert_eq!(signal.try_take(), Some(ButtonEvent::Released));
/// ```
pub struct SignalSink<'s, M: RawMutex> {
    signal: &'s Signal<M, ButtonEvent>,
}

impl<'s, M: RawMutex> SignalSink<'s, M> {
    /// Creates a sink that publishes to `signal`.
    #[must_use]
    pub const fn new(signal: &'s Signal<M, ButtonEvent>) -> Self {
        Self { signal }
    }
}

impl<M: RawMutex> EventSink for SignalSink<'_, M> {
    fn on_event(&self, event: ButtonEvent) {
        self.signal.signal(event);
    }
}

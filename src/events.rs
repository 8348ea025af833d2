//! Lock-free event queue.
//!
//! Events are produced by:
//! - the tick scheduler (sensor refresh, control tick)
//! - the MCU link receive path (front-panel button presses)
//!
//! and consumed one at a time, in FIFO order, by the main loop.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Scheduler   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ MCU link    │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::Button;
use crate::scheduler::Tick;

/// Maximum number of pending events.  One slot stays empty to tell a
/// full ring from an empty one.
const EVENT_QUEUE_CAP: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Sensor refresh tick.
    SensorTick,
    /// Control loop tick.
    ControlTick,
    /// Debounced front-panel button press.
    Button(Button),
}

impl From<Tick> for Event {
    fn from(tick: Tick) -> Self {
        match tick {
            Tick::Sensor => Self::SensorTick,
            Tick::Control => Self::ControlTick,
        }
    }
}

impl Event {
    const fn to_u8(self) -> u8 {
        match self {
            Self::SensorTick => 0,
            Self::ControlTick => 1,
            Self::Button(Button::Timer) => 10,
            Self::Button(Button::Cancel) => 11,
            Self::Button(Button::Select) => 12,
            Self::Button(Button::Start) => 13,
        }
    }

    const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::SensorTick),
            1 => Some(Self::ControlTick),
            10 => Some(Self::Button(Button::Timer)),
            11 => Some(Self::Button(Button::Cancel)),
            12 => Some(Self::Button(Button::Select)),
            13 => Some(Self::Button(Button::Start)),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// One producer, one consumer.  Slots are atomics so the ring needs no
// `unsafe`; head/tail publish with Release and observe with Acquire.

pub struct EventQueue {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU8; EVENT_QUEUE_CAP],
}

static EVENTS: EventQueue = EventQueue::new();

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU8::new(0) }; EVENT_QUEUE_CAP],
        }
    }

    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

        if next_head == tail {
            return false;
        }

        self.slots[head as usize].store(event.to_u8(), Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    pub fn pop(&self) -> Option<Event> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let raw = self.slots[tail as usize].load(Ordering::Relaxed);
        self.tail
            .store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

        Event::from_u8(raw)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed) as usize;
        let tail = self.tail.load(Ordering::Relaxed) as usize;
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Global queue ──────────────────────────────────────────────

/// Push into the global queue.  Returns `false` if it was full.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

pub fn pop_event() -> Option<Event> {
    EVENTS.pop()
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

pub fn queue_len() -> usize {
    EVENTS.len()
}

//! The message vocabulary shared by every coordination strategy.
//!
//! Messages are a tagged union: each [`Payload`] variant has a matching
//! [`MessageKind`], and behaviors declare the kinds they handle as a static
//! table.  Strategies that do not understand a kind simply never claim it.

use std::fmt;

use sf_core::{FactorId, PlaneId, Point, Task, Tick};

/// Discriminant of a [`Payload`], used for handler tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Heartbeat,
    Belief,
    HandOff,
    HandOffReturned,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Heartbeat,
        MessageKind::Belief,
        MessageKind::HandOff,
        MessageKind::HandOffReturned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Heartbeat       => "heartbeat",
            MessageKind::Belief          => "belief",
            MessageKind::HandOff         => "hand_off",
            MessageKind::HandOffReturned => "hand_off_returned",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One min-sum message between two factor-graph nodes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Belief {
    pub from:  FactorId,
    pub to:    FactorId,
    pub value: f64,
}

/// Kind-specific message content.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Periodic presence beacon.  Carries nothing; its arrival is the signal.
    Heartbeat,
    /// A factor-graph belief.
    Belief(Belief),
    /// Ownership of `Task` moves to the recipient.
    HandOff(Task),
    /// A hand-off that could not reach its recipient, bounced to the sender.
    HandOffReturned(Task),
}

impl Payload {
    #[inline]
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Heartbeat          => MessageKind::Heartbeat,
            Payload::Belief(_)          => MessageKind::Belief,
            Payload::HandOff(_)         => MessageKind::HandOff,
            Payload::HandOffReturned(_) => MessageKind::HandOffReturned,
        }
    }
}

/// An immutable message in flight between planes.
///
/// `origin` and `sent_at` are stamped by
/// [`BehaviorCtx`][crate::BehaviorCtx] at send time.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub sender:    PlaneId,
    /// `None` broadcasts to everyone in range.
    pub recipient: Option<PlaneId>,
    pub origin:    Point,
    pub sent_at:   Tick,
    pub payload:   Payload,
}

impl Message {
    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.recipient.is_none()
    }
}

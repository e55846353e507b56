//! Range-gated message delivery between planes.
//!
//! # Rules
//!
//! All range checks use the positions frozen by [`Channel::begin_tick`].
//!
//! - A broadcast reaches every plane within the sender's communication range,
//!   boundary included, except the sender.
//! - A message addressed to a specific plane reaches it only if in range.  A
//!   message a plane addresses to itself always arrives.
//! - An undeliverable `HandOff` comes back to the sender as
//!   `HandOffReturned`, so the task is never lost.  Anything else that cannot
//!   be delivered is dropped.
//!
//! Delivered messages queue in the recipient's inbox until its next pass.

use sf_agent::PlaneState;
use sf_behavior::{Message, MessageKind, Payload};
use sf_core::{PlaneId, TaskId};
use sf_spatial::RangeIndex;
use tracing::{debug, trace};

/// What routing one outbox did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteStats {
    /// Messages handed to the channel.
    pub sent:      u64,
    /// Inbox deliveries (a broadcast counts once per recipient).
    pub delivered: u64,
    /// Messages that reached nobody.
    pub dropped:   u64,
    /// Hand-offs bounced back to their sender.
    pub returned:  u64,
    pub beliefs:   u64,
    pub handoffs:  u64,
}

impl RouteStats {
    pub fn absorb(&mut self, other: RouteStats) {
        self.sent += other.sent;
        self.delivered += other.delivered;
        self.dropped += other.dropped;
        self.returned += other.returned;
        self.beliefs += other.beliefs;
        self.handoffs += other.handoffs;
    }
}

/// Per-plane inboxes plus the position snapshot used for range checks.
pub struct Channel {
    inboxes: Vec<Vec<Message>>,
    ranges:  Vec<f64>,
    index:   RangeIndex,
}

impl Channel {
    pub fn new(planes: &[PlaneState]) -> Self {
        Self {
            inboxes: vec![Vec::new(); planes.len()],
            ranges:  planes.iter().map(|p| p.comm_range).collect(),
            index:   RangeIndex::snapshot(planes),
        }
    }

    /// Freeze positions and ranges for this tick's routing.
    pub fn begin_tick(&mut self, planes: &[PlaneState]) {
        self.index = RangeIndex::snapshot(planes);
        self.ranges.clear();
        self.ranges.extend(planes.iter().map(|p| p.comm_range));
        self.inboxes.resize_with(planes.len(), Vec::new);
    }

    /// Remove and return everything queued for `plane`, in arrival order.
    pub fn take_inbox(&mut self, plane: PlaneId) -> Vec<Message> {
        self.inboxes
            .get_mut(plane.index())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Messages waiting for `plane`.
    pub fn pending(&self, plane: PlaneId) -> &[Message] {
        self.inboxes.get(plane.index()).map_or(&[], Vec::as_slice)
    }

    /// Tasks currently travelling inside a hand-off (or returned hand-off).
    pub fn tasks_in_flight(&self) -> Vec<TaskId> {
        self.inboxes
            .iter()
            .flatten()
            .filter_map(|m| match &m.payload {
                Payload::HandOff(t) | Payload::HandOffReturned(t) => Some(t.id),
                _ => None,
            })
            .collect()
    }

    /// Route one plane's outbox.
    pub fn route(&mut self, outbox: Vec<Message>) -> RouteStats {
        let mut stats = RouteStats::default();
        for msg in outbox {
            stats.sent += 1;
            match msg.kind() {
                MessageKind::Belief => stats.beliefs += 1,
                MessageKind::HandOff => stats.handoffs += 1,
                _ => {}
            }
            match msg.recipient {
                None => self.broadcast(msg, &mut stats),
                Some(to) => self.unicast(to, msg, &mut stats),
            }
        }
        stats
    }

    fn range_of(&self, plane: PlaneId) -> f64 {
        self.ranges.get(plane.index()).copied().unwrap_or(0.0)
    }

    fn broadcast(&mut self, msg: Message, stats: &mut RouteStats) {
        let Some(origin) = self.index.position(msg.sender) else {
            stats.dropped += 1;
            return;
        };
        let recipients = self.index.within(origin, self.range_of(msg.sender));
        let mut reached = 0;
        for to in recipients {
            if to == msg.sender {
                continue;
            }
            if let Some(inbox) = self.inboxes.get_mut(to.index()) {
                inbox.push(msg.clone());
                reached += 1;
            }
        }
        if reached == 0 {
            stats.dropped += 1;
        }
        stats.delivered += reached;
    }

    fn unicast(&mut self, to: PlaneId, msg: Message, stats: &mut RouteStats) {
        let sender = msg.sender;
        let deliverable = to.index() < self.inboxes.len()
            && (to == sender || self.index.in_range(sender, to, self.range_of(sender)));

        if deliverable {
            self.inboxes[to.index()].push(msg);
            stats.delivered += 1;
            return;
        }

        match msg.payload {
            Payload::HandOff(task) => {
                debug!(from = %sender, to = %to, task = %task.id, "hand-off out of range; returning to sender");
                stats.returned += 1;
                if let Some(inbox) = self.inboxes.get_mut(sender.index()) {
                    inbox.push(Message {
                        recipient: Some(sender),
                        payload:   Payload::HandOffReturned(task),
                        ..msg
                    });
                }
            }
            _ => {
                trace!(from = %sender, to = %to, kind = %msg.kind(), "out of range; dropped");
                stats.dropped += 1;
            }
        }
    }
}

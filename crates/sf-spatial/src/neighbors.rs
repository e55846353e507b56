//! Heartbeat-based neighbor confirmation.
//!
//! Every plane running a [`NeighborTracker`] broadcasts a heartbeat each tick.
//! A peer counts as a *confirmed* neighbor over a horizon `h` if it has been
//! heard from without interruption for at least `h` consecutive ticks and was
//! heard in the most recent round.  Any message counts as a sighting, not just
//! heartbeats, since every message proves the sender was in range when sent.
//!
//! Confirmation looks only backwards: a plane that has been in range for `h`
//! ticks is assumed to stay in range for the next `h`.  Long belief rounds on
//! fast-moving planes can therefore lose messages to planes drifting out of
//! range mid-cycle; the channel copes with that by dropping beliefs and
//! bouncing hand-offs.

use std::collections::BTreeSet;

use sf_behavior::{Behavior, BehaviorCtx, Message, MessageKind, Payload};
use sf_core::{PlaneId, Tick};

#[cfg(feature = "fx-hash")]
type SightingMap = rustc_hash::FxHashMap<PlaneId, Sighting>;
#[cfg(not(feature = "fx-hash"))]
type SightingMap = std::collections::HashMap<PlaneId, Sighting>;

/// Uninterrupted run of ticks during which a peer was heard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sighting {
    /// Send tick of the first message of the current run.
    pub streak_start: Tick,
    /// Send tick of the most recent message.
    pub last_seen:    Tick,
}

impl Sighting {
    /// Number of consecutive ticks covered by the run.
    pub fn streak_len(&self) -> u64 {
        self.last_seen.since(self.streak_start) + 1
    }
}

/// Promiscuous behavior that beacons presence and tracks who it hears.
#[derive(Debug, Default)]
pub struct NeighborTracker {
    sightings: SightingMap,
}

impl NeighborTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `sender` sent something at `sent_at`.
    pub fn observe(&mut self, sender: PlaneId, sent_at: Tick) {
        self.sightings
            .entry(sender)
            .and_modify(|s| {
                if sent_at > s.last_seen {
                    if sent_at.0 > s.last_seen.0 + 1 {
                        s.streak_start = sent_at;
                    }
                    s.last_seen = sent_at;
                }
            })
            .or_insert(Sighting { streak_start: sent_at, last_seen: sent_at });
    }

    pub fn sighting(&self, plane: PlaneId) -> Option<Sighting> {
        self.sightings.get(&plane).copied()
    }

    /// Whether `plane` is a confirmed neighbor of `me` over `horizon` ticks,
    /// as of tick `now`.  A plane is always its own neighbor.
    pub fn is_neighbor(&self, me: PlaneId, plane: PlaneId, horizon: u64, now: Tick) -> bool {
        if plane == me {
            return true;
        }
        match self.sightings.get(&plane) {
            Some(s) => s.last_seen.0 + 1 >= now.0 && s.streak_len() >= horizon,
            None => false,
        }
    }

    /// Every confirmed neighbor of `me`, `me` included, in id order.
    pub fn neighbors(&self, me: PlaneId, horizon: u64, now: Tick) -> BTreeSet<PlaneId> {
        let mut set: BTreeSet<PlaneId> = self
            .sightings
            .keys()
            .copied()
            .filter(|&p| self.is_neighbor(me, p, horizon, now))
            .collect();
        set.insert(me);
        set
    }
}

impl Behavior for NeighborTracker {
    fn name(&self) -> &'static str {
        "neighbor_tracker"
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::Heartbeat]
    }

    fn is_promiscuous(&self) -> bool {
        true
    }

    fn before_messages(&mut self, ctx: &mut BehaviorCtx<'_>) {
        ctx.broadcast(Payload::Heartbeat);
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut BehaviorCtx<'_>) {
        if msg.sender != ctx.me() {
            self.observe(msg.sender, msg.sent_at);
        }
    }
}

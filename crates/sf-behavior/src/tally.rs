//! A passive behavior that counts every message its plane receives.

use crate::{Behavior, BehaviorCtx, Message, MessageKind};

/// Promiscuous [`Behavior`] that counts delivered messages per kind.
///
/// Handles nothing, so it can sit next to any strategy.  Useful in tests and
/// for "how chatty is this protocol" summaries.
#[derive(Debug, Default, Clone)]
pub struct MessageTally {
    counts: [u64; MessageKind::ALL.len()],
}

impl MessageTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: MessageKind) -> u64 {
        self.counts[kind as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Behavior for MessageTally {
    fn name(&self) -> &'static str {
        "message_tally"
    }

    fn is_promiscuous(&self) -> bool {
        true
    }

    fn on_message(&mut self, msg: &Message, _ctx: &mut BehaviorCtx<'_>) {
        self.counts[msg.kind() as usize] += 1;
    }
}

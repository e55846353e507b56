//! `MaxSum` — the reallocation protocol as a plane behavior.

use sf_agent::RemovalReason;
use sf_behavior::{Behavior, BehaviorCtx, BehaviorKind, BehaviorSet, Message, MessageKind, Payload};
use sf_core::{PlaneId, Task};
use sf_mobility::{Navigator, NavigatorConfig};
use sf_spatial::NeighborTracker;
use tracing::{debug, warn};

use crate::{
    BeliefIntake, CostFactory, CostFunction, CyclePhase, FactorGraph, FleetView, MaxSumConfig,
    MaxSumResult, decide, run_round,
};

/// Per-plane protocol counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaxSumStats {
    pub cycles:            u64,
    pub active_cycles:     u64,
    pub beliefs_sent:      u64,
    pub beliefs_received:  u64,
    pub beliefs_dropped:   u64,
    pub handoffs_sent:     u64,
    pub handoffs_received: u64,
    pub handoffs_returned: u64,
}

/// Hosts one plane's share of the factor graph and drives it through the
/// reallocation cycle.
///
/// Requires a [`NeighborTracker`] (for confirmed neighbors) and a
/// [`Navigator`] (so acquired tasks get flown to) on the same plane.
pub struct MaxSum {
    config: MaxSumConfig,
    cost:   Box<dyn CostFunction>,
    graph:  Option<FactorGraph>,
    stats:  MaxSumStats,
}

impl MaxSum {
    pub fn new(config: MaxSumConfig, cost: Box<dyn CostFunction>) -> MaxSumResult<Self> {
        config.validate()?;
        Ok(Self { config, cost, graph: None, stats: MaxSumStats::default() })
    }

    pub fn config(&self) -> &MaxSumConfig {
        &self.config
    }

    /// The hosted graph; `None` until the plane first acquires a task or
    /// takes part in a tick.
    pub fn graph(&self) -> Option<&FactorGraph> {
        self.graph.as_ref()
    }

    pub fn stats(&self) -> &MaxSumStats {
        &self.stats
    }

    fn rebuild(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let me = ctx.me();
        let Some(tracker) = ctx.dependency::<NeighborTracker>() else {
            warn!(plane = %me, "no neighbor tracker attached; skipping cycle");
            return;
        };
        let confirmed = tracker.neighbors(me, self.config.rounds, ctx.tick);
        let fleet = FleetView::new(ctx.plane, ctx.peers);
        let graph = self.graph.get_or_insert_with(|| FactorGraph::new(me));
        let active = graph.rebuild(&confirmed, fleet, self.cost.as_ref());

        self.stats.cycles += 1;
        if active {
            self.stats.active_cycles += 1;
        }
        debug!(
            plane = %me,
            tick = %ctx.tick,
            neighbors = confirmed.len(),
            edges = graph.workload().edges.len(),
            active,
            "factor graph rebuilt"
        );
    }

    fn round(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let Some(graph) = self.graph.as_mut().filter(|g| g.is_active()) else { return };
        graph.refresh_potentials(FleetView::new(ctx.plane, ctx.peers), self.cost.as_ref());
        let beliefs = run_round(graph, self.config.workload_weight);
        self.stats.beliefs_sent += beliefs.len() as u64;
        for belief in beliefs {
            ctx.send_to(belief.to.plane, Payload::Belief(belief));
        }
    }

    fn decide(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let Some(graph) = self.graph.as_mut().filter(|g| g.is_active()) else { return };
        let fleet = FleetView::new(ctx.plane, ctx.peers);
        let handoffs = decide(graph, fleet, self.config.workload_weight);
        graph.deactivate();

        for h in handoffs {
            if ctx.plane.remove_task(h.task.id, RemovalReason::HandedOff).is_none() {
                continue;
            }
            debug!(plane = %ctx.me(), task = %h.task.id, to = %h.to, tick = %ctx.tick, "handing off");
            ctx.send_to(h.to, Payload::HandOff(h.task));
            self.stats.handoffs_sent += 1;
        }
    }

    fn graph_for(&mut self, me: PlaneId) -> &mut FactorGraph {
        self.graph.get_or_insert_with(|| FactorGraph::new(me))
    }
}

impl Behavior for MaxSum {
    fn name(&self) -> &'static str {
        "max_sum"
    }

    fn requires(&self) -> Vec<BehaviorKind> {
        vec![BehaviorKind::of::<NeighborTracker>(), BehaviorKind::of::<Navigator>()]
    }

    fn handles(&self) -> &'static [MessageKind] {
        &[MessageKind::Belief, MessageKind::HandOff, MessageKind::HandOffReturned]
    }

    fn initialize(&mut self, ctx: &mut BehaviorCtx<'_>) {
        // Tasks owned before this behavior ever ran have no selector yet.
        let me = ctx.me();
        let graph = self.graph.get_or_insert_with(|| FactorGraph::new(me));
        for task in ctx.plane.tasks() {
            if graph.selector(task.id).is_none() {
                graph.add_selector(*task, ctx.plane, self.cost.as_ref());
            }
        }
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut BehaviorCtx<'_>) {
        match &msg.payload {
            Payload::Belief(belief) => {
                let intake = self.graph_for(ctx.me()).receive(belief);
                if intake == BeliefIntake::Stored {
                    self.stats.beliefs_received += 1;
                } else {
                    self.stats.beliefs_dropped += 1;
                    debug!(
                        plane = %ctx.me(),
                        from = %belief.from,
                        to = %belief.to,
                        ?intake,
                        "belief dropped"
                    );
                }
            }
            Payload::HandOff(task) => {
                if ctx.plane.add_task(*task) {
                    self.stats.handoffs_received += 1;
                    debug!(plane = %ctx.me(), task = %task.id, from = %msg.sender, "task received");
                } else {
                    debug!(plane = %ctx.me(), task = %task.id, "hand-off of a task already owned");
                }
            }
            Payload::HandOffReturned(task) => {
                if ctx.plane.add_task(*task) {
                    self.stats.handoffs_returned += 1;
                    debug!(plane = %ctx.me(), task = %task.id, "hand-off returned; keeping task");
                }
            }
            // Not in `handles()`; the tracker consumes heartbeats.
            Payload::Heartbeat => {}
        }
    }

    fn after_messages(&mut self, ctx: &mut BehaviorCtx<'_>) {
        match self.config.phase(ctx.tick) {
            CyclePhase::Rebuild  => self.rebuild(ctx),
            CyclePhase::Round(_) => self.round(ctx),
            CyclePhase::Decide   => self.decide(ctx),
            CyclePhase::Idle     => {}
        }
    }

    fn on_task_added(&mut self, task: &Task, ctx: &mut BehaviorCtx<'_>) {
        let me = ctx.me();
        let graph = self.graph.get_or_insert_with(|| FactorGraph::new(me));
        graph.add_selector(*task, ctx.plane, self.cost.as_ref());
    }

    fn on_task_removed(&mut self, task: &Task, _reason: RemovalReason, ctx: &mut BehaviorCtx<'_>) {
        self.graph_for(ctx.me()).remove_selector(task.id);
    }
}

/// Attach the full max-sum stack to one plane's behavior set: neighbor
/// tracking, navigation, then the protocol itself.
pub fn install(
    set:        &mut BehaviorSet,
    plane:      PlaneId,
    config:     &MaxSumConfig,
    navigation: &NavigatorConfig,
    costs:      &dyn CostFactory,
) -> MaxSumResult<()> {
    set.attach(NeighborTracker::new())?;
    set.attach(Navigator::new(navigation.clone())?)?;
    set.attach(MaxSum::new(config.clone(), costs.make(plane))?)?;
    Ok(())
}

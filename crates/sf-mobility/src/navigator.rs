//! `Navigator` — the behavior that moves a plane.

use sf_agent::RemovalReason;
use sf_behavior::{Behavior, BehaviorCtx};
use sf_core::{Task, TaskId};
use tracing::debug;

use crate::{MobilityError, MobilityResult};

/// Navigator settings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigatorConfig {
    /// Tasks older than this many ticks are dropped as expired.
    /// `None` keeps tasks forever.
    pub task_ttl: Option<u64>,
}

impl NavigatorConfig {
    pub fn validate(&self) -> MobilityResult<()> {
        match self.task_ttl {
            Some(0) => Err(MobilityError::ZeroTtl),
            _ => Ok(()),
        }
    }
}

/// Flies the plane towards its nearest owned task and completes it on arrival.
///
/// Keeps `PlaneState::target` pointing at the nearest owned task: replans on
/// every task added or removed, and moves in `post_step` so that the whole
/// tick's coordination sees the position the tick started with.
#[derive(Debug, Default)]
pub struct Navigator {
    config:    NavigatorConfig,
    completed: u64,
    expired:   u64,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> MobilityResult<Self> {
        config.validate()?;
        Ok(Self { config, completed: 0, expired: 0 })
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Tasks this plane completed.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Tasks this plane dropped as expired.
    pub fn expired(&self) -> u64 {
        self.expired
    }

    fn replan(ctx: &mut BehaviorCtx<'_>) {
        ctx.plane.target = ctx.plane.nearest_task().map(|t| t.id);
    }
}

impl Behavior for Navigator {
    fn name(&self) -> &'static str {
        "navigator"
    }

    fn before_messages(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let Some(ttl) = self.config.task_ttl else { return };
        let now = ctx.tick;
        let stale: Vec<TaskId> = ctx
            .plane
            .tasks()
            .iter()
            .filter(|t| t.age(now) >= ttl)
            .map(|t| t.id)
            .collect();
        for id in stale {
            if ctx.plane.remove_task(id, RemovalReason::Expired).is_some() {
                self.expired += 1;
                debug!(plane = %ctx.me(), task = %id, tick = %now, "task expired");
            }
        }
    }

    fn post_step(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let Some(target) = ctx.plane.target else { return };
        let Some(goal) = ctx.plane.task(target).map(|t| t.location) else {
            // Target no longer owned: retarget, move next tick.
            Self::replan(ctx);
            return;
        };

        let next = ctx.plane.position.step_towards(goal, ctx.plane.speed);
        ctx.plane.position = next;
        if next == goal {
            ctx.plane.remove_task(target, RemovalReason::Completed);
            self.completed += 1;
            debug!(plane = %ctx.me(), task = %target, tick = %ctx.tick, "task completed");
        }
    }

    fn on_task_added(&mut self, _task: &Task, ctx: &mut BehaviorCtx<'_>) {
        Self::replan(ctx);
    }

    fn on_task_removed(&mut self, _task: &Task, _reason: RemovalReason, ctx: &mut BehaviorCtx<'_>) {
        Self::replan(ctx);
    }
}

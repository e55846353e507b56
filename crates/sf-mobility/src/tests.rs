//! Unit tests for sf-mobility.

use sf_agent::{PeerView, PlaneSpec, PlaneState, RemovalReason, TaskEvent};
use sf_behavior::{BehaviorSet, StepEnv, StepReport};
use sf_core::{PlaneId, Point, Task, TaskId, Tick};

use crate::{MobilityError, Navigator, NavigatorConfig};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn plane(speed: f64) -> PlaneState {
    PlaneState::new(PlaneId(0), PlaneSpec::new(Point::new(0.0, 0.0), 10.0, speed))
}

fn task(id: u32, x: f64, created: u64) -> Task {
    Task::new(TaskId(id), Point::new(x, 0.0), Tick(created))
}

fn navigator_set(config: NavigatorConfig) -> BehaviorSet {
    let mut set = BehaviorSet::new();
    set.attach(Navigator::new(config).unwrap()).unwrap();
    set
}

fn step(set: &mut BehaviorSet, me: &mut PlaneState, tick: u64) -> StepReport {
    let peers = PeerView::empty();
    let mut outbox = Vec::new();
    let mut env = StepEnv { tick: Tick(tick), plane: me, peers: &peers, outbox: &mut outbox };
    set.step(&mut env, vec![])
}

fn notify(set: &mut BehaviorSet, me: &mut PlaneState) {
    let peers = PeerView::empty();
    let mut outbox = Vec::new();
    let mut env = StepEnv { tick: Tick(0), plane: me, peers: &peers, outbox: &mut outbox };
    set.notify(&mut env);
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn zero_ttl_rejected() {
        let cfg = NavigatorConfig { task_ttl: Some(0) };
        assert_eq!(cfg.validate(), Err(MobilityError::ZeroTtl));
        assert!(Navigator::new(cfg).is_err());
    }

    #[test]
    fn default_never_expires() {
        assert_eq!(NavigatorConfig::default().task_ttl, None);
        assert!(NavigatorConfig::default().validate().is_ok());
    }
}

// ── Navigation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod navigator_tests {
    use super::*;

    #[test]
    fn targets_nearest_on_add_and_retargets_on_closer_task() {
        let mut set = navigator_set(NavigatorConfig::default());
        let mut me = plane(1.0);
        me.add_task(task(1, 10.0, 0));
        notify(&mut set, &mut me);
        assert_eq!(me.target, Some(TaskId(1)));

        me.add_task(task(2, -3.0, 0));
        notify(&mut set, &mut me);
        assert_eq!(me.target, Some(TaskId(2)));
    }

    #[test]
    fn moves_at_speed_and_completes_on_arrival() {
        let mut set = navigator_set(NavigatorConfig::default());
        let mut me = plane(2.0);
        me.add_task(task(1, 5.0, 0));
        notify(&mut set, &mut me);

        step(&mut set, &mut me, 0);
        assert_eq!(me.position, Point::new(2.0, 0.0));
        step(&mut set, &mut me, 1);
        assert_eq!(me.position, Point::new(4.0, 0.0));
        let report = step(&mut set, &mut me, 2);
        assert_eq!(me.position, Point::new(5.0, 0.0));
        assert_eq!(me.task_count(), 0);
        assert_eq!(me.target, None);
        assert_eq!(
            report.task_events,
            vec![TaskEvent::Removed { task: task(1, 5.0, 0), reason: RemovalReason::Completed }]
        );
        assert_eq!(set.get::<Navigator>().unwrap().completed(), 1);
    }

    #[test]
    fn moves_on_to_next_task_after_completion() {
        let mut set = navigator_set(NavigatorConfig::default());
        let mut me = plane(10.0);
        me.add_task(task(1, 1.0, 0));
        me.add_task(task(2, 4.0, 0));
        notify(&mut set, &mut me);

        step(&mut set, &mut me, 0);
        assert!(!me.owns(TaskId(1)));
        assert_eq!(me.target, Some(TaskId(2)));
    }

    #[test]
    fn stationary_plane_stays_put() {
        let mut set = navigator_set(NavigatorConfig::default());
        let mut me = plane(0.0);
        me.add_task(task(1, 5.0, 0));
        notify(&mut set, &mut me);
        for t in 0..5 {
            step(&mut set, &mut me, t);
        }
        assert_eq!(me.position, Point::new(0.0, 0.0));
        assert!(me.owns(TaskId(1)));
    }

    #[test]
    fn old_tasks_expire() {
        let mut set = navigator_set(NavigatorConfig { task_ttl: Some(3) });
        let mut me = plane(0.0);
        me.add_task(task(1, 5.0, 0));
        me.add_task(task(2, 6.0, 2));
        notify(&mut set, &mut me);

        step(&mut set, &mut me, 2);
        assert_eq!(me.task_count(), 2);
        let report = step(&mut set, &mut me, 3);
        assert!(!me.owns(TaskId(1)));
        assert!(me.owns(TaskId(2)));
        assert_eq!(me.target, Some(TaskId(2)));
        assert_eq!(
            report.task_events,
            vec![TaskEvent::Removed { task: task(1, 5.0, 0), reason: RemovalReason::Expired }]
        );
        assert_eq!(set.get::<Navigator>().unwrap().expired(), 1);
    }
}

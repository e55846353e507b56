//! Unit tests for sf-behavior.

use std::sync::{Arc, Mutex};

use sf_agent::{PeerView, PlaneSpec, PlaneState, RemovalReason};
use sf_core::{PlaneId, Point, Task, TaskId, Tick};

use crate::{
    Behavior, BehaviorCtx, BehaviorError, BehaviorKind, BehaviorSet, Message, MessageKind,
    MessageTally, Payload, StepEnv, StepReport,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Log = Arc<Mutex<Vec<String>>>;

fn plane(id: u32) -> PlaneState {
    PlaneState::new(PlaneId(id), PlaneSpec::new(Point::new(0.0, 0.0), 10.0, 1.0))
}

fn task(id: u32) -> Task {
    Task::new(TaskId(id), Point::new(3.0, 4.0), Tick(0))
}

fn msg(sender: u32, payload: Payload) -> Message {
    Message {
        sender:    PlaneId(sender),
        recipient: None,
        origin:    Point::new(0.0, 0.0),
        sent_at:   Tick(0),
        payload,
    }
}

/// Run one step of `set` on a lone plane and return the report and outbox.
fn run(set: &mut BehaviorSet, me: &mut PlaneState, tick: u64, inbox: Vec<Message>) -> (StepReport, Vec<Message>) {
    let peers = PeerView::empty();
    let mut outbox = Vec::new();
    let report = {
        let mut env = StepEnv { tick: Tick(tick), plane: me, peers: &peers, outbox: &mut outbox };
        set.step(&mut env, inbox)
    };
    (report, outbox)
}

/// Records every hook call as `"<tag>:<hook>"`.
struct Recorder {
    tag:         &'static str,
    log:         Log,
    handles:     &'static [MessageKind],
    promiscuous: bool,
}

impl Recorder {
    fn new(tag: &'static str, log: &Log) -> Self {
        Self { tag, log: Arc::clone(log), handles: &[], promiscuous: false }
    }

    fn push(&self, what: impl Into<String>) {
        self.log.lock().unwrap().push(format!("{}:{}", self.tag, what.into()));
    }
}

impl Behavior for Recorder {
    fn name(&self) -> &'static str {
        self.tag
    }

    fn handles(&self) -> &'static [MessageKind] {
        self.handles
    }

    fn is_promiscuous(&self) -> bool {
        self.promiscuous
    }

    fn initialize(&mut self, _ctx: &mut BehaviorCtx<'_>) {
        self.push("init");
    }

    fn before_messages(&mut self, _ctx: &mut BehaviorCtx<'_>) {
        self.push("before");
    }

    fn on_message(&mut self, msg: &Message, _ctx: &mut BehaviorCtx<'_>) {
        self.push(format!("msg {}", msg.kind()));
    }

    fn after_messages(&mut self, _ctx: &mut BehaviorCtx<'_>) {
        self.push("after");
    }

    fn post_step(&mut self, _ctx: &mut BehaviorCtx<'_>) {
        self.push("post");
    }

    fn on_task_added(&mut self, task: &Task, _ctx: &mut BehaviorCtx<'_>) {
        self.push(format!("added {}", task.id));
    }

    fn on_task_removed(&mut self, task: &Task, reason: RemovalReason, _ctx: &mut BehaviorCtx<'_>) {
        self.push(format!("removed {} {}", task.id, reason.as_str()));
    }
}

/// A second recorder type, so two can be attached to one set.
struct Follower(Recorder);

impl Behavior for Follower {
    fn name(&self) -> &'static str {
        "follower"
    }

    fn requires(&self) -> Vec<BehaviorKind> {
        vec![BehaviorKind::of::<Recorder>()]
    }

    fn handles(&self) -> &'static [MessageKind] {
        self.0.handles
    }

    fn before_messages(&mut self, ctx: &mut BehaviorCtx<'_>) {
        let seen = ctx.dependency::<Recorder>().map(|r| r.tag).unwrap_or("none");
        self.0.push(format!("before dep={seen}"));
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut BehaviorCtx<'_>) {
        self.0.on_message(msg, ctx);
    }

    fn on_task_removed(&mut self, task: &Task, reason: RemovalReason, ctx: &mut BehaviorCtx<'_>) {
        self.0.on_task_removed(task, reason, ctx);
    }
}

struct SelfLoop;

impl Behavior for SelfLoop {
    fn name(&self) -> &'static str {
        "self_loop"
    }

    fn requires(&self) -> Vec<BehaviorKind> {
        vec![BehaviorKind::of::<SelfLoop>()]
    }
}

/// Drops the first owned task in `before_messages`.
struct Dropper;

impl Behavior for Dropper {
    fn name(&self) -> &'static str {
        "dropper"
    }

    fn before_messages(&mut self, ctx: &mut BehaviorCtx<'_>) {
        if let Some(id) = ctx.plane.tasks().first().map(|t| t.id) {
            ctx.plane.remove_task(id, RemovalReason::Expired);
        }
    }
}

// ── Topological sort ──────────────────────────────────────────────────────────

#[cfg(test)]
mod dag_tests {
    use crate::dag::{CycleError, topological_sort};

    #[test]
    fn no_edges_is_index_order() {
        assert_eq!(topological_sort(3, &[]), Ok(vec![0, 1, 2]));
    }

    #[test]
    fn edges_override_index_order() {
        // 2 must precede 0.
        assert_eq!(topological_sort(3, &[(2, 0)]), Ok(vec![1, 2, 0]));
    }

    #[test]
    fn cycle_detected() {
        assert_eq!(topological_sort(2, &[(0, 1), (1, 0)]), Err(CycleError));
    }

    #[test]
    fn self_edge_is_cycle() {
        assert_eq!(topological_sort(1, &[(0, 0)]), Err(CycleError));
    }
}

// ── Attach-time validation ────────────────────────────────────────────────────

#[cfg(test)]
mod attach_tests {
    use super::*;

    #[test]
    fn dependency_order_follows_attach_order() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        set.attach(Recorder::new("rec", &log)).unwrap();
        set.attach(Follower(Recorder::new("fol", &log))).unwrap();
        assert_eq!(set.names(), vec!["rec", "follower"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn missing_dependency_rejected() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        let err = set.attach(Follower(Recorder::new("fol", &log))).unwrap_err();
        assert_eq!(
            err,
            BehaviorError::MissingDependency { behavior: "follower", missing: "Recorder" }
        );
        assert!(set.is_empty());
    }

    #[test]
    fn self_dependency_is_cycle() {
        let mut set = BehaviorSet::new();
        let err = set.attach(SelfLoop).unwrap_err();
        assert_eq!(err, BehaviorError::DependencyCycle { behavior: "self_loop" });
        assert!(set.is_empty());
    }

    #[test]
    fn duplicate_kind_rejected() {
        let mut set = BehaviorSet::new();
        set.attach(MessageTally::new()).unwrap();
        let err = set.attach(MessageTally::new()).unwrap_err();
        assert_eq!(err, BehaviorError::DuplicateBehavior("message_tally"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn duplicate_handler_rejected_and_set_unchanged() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        let mut rec = Recorder::new("rec", &log);
        rec.handles = &[MessageKind::Belief];
        let rec_id = set.attach(rec).unwrap();

        let mut fol = Recorder::new("fol", &log);
        fol.handles = &[MessageKind::Belief];
        let err = set.attach(Follower(fol)).unwrap_err();
        assert_eq!(
            err,
            BehaviorError::DuplicateHandler {
                kind:   MessageKind::Belief,
                first:  "rec",
                second: "follower",
            }
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.handler_of(MessageKind::Belief), Some(rec_id));
    }

    #[test]
    fn get_and_get_mut_downcast() {
        let mut set = BehaviorSet::new();
        set.attach(MessageTally::new()).unwrap();
        assert!(set.get::<MessageTally>().is_some());
        assert!(set.get::<SelfLoop>().is_none());
        assert!(set.get_mut::<MessageTally>().is_some());
    }
}

// ── Step dispatch ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn phases_run_in_order_and_initialize_once() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        set.attach(Recorder::new("rec", &log)).unwrap();
        let mut me = plane(0);

        run(&mut set, &mut me, 0, vec![]);
        run(&mut set, &mut me, 1, vec![]);

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                "rec:init", "rec:before", "rec:after", "rec:post",
                "rec:before", "rec:after", "rec:post",
            ]
        );
    }

    #[test]
    fn dependency_visible_through_ctx() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        set.attach(Recorder::new("rec", &log)).unwrap();
        set.attach(Follower(Recorder::new("fol", &log))).unwrap();
        let mut me = plane(0);
        run(&mut set, &mut me, 0, vec![]);
        assert!(log.lock().unwrap().contains(&"fol:before dep=rec".to_string()));
    }

    #[test]
    fn message_goes_to_handler_and_promiscuous_only() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        let mut rec = Recorder::new("rec", &log);
        rec.promiscuous = true;
        set.attach(rec).unwrap();
        let mut fol = Recorder::new("fol", &log);
        fol.handles = &[MessageKind::Belief];
        set.attach(Follower(fol)).unwrap();
        let mut me = plane(0);

        let heartbeat = msg(1, Payload::Heartbeat);
        let (report, _) = run(&mut set, &mut me, 0, vec![heartbeat]);
        assert_eq!(report.handled, 0);
        assert_eq!(report.unhandled, 1);

        let log = log.lock().unwrap();
        assert!(log.contains(&"rec:msg heartbeat".to_string()));
        assert!(!log.iter().any(|l| l.starts_with("fol:msg")));
    }

    #[test]
    fn handler_and_observer_each_see_message_once() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        let mut rec = Recorder::new("rec", &log);
        rec.promiscuous = true;
        rec.handles = &[MessageKind::Heartbeat];
        set.attach(rec).unwrap();
        set.attach(MessageTally::new()).unwrap();
        let mut me = plane(0);

        let (report, _) = run(&mut set, &mut me, 0, vec![msg(1, Payload::Heartbeat)]);
        assert_eq!(report.handled, 1);
        let seen = log.lock().unwrap().iter().filter(|l| l.contains("msg")).count();
        assert_eq!(seen, 1);
        assert_eq!(set.get::<MessageTally>().unwrap().count(MessageKind::Heartbeat), 1);
    }

    #[test]
    fn task_removal_fans_out_to_every_behavior() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        set.attach(Dropper).unwrap();
        set.attach(Recorder::new("rec", &log)).unwrap();
        let mut me = plane(0);
        me.add_task(task(7));
        me.drain_events();

        let (report, _) = run(&mut set, &mut me, 0, vec![]);
        assert_eq!(me.task_count(), 0);
        assert_eq!(report.task_events.len(), 1);
        let log = log.lock().unwrap();
        let removed = log.iter().position(|l| l == "rec:removed TaskId(7) expired").unwrap();
        let after = log.iter().position(|l| l == "rec:after").unwrap();
        assert!(removed < after);
    }

    #[test]
    fn notify_flushes_external_changes() {
        let log = Log::default();
        let mut set = BehaviorSet::new();
        set.attach(Recorder::new("rec", &log)).unwrap();
        let mut me = plane(0);
        me.add_task(task(3));

        let peers = PeerView::empty();
        let mut outbox = Vec::new();
        let report = {
            let mut env = StepEnv { tick: Tick(0), plane: &mut me, peers: &peers, outbox: &mut outbox };
            set.notify(&mut env)
        };
        assert_eq!(report.task_events.len(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["rec:added TaskId(3)"]);
        assert!(!me.has_pending_events());
    }
}

// ── BehaviorCtx ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod ctx_tests {
    use super::*;

    struct Chatter;

    impl Behavior for Chatter {
        fn name(&self) -> &'static str {
            "chatter"
        }

        fn post_step(&mut self, ctx: &mut BehaviorCtx<'_>) {
            ctx.broadcast(Payload::Heartbeat);
            ctx.send_to(PlaneId(4), Payload::HandOff(task(1)));
            assert_eq!(ctx.queued(), 2);
            assert!(ctx.view(ctx.me()).is_some());
            assert!(ctx.view(PlaneId(4)).is_none());
        }
    }

    #[test]
    fn sends_are_stamped() {
        let mut set = BehaviorSet::new();
        set.attach(Chatter).unwrap();
        let mut me = plane(2);
        me.position = Point::new(1.0, 2.0);

        let (_, outbox) = run(&mut set, &mut me, 9, vec![]);
        assert_eq!(outbox.len(), 2);
        assert!(outbox[0].is_broadcast());
        assert_eq!(outbox[1].recipient, Some(PlaneId(4)));
        for m in &outbox {
            assert_eq!(m.sender, PlaneId(2));
            assert_eq!(m.sent_at, Tick(9));
            assert_eq!(m.origin, Point::new(1.0, 2.0));
        }
    }
}

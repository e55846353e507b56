//! Fluent builder for constructing a [`Sim`].

use std::error::Error;

use sf_agent::{PlaneSpec, PlaneState};
use sf_behavior::BehaviorSet;
use sf_core::{IdAllocator, PlaneId, SimConfig};
use tracing::debug;

use crate::{Sim, SimError, SimResult};

type BoxedError = Box<dyn Error + Send + Sync>;
type Installer = Box<dyn FnMut(PlaneId, &mut BehaviorSet) -> Result<(), BoxedError>>;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] (total ticks, seed, snapshot interval)
/// - at least one [`PlaneSpec`]
///
/// # Optional inputs
///
/// | Method          | Default                          |
/// |-----------------|----------------------------------|
/// | `.install(f)`   | Planes carry no behaviors        |
///
/// Planes receive ids `0, 1, …` in the order they were added; that order is
/// also the per-tick processing order.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .plane(PlaneSpec::new(Point::new(0.0, 0.0), 20.0, 1.0))
///     .plane(PlaneSpec::new(Point::new(6.0, 0.0), 20.0, 1.0))
///     .install(|id, set| sf_maxsum::install(set, id, &max_sum, &nav, &WorkloadCost::default()))
///     .build()?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    specs:     Vec<PlaneSpec>,
    installer: Option<Installer>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, specs: Vec::new(), installer: None }
    }

    /// Add one plane.
    pub fn plane(mut self, spec: PlaneSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Add several planes, in iteration order.
    pub fn planes<I: IntoIterator<Item = PlaneSpec>>(mut self, specs: I) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Populate every plane's [`BehaviorSet`].
    ///
    /// Called once per plane during [`build`](Self::build), in id order.  The
    /// first error aborts the build.
    pub fn install<F, E>(mut self, mut f: F) -> Self
    where
        F: FnMut(PlaneId, &mut BehaviorSet) -> Result<(), E> + 'static,
        E: Error + Send + Sync + 'static,
    {
        self.installer = Some(Box::new(move |id, set| f(id, set).map_err(|e| Box::new(e) as BoxedError)));
        self
    }

    /// Validate inputs, install behaviors and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        if self.specs.is_empty() {
            return Err(SimError::NoPlanes);
        }

        // ── Planes ────────────────────────────────────────────────────────
        let mut ids = IdAllocator::<PlaneId>::new();
        let mut planes = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            let id = ids.allocate()?;
            if !spec.comm_range.is_finite() || spec.comm_range < 0.0 {
                return Err(SimError::InvalidPlane { plane: id, reason: "communication range must be finite and non-negative" });
            }
            if !spec.speed.is_finite() || spec.speed < 0.0 {
                return Err(SimError::InvalidPlane { plane: id, reason: "speed must be finite and non-negative" });
            }
            if !spec.position.x.is_finite() || !spec.position.y.is_finite() {
                return Err(SimError::InvalidPlane { plane: id, reason: "position must be finite" });
            }
            planes.push(PlaneState::new(id, spec));
        }

        // ── Behaviors ─────────────────────────────────────────────────────
        let mut behaviors: Vec<BehaviorSet> = planes.iter().map(|_| BehaviorSet::new()).collect();
        if let Some(mut install) = self.installer {
            for (plane, set) in planes.iter().zip(behaviors.iter_mut()) {
                install(plane.id, set).map_err(|source| SimError::Install { plane: plane.id, source })?;
                debug!(plane = %plane.id, behaviors = ?set.names(), "behaviors installed");
            }
        }

        Ok(Sim::new(self.config, planes, behaviors))
    }
}

use std::sync::{atomic::{AtomicBool, Ordering}, Arc};

use anyhow::Result;

use crate::cache::{GroupDirectory, GroupInfo, PointIndex};
use crate::camera::{CameraCommand, CameraController};
use crate::config::MapConfig;
use crate::interaction::{Effect, InteractionState, MapEvent};
use crate::plan::{LegendConfig, PlanMode, Planner, SourcePlan};
use crate::source::DocumentSource;

/// Shared flag telling whether the view a session drives still exists.
/// Work finishing after the view is gone must not touch it.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self { Self(Arc::new(AtomicBool::new(true))) }
}

impl Liveness {
    pub fn is_alive(&self) -> bool { self.0.load(Ordering::Acquire) }

    pub fn kill(&self) { self.0.store(false, Ordering::Release) }
}

/// One map view: its plan, interaction state and the caches it reads.
///
/// Caches are shared (`Arc`) so several views of the same dataset fetch once.
pub struct MapSession {
    config: MapConfig,
    planner: Planner,
    camera: CameraController,
    source: Arc<dyn DocumentSource>,
    points: Arc<PointIndex>,
    groups: Arc<GroupDirectory>,
    legend: LegendConfig,
    clustering: bool,
    excluded: Option<String>,
    plan: SourcePlan,
    state: InteractionState,
    liveness: Liveness,
}

impl MapSession {
    /// Session with fresh caches and the default spots + lines legend.
    pub fn new(config: MapConfig, source: Arc<dyn DocumentSource>) -> Self {
        Self::with_caches(config, source, Arc::default(), Arc::default())
    }

    pub fn with_caches(
        config: MapConfig,
        source: Arc<dyn DocumentSource>,
        points: Arc<PointIndex>,
        groups: Arc<GroupDirectory>,
    ) -> Self {
        let planner = Planner::from_config(&config);
        let legend = LegendConfig::slacklines();
        let clustering = config.clustering.enabled;
        let plan = planner.plan(&legend, clustering, None);
        let state = InteractionState::new(plan.cluster_source_id().map(str::to_string));

        Self {
            camera: CameraController::new(config.bounds_padding),
            config,
            planner,
            source,
            points,
            groups,
            legend,
            clustering,
            excluded: None,
            plan,
            state,
            liveness: Liveness::default(),
        }
    }

    pub fn config(&self) -> &MapConfig { &self.config }

    pub fn plan(&self) -> &SourcePlan { &self.plan }

    pub fn legend(&self) -> &LegendConfig { &self.legend }

    pub fn state(&self) -> &InteractionState { &self.state }

    pub fn points(&self) -> &Arc<PointIndex> { &self.points }

    pub fn liveness(&self) -> Liveness { self.liveness.clone() }

    pub fn set_legend(&mut self, legend: LegendConfig) -> &SourcePlan {
        self.legend = legend;
        self.replan()
    }

    pub fn set_clustering(&mut self, enabled: bool) -> &SourcePlan {
        self.clustering = enabled;
        self.replan()
    }

    /// Hide one feature from the static sources, e.g. on its own detail page.
    pub fn set_excluded_feature(&mut self, feature_id: Option<String>) -> &SourcePlan {
        self.excluded = feature_id;
        self.replan()
    }

    fn replan(&mut self) -> &SourcePlan {
        self.plan = self.planner.plan(&self.legend, self.clustering, self.excluded.as_deref());
        self.state.track_cluster_source(self.plan.cluster_source_id().map(str::to_string));
        &self.plan
    }

    /// Feed a renderer event and return the effects for the host, with camera
    /// and loading requests already resolved.
    pub fn handle(&mut self, event: MapEvent) -> Vec<Effect> {
        if !self.liveness.is_alive() && !matches!(event, MapEvent::Teardown) {
            tracing::debug!("event for a dead view ignored");
            return Vec::new();
        }
        if matches!(event, MapEvent::Teardown) {
            self.liveness.kill();
        }

        let mut out = Vec::new();
        for effect in self.state.apply(event) {
            match effect {
                Effect::ZoomToFeature { feature_id, length_m } => {
                    if let Some(command) = self.zoom_to_feature(&feature_id, length_m) {
                        out.push(Effect::Camera { command });
                    }
                }
                Effect::ClearFocus => out.push(Effect::Camera { command: self.camera.clear_focus() }),
                Effect::LoadPointIndex => {
                    if self.plan.mode == PlanMode::Slacklines {
                        if let Err(err) = self.load_points() {
                            tracing::warn!("point index load failed: {err:#}");
                        }
                    }
                }
                other => out.push(other),
            }
        }

        // The view may have died while a load was running. Only `LoadPointIndex`
        // blocks, so this is a `SourceDataLoaded` batch. Its effects are dropped
        // and the state is torn down with them, so no highlight it recorded
        // outlives the view.
        if !self.liveness.is_alive() && !self.state.is_torn_down() {
            tracing::debug!("view died during event handling, effects dropped");
            self.state.apply(MapEvent::Teardown);
            return Vec::new();
        }
        out
    }

    /// Populate the point index from the joined cluster document.
    pub fn load_points(&self) -> Result<()> {
        self.points.ensure_loaded(self.source.as_ref(), &self.config.endpoints.clusters_main)
    }

    pub fn zoom_to_feature(&self, feature_id: &str, length_m: Option<f64>) -> Option<CameraCommand> {
        self.camera.zoom_to_feature(&self.points, feature_id, length_m)
    }

    /// Community group info for the popup of a community point.
    pub fn group_info(&self, id: &str) -> Result<Option<GroupInfo>> {
        self.groups.find(self.source.as_ref(), &self.config.endpoints.groups, id)
    }
}

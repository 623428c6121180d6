use crate::feature::{classify, DomainFeature, FeatureRef, LENGTH_PROPERTY};
use crate::types::{FeatureStateKey, LayerId};

use super::{Cursor, Effect, Highlight, HighlightState, MapEvent};

/// A hovered or selected hit.
#[derive(Debug, Clone, PartialEq)]
struct Tracked {
    key: Option<FeatureStateKey>,
    layer_id: String,
    feature: DomainFeature,
}

impl Tracked {
    fn of(hit: &FeatureRef) -> Self {
        Self { key: hit.state_key(), layer_id: hit.layer_id.clone(), feature: classify(hit) }
    }

    fn same_target(&self, other: &Tracked) -> bool {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => a == b,
            _ => {
                let (a, b) = (self.feature.center, other.feature.center);
                self.layer_id == other.layer_id
                    && self.feature.original_id == other.feature.original_id
                    && a.x.total_cmp(&b.x).is_eq()
                    && a.y.total_cmp(&b.y).is_eq()
            }
        }
    }

    fn toggle(&self, highlight: Highlight, value: bool, effects: &mut Vec<Effect>) {
        if let Some(key) = &self.key {
            effects.push(Effect::SetFeatureState { key: key.clone(), highlight, value });
        }
    }
}

/// Hover, selection, cursor and readiness of a map view.
///
/// Every renderer callback goes through `apply`, which updates the state and
/// returns the effects the host must carry out. Hover and selection are
/// independent: a feature can be both at once.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    cluster_source_id: Option<String>,
    hovered: Option<Tracked>,
    selected: Option<Tracked>,
    cursor: Cursor,
    map_loaded: bool,
    cluster_loaded: bool,
    ready: bool,
    torn_down: bool,
}

/// Pure form of `InteractionState::apply`.
pub fn reduce(mut state: InteractionState, event: MapEvent) -> (InteractionState, Vec<Effect>) {
    let effects = state.apply(event);
    (state, effects)
}

impl InteractionState {
    /// Fresh state; readiness waits on `cluster_source_id` when given.
    pub fn new(cluster_source_id: Option<String>) -> Self {
        Self { cluster_source_id, ..Self::default() }
    }

    /// Track a different cluster source after the plan changed.
    pub fn track_cluster_source(&mut self, cluster_source_id: Option<String>) {
        if self.cluster_source_id != cluster_source_id {
            self.cluster_source_id = cluster_source_id;
            self.cluster_loaded = false;
        }
    }

    pub fn highlight(&self) -> HighlightState {
        HighlightState {
            hovered_id: self.hovered.as_ref().and_then(|t| t.key.clone()),
            selected_id: self.selected.as_ref().and_then(|t| t.key.clone()),
        }
    }

    pub fn hovered(&self) -> Option<&DomainFeature> { self.hovered.as_ref().map(|t| &t.feature) }

    pub fn selected(&self) -> Option<&DomainFeature> { self.selected.as_ref().map(|t| &t.feature) }

    pub fn cursor(&self) -> Cursor { self.cursor }

    pub fn is_ready(&self) -> bool { self.ready }

    pub fn is_torn_down(&self) -> bool { self.torn_down }

    /// Feed one renderer event.
    pub fn apply(&mut self, event: MapEvent) -> Vec<Effect> {
        if self.torn_down {
            tracing::debug!(?event, "event after teardown ignored");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match event {
            MapEvent::PointerMove(hit) => self.pointer_move(hit.as_ref(), &mut effects),
            MapEvent::Click(hit) => self.click(hit.as_ref(), &mut effects),
            MapEvent::MapLoaded => {
                self.map_loaded = true;
                self.check_ready(&mut effects);
            }
            MapEvent::SourceDataLoaded { source_id } => {
                if !self.cluster_loaded && self.cluster_source_id.as_deref() == Some(source_id.as_str()) {
                    self.cluster_loaded = true;
                    effects.push(Effect::LoadPointIndex);
                }
                self.check_ready(&mut effects);
            }
            MapEvent::MoveEnd(viewport) => {
                effects.push(Effect::ViewportChanged { param: viewport.to_param(), viewport });
            }
            MapEvent::PopupClosed => effects.push(Effect::ClearFocus),
            MapEvent::Teardown => self.teardown(&mut effects),
        }
        effects
    }

    fn pointer_move(&mut self, hit: Option<&FeatureRef>, effects: &mut Vec<Effect>) {
        let hoverable = hit.filter(|hit| LayerId::from_str(&hit.layer_id).is_some_and(|l| l.is_hoverable()));

        match hoverable {
            Some(hit) => {
                let next = Tracked::of(hit);
                if self.hovered.as_ref().is_some_and(|current| current.same_target(&next)) {
                    return;
                }
                self.leave_hover(effects);
                next.toggle(Highlight::Hover, true, effects);
                effects.push(Effect::HoverEnter { feature: next.feature.clone() });
                self.hovered = Some(next);
                self.set_cursor(Cursor::Pointer, effects);
            }
            None => {
                self.leave_hover(effects);
                self.set_cursor(Cursor::Default, effects);
            }
        }
    }

    fn click(&mut self, hit: Option<&FeatureRef>, effects: &mut Vec<Effect>) {
        let Some((hit, layer)) = hit.and_then(|hit| {
            LayerId::from_str(&hit.layer_id).filter(|l| l.is_interactive()).map(|l| (hit, l))
        }) else {
            self.clear_selection(effects);
            effects.push(Effect::SelectionChanged { feature: None });
            return;
        };

        if layer == LayerId::UnclusteredPoint {
            match hit.original_id() {
                Some(feature_id) => effects.push(Effect::ZoomToFeature {
                    feature_id,
                    length_m: hit.number_property(LENGTH_PROPERTY),
                }),
                None => tracing::debug!(layer = %layer, "clicked point has no id"),
            }
        } else if layer.is_hoverable() {
            let next = Tracked::of(hit);
            let same = self.selected.as_ref().is_some_and(|current| current.same_target(&next));
            if !same {
                self.clear_selection(effects);
                next.toggle(Highlight::Selected, true, effects);
            }
            effects.push(Effect::SelectionChanged { feature: Some(next.feature.clone()) });
            self.selected = Some(next);
        }
        // Label hits are interactive but neither select nor clear.
    }

    fn leave_hover(&mut self, effects: &mut Vec<Effect>) {
        if let Some(previous) = self.hovered.take() {
            previous.toggle(Highlight::Hover, false, effects);
            effects.push(Effect::HoverLeave { feature: previous.feature });
        }
    }

    fn clear_selection(&mut self, effects: &mut Vec<Effect>) {
        if let Some(previous) = self.selected.take() {
            previous.toggle(Highlight::Selected, false, effects);
        }
    }

    fn set_cursor(&mut self, cursor: Cursor, effects: &mut Vec<Effect>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            effects.push(Effect::SetCursor { cursor });
        }
    }

    fn check_ready(&mut self, effects: &mut Vec<Effect>) {
        let cluster_ready = self.cluster_source_id.is_none() || self.cluster_loaded;
        if !self.ready && self.map_loaded && cluster_ready {
            self.ready = true;
            effects.push(Effect::MapReady);
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        if let Some(hovered) = self.hovered.take() {
            hovered.toggle(Highlight::Hover, false, effects);
        }
        self.clear_selection(effects);
        self.set_cursor(Cursor::Default, effects);
        self.torn_down = true;
    }
}

use foundation::bounds::LonLatBounds;

use crate::model::{ColorView, Filters, LayerVisibility, RunId, Selection, ViewState};

/// Tags the view-state slice a change touched.
///
/// A drained batch tells the consumer *which* slices changed and in what
/// order; the values are always read from the current snapshot, so a later
/// write to the same slice wins over an earlier one within a batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StateField {
    Layers,
    Filters,
    Selection,
    ActiveRun,
    Viewport,
}

/// Holds the single mutable `ViewState` snapshot and records which slices
/// changed since the last drain.
///
/// Notification is drain-based rather than callback-based: setters enqueue
/// a slice tag (once, at first-change position) and consumers pull the
/// batch with [`Store::drain_changes`]. Setters compare against the
/// current value first, so writing an equal value enqueues nothing; that
/// is the "did this slice change" check consumers rely on.
///
/// No domain validation happens here; callers own value validity (a
/// selection is expected to come from the hit tester or a list component).
#[derive(Debug, Default)]
pub struct Store {
    state: ViewState,
    pending: Vec<StateField>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the changed slices since the last drain, in first-change
    /// order, and clears the batch.
    pub fn drain_changes(&mut self) -> Vec<StateField> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn set_layers(&mut self, layers: LayerVisibility) {
        if self.state.layers != layers {
            self.state.layers = layers;
            self.mark(StateField::Layers);
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        if self.state.filters != filters {
            self.state.filters = filters;
            self.mark(StateField::Filters);
        }
    }

    pub fn set_filters_enabled(&mut self, enabled: bool) {
        if self.state.filters_enabled != enabled {
            self.state.filters_enabled = enabled;
            self.mark(StateField::Filters);
        }
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if self.state.selection != selection {
            self.state.selection = selection;
            self.mark(StateField::Selection);
        }
    }

    pub fn set_active_run_id(&mut self, run_id: Option<RunId>) {
        if self.state.active_run.run_id != run_id {
            self.state.active_run.run_id = run_id;
            self.mark(StateField::ActiveRun);
        }
    }

    pub fn set_show_points(&mut self, show: bool) {
        if self.state.active_run.show_points != show {
            self.state.active_run.show_points = show;
            self.mark(StateField::ActiveRun);
        }
    }

    pub fn set_show_buildings(&mut self, show: bool) {
        if self.state.active_run.show_buildings != show {
            self.state.active_run.show_buildings = show;
            self.mark(StateField::ActiveRun);
        }
    }

    pub fn set_color_view(&mut self, view: ColorView) {
        if self.state.active_run.color_view != view {
            self.state.active_run.color_view = view;
            self.mark(StateField::ActiveRun);
        }
    }

    /// Explicit refresh request: bumps the cache-busting tile version.
    pub fn bump_tile_version(&mut self) {
        self.state.active_run.tile_version += 1;
        self.mark(StateField::ActiveRun);
    }

    pub fn set_viewport(&mut self, bounds: LonLatBounds) {
        if self.state.viewport != Some(bounds) {
            self.state.viewport = Some(bounds);
            self.mark(StateField::Viewport);
        }
    }

    fn mark(&mut self, field: StateField) {
        if !self.pending.contains(&field) {
            self.pending.push(field);
        }
    }
}

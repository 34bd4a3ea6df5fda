/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bypass-state reconciler and manager panel state.
//!
//! Core structures:
//! - `BypassManager`: panel state (managed set, mixed-state bookkeeping,
//!   control rows, collapse flag) plus the reconciliation algorithm
//! - `ManagerIntent`: every mutation flows through `apply_intents`
//! - `AggregateState`: the tri-state classification the master toggle shows
//!
//! The host graph is borrowed per operation as `&mut dyn GraphHost`; the
//! manager owns no node references, only opaque string ids.
//!
//! Boundary: flag mutations outside this module (host-side edits) must be
//! followed by a `RefreshStates` intent before the master display is read.

use std::collections::HashMap;

use euclid::default::Size2D;
use log::{debug, info, warn};

use crate::config::PanelConfig;
use crate::error::BypassError;
use crate::graph::GraphHost;
use crate::persistence::types::PersistedManagerState;

pub mod layout;
pub mod roster;
pub mod widgets;

use layout::LayoutScheduler;
use widgets::{Control, ControlAction};

/// Aggregate bypass status of the managed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateState {
    /// Every managed node is active (also the empty-set default).
    AllActive,

    /// Every managed node is bypassed and no mixed history survives.
    AllBypassed,

    /// Every managed node is bypassed, reached through the master toggle
    /// from a mixed set; the pre-forced distribution is retained and the
    /// next master toggle restores it.
    ForcedAllBypass,

    /// The managed set contains both active and bypassed nodes.
    Mixed,
}

/// Reconciler bookkeeping, persisted into the host envelope.
///
/// Invariants: `saved_mixed_states` is non-empty only while `is_mixed`;
/// `is_forced_all_bypass` implies `is_mixed`; removing a managed node also
/// removes its snapshot entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconcilerState {
    /// Managed node ids, insertion order, no duplicates.
    pub managed_nodes: Vec<String>,

    /// True iff the set holds (or held, at the last capture) both active
    /// and bypassed nodes.
    pub is_mixed: bool,

    /// True iff a mixed set was driven to all-bypassed via the master
    /// toggle, as opposed to converging there node by node.
    pub is_forced_all_bypass: bool,

    /// Per-node flags captured when the set last entered (or refreshed)
    /// the mixed state; the restore target for the forced toggle.
    pub saved_mixed_states: HashMap<String, bool>,
}

/// Display entry for one managed node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub label: String,
    pub active: bool,
}

/// Result of a batch flag write. Misses are reported, never fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub missing: Vec<String>,
}

/// Write a bypass flag to every id, tolerating reference misses.
pub fn batch_set_bypass(host: &mut dyn GraphHost, ids: &[String], bypass: bool) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for id in ids {
        if host.set_bypass_flag(id, bypass) {
            outcome.applied += 1;
        } else {
            outcome.missing.push(id.clone());
        }
    }
    info!(
        "Batch {}: {} nodes",
        if bypass { "bypass" } else { "restore" },
        outcome.applied
    );
    if !outcome.missing.is_empty() {
        warn!("Batch skipped unknown node ids: {:?}", outcome.missing);
    }
    host.request_redraw();
    outcome
}

/// Panel mutations, applied deterministically in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerIntent {
    AddSelected,
    AddNodes { ids: Vec<String> },
    RemoveNode { id: String },
    SetNodeBypass { id: String, bypass: bool },
    MasterToggle { value: bool },
    RefreshStates,
    EnableAll,
    BypassAll,
    ClearManaged,
    Collapse,
    Expand,
}

/// The manager panel: reconciler state plus display bookkeeping.
pub struct BypassManager {
    /// Id of the panel's own node in the host graph; never managed.
    own_id: String,

    config: PanelConfig,

    state: ReconcilerState,

    /// Per-node display entries, keyed by managed id.
    rows: HashMap<String, NodeRow>,

    aggregate: AggregateState,

    /// Master toggle value as rendered: true for all-active and mixed.
    master_value: bool,

    master_label: String,

    is_collapsed: bool,

    panel_size: Size2D<f32>,

    layout: LayoutScheduler,

    /// Count of operations that targeted ids the host no longer knows.
    reference_misses: u64,
}

impl BypassManager {
    pub fn new(own_id: impl Into<String>) -> Self {
        Self::with_config(own_id, PanelConfig::default())
    }

    pub fn with_config(own_id: impl Into<String>, config: PanelConfig) -> Self {
        let master_label = format!("{}: ON", config.master_label);
        let panel_size = Size2D::new(config.panel_width, config.header_height);
        let mut layout = LayoutScheduler::new();
        layout.schedule();
        Self {
            own_id: own_id.into(),
            config,
            state: ReconcilerState::default(),
            rows: HashMap::new(),
            aggregate: AggregateState::AllActive,
            master_value: true,
            master_label,
            is_collapsed: false,
            panel_size,
            layout,
            reference_misses: 0,
        }
    }

    pub fn own_id(&self) -> &str {
        &self.own_id
    }

    pub fn state(&self) -> &ReconcilerState {
        &self.state
    }

    pub fn managed_nodes(&self) -> &[String] {
        &self.state.managed_nodes
    }

    pub fn row(&self, id: &str) -> Option<&NodeRow> {
        self.rows.get(id)
    }

    pub fn aggregate_state(&self) -> AggregateState {
        self.aggregate
    }

    pub fn master_value(&self) -> bool {
        self.master_value
    }

    pub fn master_label(&self) -> &str {
        &self.master_label
    }

    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    pub fn panel_size(&self) -> Size2D<f32> {
        self.panel_size
    }

    pub fn layout_pending(&self) -> bool {
        self.layout.is_pending()
    }

    pub fn reference_misses(&self) -> u64 {
        self.reference_misses
    }

    /// Apply a batch of intents deterministically in insertion order.
    pub fn apply_intents<I>(&mut self, host: &mut dyn GraphHost, intents: I)
    where
        I: IntoIterator<Item = ManagerIntent>,
    {
        for intent in intents {
            self.apply_intent(host, intent);
        }
    }

    fn apply_intent(&mut self, host: &mut dyn GraphHost, intent: ManagerIntent) {
        match intent {
            ManagerIntent::AddSelected => {
                if let Err(e) = self.add_selected(host) {
                    info!("Add selected skipped: {e}");
                }
            },
            ManagerIntent::AddNodes { ids } => {
                self.add_nodes(host, &ids);
            },
            ManagerIntent::RemoveNode { id } => self.remove_node(host, &id),
            ManagerIntent::SetNodeBypass { id, bypass } => self.set_node_bypass(host, &id, bypass),
            ManagerIntent::MasterToggle { value } => self.master_toggle(host, value),
            ManagerIntent::RefreshStates => self.refresh_all(host),
            ManagerIntent::EnableAll => self.enable_all(host),
            ManagerIntent::BypassAll => self.bypass_all(host),
            ManagerIntent::ClearManaged => self.clear_managed(host),
            ManagerIntent::Collapse => {
                self.collapse();
                host.request_redraw();
            },
            ManagerIntent::Expand => {
                self.expand();
                host.request_redraw();
            },
        }
    }

    /// Append ids not already managed, initializing their display rows
    /// from the current external flags. Returns how many were new.
    pub fn add_nodes(&mut self, host: &mut dyn GraphHost, ids: &[String]) -> usize {
        let mut added = 0;
        for id in ids {
            if *id == self.own_id {
                debug!("Refusing to manage the panel's own node");
                continue;
            }
            if self.state.managed_nodes.iter().any(|managed| managed == id) {
                continue;
            }
            self.state.managed_nodes.push(id.clone());
            self.update_row_from_host(id, &*host);
            added += 1;
        }
        if added > 0 {
            self.reconcile(&*host);
            self.layout.schedule();
            host.request_redraw();
        }
        added
    }

    /// Add the host's current selection, minus the panel itself.
    pub fn add_selected(&mut self, host: &mut dyn GraphHost) -> Result<usize, BypassError> {
        let selected = host.selected_ids();
        if selected.is_empty() {
            return Err(BypassError::NoSelection);
        }
        let filtered: Vec<String> = selected
            .into_iter()
            .filter(|id| *id != self.own_id)
            .collect();
        if filtered.is_empty() {
            debug!("Selection holds only the manager itself");
            return Err(BypassError::NoSelection);
        }
        Ok(self.add_nodes(host, &filtered))
    }

    /// Stop managing a node, restoring it to active. Unmanaged ids are a
    /// strict no-op: no flag write, no reclassification.
    pub fn remove_node(&mut self, host: &mut dyn GraphHost, id: &str) {
        let Some(index) = self.state.managed_nodes.iter().position(|managed| managed == id)
        else {
            return;
        };
        self.state.managed_nodes.remove(index);
        self.rows.remove(id);
        self.state.saved_mixed_states.remove(id);
        if !host.set_bypass_flag(id, false) {
            self.note_reference_miss(id);
        }
        self.reconcile(&*host);
        self.layout.schedule();
        host.request_redraw();
    }

    /// Per-node toggle callback: write one managed node's flag, refresh
    /// its row, reclassify.
    pub fn set_node_bypass(&mut self, host: &mut dyn GraphHost, id: &str, bypass: bool) {
        if !self.state.managed_nodes.iter().any(|managed| managed == id) {
            debug!("Ignoring toggle for unmanaged node '{id}'");
            return;
        }
        if !host.set_bypass_flag(id, bypass) {
            self.note_reference_miss(id);
        }
        self.update_row_from_host(id, &*host);
        self.reconcile(&*host);
        host.request_redraw();
    }

    /// Master toggle callback.
    ///
    /// Outside the mixed state, `requested` means all-active (true) or
    /// all-bypassed (false). Inside it, `requested` is ignored and the
    /// toggle moves between the saved mixed distribution and forced
    /// all-bypass.
    pub fn master_toggle(&mut self, host: &mut dyn GraphHost, requested: bool) {
        if self.state.is_mixed {
            let order = self.state.managed_nodes.clone();
            if self.state.is_forced_all_bypass {
                // Release: restore each node's saved flag. Ids managed but
                // never snapshotted (added while forced) keep their flag.
                for id in &order {
                    let Some(bypass) = self.state.saved_mixed_states.get(id).copied() else {
                        continue;
                    };
                    if !host.set_bypass_flag(id, bypass) {
                        self.note_reference_miss(id);
                    }
                    self.update_row_from_host(id, &*host);
                }
                self.state.is_forced_all_bypass = false;
                self.aggregate = AggregateState::Mixed;
            } else {
                // Force: drive the whole set to bypassed. The snapshot
                // already holds the pre-forced distribution; it is not
                // re-captured here.
                for id in &order {
                    if !host.set_bypass_flag(id, true) {
                        self.note_reference_miss(id);
                    }
                    self.update_row_from_host(id, &*host);
                }
                self.state.is_forced_all_bypass = true;
                self.aggregate = AggregateState::ForcedAllBypass;
            }
            // Label refresh only: a full reconcile would re-derive
            // mixedness from the transiently uniform flags.
            self.update_master_display(&*host);
        } else {
            let bypass = !requested;
            let order = self.state.managed_nodes.clone();
            for id in &order {
                if !host.set_bypass_flag(id, bypass) {
                    self.note_reference_miss(id);
                }
                self.update_row_from_host(id, &*host);
            }
            self.aggregate = if requested {
                AggregateState::AllActive
            } else {
                AggregateState::AllBypassed
            };
            self.update_master_display(&*host);
        }
        host.request_redraw();
    }

    /// Classify the managed set from the current external flags and drive
    /// the master display. Deterministic and idempotent; must run after
    /// every managed-flag mutation, including host-side ones.
    pub fn reconcile(&mut self, host: &dyn GraphHost) {
        if self.state.managed_nodes.is_empty() {
            self.state.is_mixed = false;
            self.state.is_forced_all_bypass = false;
            self.state.saved_mixed_states.clear();
            self.aggregate = AggregateState::AllActive;
            self.update_master_display(host);
            return;
        }

        let (active, bypassed) = self.count_flags(host);
        let total = self.state.managed_nodes.len();
        let was_mixed = self.state.is_mixed;

        if active == total {
            self.state.is_mixed = false;
            self.state.is_forced_all_bypass = false;
            self.state.saved_mixed_states.clear();
            self.aggregate = AggregateState::AllActive;
        } else if bypassed == total {
            if was_mixed && !self.state.saved_mixed_states.is_empty() {
                // Reached all-bypassed out of a mixed set: keep the saved
                // distribution so the master toggle can restore it.
                self.state.is_forced_all_bypass = true;
                self.aggregate = AggregateState::ForcedAllBypass;
            } else {
                // Natively all-bypassed; nothing to restore.
                self.state.is_mixed = false;
                self.state.is_forced_all_bypass = false;
                self.state.saved_mixed_states.clear();
                self.aggregate = AggregateState::AllBypassed;
            }
        } else {
            if !was_mixed {
                debug!("Entering mixed state: {active} active / {bypassed} bypassed");
            }
            self.state.is_mixed = true;
            self.state.is_forced_all_bypass = false;
            // Refresh the snapshot on every genuinely mixed pass so the
            // restore target tracks the latest observed distribution.
            self.capture_mixed_snapshot(host);
            self.aggregate = AggregateState::Mixed;
        }

        self.update_master_display(host);
    }

    /// Re-read every managed node's flag into its row, then reclassify.
    pub fn refresh_all(&mut self, host: &mut dyn GraphHost) {
        let order = self.state.managed_nodes.clone();
        for id in &order {
            self.update_row_from_host(id, &*host);
        }
        self.reconcile(&*host);
        self.layout.schedule();
        host.request_redraw();
    }

    /// Set every managed node active and drop the mixed bookkeeping.
    pub fn enable_all(&mut self, host: &mut dyn GraphHost) {
        self.drive_all(host, false);
    }

    /// Set every managed node bypassed and drop the mixed bookkeeping;
    /// this is the native all-bypass path, so no snapshot survives.
    pub fn bypass_all(&mut self, host: &mut dyn GraphHost) {
        self.drive_all(host, true);
    }

    fn drive_all(&mut self, host: &mut dyn GraphHost, bypass: bool) {
        let ids = self.state.managed_nodes.clone();
        let outcome = batch_set_bypass(host, &ids, bypass);
        self.reference_misses += outcome.missing.len() as u64;
        self.state.is_mixed = false;
        self.state.is_forced_all_bypass = false;
        self.state.saved_mixed_states.clear();
        self.refresh_all(host);
    }

    /// Restore every managed node to active and empty the panel.
    pub fn clear_managed(&mut self, host: &mut dyn GraphHost) {
        let ids = self.state.managed_nodes.clone();
        let outcome = batch_set_bypass(host, &ids, false);
        self.reference_misses += outcome.missing.len() as u64;
        self.state.managed_nodes.clear();
        self.rows.clear();
        self.state.is_mixed = false;
        self.state.is_forced_all_bypass = false;
        self.state.saved_mixed_states.clear();
        self.reconcile(&*host);
        self.layout.schedule();
        host.request_redraw();
    }

    /// Shrink the panel to the master control plus an expand affordance.
    /// Idempotent; reconciler state is untouched.
    pub fn collapse(&mut self) {
        if self.is_collapsed {
            return;
        }
        self.is_collapsed = true;
        self.layout.schedule();
    }

    /// Show the full control list again. Idempotent.
    pub fn expand(&mut self) {
        if !self.is_collapsed {
            return;
        }
        self.is_collapsed = false;
        self.layout.schedule();
    }

    /// The ordered control list the host should render right now.
    pub fn visible_controls(&self) -> Vec<Control> {
        let mut controls = vec![Control::toggle(
            self.master_label.clone(),
            self.master_value,
            ControlAction::MasterToggle,
        )];

        if self.is_collapsed {
            controls.push(Control::button(
                widgets::EXPAND_LABEL,
                ControlAction::ExpandPanel,
            ));
            return controls;
        }

        controls.push(Control::button(
            widgets::ADD_SELECTED_LABEL,
            ControlAction::AddSelected,
        ));
        controls.push(Control::button(
            widgets::REFRESH_LABEL,
            ControlAction::RefreshStates,
        ));
        controls.push(Control::button(
            widgets::ENABLE_ALL_LABEL,
            ControlAction::EnableAll,
        ));
        controls.push(Control::button(
            widgets::BYPASS_ALL_LABEL,
            ControlAction::BypassAll,
        ));
        controls.push(Control::button(
            widgets::CLEAR_LABEL,
            ControlAction::ClearManaged,
        ));
        controls.push(Control::button(
            widgets::COLLAPSE_LABEL,
            ControlAction::CollapsePanel,
        ));

        for id in &self.state.managed_nodes {
            if let Some(row) = self.rows.get(id) {
                controls.push(Control::toggle(
                    row.label.clone(),
                    row.active,
                    ControlAction::ToggleNode { id: id.clone() },
                ));
                controls.push(Control::button(
                    widgets::REMOVE_ROW_LABEL,
                    ControlAction::RemoveNode { id: id.clone() },
                ));
            }
        }
        controls
    }

    /// Run the deferred relayout if one is pending. The host calls this
    /// once per frame after callback dispatch; width is preserved, height
    /// is recomputed from the collapse flag and visible control count.
    pub fn drain_layout(&mut self) -> bool {
        if !self.layout.take_pending() {
            return false;
        }
        let width = self.panel_size.width;
        let height = if self.is_collapsed {
            self.config.collapsed_height
        } else {
            self.config.header_height
                + self.visible_controls().len() as f32 * self.config.row_height
        };
        self.panel_size = Size2D::new(width, height);
        true
    }

    /// Snapshot the persistable fields for the host envelope.
    pub fn to_persisted(&self) -> PersistedManagerState {
        PersistedManagerState {
            managed_nodes: self.state.managed_nodes.clone(),
            is_mixed: self.state.is_mixed,
            is_forced_all_bypass: self.state.is_forced_all_bypass,
            saved_mixed_states: self
                .state
                .managed_nodes
                .iter()
                .filter_map(|id| {
                    self.state
                        .saved_mixed_states
                        .get(id)
                        .map(|bypass| (id.clone(), *bypass))
                })
                .collect(),
            is_collapsed: self.is_collapsed,
        }
    }

    /// Rebuild panel state from a persisted envelope, re-reading display
    /// rows from the live graph and reclassifying.
    pub fn restore_from_persisted(
        &mut self,
        persisted: PersistedManagerState,
        host: &mut dyn GraphHost,
    ) {
        self.state.managed_nodes.clear();
        self.rows.clear();
        for id in persisted.managed_nodes {
            if id == self.own_id || self.state.managed_nodes.contains(&id) {
                continue;
            }
            self.state.managed_nodes.push(id);
        }
        self.state.is_mixed = persisted.is_mixed;
        self.state.is_forced_all_bypass = persisted.is_forced_all_bypass && persisted.is_mixed;
        self.state.saved_mixed_states = persisted
            .saved_mixed_states
            .into_iter()
            .filter(|(id, _)| self.state.managed_nodes.contains(id))
            .collect();
        if !self.state.is_mixed {
            self.state.saved_mixed_states.clear();
        }
        self.is_collapsed = persisted.is_collapsed;

        let order = self.state.managed_nodes.clone();
        for id in &order {
            self.update_row_from_host(id, &*host);
        }
        self.reconcile(&*host);
        self.layout.schedule();
        host.request_redraw();
    }

    fn update_master_display(&mut self, host: &dyn GraphHost) {
        match self.aggregate {
            AggregateState::AllActive => {
                self.master_value = true;
                self.master_label = format!("{}: ON", self.config.master_label);
            },
            AggregateState::AllBypassed | AggregateState::ForcedAllBypass => {
                self.master_value = false;
                self.master_label = format!("{}: OFF", self.config.master_label);
            },
            AggregateState::Mixed => {
                let (active, bypassed) = self.count_flags(host);
                self.master_value = true;
                self.master_label = format!(
                    "{}: MIXED (active={active}/bypassed={bypassed})",
                    self.config.master_label
                );
            },
        }
    }

    fn capture_mixed_snapshot(&mut self, host: &dyn GraphHost) {
        self.state.saved_mixed_states = self
            .state
            .managed_nodes
            .iter()
            .map(|id| (id.clone(), host.bypass_flag(id)))
            .collect();
    }

    fn count_flags(&self, host: &dyn GraphHost) -> (usize, usize) {
        let bypassed = self
            .state
            .managed_nodes
            .iter()
            .filter(|id| host.bypass_flag(id))
            .count();
        (self.state.managed_nodes.len() - bypassed, bypassed)
    }

    fn update_row_from_host(&mut self, id: &str, host: &dyn GraphHost) {
        let active = !host.bypass_flag(id);
        let label = widgets::row_label(&host.display_name(id), active);
        self.rows.insert(id.to_string(), NodeRow { label, active });
    }

    fn note_reference_miss(&mut self, id: &str) {
        self.reference_misses += 1;
        warn!(
            "{}; flag write skipped",
            BypassError::ReferenceMiss { id: id.to_string() }
        );
    }
}

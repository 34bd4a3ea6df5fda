/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point2D;
use graph_bypass::graph::{Graph, GraphHost, NodeKey};
use graph_bypass::manager::widgets::{Control, ControlKind, intent_for_activation};
use graph_bypass::manager::{BypassManager, ManagerIntent};

/// Editor stand-in: a reference graph holding the manager's own node,
/// plus the manager panel itself.
pub(crate) struct TestHarness {
    pub(crate) graph: Graph,
    pub(crate) manager: BypassManager,
}

impl TestHarness {
    pub(crate) fn new() -> Self {
        let mut graph = Graph::new();
        let key = graph.add_node("Bypass Manager", Point2D::new(0.0, 0.0));
        let own_id = graph.id_string(key).unwrap();
        Self {
            graph,
            manager: BypassManager::new(own_id),
        }
    }

    /// Add an editor node with a preset bypass flag; returns its id.
    pub(crate) fn add_graph_node(&mut self, title: &str, bypassed: bool) -> String {
        let key = self.graph.add_node(title, Point2D::new(0.0, 0.0));
        let id = self.graph.id_string(key).unwrap();
        self.graph.set_bypass_flag(&id, bypassed);
        id
    }

    pub(crate) fn manage(&mut self, ids: &[String]) {
        self.manager.apply_intents(
            &mut self.graph,
            vec![ManagerIntent::AddNodes { ids: ids.to_vec() }],
        );
    }

    pub(crate) fn select(&mut self, ids: &[String]) {
        let keys: Vec<NodeKey> = ids
            .iter()
            .filter_map(|id| self.graph.resolve_id(id))
            .collect();
        self.graph.set_selection(keys);
    }

    /// Activate the first visible control matching `predicate`, the way
    /// the host UI would: toggles flip their value, buttons just fire.
    pub(crate) fn activate<F>(&mut self, predicate: F)
    where
        F: Fn(&Control) -> bool,
    {
        let control = self
            .manager
            .visible_controls()
            .into_iter()
            .find(|control| predicate(control))
            .expect("control not visible");
        let toggle_value = match control.kind {
            ControlKind::Toggle { value } => Some(!value),
            ControlKind::Button => None,
        };
        let intent = intent_for_activation(&control.action, toggle_value);
        self.manager.apply_intents(&mut self.graph, vec![intent]);
    }

    /// Let the deferred relayout settle, as the frame loop would after
    /// callback dispatch. Returns whether a pass ran.
    pub(crate) fn settle_frame(&mut self) -> bool {
        self.manager.drain_layout()
    }
}

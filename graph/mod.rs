/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Host-side graph model for the bypass manager.
//!
//! Core structures:
//! - `Graph`: reference editor graph backed by petgraph::StableGraph
//! - `Node`: editor node with a display title, position, and execution mode
//! - `GraphHost`: the capability seam the manager drives the editor through
//!
//! The manager never holds node references; it speaks opaque string ids
//! through `GraphHost` and tolerates ids the host no longer knows.

use std::collections::HashMap;

use euclid::default::Point2D;
use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use uuid::Uuid;

/// Stable node handle (petgraph NodeIndex — survives other deletions)
pub type NodeKey = NodeIndex;

/// Execution mode of an editor node.
///
/// Bypassed nodes are skipped by the host's executor; the manager mirrors
/// this flag into its per-node control rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeMode {
    /// Node participates in execution.
    #[default]
    Active,

    /// Node is skipped during execution.
    Bypassed,
}

/// An editor node in the graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable node identity.
    pub id: Uuid,

    /// Display title (or a synthesized name if never titled).
    pub title: String,

    /// Position in graph space.
    pub position: Point2D<f32>,

    /// Execution mode.
    pub mode: NodeMode,
}

/// Capability interface the manager uses to reach the host editor.
///
/// Ids are opaque strings; the reference implementation parses them back
/// to UUIDs, and an unparseable or unknown id is a reference miss, never
/// a panic. Flag reads on a miss report "active"; flag writes report
/// failure and leave the batch to continue.
pub trait GraphHost {
    /// Current bypass flag for a node. Misses read as `false` (active).
    fn bypass_flag(&self, id: &str) -> bool;

    /// Write a node's bypass flag. Returns whether the write landed.
    fn set_bypass_flag(&mut self, id: &str, bypass: bool) -> bool;

    /// Human-readable label for a node, falling back to `"Node <id>"`.
    fn display_name(&self, id: &str) -> String;

    /// Ids of the nodes currently selected on the host canvas.
    fn selected_ids(&self) -> Vec<String>;

    /// Ids of every node in the graph, in insertion order.
    fn node_ids(&self) -> Vec<String>;

    /// Advisory hint that node visuals are stale.
    fn request_redraw(&mut self);
}

/// Synthesized display name for ids the host cannot resolve.
pub fn fallback_display_name(id: &str) -> String {
    format!("Node {id}")
}

/// Reference host graph backed by petgraph::StableGraph.
#[derive(Clone)]
pub struct Graph {
    /// The underlying petgraph stable graph. Wires are owned by the host
    /// editor's routing layer and are not modeled here.
    inner: StableGraph<Node, (), Directed>,

    /// Stable UUID to node mapping.
    id_to_node: HashMap<Uuid, NodeKey>,

    /// Insertion order of live nodes, for deterministic id listings.
    insertion_order: Vec<NodeKey>,

    /// Current canvas selection.
    selected: Vec<NodeKey>,

    /// Count of redraw hints received, observable by tests.
    redraw_requests: u64,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            inner: StableGraph::new(),
            id_to_node: HashMap::new(),
            insertion_order: Vec::new(),
            selected: Vec::new(),
            redraw_requests: 0,
        }
    }

    /// Add a new node with a fresh UUID.
    pub fn add_node(&mut self, title: impl Into<String>, position: Point2D<f32>) -> NodeKey {
        self.add_node_with_id(Uuid::new_v4(), title, position)
    }

    /// Add a node with a pre-existing UUID.
    pub fn add_node_with_id(
        &mut self,
        id: Uuid,
        title: impl Into<String>,
        position: Point2D<f32>,
    ) -> NodeKey {
        let key = self.inner.add_node(Node {
            id,
            title: title.into(),
            position,
            mode: NodeMode::Active,
        });
        self.id_to_node.insert(id, key);
        self.insertion_order.push(key);
        key
    }

    /// Remove a node. Returns whether it existed.
    pub fn remove_node(&mut self, key: NodeKey) -> bool {
        if let Some(node) = self.inner.remove_node(key) {
            self.id_to_node.remove(&node.id);
            self.insertion_order.retain(|candidate| *candidate != key);
            self.selected.retain(|candidate| *candidate != key);
            true
        } else {
            false
        }
    }

    /// Get a node by key.
    pub fn get_node(&self, key: NodeKey) -> Option<&Node> {
        self.inner.node_weight(key)
    }

    /// Get a mutable node by key.
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.inner.node_weight_mut(key)
    }

    /// Get node key by UUID.
    pub fn get_node_key_by_id(&self, id: Uuid) -> Option<NodeKey> {
        self.id_to_node.get(&id).copied()
    }

    /// Opaque string id for a node, as handed to the manager.
    pub fn id_string(&self, key: NodeKey) -> Option<String> {
        self.get_node(key).map(|node| node.id.to_string())
    }

    /// Resolve an opaque string id back to a live node key.
    pub fn resolve_id(&self, id: &str) -> Option<NodeKey> {
        let uuid = Uuid::parse_str(id).ok()?;
        self.get_node_key_by_id(uuid)
    }

    /// Iterate over all nodes as (key, node) pairs in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.insertion_order
            .iter()
            .filter_map(|key| self.inner.node_weight(*key).map(|node| (*key, node)))
    }

    /// Count of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Replace the canvas selection.
    pub fn set_selection(&mut self, keys: Vec<NodeKey>) {
        self.selected = keys
            .into_iter()
            .filter(|key| self.inner.contains_node(*key))
            .collect();
    }

    /// Clear the canvas selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Redraw hints received so far.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }
}

impl GraphHost for Graph {
    fn bypass_flag(&self, id: &str) -> bool {
        self.resolve_id(id)
            .and_then(|key| self.get_node(key))
            .map(|node| node.mode == NodeMode::Bypassed)
            .unwrap_or(false)
    }

    fn set_bypass_flag(&mut self, id: &str, bypass: bool) -> bool {
        let Some(key) = self.resolve_id(id) else {
            return false;
        };
        let Some(node) = self.get_node_mut(key) else {
            return false;
        };
        node.mode = if bypass {
            NodeMode::Bypassed
        } else {
            NodeMode::Active
        };
        self.redraw_requests += 1;
        true
    }

    fn display_name(&self, id: &str) -> String {
        self.resolve_id(id)
            .and_then(|key| self.get_node(key))
            .filter(|node| !node.title.is_empty())
            .map(|node| node.title.clone())
            .unwrap_or_else(|| fallback_display_name(id))
    }

    fn selected_ids(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|key| self.id_string(*key))
            .collect()
    }

    fn node_ids(&self) -> Vec<String> {
        self.nodes().map(|(_, node)| node.id.to_string()).collect()
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use graph_bypass::config::PanelConfig;
use graph_bypass::graph::GraphHost;
use graph_bypass::manager::widgets::{ControlAction, ControlKind};

use crate::harness::TestHarness;

#[test]
fn collapse_and_expand_resize_after_the_frame_settles() {
    let config = PanelConfig::default();
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", true);
    h.manage(&[a, b]);

    // Structural change armed a relayout; the frame loop settles it.
    assert!(h.settle_frame());
    let expanded = h.manager.panel_size();
    // Master + six fixed actions + two rows per managed node.
    assert_eq!(
        expanded.height,
        config.header_height + 11.0 * config.row_height
    );
    assert_eq!(expanded.width, config.panel_width);

    h.activate(|control| control.action == ControlAction::CollapsePanel);
    // Size only changes once the deferred pass runs.
    assert_eq!(h.manager.panel_size(), expanded);
    assert!(h.settle_frame());
    assert_eq!(h.manager.panel_size().height, config.collapsed_height);
    assert_eq!(h.manager.panel_size().width, config.panel_width);

    h.activate(|control| control.action == ControlAction::ExpandPanel);
    assert!(h.settle_frame());
    assert_eq!(h.manager.panel_size(), expanded);

    // Settling again with nothing pending is a no-op.
    assert!(!h.settle_frame());
}

#[test]
fn collapsed_panel_shows_master_and_expand_only() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", true);
    h.manage(&[a]);

    h.activate(|control| control.action == ControlAction::CollapsePanel);
    let controls = h.manager.visible_controls();
    assert_eq!(controls.len(), 2);
    assert!(matches!(controls[0].kind, ControlKind::Toggle { .. }));
    assert_eq!(controls[0].action, ControlAction::MasterToggle);
    assert_eq!(controls[1].action, ControlAction::ExpandPanel);
}

#[test]
fn collapse_preserves_reconciler_state_and_managed_set() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", true);
    h.manage(&[a.clone(), b.clone()]);

    let state_before = h.manager.state().clone();
    let label_before = h.manager.master_label().to_string();

    h.activate(|control| control.action == ControlAction::CollapsePanel);
    h.settle_frame();
    assert_eq!(h.manager.state(), &state_before);
    assert_eq!(h.manager.master_label(), label_before);

    h.activate(|control| control.action == ControlAction::ExpandPanel);
    h.settle_frame();
    assert_eq!(h.manager.state(), &state_before);
    assert_eq!(h.manager.managed_nodes(), &[a, b]);
}

#[test]
fn master_toggle_stays_reachable_while_collapsed() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", true);
    h.manage(&[a.clone(), b.clone()]);

    h.activate(|control| control.action == ControlAction::CollapsePanel);

    // The master control still forces the mixed set from the collapsed
    // panel.
    h.activate(|control| control.action == ControlAction::MasterToggle);
    assert!(h.graph.bypass_flag(&a) && h.graph.bypass_flag(&b));
    assert_eq!(h.manager.master_label(), "control: OFF");
}

#[test]
fn several_mutations_in_one_callback_settle_in_one_pass() {
    let mut h = TestHarness::new();
    let ids: Vec<String> = (0..4)
        .map(|i| h.add_graph_node(&format!("n{i}"), false))
        .collect();

    // One callback: adopt, drop one, collapse. Coalesced into one pass.
    h.manage(&ids);
    h.activate(
        |control| matches!(&control.action, ControlAction::RemoveNode { id } if *id == ids[0]),
    );
    h.activate(|control| control.action == ControlAction::CollapsePanel);

    assert!(h.settle_frame());
    assert!(!h.settle_frame());
    assert_eq!(
        h.manager.panel_size().height,
        PanelConfig::default().collapsed_height
    );
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use graph_bypass::graph::GraphHost;
use graph_bypass::manager::roster::RosterPanel;

use crate::harness::TestHarness;

#[test]
fn roster_flow_add_selection_and_apply() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", false);
    h.select(&[a.clone(), b.clone()]);

    let mut panel = RosterPanel::new(h.manager.own_id().to_string());
    panel.bypass_enabled = true;

    // Adding the selection re-applies the master flag immediately.
    assert_eq!(panel.add_selected(&mut h.graph).unwrap(), 2);
    assert!(h.graph.bypass_flag(&a) && h.graph.bypass_flag(&b));

    // The text field holds the ids as a pretty JSON array.
    let listed = panel.ids().unwrap();
    assert_eq!(listed, vec![a.clone(), b.clone()]);

    // Flipping the master flag and re-applying restores them.
    panel.bypass_enabled = false;
    panel.apply(&mut h.graph);
    assert!(!h.graph.bypass_flag(&a) && !h.graph.bypass_flag(&b));
}

#[test]
fn roster_set_all_skips_the_panel_itself() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", false);

    let mut panel = RosterPanel::new(h.manager.own_id().to_string());
    panel.bypass_enabled = true;
    assert_eq!(panel.set_all_nodes(&mut h.graph), 2);

    assert!(!h.graph.bypass_flag(h.manager.own_id()));
    assert!(h.graph.bypass_flag(&a) && h.graph.bypass_flag(&b));
}

#[test]
fn hand_edited_garbage_never_breaks_the_field() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    h.select(&[a.clone()]);

    let mut panel = RosterPanel::new(h.manager.own_id().to_string());
    panel.text = "{ not an array".to_string();

    // The mutation is refused and the user's text survives untouched.
    assert!(panel.add_selected(&mut h.graph).is_err());
    assert_eq!(panel.text, "{ not an array");

    // Clearing always recovers the field.
    panel.clear(&mut h.graph);
    assert_eq!(panel.text, "[]");
    assert_eq!(panel.add_selected(&mut h.graph).unwrap(), 1);
}

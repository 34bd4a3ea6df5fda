/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use graph_bypass::graph::GraphHost;
use graph_bypass::manager::AggregateState;
use graph_bypass::menu::{ActionContext, ActionId, execute_action, list_actions_for_context};

use crate::harness::TestHarness;

#[test]
fn right_click_flow_adds_selection_to_panel() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", true);
    h.select(&[a.clone(), b.clone()]);

    let entries = list_actions_for_context(&ActionContext {
        has_selection: !h.graph.selected_ids().is_empty(),
    });
    assert!(entries.iter().all(|entry| entry.enabled));

    execute_action(ActionId::AddSelectedToManager, &mut h.manager, &mut h.graph);
    assert_eq!(h.manager.managed_nodes(), &[a, b]);
    assert_eq!(h.manager.aggregate_state(), AggregateState::Mixed);
}

#[test]
fn bypass_then_restore_selection_without_managing() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", false);
    let b = h.add_graph_node("b", false);
    h.select(&[a.clone(), b.clone()]);

    execute_action(ActionId::BypassSelected, &mut h.manager, &mut h.graph);
    assert!(h.graph.bypass_flag(&a) && h.graph.bypass_flag(&b));
    assert!(h.manager.managed_nodes().is_empty());

    execute_action(ActionId::RestoreSelected, &mut h.manager, &mut h.graph);
    assert!(!h.graph.bypass_flag(&a) && !h.graph.bypass_flag(&b));
}

#[test]
fn remove_selected_releases_only_managed_nodes() {
    let mut h = TestHarness::new();
    let a = h.add_graph_node("a", true);
    let b = h.add_graph_node("b", true);
    h.manage(&[a.clone()]);

    h.select(&[a.clone(), b.clone()]);
    execute_action(
        ActionId::RemoveSelectedFromManager,
        &mut h.manager,
        &mut h.graph,
    );

    assert!(h.manager.managed_nodes().is_empty());
    assert!(!h.graph.bypass_flag(&a));
    // Unmanaged selection members keep their flags.
    assert!(h.graph.bypass_flag(&b));
}

#[test]
fn menu_lists_stable_but_disabled_without_selection() {
    let entries = list_actions_for_context(&ActionContext {
        has_selection: false,
    });
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|entry| !entry.enabled));
    assert_eq!(entries[2].label, "Bypass selected");
}

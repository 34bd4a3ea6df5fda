/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tagged control records for the manager panel.
//!
//! Each visible control is a plain record: kind, label, and the action
//! activation raises. No callbacks live in the data; surfaces translate
//! an activation into a [`ManagerIntent`](super::ManagerIntent) via
//! [`intent_for_activation`] and feed it to the reducer.

use super::ManagerIntent;

/// Control shape, as the host renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Toggle { value: bool },
    Button,
}

/// What activating a control means.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    MasterToggle,
    ExpandPanel,
    CollapsePanel,
    AddSelected,
    RefreshStates,
    EnableAll,
    BypassAll,
    ClearManaged,
    ToggleNode { id: String },
    RemoveNode { id: String },
}

/// One visible control row.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub kind: ControlKind,
    pub label: String,
    pub action: ControlAction,
}

impl Control {
    pub fn toggle(label: impl Into<String>, value: bool, action: ControlAction) -> Self {
        Self {
            kind: ControlKind::Toggle { value },
            label: label.into(),
            action,
        }
    }

    pub fn button(label: impl Into<String>, action: ControlAction) -> Self {
        Self {
            kind: ControlKind::Button,
            label: label.into(),
            action,
        }
    }
}

pub const ADD_SELECTED_LABEL: &str = "Add selected nodes";
pub const REFRESH_LABEL: &str = "Refresh states";
pub const ENABLE_ALL_LABEL: &str = "Enable all";
pub const BYPASS_ALL_LABEL: &str = "Bypass all";
pub const CLEAR_LABEL: &str = "Clear list";
pub const COLLAPSE_LABEL: &str = "Collapse panel";
pub const EXPAND_LABEL: &str = "Expand panel";
pub const REMOVE_ROW_LABEL: &str = "Remove";

/// Label for a per-node toggle row.
pub fn row_label(name: &str, active: bool) -> String {
    if active {
        format!("{name} [on]")
    } else {
        format!("{name} [off]")
    }
}

/// Map a control activation to the intent it raises.
///
/// `toggle_value` is the toggle's post-activation value; button
/// activations pass `None`.
pub fn intent_for_activation(
    action: &ControlAction,
    toggle_value: Option<bool>,
) -> ManagerIntent {
    match action {
        ControlAction::MasterToggle => ManagerIntent::MasterToggle {
            value: toggle_value.unwrap_or(true),
        },
        // The toggle shows "active"; the external flag is its inverse.
        ControlAction::ToggleNode { id } => ManagerIntent::SetNodeBypass {
            id: id.clone(),
            bypass: !toggle_value.unwrap_or(true),
        },
        ControlAction::ExpandPanel => ManagerIntent::Expand,
        ControlAction::CollapsePanel => ManagerIntent::Collapse,
        ControlAction::AddSelected => ManagerIntent::AddSelected,
        ControlAction::RefreshStates => ManagerIntent::RefreshStates,
        ControlAction::EnableAll => ManagerIntent::EnableAll,
        ControlAction::BypassAll => ManagerIntent::BypassAll,
        ControlAction::ClearManaged => ManagerIntent::ClearManaged,
        ControlAction::RemoveNode { id } => ManagerIntent::RemoveNode { id: id.clone() },
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Context-menu action catalogue.
//!
//! Canvas surfaces draw their "batch bypass" submenu from
//! [`list_actions_for_context`] rather than hardcoding entries; each
//! [`ActionEntry`] carries enough metadata for any surface to render the
//! action and decide whether it is currently enabled. Dispatch goes
//! through [`execute_action`], the single execution path shared by every
//! surface.

use log::info;

use crate::graph::GraphHost;
use crate::manager::{BypassManager, ManagerIntent, batch_set_bypass};

/// Stable identifier for a registered action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionId {
    /// Adopt the selected nodes into the manager panel.
    AddSelectedToManager,

    /// Drop the selected nodes from the manager panel (managed ones only).
    RemoveSelectedFromManager,

    /// Bypass the selected nodes directly, managed or not.
    BypassSelected,

    /// Restore the selected nodes directly, managed or not.
    RestoreSelected,
}

impl ActionId {
    const ALL: [Self; 4] = [
        Self::AddSelectedToManager,
        Self::RemoveSelectedFromManager,
        Self::BypassSelected,
        Self::RestoreSelected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AddSelectedToManager => "Add selected to manager",
            Self::RemoveSelectedFromManager => "Remove selected from manager",
            Self::BypassSelected => "Bypass selected",
            Self::RestoreSelected => "Restore selected",
        }
    }
}

/// One renderable menu entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionEntry {
    pub id: ActionId,
    pub label: &'static str,
    pub enabled: bool,
}

/// Everything enablement currently depends on.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionContext {
    pub has_selection: bool,
}

/// The submenu content for the current context. Every action needs a
/// selection; entries stay listed (disabled) so the menu shape is stable.
pub fn list_actions_for_context(context: &ActionContext) -> Vec<ActionEntry> {
    ActionId::ALL
        .into_iter()
        .map(|id| ActionEntry {
            id,
            label: id.label(),
            enabled: context.has_selection,
        })
        .collect()
}

/// Execute one action against the manager and host.
pub fn execute_action(id: ActionId, manager: &mut BypassManager, host: &mut dyn GraphHost) {
    match id {
        ActionId::AddSelectedToManager => {
            manager.apply_intents(host, [ManagerIntent::AddSelected]);
        },
        ActionId::RemoveSelectedFromManager => {
            let selected = host.selected_ids();
            if selected.is_empty() {
                info!("Remove from manager skipped: no nodes selected");
                return;
            }
            let intents: Vec<ManagerIntent> = selected
                .into_iter()
                .map(|id| ManagerIntent::RemoveNode { id })
                .collect();
            manager.apply_intents(host, intents);
        },
        ActionId::BypassSelected | ActionId::RestoreSelected => {
            let selected = host.selected_ids();
            if selected.is_empty() {
                return;
            }
            let bypass = id == ActionId::BypassSelected;
            batch_set_bypass(host, &selected, bypass);
            // Flags changed outside the panel's own path; re-scan so any
            // managed overlap reclassifies.
            manager.apply_intents(host, [ManagerIntent::RefreshStates]);
        },
    }
}

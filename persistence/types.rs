/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable types for manager persistence.

use serde::{Deserialize, Serialize};

/// Persisted manager panel state.
///
/// Every field defaults independently: envelopes written by older
/// revisions (or hand-edited) restore whatever they do carry.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PersistedManagerState {
    /// Managed node ids, insertion order.
    #[serde(default)]
    pub managed_nodes: Vec<String>,

    #[serde(default)]
    pub is_mixed: bool,

    #[serde(default)]
    pub is_forced_all_bypass: bool,

    /// Saved mixed distribution as ordered (id, flag) pairs, managed-set
    /// order. Present only when a snapshot was held at save time.
    #[serde(default)]
    pub saved_mixed_states: Vec<(String, bool)>,

    #[serde(default)]
    pub is_collapsed: bool,
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! List-based manager variant: a free-text field holding a JSON array of
//! node ids, plus a single bypass/restore flag applied to the whole list.
//!
//! Mutations parse, edit, and re-serialize the text. Malformed JSON leaves
//! the field exactly as it was and logs; non-array JSON is coerced to an
//! empty list. The field stays human-editable, so every operation has to
//! survive whatever the user typed.

use log::{info, warn};
use serde_json::Value;

use crate::error::BypassError;
use crate::graph::GraphHost;

use super::{BatchOutcome, batch_set_bypass};

/// Parse the roster text into ids. Empty text is an empty roster;
/// non-array JSON is coerced to empty; a parse failure is an error the
/// caller recovers from by keeping the old text.
pub fn parse_roster(raw: &str) -> Result<Vec<String>, BypassError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(trimmed).map_err(BypassError::MalformedRoster)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(id) => Some(id),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Render ids back into the text field (pretty, stable ordering).
pub fn serialize_roster(ids: &[String]) -> String {
    serde_json::to_string_pretty(ids).unwrap_or_else(|_| "[]".to_string())
}

/// The list-based panel: one text field, one master flag.
#[derive(Debug, Clone)]
pub struct RosterPanel {
    /// Id of the panel's own node; excluded from "add all".
    own_id: String,

    /// JSON array of managed ids, as shown in the text widget.
    pub text: String,

    /// Master flag: listed nodes are driven to this bypass state.
    pub bypass_enabled: bool,
}

impl RosterPanel {
    pub fn new(own_id: impl Into<String>) -> Self {
        Self {
            own_id: own_id.into(),
            text: "[]".to_string(),
            bypass_enabled: false,
        }
    }

    /// Current roster ids, tolerating the field's content.
    pub fn ids(&self) -> Result<Vec<String>, BypassError> {
        parse_roster(&self.text)
    }

    /// Append ids not already listed. On malformed text the field is left
    /// unchanged. Returns how many ids were new.
    pub fn add_ids(&mut self, ids: &[String]) -> Result<usize, BypassError> {
        let mut listed = match parse_roster(&self.text) {
            Ok(listed) => listed,
            Err(e) => {
                warn!("Roster add skipped: {e}");
                return Err(e);
            },
        };
        let mut added = 0;
        for id in ids {
            if !listed.contains(id) {
                listed.push(id.clone());
                added += 1;
            }
        }
        self.text = serialize_roster(&listed);
        Ok(added)
    }

    /// Drop ids from the list. On malformed text the field is left
    /// unchanged. Returns how many ids were removed.
    pub fn remove_ids(&mut self, ids: &[String]) -> Result<usize, BypassError> {
        let mut listed = match parse_roster(&self.text) {
            Ok(listed) => listed,
            Err(e) => {
                warn!("Roster remove skipped: {e}");
                return Err(e);
            },
        };
        let before = listed.len();
        listed.retain(|listed_id| !ids.contains(listed_id));
        let removed = before - listed.len();
        self.text = serialize_roster(&listed);
        Ok(removed)
    }

    /// Add the host's selection to the list and re-apply the master flag.
    pub fn add_selected(&mut self, host: &mut dyn GraphHost) -> Result<usize, BypassError> {
        let selected = host.selected_ids();
        if selected.is_empty() {
            return Err(BypassError::NoSelection);
        }
        let added = self.add_ids(&selected)?;
        self.apply(host);
        Ok(added)
    }

    /// Remove the host's selection from the list and re-apply.
    pub fn remove_selected(&mut self, host: &mut dyn GraphHost) -> Result<usize, BypassError> {
        let selected = host.selected_ids();
        if selected.is_empty() {
            return Err(BypassError::NoSelection);
        }
        let removed = self.remove_ids(&selected)?;
        self.apply(host);
        Ok(removed)
    }

    /// Replace the list with every node in the graph except the panel
    /// itself, then apply.
    pub fn set_all_nodes(&mut self, host: &mut dyn GraphHost) -> usize {
        let ids: Vec<String> = host
            .node_ids()
            .into_iter()
            .filter(|id| *id != self.own_id)
            .collect();
        let count = ids.len();
        self.text = serialize_roster(&ids);
        info!("Roster set to all {count} nodes");
        self.apply(host);
        count
    }

    /// Restore listed nodes to active, then empty the list. The list is
    /// emptied even when the old content could not be parsed.
    pub fn clear(&mut self, host: &mut dyn GraphHost) {
        match parse_roster(&self.text) {
            Ok(ids) if !ids.is_empty() => {
                batch_set_bypass(host, &ids, false);
            },
            Ok(_) => {},
            Err(e) => warn!("Roster restore-on-clear skipped: {e}"),
        }
        self.text = "[]".to_string();
        host.request_redraw();
    }

    /// Drive every listed node to the master flag's state.
    pub fn apply(&mut self, host: &mut dyn GraphHost) -> BatchOutcome {
        let ids = match parse_roster(&self.text) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Roster apply skipped: {e}");
                return BatchOutcome::default();
            },
        };
        if ids.is_empty() {
            return BatchOutcome::default();
        }
        batch_set_bypass(host, &ids, self.bypass_enabled)
    }
}

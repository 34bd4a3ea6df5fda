/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Manager state in and out of the host serialization envelope.
//!
//! The host hands each panel an opaque JSON object at save and load time.
//! Writes merge the manager's fields into that object without touching
//! foreign keys; reads tolerate any subset of the fields being absent or
//! malformed, falling back field-by-field to defaults.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::BypassError;
use crate::graph::GraphHost;
use crate::manager::BypassManager;

pub mod types;

use types::PersistedManagerState;

const MANAGED_NODES: &str = "managed_nodes";
const IS_MIXED: &str = "is_mixed";
const IS_FORCED_ALL_BYPASS: &str = "is_forced_all_bypass";
const SAVED_MIXED_STATES: &str = "saved_mixed_states";
const IS_COLLAPSED: &str = "is_collapsed";

/// Merge persisted fields into the host envelope, preserving foreign keys.
pub fn write_envelope(state: &PersistedManagerState, envelope: &mut Value) {
    if !envelope.is_object() {
        if !envelope.is_null() {
            warn!("Host envelope was not an object; replacing it");
        }
        *envelope = Value::Object(Map::new());
    }
    if let Value::Object(map) = envelope {
        map.insert(MANAGED_NODES.into(), json_or_null(&state.managed_nodes));
        map.insert(IS_MIXED.into(), Value::Bool(state.is_mixed));
        map.insert(
            IS_FORCED_ALL_BYPASS.into(),
            Value::Bool(state.is_forced_all_bypass),
        );
        if state.saved_mixed_states.is_empty() {
            map.remove(SAVED_MIXED_STATES);
        } else {
            map.insert(
                SAVED_MIXED_STATES.into(),
                json_or_null(&state.saved_mixed_states),
            );
        }
        map.insert(IS_COLLAPSED.into(), Value::Bool(state.is_collapsed));
    }
}

/// Read persisted fields back, tolerating absence or damage per field.
pub fn read_envelope(envelope: &Value) -> PersistedManagerState {
    let Some(map) = envelope.as_object() else {
        if !envelope.is_null() {
            warn!("Host envelope is not an object; restoring defaults");
        }
        return PersistedManagerState::default();
    };

    PersistedManagerState {
        managed_nodes: read_field(map, MANAGED_NODES),
        is_mixed: read_field(map, IS_MIXED),
        is_forced_all_bypass: read_field(map, IS_FORCED_ALL_BYPASS),
        saved_mixed_states: read_field(map, SAVED_MIXED_STATES),
        is_collapsed: read_field(map, IS_COLLAPSED),
    }
}

/// Snapshot a manager into the envelope.
pub fn save_into(manager: &BypassManager, envelope: &mut Value) {
    write_envelope(&manager.to_persisted(), envelope);
}

/// Restore a manager from the envelope, rebuilding display rows from the
/// live graph.
pub fn load_from(manager: &mut BypassManager, envelope: &Value, host: &mut dyn GraphHost) {
    manager.restore_from_persisted(read_envelope(envelope), host);
}

fn json_or_null<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn read_field<T: DeserializeOwned + Default>(map: &Map<String, Value>, field: &'static str) -> T {
    match map.get(field) {
        None => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|source| {
            warn!("{}", BypassError::MalformedEnvelope { field, source });
            T::default()
        }),
    }
}

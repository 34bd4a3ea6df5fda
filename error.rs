/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Error taxonomy for bypass-manager operations.
//!
//! Every variant is recoverable: operations log, fall back to a default,
//! and continue. Nothing here propagates past the triggering UI callback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BypassError {
    /// Operation targeted an id that is not present in the host graph.
    /// Flag reads on such an id report "active"; flag writes fail.
    #[error("node '{id}' is not present in the host graph")]
    ReferenceMiss { id: String },

    /// The roster text field does not hold parseable JSON. The field is
    /// left unchanged by the failing operation.
    #[error("roster field is not valid JSON: {0}")]
    MalformedRoster(serde_json::Error),

    /// A persisted envelope field failed to decode. The field falls back
    /// to its default value.
    #[error("persisted field '{field}' could not be decoded: {source}")]
    MalformedEnvelope {
        field: &'static str,
        source: serde_json::Error,
    },

    /// A batch-add ran with an empty host selection (or a selection
    /// containing only the manager itself). No state changes.
    #[error("no nodes selected")]
    NoSelection,
}

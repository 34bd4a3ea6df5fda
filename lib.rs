/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Batch bypass manager for node-graph editors.
//!
//! A "manager" panel node that batch-toggles the bypass/enabled mode of
//! other nodes in the host graph:
//! - `graph`: reference host graph and the [`graph::GraphHost`] capability
//!   seam the manager drives the editor through
//! - `manager`: the bypass-state reconciler, its intent reducer, the
//!   control-row model, the JSON roster variant, and deferred relayout
//! - `menu`: context-menu action catalogue for canvas surfaces
//! - `persistence`: tolerant read/write of the host serialization envelope
//!
//! The host editor (canvas, rendering, widget drawing, node registration)
//! is out of scope; everything here is driven through `GraphHost`.

pub mod config;
pub mod error;
pub mod graph;
pub mod manager;
pub mod menu;
pub mod persistence;

/// Crate version, exposed for smoke tests and diagnostics surfaces.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

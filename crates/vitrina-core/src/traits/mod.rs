// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the workflow core and its external collaborators.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod search;
pub mod store;
pub mod transport;

pub use search::SearchBackend;
pub use store::ListingStore;
pub use transport::Transport;

// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language search over approved listings.
//!
//! [`OpenAiBackend`] asks a chat-completion model to score the catalogue
//! against the user's request; [`SearchService`] wraps any backend with a
//! deterministic substring fallback so search keeps working when the API
//! is unavailable or unconfigured.

pub mod openai;
pub mod service;

pub use openai::OpenAiBackend;
pub use service::SearchService;

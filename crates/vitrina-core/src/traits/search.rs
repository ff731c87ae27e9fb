// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search backend trait for natural-language ranking over approved listings.

use async_trait::async_trait;

use crate::error::VitrinaError;
use crate::types::{ListingSummary, SearchOutcome};

/// Ranks candidates against a free-form query.
///
/// Implementations may call out to an LLM; any error from `rank` makes the
/// caller degrade to deterministic substring matching, so backends should
/// fail fast rather than guess.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    async fn rank(
        &self,
        query: &str,
        candidates: &[ListingSummary],
    ) -> Result<SearchOutcome, VitrinaError>;
}

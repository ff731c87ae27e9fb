// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search orchestration with a deterministic fallback.
//!
//! The service prefers the configured [`SearchBackend`], but a missing or
//! failing backend never surfaces to the user as an error: the query falls
//! back to case-insensitive substring matching over name and description.

use std::sync::Arc;

use tracing::{debug, warn};
use vitrina_core::types::{ListingSummary, SearchHit, SearchOutcome};
use vitrina_core::SearchBackend;

pub struct SearchService {
    backend: Option<Arc<dyn SearchBackend>>,
    max_results: usize,
}

impl SearchService {
    pub fn new(backend: Option<Arc<dyn SearchBackend>>, max_results: usize) -> Self {
        Self {
            backend,
            max_results,
        }
    }

    /// Rank `candidates` against `query`. Always produces an outcome.
    pub async fn search(&self, query: &str, candidates: &[ListingSummary]) -> SearchOutcome {
        if candidates.is_empty() {
            return SearchOutcome {
                found: false,
                results: Vec::new(),
                explanation: "There are no published announcements yet.".to_string(),
            };
        }

        if let Some(backend) = &self.backend {
            match backend.rank(query, candidates).await {
                Ok(outcome) => {
                    debug!(
                        hits = outcome.results.len(),
                        found = outcome.found,
                        "backend ranking completed"
                    );
                    return outcome;
                }
                Err(e) => {
                    warn!(error = %e, "search backend failed, using substring fallback");
                }
            }
        }

        self.substring_fallback(query, candidates)
    }

    fn substring_fallback(&self, query: &str, candidates: &[ListingSummary]) -> SearchOutcome {
        let needle = query.trim().to_lowercase();
        let results: Vec<SearchHit> = candidates
            .iter()
            .filter(|c| {
                !needle.is_empty()
                    && (c.name.to_lowercase().contains(&needle)
                        || c.description.to_lowercase().contains(&needle))
            })
            .take(self.max_results)
            .map(|summary| SearchHit {
                summary: summary.clone(),
                relevance_score: 0,
                explanation: "matched by keyword".to_string(),
            })
            .collect();

        if results.is_empty() {
            SearchOutcome {
                found: false,
                results,
                explanation: "Nothing in the catalogue matches your request.".to_string(),
            }
        } else {
            SearchOutcome {
                found: true,
                results,
                explanation: "Keyword matches from the catalogue.".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vitrina_core::VitrinaError;

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn rank(
            &self,
            _query: &str,
            _candidates: &[ListingSummary],
        ) -> Result<SearchOutcome, VitrinaError> {
            Err(VitrinaError::Search {
                message: "api down".to_string(),
                source: None,
            })
        }
    }

    struct FixedBackend(SearchOutcome);

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn rank(
            &self,
            _query: &str,
            _candidates: &[ListingSummary],
        ) -> Result<SearchOutcome, VitrinaError> {
            Ok(SearchOutcome {
                found: self.0.found,
                results: self.0.results.clone(),
                explanation: self.0.explanation.clone(),
            })
        }
    }

    fn catalogue() -> Vec<ListingSummary> {
        vec![
            ListingSummary {
                id: 1,
                name: "BakeryBot".to_string(),
                description: "takes bread orders".to_string(),
            },
            ListingSummary {
                id: 2,
                name: "SupportBot".to_string(),
                description: "answers customer questions".to_string(),
            },
            ListingSummary {
                id: 3,
                name: "OrderBot".to_string(),
                description: "tracks bakery deliveries".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn empty_catalogue_short_circuits() {
        let service = SearchService::new(Some(Arc::new(FailingBackend)), 5);
        let outcome = service.search("anything", &[]).await;
        assert!(!outcome.found);
        assert!(outcome.results.is_empty());
    }

    #[tokio::test]
    async fn backend_outcome_is_returned_as_is() {
        let fixed = SearchOutcome {
            found: true,
            results: vec![SearchHit {
                summary: catalogue().remove(1),
                relevance_score: 9,
                explanation: "handles support".to_string(),
            }],
            explanation: "one strong match".to_string(),
        };
        let service = SearchService::new(Some(Arc::new(FixedBackend(fixed))), 5);
        let outcome = service.search("support", &catalogue()).await;
        assert!(outcome.found);
        assert_eq!(outcome.results[0].summary.id, 2);
        assert_eq!(outcome.results[0].relevance_score, 9);
    }

    #[tokio::test]
    async fn failing_backend_degrades_to_substring_match() {
        let service = SearchService::new(Some(Arc::new(FailingBackend)), 5);
        let outcome = service.search("BAKERY", &catalogue()).await;
        assert!(outcome.found);
        let ids: Vec<i64> = outcome.results.iter().map(|h| h.summary.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn no_backend_uses_fallback_directly() {
        let service = SearchService::new(None, 5);
        let outcome = service.search("customer", &catalogue()).await;
        assert!(outcome.found);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].summary.id, 2);
    }

    #[tokio::test]
    async fn fallback_miss_reports_not_found() {
        let service = SearchService::new(None, 5);
        let outcome = service.search("spaceship", &catalogue()).await;
        assert!(!outcome.found);
        assert!(outcome.results.is_empty());
        assert!(!outcome.explanation.is_empty());
    }

    #[tokio::test]
    async fn fallback_respects_max_results() {
        let service = SearchService::new(None, 1);
        let outcome = service.search("bot", &catalogue()).await;
        assert_eq!(outcome.results.len(), 1);
    }

    #[tokio::test]
    async fn blank_query_matches_nothing() {
        let service = SearchService::new(None, 5);
        let outcome = service.search("   ", &catalogue()).await;
        assert!(!outcome.found);
    }
}

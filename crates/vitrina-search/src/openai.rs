// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions backend for relevance ranking.
//!
//! Sends the query plus a JSON projection of the candidates and expects a
//! strict JSON verdict back. Models like to wrap JSON in markdown fences
//! regardless of instructions, so the response is unfenced before parsing.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vitrina_core::types::{ListingSummary, SearchHit, SearchOutcome};
use vitrina_core::{SearchBackend, VitrinaError};

use async_trait::async_trait;

/// Base URL for the OpenAI chat completions API.
const API_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

/// Relevance-ranking backend over the OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    model: String,
    max_results: usize,
    min_relevance: u8,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// The verdict format the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct Verdict {
    found: bool,
    #[serde(default)]
    results: Vec<VerdictHit>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct VerdictHit {
    id: i64,
    relevance_score: u8,
    #[serde(default)]
    explanation: String,
}

impl OpenAiBackend {
    pub fn new(
        api_key: &str,
        model: String,
        max_results: usize,
        min_relevance: u8,
    ) -> Result<Self, VitrinaError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            VitrinaError::Config(format!("invalid search API key header value: {e}"))
        })?;
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VitrinaError::Search {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model,
            max_results,
            min_relevance,
            base_url: API_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn build_prompt(query: &str, candidates: &[ListingSummary]) -> Result<String, VitrinaError> {
        let catalogue = serde_json::to_string(candidates).map_err(|e| VitrinaError::Search {
            message: format!("failed to serialize candidates: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(format!(
            "You match a user's request against a catalogue of chat-bot solutions.\n\
             User request: {query}\n\n\
             Catalogue (JSON array of {{id, name, description}}):\n{catalogue}\n\n\
             Score each relevant entry from 1 to 10 and reply with JSON ONLY, \
             no markdown, in this exact shape:\n\
             {{\"found\": true|false, \"results\": [{{\"id\": <id>, \
             \"relevance_score\": <1-10>, \"explanation\": \"<why>\"}}], \
             \"explanation\": \"<overall summary>\"}}"
        ))
    }

    /// Turn the model's verdict into a ranked outcome over the real
    /// candidates. Unknown ids are dropped; scores below the floor are
    /// filtered; the rest is sorted descending and truncated.
    fn apply_verdict(&self, verdict: Verdict, candidates: &[ListingSummary]) -> SearchOutcome {
        let mut hits: Vec<SearchHit> = verdict
            .results
            .into_iter()
            .filter(|hit| hit.relevance_score >= self.min_relevance)
            .filter_map(|hit| {
                candidates
                    .iter()
                    .find(|c| c.id == hit.id)
                    .map(|summary| SearchHit {
                        summary: summary.clone(),
                        relevance_score: hit.relevance_score,
                        explanation: hit.explanation,
                    })
            })
            .collect();
        hits.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        hits.truncate(self.max_results);

        SearchOutcome {
            found: verdict.found && !hits.is_empty(),
            results: hits,
            explanation: verdict.explanation,
        }
    }
}

/// Strip a surrounding markdown code fence (``` or ```json) if present.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[async_trait]
impl SearchBackend for OpenAiBackend {
    async fn rank(
        &self,
        query: &str,
        candidates: &[ListingSummary],
    ) -> Result<SearchOutcome, VitrinaError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(query, candidates)?,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VitrinaError::Search {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VitrinaError::Search {
                message: format!("search API returned {status}: {body}"),
                source: None,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| VitrinaError::Search {
            message: format!("malformed search API response: {e}"),
            source: Some(Box::new(e)),
        })?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| VitrinaError::Search {
                message: "search API response had no choices".to_string(),
                source: None,
            })?;

        debug!(content_len = content.len(), "search verdict received");

        let verdict: Verdict =
            serde_json::from_str(strip_code_fence(content)).map_err(|e| VitrinaError::Search {
                message: format!("verdict was not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(self.apply_verdict(verdict, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> OpenAiBackend {
        OpenAiBackend::new("sk-test", "gpt-4o-mini".to_string(), 5, 6).unwrap()
    }

    fn candidates() -> Vec<ListingSummary> {
        (1..=8)
            .map(|i| ListingSummary {
                id: i,
                name: format!("Bot {i}"),
                description: format!("does thing {i}"),
            })
            .collect()
    }

    #[test]
    fn fence_stripping_handles_plain_and_fenced() {
        assert_eq!(strip_code_fence("{\"found\": true}"), "{\"found\": true}");
        assert_eq!(
            strip_code_fence("```json\n{\"found\": true}\n```"),
            "{\"found\": true}"
        );
        assert_eq!(
            strip_code_fence("```\n{\"found\": true}\n```"),
            "{\"found\": true}"
        );
    }

    #[test]
    fn verdict_filters_sorts_and_truncates() {
        let verdict: Verdict = serde_json::from_str(
            r#"{
                "found": true,
                "results": [
                    {"id": 1, "relevance_score": 6, "explanation": "ok"},
                    {"id": 2, "relevance_score": 9, "explanation": "great"},
                    {"id": 3, "relevance_score": 5, "explanation": "weak"},
                    {"id": 4, "relevance_score": 7, "explanation": "good"},
                    {"id": 5, "relevance_score": 8, "explanation": "strong"},
                    {"id": 6, "relevance_score": 10, "explanation": "perfect"},
                    {"id": 7, "relevance_score": 6, "explanation": "ok"},
                    {"id": 99, "relevance_score": 10, "explanation": "hallucinated"}
                ],
                "explanation": "several matches"
            }"#,
        )
        .unwrap();

        let outcome = backend().apply_verdict(verdict, &candidates());
        assert!(outcome.found);
        // Score 5 filtered, unknown id 99 dropped, capped at 5 of the 6 left.
        assert_eq!(outcome.results.len(), 5);
        let scores: Vec<u8> = outcome.results.iter().map(|h| h.relevance_score).collect();
        assert_eq!(scores, vec![10, 9, 8, 7, 6]);
        assert_eq!(outcome.results[0].summary.id, 6);
    }

    #[test]
    fn found_but_all_filtered_becomes_not_found() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"found": true, "results": [{"id": 1, "relevance_score": 2}], "explanation": "weak"}"#,
        )
        .unwrap();
        let outcome = backend().apply_verdict(verdict, &candidates());
        assert!(!outcome.found);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn prompt_embeds_query_and_catalogue() {
        let prompt = OpenAiBackend::build_prompt("a bot for bakeries", &candidates()).unwrap();
        assert!(prompt.contains("a bot for bakeries"));
        assert!(prompt.contains("\"name\":\"Bot 1\""));
    }
}

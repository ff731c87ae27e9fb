// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the non-empty moderator list and the topic/chat dependency.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::VitrinaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VitrinaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match &config.bot.token {
        None => errors.push(ConfigError::MissingKey {
            key: "bot.token".to_string(),
        }),
        Some(token) if token.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "bot.token must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.moderation.moderator_ids.is_empty() {
        errors.push(ConfigError::Validation {
            message: "moderation.moderator_ids must not be empty: \
                      submissions have nobody to review them"
                .to_string(),
        });
    }

    let mut seen = HashSet::new();
    for id in &config.moderation.moderator_ids {
        if !seen.insert(id) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate moderator id `{id}` in moderation.moderator_ids"),
            });
        }
    }

    if config.moderation.min_comment_len == 0 {
        errors.push(ConfigError::Validation {
            message: "moderation.min_comment_len must be at least 1".to_string(),
        });
    }

    // A topic only exists inside a channel.
    if config.publication.topic_id.is_some() && config.publication.chat_id.is_none() {
        errors.push(ConfigError::Validation {
            message: "publication.topic_id requires publication.chat_id to be set".to_string(),
        });
    }

    if config.search.max_results == 0 {
        errors.push(ConfigError::Validation {
            message: "search.max_results must be at least 1".to_string(),
        });
    }

    if config.search.min_relevance > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "search.min_relevance must be between 0 and 10, got {}",
                config.search.min_relevance
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid() -> VitrinaConfig {
        let mut config = VitrinaConfig::default();
        config.bot.token = Some("123:abc".to_string());
        config.moderation.moderator_ids = vec![111];
        config
    }

    #[test]
    fn minimal_config_validates() {
        assert!(validate_config(&minimal_valid()).is_ok());
    }

    #[test]
    fn default_config_fails_on_missing_token_and_moderators() {
        let errors = validate_config(&VitrinaConfig::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "bot.token")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("moderator_ids"))));
    }

    #[test]
    fn topic_without_chat_fails_validation() {
        let mut config = minimal_valid();
        config.publication.topic_id = Some(42);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("topic_id"))));
    }

    #[test]
    fn topic_with_chat_passes() {
        let mut config = minimal_valid();
        config.publication.chat_id = Some(-1001234);
        config.publication.topic_id = Some(42);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_moderator_ids_fail_validation() {
        let mut config = minimal_valid();
        config.moderation.moderator_ids = vec![111, 222, 111];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate moderator"))));
    }

    #[test]
    fn out_of_range_relevance_fails_validation() {
        let mut config = minimal_valid();
        config.search.min_relevance = 11;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("min_relevance"))));
    }
}

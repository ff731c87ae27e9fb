// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error diagnostics rendered through miette.
//!
//! Figment failures are flattened into [`ConfigError`] values carrying a
//! source span into the offending TOML file and a typo suggestion computed
//! against the keys vitrina actually accepts. A key typed into the wrong
//! section is pointed at its owning section instead.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Every section of vitrina.toml with the keys it accepts. Drives the
/// "did you mean" and wrong-section hints.
const SECTIONS: &[(&str, &[&str])] = &[
    ("bot", &["token", "log_level"]),
    ("storage", &["database_path", "wal_mode"]),
    ("moderation", &["moderator_ids", "min_comment_len"]),
    ("publication", &["chat_id", "topic_id", "chat_url"]),
    (
        "search",
        &["openai_api_key", "model", "max_results", "min_relevance"],
    ),
];

/// Jaro-Winkler floor below which a candidate key is not worth suggesting.
const SUGGESTION_FLOOR: f64 = 0.8;

/// A configuration error, shaped for miette's graphical report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key figment refused under `deny_unknown_fields`.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(vitrina::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        /// The accepted key this was probably a typo for.
        suggestion: Option<String>,
        help: String,
        #[label("not a recognised key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that deserialized into the wrong type.
    #[error("wrong type for `{key}`: {detail}")]
    #[diagnostic(code(vitrina::config::wrong_type))]
    WrongType { key: String, detail: String },

    /// A key the bot cannot run without.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(vitrina::config::missing_key),
        help("set it in vitrina.toml or via the matching VITRINA_* variable")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated by an otherwise well-formed value.
    #[error("{message}")]
    #[diagnostic(code(vitrina::config::invalid_value))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(vitrina::config::other))]
    Other(String),
}

/// Flatten a `figment::Error` (which may aggregate several failures) into
/// one [`ConfigError`] per failure.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|e| {
            let path: Vec<String> = e.path.iter().map(|p| p.to_string()).collect();
            match &e.kind {
                Kind::UnknownField(field, accepted) => unknown_key(
                    field,
                    accepted,
                    path.first().map(String::as_str),
                    toml_sources,
                ),
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: dotted(&path, field),
                },
                Kind::InvalidType(found, wanted) => ConfigError::WrongType {
                    key: path.join("."),
                    detail: format!("found {found}, expected {wanted}"),
                },
                _ => ConfigError::Other(e.to_string()),
            }
        })
        .collect()
}

fn dotted(path: &[String], field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path.join("."), field)
    }
}

fn unknown_key(
    field: &str,
    accepted: &[&str],
    section: Option<&str>,
    toml_sources: &[(String, String)],
) -> ConfigError {
    let suggestion = closest_key(field, accepted).map(str::to_string);
    let help = match (&suggestion, owning_section(field)) {
        (Some(better), _) => format!("did you mean `{better}`?"),
        (None, Some(owner)) if Some(owner) != section => {
            format!("`{field}` belongs in the [{owner}] section")
        }
        _ => format!("accepted keys here: {}", accepted.join(", ")),
    };
    let (span, src) = locate(toml_sources, section, field);
    ConfigError::UnknownKey {
        key: field.to_string(),
        suggestion,
        help,
        span,
        src,
    }
}

/// The accepted key closest to `unknown`, if any is close enough.
pub fn closest_key<'a>(unknown: &str, accepted: &[&'a str]) -> Option<&'a str> {
    accepted
        .iter()
        .map(|key| (*key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score >= SUGGESTION_FLOOR)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// The section that declares `key`, for keys typed into the wrong section.
fn owning_section(key: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|(_, keys)| keys.contains(&key))
        .map(|(name, _)| *name)
}

/// Search the loaded TOML sources for `key` inside `[section]` and build a
/// span pointing at it.
fn locate(
    sources: &[(String, String)],
    section: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    for (path, content) in sources {
        if let Some(offset) = key_offset(content, section, key) {
            return (
                Some(SourceSpan::new(offset.into(), key.len())),
                Some(NamedSource::new(path, content.clone())),
            );
        }
    }
    (None, None)
}

/// Byte offset of `key` within its section. Section headers are tracked
/// line by line, so the same key name in another section never matches.
pub fn key_offset(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut consumed = 0;

    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            current = Some(name.trim());
        } else if current == section {
            let indent = line.len() - line.trim_start().len();
            if let Some(rest) = line.trim_start().strip_prefix(key) {
                if rest.trim_start().starts_with('=') {
                    return Some(consumed + indent);
                }
            }
        }
        consumed += line.len() + 1;
    }
    None
}

/// Render every collected error to stderr through miette's graphical
/// handler, falling back to plain `Display` when rendering fails.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typo_is_suggested() {
        assert_eq!(closest_key("tokne", &["token", "log_level"]), Some("token"));
        assert_eq!(
            closest_key("moderator_idz", &["moderator_ids", "min_comment_len"]),
            Some("moderator_ids")
        );
    }

    #[test]
    fn distant_garbage_gets_no_suggestion() {
        assert_eq!(closest_key("zzzzzz", &["token", "log_level"]), None);
    }

    #[test]
    fn misplaced_key_names_its_owning_section() {
        assert_eq!(owning_section("min_relevance"), Some("search"));
        assert_eq!(owning_section("no_such_key"), None);

        let err = unknown_key("min_relevance", &["token", "log_level"], Some("bot"), &[]);
        match err {
            ConfigError::UnknownKey { help, suggestion, .. } => {
                assert_eq!(suggestion, None);
                assert!(help.contains("[search]"));
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn key_offset_respects_section_boundaries() {
        let content = "[bot]\ntoken = \"a\"\n\n[search]\nmodel = \"gpt\"\n";
        let bot = key_offset(content, Some("bot"), "token").unwrap();
        assert_eq!(&content[bot..bot + 5], "token");
        // `model` lives in [search], not [bot].
        assert!(key_offset(content, Some("bot"), "model").is_none());
        let model = key_offset(content, Some("search"), "model").unwrap();
        assert_eq!(&content[model..model + 5], "model");
    }

    #[test]
    fn key_prefix_does_not_match() {
        let content = "[bot]\ntoken_file = \"x\"\n";
        assert!(key_offset(content, Some("bot"), "token").is_none());
    }

    #[test]
    fn indented_key_offset_points_at_the_key() {
        let content = "[moderation]\n    moderator_idz = [1]\n";
        let o = key_offset(content, Some("moderation"), "moderator_idz").unwrap();
        assert_eq!(&content[o..o + 13], "moderator_idz");
    }
}

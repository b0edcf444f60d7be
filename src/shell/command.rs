use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

/// One entry of a `set` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrumbSpec {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push { label: String, url: Option<String> },
    Pop,
    Goto { label: String },
    /// Entries run oldest to newest.
    Set { entries: Vec<CrumbSpec> },
    Clear,
    Peek { index: isize },
    Home,
    Show,
}

#[derive(Deserialize)]
struct Envelope {
    op: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct GotoPayload {
    label: String,
}

#[derive(Deserialize)]
struct SetPayload {
    entries: Vec<CrumbSpec>,
}

#[derive(Deserialize)]
struct PeekPayload {
    index: isize,
}

impl Command {
    /// Parses one `{"op": ..., "payload": ...}` line. Blank lines and `#`
    /// comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let envelope: Envelope = serde_json::from_str(line).context("Malformed command")?;
        let payload = envelope.payload;
        let command = match envelope.op.as_str() {
            "push" => {
                let spec: CrumbSpec =
                    serde_json::from_value(payload).context("Invalid push payload")?;
                Command::Push {
                    label: spec.label,
                    url: spec.url,
                }
            }
            "pop" => Command::Pop,
            "goto" => {
                let p: GotoPayload =
                    serde_json::from_value(payload).context("Invalid goto payload")?;
                Command::Goto { label: p.label }
            }
            "set" => {
                let p: SetPayload =
                    serde_json::from_value(payload).context("Invalid set payload")?;
                Command::Set { entries: p.entries }
            }
            "clear" => Command::Clear,
            "peek" => {
                let p: PeekPayload =
                    serde_json::from_value(payload).context("Invalid peek payload")?;
                Command::Peek { index: p.index }
            }
            "home" => Command::Home,
            "show" => Command::Show,
            other => return Err(anyhow!("Unknown op: {}", other)),
        };
        Ok(Some(command))
    }
}

/// Turns address-bar style input into a location: full URLs are kept, bare
/// hosts get `https://`, anything else becomes a search.
pub fn normalize_location(input: &str) -> Result<Url> {
    let input = input.trim();
    let target = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else if input.starts_with("about:") || input.contains("://") {
        input.to_string()
    } else if input.contains('.') && !input.contains(' ') {
        format!("https://{}", input)
    } else {
        format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(input)
        )
    };
    Url::parse(&target).with_context(|| format!("Invalid location: {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# setup").unwrap(), None);
    }

    #[test]
    fn parses_ops_with_and_without_payload() {
        assert_eq!(
            Command::parse(r#"{"op":"push","payload":{"label":"docs","url":"docs.rs"}}"#).unwrap(),
            Some(Command::Push {
                label: "docs".to_string(),
                url: Some("docs.rs".to_string()),
            })
        );
        assert_eq!(
            Command::parse(r#"{"op":"push","payload":{"label":"draft"}}"#).unwrap(),
            Some(Command::Push {
                label: "draft".to_string(),
                url: None,
            })
        );
        assert_eq!(Command::parse(r#"{"op":"pop"}"#).unwrap(), Some(Command::Pop));
        assert_eq!(
            Command::parse(r#"{"op":"peek","payload":{"index":-1}}"#).unwrap(),
            Some(Command::Peek { index: -1 })
        );
        assert_eq!(
            Command::parse(r#"{"op":"set","payload":{"entries":[{"label":"a"},{"label":"b","url":"b.io"}]}}"#)
                .unwrap(),
            Some(Command::Set {
                entries: vec![
                    CrumbSpec {
                        label: "a".to_string(),
                        url: None,
                    },
                    CrumbSpec {
                        label: "b".to_string(),
                        url: Some("b.io".to_string()),
                    },
                ],
            })
        );
    }

    #[test]
    fn rejects_unknown_op_and_bad_payload() {
        assert!(Command::parse(r#"{"op":"fly"}"#).is_err());
        assert!(Command::parse(r#"{"op":"goto"}"#).is_err());
        assert!(Command::parse("push docs").is_err());
    }

    #[test]
    fn normalizes_locations() {
        assert_eq!(
            normalize_location("https://example.com/a").unwrap().as_str(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_location("example.com").unwrap().as_str(),
            "https://example.com/"
        );
        assert_eq!(normalize_location("about:home").unwrap().as_str(), "about:home");
        assert_eq!(
            normalize_location("rust traits").unwrap().as_str(),
            "https://www.google.com/search?q=rust%20traits"
        );
    }
}

use super::command::{normalize_location, Command};
use super::renderer::TrailRenderer;
use super::Label;
use crate::config::Config;
use anyhow::{Context, Result};
use breadcrumb::{Breadcrumb, Entry, Handle};
use log::warn;
use serde::Serialize;
use std::io::BufRead;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub url: Option<String>,
}

/// Final state of a session. Entries run oldest to newest, the same order
/// a `set` payload takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailReport {
    pub current: Option<String>,
    pub entries: Vec<ReportEntry>,
}

pub struct Session {
    crumb: Breadcrumb<Label, Url>,
    renderer: Arc<TrailRenderer>,
    config: Config,
}

impl Session {
    pub fn new(config: Config, echo: bool) -> Self {
        let crumb: Breadcrumb<Label, Url> = Breadcrumb::new();
        let renderer = Arc::new(TrailRenderer::new(config.separator.clone(), echo));
        crumb.add_listener(renderer.clone());
        renderer.sync(crumb.trail());
        Self {
            crumb,
            renderer,
            config,
        }
    }

    pub fn breadcrumb(&self) -> &Breadcrumb<Label, Url> {
        &self.crumb
    }

    pub fn renderer(&self) -> &TrailRenderer {
        &self.renderer
    }

    /// Applies every command read from `input`. Bad lines are logged and
    /// skipped; only read failures end the session.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        for (n, line) in input.lines().enumerate() {
            let line = line.context("Failed to read command")?;
            let outcome = Command::parse(&line).and_then(|command| match command {
                Some(command) => self.apply(command),
                None => Ok(()),
            });
            if let Err(e) = outcome {
                warn!("line {}: {:#}", n + 1, e);
            }
        }
        Ok(())
    }

    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Push { label, url } => {
                let url = url.as_deref().map(normalize_location).transpose()?;
                self.crumb.add_state(Handle::new(label), url);
            }
            Command::Pop => self.crumb.pop_state(),
            Command::Goto { label } => match self.find(&label) {
                Some(state) => self.crumb.goto_state(&state),
                None => warn!("no crumb labelled {}", label),
            },
            Command::Set { entries } => {
                let entries = entries
                    .into_iter()
                    .map(|spec| -> Result<Entry<Label, Url>> {
                        let url = spec.url.as_deref().map(normalize_location).transpose()?;
                        Ok(Entry::new(Handle::new(spec.label), url))
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.crumb.set(entries);
            }
            Command::Clear => self.crumb.clear(),
            Command::Peek { index } => {
                let state = self.crumb.peek_state_signed(index)?;
                match self.crumb.peek_value_signed(index)? {
                    Some(url) => println!("{}: {} {}", index, state, url),
                    None => println!("{}: {}", index, state),
                }
            }
            Command::Home => {
                let url = normalize_location(&self.config.home)?;
                self.crumb.add_state(Handle::new("home".to_string()), url);
            }
            Command::Show => println!("{}", self.renderer.render(self.crumb.trail())),
        }
        Ok(())
    }

    /// Newest crumb carrying `label`.
    fn find(&self, label: &str) -> Option<Label> {
        self.crumb
            .iter()
            .find(|(state, _)| state.as_str() == label)
            .map(|(state, _)| state.clone())
    }

    pub fn report(&self) -> TrailReport {
        TrailReport {
            current: self.crumb.current_state().map(|s| s.to_string()),
            entries: self
                .crumb
                .iter()
                .rev()
                .map(|(label, url)| ReportEntry {
                    label: label.to_string(),
                    url: url.map(|u| u.to_string()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Config::default(), false)
    }

    fn run(session: &mut Session, script: &str) {
        session.run(script.as_bytes()).unwrap();
    }

    #[test]
    fn goto_jumps_to_newest_matching_label() {
        let mut s = session();
        run(
            &mut s,
            r#"
{"op":"push","payload":{"label":"home"}}
{"op":"push","payload":{"label":"docs","url":"docs.rs"}}
{"op":"push","payload":{"label":"home"}}
{"op":"push","payload":{"label":"search","url":"rust traits"}}
{"op":"goto","payload":{"label":"home"}}
"#,
        );
        assert_eq!(s.breadcrumb().len(), 3);
        assert_eq!(s.renderer().last(), "home > docs > home");
    }

    #[test]
    fn bad_lines_are_skipped() {
        let mut s = session();
        run(
            &mut s,
            r#"{"op":"push","payload":{"label":"a"}}
not json
{"op":"peek","payload":{"index":5}}
{"op":"goto","payload":{"label":"missing"}}
{"op":"push","payload":{"label":"b"}}"#,
        );
        assert_eq!(s.renderer().last(), "a > b");
    }

    #[test]
    fn set_and_report_round_out_a_session() {
        let mut s = session();
        run(
            &mut s,
            r#"{"op":"home"}
{"op":"set","payload":{"entries":[{"label":"a","url":"a.example"},{"label":"b"}]}}
{"op":"pop"}"#,
        );
        let report = s.report();
        assert_eq!(report.current.as_deref(), Some("a"));
        assert_eq!(
            report.entries,
            vec![ReportEntry {
                label: "a".to_string(),
                url: Some("https://a.example/".to_string()),
            }]
        );

        run(&mut s, r#"{"op":"clear"}"#);
        assert_eq!(s.report().current, None);
        assert_eq!(s.renderer().last(), "(empty)");
    }

    #[test]
    fn home_uses_configured_location() {
        let config = Config {
            separator: " | ".to_string(),
            home: "start.example".to_string(),
        };
        let mut s = Session::new(config, false);
        s.apply(Command::Home).unwrap();
        assert_eq!(
            s.breadcrumb().current_value().map(|u| u.as_str()),
            Some("https://start.example/")
        );
    }
}

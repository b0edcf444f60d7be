use super::Label;
use breadcrumb::{BreadcrumbListener, Trail};
use std::sync::{Mutex, PoisonError};
use url::Url;

const EMPTY_TRAIL: &str = "(empty)";

/// Text rendering of a breadcrumb, oldest state first, rebuilt on every
/// state change.
pub struct TrailRenderer {
    separator: String,
    echo: bool,
    last: Mutex<String>,
}

impl TrailRenderer {
    pub fn new(separator: impl Into<String>, echo: bool) -> Self {
        Self {
            separator: separator.into(),
            echo,
            last: Mutex::new(EMPTY_TRAIL.to_string()),
        }
    }

    pub fn render(&self, trail: Trail<'_, Label, Url>) -> String {
        if trail.is_empty() {
            return EMPTY_TRAIL.to_string();
        }
        trail
            .iter()
            .rev()
            .map(|(label, _)| label.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Renders `trail` without echoing it, for a renderer attached to a
    /// breadcrumb that may already hold entries.
    pub fn sync(&self, trail: Trail<'_, Label, Url>) {
        let line = self.render(trail);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = line;
    }

    /// The most recently rendered trail.
    pub fn last(&self) -> String {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BreadcrumbListener<Label, Url> for TrailRenderer {
    fn state_added(&self, state: &Label, value: Option<&Url>) {
        match value {
            Some(url) => log::debug!("crumb added: {} -> {}", state, url),
            None => log::debug!("crumb added: {}", state),
        }
    }

    fn state_changed(&self, trail: Trail<'_, Label, Url>, old: Option<&Label>, new: Option<&Label>) {
        log::debug!(
            "current crumb {} -> {}",
            old.map_or("-", |s| s.as_str()),
            new.map_or("-", |s| s.as_str())
        );
        let line = self.render(trail);
        if self.echo {
            println!("{}", line);
        }
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = line;
    }
}

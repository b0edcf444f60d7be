/// Shell settings, read from the environment with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub separator: String,
    pub home: String,
}

pub const DEFAULT_SEPARATOR: &str = " > ";
pub const DEFAULT_HOME: &str = "about:home";

impl Config {
    pub fn from_env() -> Self {
        Self {
            separator: std::env::var("BREADCRUMB_SEPARATOR")
                .unwrap_or_else(|_| DEFAULT_SEPARATOR.to_string()),
            home: std::env::var("BREADCRUMB_HOME").unwrap_or_else(|_| DEFAULT_HOME.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            home: DEFAULT_HOME.to_string(),
        }
    }
}

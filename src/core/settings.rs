//=========================================================================
// Settings
//=========================================================================
//
// Declarative game service configuration, loadable from TOML.
//
// Example:
// ```toml
// auto_init = true
// auto_init_delay_secs = 1.5
// max_login_requests = 3
// fetch_timeout_secs = 30
//
// [[leaderboards]]
// name = "high_score"
// ios_id = "com.example.high_score"
// android_id = "CgkIabc_EAIQAQ"
//
// [[achievements]]
// name = "first_win"
// ios_id = "com.example.first_win"
// android_id = "CgkIabc_EAIQAg"
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::catalog::{Achievement, Catalog, Leaderboard};

//=== Defaults ============================================================

const DEFAULT_MAX_LOGIN_REQUESTS: u32 = 3;
const DEFAULT_EVENT_BUDGET: usize = 64;

fn default_true() -> bool {
    true
}

fn default_max_login_requests() -> u32 {
    DEFAULT_MAX_LOGIN_REQUESTS
}

fn default_event_budget() -> usize {
    DEFAULT_EVENT_BUDGET
}

//=== SettingsError =======================================================

/// Settings loading and validation errors.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(std::io::Error),

    /// The content is not valid TOML for these settings.
    Parse(toml::de::Error),

    /// The content parsed but is inconsistent.
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Failed to read settings: {}", e),
            Self::Parse(e) => write!(f, "Failed to parse settings: {}", e),
            Self::Invalid(e) => write!(f, "Invalid settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

//=== GameServiceSettings =================================================

/// Game service configuration.
///
/// # Default Values
///
/// - **auto_init**: true
/// - **auto_init_delay_secs**: 0
/// - **max_login_requests**: 3 (0 = unlimited)
/// - **fetch_timeout_secs**: none (wait forever)
/// - **event_budget**: 64 events per update
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameServiceSettings {
    #[serde(default = "default_true")]
    pub auto_init: bool,

    #[serde(default)]
    pub auto_init_delay_secs: f64,

    /// How many managed-init login prompts may be shown before giving up.
    #[serde(default = "default_max_login_requests")]
    pub max_login_requests: u32,

    #[serde(default)]
    pub fetch_timeout_secs: Option<f64>,

    #[serde(default = "default_event_budget")]
    pub event_budget: usize,

    #[serde(default)]
    pub leaderboards: Vec<Leaderboard>,

    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Default for GameServiceSettings {
    fn default() -> Self {
        Self {
            auto_init: true,
            auto_init_delay_secs: 0.0,
            max_login_requests: DEFAULT_MAX_LOGIN_REQUESTS,
            fetch_timeout_secs: None,
            event_budget: DEFAULT_EVENT_BUDGET,
            leaderboards: Vec::new(),
            achievements: Vec::new(),
        }
    }
}

impl GameServiceSettings {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a TOML settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    //--- Validation -------------------------------------------------------

    /// Checks value ranges and catalog consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for durations that are negative,
    /// non-finite or too large for [`Duration`], a zero event budget,
    /// duplicate names, or entries with no platform id at all.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Err(e) = Duration::try_from_secs_f64(self.auto_init_delay_secs) {
            return Err(SettingsError::Invalid(format!(
                "auto_init_delay_secs must be a duration >= 0, got {} ({})",
                self.auto_init_delay_secs, e
            )));
        }

        if let Some(timeout) = self.fetch_timeout_secs {
            match Duration::try_from_secs_f64(timeout) {
                Ok(duration) if !duration.is_zero() => {}
                Ok(_) => {
                    return Err(SettingsError::Invalid(
                        "fetch_timeout_secs must be > 0".to_string(),
                    ))
                }
                Err(e) => {
                    return Err(SettingsError::Invalid(format!(
                        "fetch_timeout_secs must be a duration > 0, got {} ({})",
                        timeout, e
                    )))
                }
            }
        }

        if self.event_budget == 0 {
            return Err(SettingsError::Invalid("event_budget must be > 0".to_string()));
        }

        check_entries(
            "leaderboard",
            self.leaderboards.iter().map(|l| (&l.name, &l.ios_id, &l.android_id)),
        )?;
        check_entries(
            "achievement",
            self.achievements.iter().map(|a| (&a.name, &a.ios_id, &a.android_id)),
        )
    }

    //--- Accessors --------------------------------------------------------

    /// Out-of-range values that skipped [`validate`](Self::validate)
    /// saturate: negative or NaN becomes zero, too large becomes
    /// [`Duration::MAX`].
    pub fn auto_init_delay(&self) -> Duration {
        seconds_to_duration(self.auto_init_delay_secs.max(0.0))
    }

    /// `None` also for zero, negative or NaN timeouts.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs
            .filter(|secs| *secs > 0.0)
            .map(seconds_to_duration)
    }

    /// Builds the name-indexed catalog of declared entries.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.leaderboards.clone(), self.achievements.clone())
    }
}

fn seconds_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn check_entries<'a, I>(kind: &str, entries: I) -> Result<(), SettingsError>
where
    I: Iterator<Item = (&'a String, &'a String, &'a String)>,
{
    let mut seen = HashSet::new();
    for (name, ios_id, android_id) in entries {
        if name.is_empty() {
            return Err(SettingsError::Invalid(format!("{} with empty name", kind)));
        }
        if !seen.insert(name.as_str()) {
            return Err(SettingsError::Invalid(format!("duplicate {} name {:?}", kind, name)));
        }
        if ios_id.is_empty() && android_id.is_empty() {
            return Err(SettingsError::Invalid(format!("{} {:?} has no platform id", kind, name)));
        }
    }
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

//! `meetbook.toml` loading and environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use slot_engine::SchedulingPolicy;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "meetbook.toml";
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const ENV_GOOGLE_CREDENTIALS: &str = "MEETBOOK_GOOGLE_CREDENTIALS";
const ENV_JIRA_API_TOKEN: &str = "MEETBOOK_JIRA_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub google: GoogleConfig,
    pub jira: Option<JiraConfig>,
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleConfig {
    /// Authorized-user JSON holding `client_id`, `client_secret` and `refresh_token`.
    pub credentials: PathBuf,
    pub api_base: String,
    /// IANA zone to schedule in; asked from the calendar when unset.
    pub timezone: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("token.json"),
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JiraConfig {
    pub base_url: String,
    pub email: String,
    #[serde(default)]
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub quota: usize,
    pub working_hours: [String; 2],
    pub exclusion: [String; 2],
    pub admission_threshold_minutes: i64,
    pub slot_minutes: i64,
    pub max_lookahead_days: u32,
    pub primary_attendee_index: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = SchedulingPolicy::default();
        Self {
            quota: policy.quota,
            working_hours: [hm(policy.day_start), hm(policy.day_end)],
            exclusion: [hm(policy.exclusion_start), hm(policy.exclusion_end)],
            admission_threshold_minutes: policy.admission_threshold_minutes,
            slot_minutes: policy.slot_minutes,
            max_lookahead_days: policy.max_lookahead_days,
            primary_attendee_index: policy.primary_attendee_index,
        }
    }
}

impl PolicyConfig {
    /// Convert to the engine's policy, checking it on the way.
    pub fn to_policy(&self) -> Result<SchedulingPolicy> {
        let policy = SchedulingPolicy {
            quota: self.quota,
            day_start: parse_hm(&self.working_hours[0])?,
            day_end: parse_hm(&self.working_hours[1])?,
            exclusion_start: parse_hm(&self.exclusion[0])?,
            exclusion_end: parse_hm(&self.exclusion[1])?,
            admission_threshold_minutes: self.admission_threshold_minutes,
            slot_minutes: self.slot_minutes,
            max_lookahead_days: self.max_lookahead_days,
            primary_attendee_index: self.primary_attendee_index,
        };
        policy.validate().context("Invalid [policy] section")?;
        Ok(policy)
    }
}

impl Config {
    /// Read `path` if it exists, then apply environment overrides.
    ///
    /// A missing file is only tolerated for the default path, so a typo in
    /// `--config` is reported instead of silently running on defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else if path == Path::new(DEFAULT_CONFIG_PATH) {
            debug!("no {} found, using defaults", DEFAULT_CONFIG_PATH);
            Self::default()
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Overlay secrets and paths from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_GOOGLE_CREDENTIALS) {
            self.google.credentials = PathBuf::from(path);
        }
        if let (Some(token), Some(jira)) = (lookup(ENV_JIRA_API_TOKEN), self.jira.as_mut()) {
            jira.api_token = token;
        }
    }
}

fn parse_hm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("Expected a time as HH:MM, got '{}'", raw))
}

fn hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.google.api_base, GOOGLE_CALENDAR_API_BASE);
        assert!(config.jira.is_none());
        assert_eq!(config.policy.to_policy().unwrap(), SchedulingPolicy::default());
    }

    #[test]
    fn full_file_round_trips_into_policy() {
        let raw = r#"
            [google]
            credentials = "/etc/meetbook/token.json"
            timezone = "Europe/Paris"

            [jira]
            base_url = "https://acme.atlassian.net"
            email = "me@acme.io"
            api_token = "secret"

            [policy]
            quota = 3
            working_hours = ["08:30", "18:00"]
            exclusion = ["12:00", "13:30"]
            admission_threshold_minutes = 240
            slot_minutes = 45
            max_lookahead_days = 30
        "#;
        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.google.timezone.as_deref(), Some("Europe/Paris"));
        assert_eq!(config.jira.as_ref().unwrap().email, "me@acme.io");

        let policy = config.policy.to_policy().unwrap();
        assert_eq!(policy.quota, 3);
        assert_eq!(policy.day_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(policy.exclusion_end, NaiveTime::from_hms_opt(13, 30, 0).unwrap());
        assert_eq!(policy.slot_minutes, 45);
        assert_eq!(policy.max_lookahead_days, 30);
    }

    #[test]
    fn bad_time_is_reported() {
        let raw = r#"
            [policy]
            working_hours = ["9am", "17:00"]
        "#;
        let config = Config::from_toml(raw).unwrap();
        let err = config.policy.to_policy().unwrap_err();
        assert!(err.to_string().contains("9am"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("[policy]\nlunch = 1\n").is_err());
    }

    #[test]
    fn environment_overrides_secrets() {
        let mut config = Config::from_toml(
            "[jira]\nbase_url = \"https://acme.atlassian.net\"\nemail = \"me@acme.io\"\n",
        )
        .unwrap();
        config.apply_env(|key| match key {
            "MEETBOOK_JIRA_API_TOKEN" => Some("from-env".to_string()),
            "MEETBOOK_GOOGLE_CREDENTIALS" => Some("/tmp/creds.json".to_string()),
            _ => None,
        });
        assert_eq!(config.jira.unwrap().api_token, "from-env");
        assert_eq!(config.google.credentials, PathBuf::from("/tmp/creds.json"));
    }
}

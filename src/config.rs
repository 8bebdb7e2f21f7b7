use crate::calendar::CalendarPolicy;
use crate::i18n::Language;
use crate::preferences::{Preferences, STORAGE_KEY};
use crate::retry::RetryConfig;
use crate::submission::SubmissionPolicy;
use crate::validation::EmailPolicy;
use crate::wizard::WizardOptions;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Preferences
    pub storage_path: PathBuf,
    pub default_language: Language,

    // Submission
    pub booking_endpoint: Option<String>,
    pub submit_delay: Duration,
    pub submit_timeout: Duration,
    pub max_attempts: u32,
    pub auto_close: Duration,

    // Validation
    pub email_policy: EmailPolicy,

    // Calendar
    pub allow_past_months: bool,
    pub max_months_ahead: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Preferences
            storage_path: std::env::var("MAM_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(format!("{}.json", STORAGE_KEY))),
            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(&code).context("DEFAULT_LANGUAGE is invalid")?,
                Err(_) => Language::default(),
            },

            // Submission
            booking_endpoint: std::env::var("BOOKING_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            submit_delay: Duration::from_millis(
                std::env::var("BOOKING_SUBMIT_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1500),
            ),
            submit_timeout: Duration::from_secs(
                std::env::var("BOOKING_SUBMIT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            max_attempts: std::env::var("BOOKING_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            auto_close: Duration::from_millis(
                std::env::var("BOOKING_AUTO_CLOSE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3000),
            ),

            // Validation
            email_policy: match std::env::var("BOOKING_EMAIL_POLICY") {
                Ok(value) => value
                    .parse::<EmailPolicy>()
                    .map_err(|e| anyhow!(e))
                    .context("BOOKING_EMAIL_POLICY is invalid")?,
                Err(_) => EmailPolicy::default(),
            },

            // Calendar
            allow_past_months: std::env::var("CALENDAR_ALLOW_PAST_MONTHS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            max_months_ahead: std::env::var("CALENDAR_MAX_MONTHS_AHEAD")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }

    pub fn wizard_options(&self) -> WizardOptions {
        WizardOptions {
            email_policy: self.email_policy,
            calendar: CalendarPolicy {
                allow_past_months: self.allow_past_months,
                max_months_ahead: self.max_months_ahead,
            },
            auto_close: self.auto_close,
        }
    }

    pub fn submission_policy(&self) -> SubmissionPolicy {
        SubmissionPolicy {
            timeout: self.submit_timeout,
            retry: RetryConfig {
                max_attempts: self.max_attempts,
                ..RetryConfig::booking_submission()
            },
        }
    }

    /// Preferences used when nothing has been stored yet.
    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            language: self.default_language,
            ..Default::default()
        }
    }
}

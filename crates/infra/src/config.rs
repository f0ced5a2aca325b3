use std::{fmt::Display, ops::RangeInclusive, str::FromStr};
use teamdesk_domain::ReminderPolicy;
use teamdesk_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Key the task workflow endpoints expect in the `x-api-key` header
    pub internal_api_key: String,
    /// Shared secret guarding the reminder processing endpoint.
    /// When `None` the endpoint is open to anyone who can reach it.
    pub task_reminder_secret: Option<String>,
    /// Telegram bot used to deliver task notifications
    pub telegram_bot_token: Option<String>,
    /// Delays and cap written into newly scheduled `TaskReminder`s
    pub reminder_policy: ReminderPolicy,
    /// How long a sweep may hold a `TaskReminder` before another sweep
    /// is allowed to pick it up again.
    pub reminder_claim_lease_millis: i64,
    /// Maximum number of due `TaskReminder`s handled by one sweep. The rest
    /// stay due and are picked up by the next sweep.
    pub reminder_sweep_batch_size: usize,
}

/// Longest delay accepted for reminder timings, one year
const MAX_REMINDER_MINUTES: i64 = 60 * 24 * 365;

fn parse_env<T>(name: &str, default: T, bounds: RangeInclusive<T>) -> T
where
    T: FromStr + Display + PartialOrd,
{
    parse_value(name, std::env::var(name).ok(), default, bounds)
}

fn parse_value<T>(name: &str, value: Option<String>, default: T, bounds: RangeInclusive<T>) -> T
where
    T: FromStr + Display + PartialOrd,
{
    let value = match value {
        Some(value) => value,
        None => return default,
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if bounds.contains(&parsed) => parsed,
        Ok(_) => {
            warn!(
                "The given {}: {} is outside of {}..={}, falling back to the default: {}.",
                name,
                value,
                bounds.start(),
                bounds.end(),
                default
            );
            default
        }
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn new() -> Self {
        let internal_api_key = match optional_env("INTERNAL_API_KEY") {
            Some(key) => key,
            None => {
                info!("Did not find INTERNAL_API_KEY environment variable. Going to create one.");
                let key = create_random_secret(30);
                info!("Internal api key was generated and set to: {}", key);
                key
            }
        };

        let task_reminder_secret = optional_env("TASK_REMINDER_SECRET");
        if task_reminder_secret.is_none() {
            warn!(
                "TASK_REMINDER_SECRET is not set. The reminder processing endpoint is OPEN and will \
                 accept requests from anyone. Set TASK_REMINDER_SECRET to protect it."
            );
        }

        let telegram_bot_token = optional_env("TELEGRAM_BOT_TOKEN");
        if telegram_bot_token.is_none() {
            warn!("TELEGRAM_BOT_TOKEN is not set. Task notifications will not be delivered.");
        }

        let defaults = ReminderPolicy::default();
        let reminder_policy = ReminderPolicy {
            first_reminder_delay_minutes: parse_env(
                "TASK_REMINDER_FIRST_DELAY_MINUTES",
                defaults.first_reminder_delay_minutes,
                0..=MAX_REMINDER_MINUTES,
            ),
            reminder_interval_minutes: parse_env(
                "TASK_REMINDER_INTERVAL_MINUTES",
                defaults.reminder_interval_minutes,
                1..=MAX_REMINDER_MINUTES,
            ),
            max_reminders: parse_env(
                "TASK_REMINDER_MAX_REMINDERS",
                defaults.max_reminders,
                i64::MIN..=i64::MAX,
            ),
        };

        Self {
            port: parse_env("PORT", 5000, 0..=65535),
            internal_api_key,
            task_reminder_secret,
            telegram_bot_token,
            reminder_policy,
            reminder_claim_lease_millis: parse_env(
                "TASK_REMINDER_CLAIM_LEASE_MILLIS",
                1000 * 60 * 5, // 5 minutes
                1..=1000 * 60 * 60 * 24,
            ),
            reminder_sweep_batch_size: parse_env("TASK_REMINDER_SWEEP_BATCH_SIZE", 500, 1..=10_000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

use std::cell::RefCell;
use std::env::VarError;
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::{NotifyError, Result};
use crate::git_ref;

pub const ENV_WEBHOOK: &str = "SLACK_WEBHOOK";
pub const ENV_MESSAGE: &str = "SLACK_MESSAGE";
pub const ENV_FALLBACK: &str = "SLACK_FALLBACK";
pub const ENV_ICON: &str = "SLACK_ICON";
pub const ENV_ICON_EMOJI: &str = "SLACK_ICON_EMOJI";
pub const ENV_CHANNEL: &str = "SLACK_CHANNEL";
pub const ENV_TITLE: &str = "SLACK_TITLE";
pub const ENV_COLOR: &str = "SLACK_COLOR";
pub const ENV_USERNAME: &str = "SLACK_USERNAME";
pub const ENV_PRETEXT: &str = "SLACK_PRETEXT";
pub const ENV_FOOTER: &str = "SLACK_FOOTER";
pub const ENV_UNFURL_LINKS: &str = "SLACK_UNFURL_LINKS";
pub const ENV_TIMEOUT: &str = "SLACK_TIMEOUT";
pub const ENV_ACTOR: &str = "GITHUB_ACTOR";
pub const ENV_CHANGELOG_URL: &str = "CHANGELOG_URL";
pub const ENV_RELEASES_URL: &str = "RELEASES_URL";
pub const ENV_VARIANTS: &str = "VARIANTS";
pub const ENV_REF: &str = "GITHUB_REF";

/// Build-context variables folded into the default fallback text, in order.
const DIAGNOSTIC_VARS: [&str; 6] = [
    "GITHUB_ACTION",
    ENV_ACTOR,
    "GITHUB_EVENT_NAME",
    ENV_REF,
    "GITHUB_REPOSITORY",
    "GITHUB_WORKFLOW",
];

const DEFAULT_COLOR: &str = "good";
const DEFAULT_ACTOR: &str = "N/A";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully resolved notification settings for one run.
#[derive(Clone)]
pub struct Config {
    pub webhook_url: String,
    pub message: String,
    pub fallback: String,
    pub icon_url: String,
    pub icon_emoji: String,
    pub channel: String,
    pub title: String,
    pub color: String,
    pub username: String,
    pub pretext: String,
    pub footer: String,
    pub unfurl_links: bool,
    /// `None` disables the request timeout.
    pub timeout: Option<Duration>,
    pub actor: String,
    pub changelog_url: String,
    pub releases_url: String,
    pub variants: String,
    pub built_from: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The webhook URL embeds the secret token.
        f.debug_struct("Config")
            .field("webhook_url", &"[REDACTED]")
            .field("message", &self.message)
            .field("fallback", &self.fallback)
            .field("icon_url", &self.icon_url)
            .field("icon_emoji", &self.icon_emoji)
            .field("channel", &self.channel)
            .field("title", &self.title)
            .field("color", &self.color)
            .field("username", &self.username)
            .field("pretext", &self.pretext)
            .field("footer", &self.footer)
            .field("unfurl_links", &self.unfurl_links)
            .field("timeout", &self.timeout)
            .field("actor", &self.actor)
            .field("changelog_url", &self.changelog_url)
            .field("releases_url", &self.releases_url)
            .field("variants", &self.variants)
            .field("built_from", &self.built_from)
            .finish()
    }
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_var_lookup(|name| std::env::var(name))
    }

    /// Like [`Config::from_lookup`], but rejects values that are not valid UTF-8
    /// instead of treating them as unset.
    pub fn from_var_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let not_unicode = RefCell::new(None);
        let resolved = Self::from_lookup(|name| match lookup(name) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                not_unicode
                    .borrow_mut()
                    .get_or_insert_with(|| name.to_string());
                None
            }
        });
        if let Some(name) = not_unicode.into_inner() {
            return Err(NotifyError::Configuration(format!(
                "{name} is not valid UTF-8"
            )));
        }
        resolved
    }

    /// Resolve configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated exactly like unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // "" counts as unset. Earlier releases sent set-but-empty values
        // as-is; CI runners expand absent inputs to "".
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let get_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());
        let get_or_empty = |name: &str| get_or(name, "");

        let webhook_url = get(ENV_WEBHOOK)
            .ok_or_else(|| NotifyError::Configuration("URL is required".into()))?;
        let message = get(ENV_MESSAGE)
            .ok_or_else(|| NotifyError::Configuration("Message is required".into()))?;

        let fallback = resolve_fallback(&get, &get_or_empty);

        let unfurl_links = match get(ENV_UNFURL_LINKS) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                NotifyError::Configuration(format!(
                    "{ENV_UNFURL_LINKS} must be true or false, got '{raw}'"
                ))
            })?,
            None => false,
        };

        let timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                NotifyError::Configuration(format!(
                    "{ENV_TIMEOUT} must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Config {
            webhook_url,
            message,
            fallback,
            icon_url: get_or_empty(ENV_ICON),
            icon_emoji: get_or_empty(ENV_ICON_EMOJI),
            channel: get_or_empty(ENV_CHANNEL),
            title: get_or_empty(ENV_TITLE),
            color: get_or(ENV_COLOR, DEFAULT_COLOR),
            username: get_or_empty(ENV_USERNAME),
            pretext: get_or_empty(ENV_PRETEXT),
            footer: get_or_empty(ENV_FOOTER),
            unfurl_links,
            timeout: timeout_from_secs(timeout_secs),
            actor: get_or(ENV_ACTOR, DEFAULT_ACTOR),
            changelog_url: get_or_empty(ENV_CHANGELOG_URL),
            releases_url: get_or_empty(ENV_RELEASES_URL),
            variants: get_or_empty(ENV_VARIANTS),
            built_from: git_ref::shorten(&get_or_empty(ENV_REF)),
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    /// Replace the request timeout; zero disables it.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = timeout_from_secs(secs);
        self
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Explicit override, then the message, then the build-context summary.
fn resolve_fallback(
    get: &dyn Fn(&str) -> Option<String>,
    get_or_empty: &dyn Fn(&str) -> String,
) -> String {
    get(ENV_FALLBACK)
        .or_else(|| get(ENV_MESSAGE))
        .unwrap_or_else(|| diagnostic_summary(get_or_empty))
}

fn diagnostic_summary(get: &dyn Fn(&str) -> String) -> String {
    DIAGNOSTIC_VARS
        .iter()
        .map(|&name| format!("{name}={}", get(name)))
        .collect::<Vec<_>>()
        .join(" \n ")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

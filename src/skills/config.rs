//! Skills configuration parsed from environment variables.
//!
//! Absence of the base URL or access key is not an error here: the
//! dispatcher reports it per call as `config_missing`, so the rest of the
//! application keeps running without a skills backend.

pub const DEFAULT_SKILLS_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SKILLS_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Path segment between the base URL and a skill's endpoint path.
pub const FUNCTIONS_PREFIX: &str = "functions/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillsTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for SkillsTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_SKILLS_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_SKILLS_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillsConfig {
    pub base_url: Option<String>,
    pub access_key: Option<String>,
    pub timeouts: SkillsTimeouts,
}

/// Base URL and key, both present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub base_url: &'a str,
    pub access_key: &'a str,
}

impl SkillsConfig {
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(Some(base_url.into())),
            access_key: non_blank(Some(access_key.into())),
            timeouts: SkillsTimeouts::default(),
        }
    }

    /// Build typed skills config from environment variables.
    ///
    /// - `SKILLS_BASE_URL` (fallback `SUPABASE_URL`): project base URL
    /// - `SKILLS_ACCESS_KEY` (fallback `SUPABASE_ANON_KEY`): bearer credential
    /// - `SKILLS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SKILLS_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SkillsConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = non_blank(lookup("SKILLS_BASE_URL")).or_else(|| lookup("SUPABASE_URL"));
        let access_key = non_blank(lookup("SKILLS_ACCESS_KEY")).or_else(|| lookup("SUPABASE_ANON_KEY"));
        let timeouts = SkillsTimeouts {
            request_secs: parse_or(lookup("SKILLS_REQUEST_TIMEOUT_SECS"), DEFAULT_SKILLS_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(lookup("SKILLS_CONNECT_TIMEOUT_SECS"), DEFAULT_SKILLS_CONNECT_TIMEOUT_SECS),
        };
        Self { base_url: normalize_base_url(base_url), access_key: non_blank(access_key), timeouts }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: SkillsTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// `Some` only when both the base URL and the access key are set.
    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint<'_>> {
        Some(Endpoint { base_url: self.base_url.as_deref()?, access_key: self.access_key.as_deref()? })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some()
    }

    /// Names of the missing values, for the `config_missing` message.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.is_none() {
            missing.push("base URL");
        }
        if self.access_key.is_none() {
            missing.push("access key");
        }
        missing
    }
}

impl Endpoint<'_> {
    /// `{base_url}/functions/v1/{endpoint_path}`.
    #[must_use]
    pub fn url_for(&self, endpoint_path: &str) -> String {
        format!("{}/{FUNCTIONS_PREFIX}/{}", self.base_url, endpoint_path.trim_start_matches('/'))
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_base_url(raw: Option<String>) -> Option<String> {
    non_blank(raw).map(|v| v.trim_end_matches('/').to_string()).filter(|v| !v.is_empty())
}

fn parse_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

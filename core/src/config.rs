//! Account credentials and endpoint selection.
//!
//! Values can be given directly or loaded from the environment:
//! - `FORMSITE_USER` (required)
//! - `FORMSITE_API_KEY` (required)
//! - `FORMSITE_SERVER` (optional, defaults to `fs7`)
//! - `FORMSITE_API_ROOT` (optional, replaces `https://{server}.formsite.com`)

use crate::error::ApiError;
use crate::http::path_segment;

/// Server shard hosting the account when none is configured.
pub const DEFAULT_SERVER: &str = "fs7";

pub const ENV_USER: &str = "FORMSITE_USER";
pub const ENV_API_KEY: &str = "FORMSITE_API_KEY";
pub const ENV_SERVER: &str = "FORMSITE_SERVER";
pub const ENV_API_ROOT: &str = "FORMSITE_API_ROOT";

/// Identity and location of a FormSite account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    api_key: String,
    server: String,
    api_root: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            api_key: api_key.into(),
            server: DEFAULT_SERVER.to_string(),
            api_root: None,
        }
    }

    /// Load credentials from `FORMSITE_*` environment variables.
    ///
    /// # Errors
    /// Returns `ApiError::MissingCredential` if the user or API key is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let user = non_empty(ENV_USER).ok_or(ApiError::MissingCredential(ENV_USER))?;
        let api_key = non_empty(ENV_API_KEY).ok_or(ApiError::MissingCredential(ENV_API_KEY))?;
        let mut creds = Self::new(user, api_key);
        if let Some(server) = non_empty(ENV_SERVER) {
            creds = creds.with_server(server);
        }
        if let Some(root) = non_empty(ENV_API_ROOT) {
            creds = creds.with_api_root(root);
        }
        Ok(creds)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Point requests at `root` (scheme and host) instead of the shard URL.
    pub fn with_api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = Some(root.into().trim_end_matches('/').to_string());
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Base URL for user-scoped endpoints, without a trailing slash. The user
    /// name is percent-encoded.
    pub fn base_url(&self) -> String {
        let root = match &self.api_root {
            Some(root) => root.clone(),
            None => format!("https://{}.formsite.com", self.server),
        };
        format!("{root}/api/users/{}", path_segment(&self.user))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("api_key", &"<redacted>")
            .field("server", &self.server)
            .field("api_root", &self.api_root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_base_url_uses_fixed_shard() {
        let creds = Credentials::new("bob", "key");
        assert_eq!(creds.server(), "fs7");
        assert_eq!(creds.base_url(), "https://fs7.formsite.com/api/users/bob");
    }

    #[test]
    fn server_override_changes_host() {
        let creds = Credentials::new("bob", "key").with_server("fs22");
        assert_eq!(creds.base_url(), "https://fs22.formsite.com/api/users/bob");
    }

    #[test]
    fn api_root_trailing_slash_is_stripped() {
        let creds = Credentials::new("bob", "key").with_api_root("http://127.0.0.1:3000/");
        assert_eq!(creds.base_url(), "http://127.0.0.1:3000/api/users/bob");
    }

    #[test]
    fn user_is_percent_encoded_in_base_url() {
        let creds = Credentials::new("jane doe", "key");
        assert_eq!(creds.base_url(), "https://fs7.formsite.com/api/users/jane%20doe");
    }

    #[test]
    fn debug_redacts_api_key() {
        let printed = format!("{:?}", Credentials::new("bob", "s3cret"));
        assert!(printed.contains("bob"));
        assert!(!printed.contains("s3cret"));
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let creds = Credentials::from_lookup(lookup(&[
            (ENV_USER, "alice"),
            (ENV_API_KEY, "k1"),
            (ENV_SERVER, "fs3"),
        ]))
        .unwrap();
        assert_eq!(creds.user(), "alice");
        assert_eq!(creds.api_key(), "k1");
        assert_eq!(creds.base_url(), "https://fs3.formsite.com/api/users/alice");
    }

    #[test]
    fn from_lookup_requires_user_and_key() {
        let err = Credentials::from_lookup(lookup(&[(ENV_API_KEY, "k1")])).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential(ENV_USER)));

        let err = Credentials::from_lookup(lookup(&[(ENV_USER, "alice"), (ENV_API_KEY, "  ")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential(ENV_API_KEY)));
    }

    #[test]
    fn from_lookup_honours_api_root() {
        let creds = Credentials::from_lookup(lookup(&[
            (ENV_USER, "alice"),
            (ENV_API_KEY, "k1"),
            (ENV_API_ROOT, "http://localhost:9999"),
        ]))
        .unwrap();
        assert_eq!(creds.base_url(), "http://localhost:9999/api/users/alice");
    }
}

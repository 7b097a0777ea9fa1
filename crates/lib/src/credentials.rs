//! Skills Bank API credentials: base URL and secret API key.

use serde::Serialize;
use std::fmt;

use crate::schema::FieldSpec;

/// Production Skills Bank API.
pub const DEFAULT_API_URL: &str = "https://skills-api.automators.work";
pub const DOCUMENTATION_URL: &str = "https://skills-api.automators.work/docs";

/// Resolved credentials, threaded explicitly into [`crate::client::SkillsBankClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_url: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Value of the Authorization header.
    pub fn authorization(&self) -> String {
        format!("ApiKey {}", self.api_key)
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, "")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Declarative credential type: the fields a host asks the user for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub documentation_url: &'static str,
    pub properties: Vec<FieldSpec>,
}

pub fn credential_descriptor() -> CredentialDescriptor {
    let mut api_url = FieldSpec::string("apiUrl", "API URL", "The base URL of the Skills Bank API");
    api_url.default = DEFAULT_API_URL.into();
    CredentialDescriptor {
        name: "skillsBankApi",
        display_name: "Skills Bank API",
        documentation_url: DOCUMENTATION_URL,
        properties: vec![
            api_url,
            FieldSpec::password(
                "apiKey",
                "API Key",
                "Your Skills Bank API key (generate from your profile)",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn debug_never_shows_key() {
        let c = Credentials::new("https://example.test", "sk-secret");
        let s = format!("{:?}", c);
        assert!(!s.contains("sk-secret"));
        assert!(s.contains("https://example.test"));
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let c = Credentials::new("https://example.test//", "k");
        assert_eq!(c.base_url(), "https://example.test");
        assert_eq!(c.authorization(), "ApiKey k");
    }

    #[test]
    fn descriptor_declares_url_and_secret_key() {
        let d = credential_descriptor();
        assert_eq!(d.properties.len(), 2);
        assert_eq!(d.properties[0].name, "apiUrl");
        assert_eq!(d.properties[0].default, DEFAULT_API_URL);
        assert_eq!(d.properties[1].name, "apiKey");
        assert_eq!(d.properties[1].kind, FieldKind::Password);
    }
}

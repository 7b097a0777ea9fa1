//! Skills Bank HTTP client (https://skills-api.automators.work by default).
//! Every request carries `Authorization: ApiKey <key>`; responses are returned as raw JSON.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde_json::Value;

use crate::credentials::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum SkillsBankError {
    #[error("skills bank request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success status; message follows the `<status> - <body>` shape.
    #[error("{status} - {body}")]
    Api { status: u16, body: String },
    #[error("invalid JSON in {field}: {source}")]
    InvalidInput {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("unknown operation {operation} for resource {resource}")]
    UnknownOperation { resource: String, operation: String },
    #[error("Skill {skill_id} is not in group {group_id}")]
    NotInGroup { skill_id: String, group_id: String },
}

/// Remote operations the dispatcher needs. Implemented by [`SkillsBankClient`]; tests substitute fakes.
#[async_trait]
pub trait SkillsApi: Send + Sync {
    /// POST /skills/{id}/run, or /skills/{id}/dry-run when `dry_run` is set.
    async fn run_skill(&self, skill_id: &str, input: &Value, dry_run: bool) -> Result<Value, SkillsBankError>;
    /// GET /skills/{id}
    async fn get_skill(&self, skill_id: &str) -> Result<Value, SkillsBankError>;
    /// GET /skills — public skills.
    async fn list_skills(&self) -> Result<Value, SkillsBankError>;
    /// GET /skills/mine — the caller's own skills, public and private.
    async fn list_my_skills(&self) -> Result<Value, SkillsBankError>;
    /// GET /skills/search?q=
    async fn search_skills(&self, query: &str) -> Result<Value, SkillsBankError>;
    /// GET /groups
    async fn list_groups(&self) -> Result<Value, SkillsBankError>;
    /// GET /groups/{id} — group detail including `skills`.
    async fn get_group(&self, group_id: &str) -> Result<Value, SkillsBankError>;
}

/// Client for the Skills Bank REST API.
#[derive(Clone)]
pub struct SkillsBankClient {
    base_url: String,
    authorization: String,
    client: reqwest::Client,
}

impl SkillsBankClient {
    pub fn new(credentials: &Credentials) -> Self {
        Self::with_client(credentials, reqwest::Client::new())
    }

    /// Use a preconfigured reqwest client (proxy, TLS roots). No timeout is set here.
    pub fn with_client(credentials: &Credentials, client: reqwest::Client) -> Self {
        Self {
            base_url: credentials.base_url().to_string(),
            authorization: credentials.authorization(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("skills bank: {} {}", method, url);
        self.client
            .request(method, &url)
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, SkillsBankError> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(SkillsBankError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(parse_body(body))
    }

    async fn get(&self, path: &str) -> Result<Value, SkillsBankError> {
        self.send(self.request(Method::GET, path)).await
    }
}

/// Empty body reads as null; a body that is not JSON is passed through as a string.
fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

/// Characters left as is in a query value; everything else is percent-encoded (space as `%20`).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `/skills/search?q=<query>` with the query percent-encoded.
pub fn search_path(query: &str) -> String {
    format!("/skills/search?q={}", utf8_percent_encode(query, QUERY_VALUE))
}

/// `/skills/{id}/run` or `/skills/{id}/dry-run`.
pub fn run_path(skill_id: &str, dry_run: bool) -> String {
    let mode = if dry_run { "dry-run" } else { "run" };
    format!("/skills/{}/{}", skill_id, mode)
}

#[async_trait]
impl SkillsApi for SkillsBankClient {
    async fn run_skill(&self, skill_id: &str, input: &Value, dry_run: bool) -> Result<Value, SkillsBankError> {
        let body = serde_json::json!({ "input": input });
        let req = self
            .request(Method::POST, &run_path(skill_id, dry_run))
            .json(&body);
        self.send(req).await
    }

    async fn get_skill(&self, skill_id: &str) -> Result<Value, SkillsBankError> {
        self.get(&format!("/skills/{}", skill_id)).await
    }

    async fn list_skills(&self) -> Result<Value, SkillsBankError> {
        self.get("/skills").await
    }

    async fn list_my_skills(&self) -> Result<Value, SkillsBankError> {
        self.get("/skills/mine").await
    }

    async fn search_skills(&self, query: &str) -> Result<Value, SkillsBankError> {
        self.get(&search_path(query)).await
    }

    async fn list_groups(&self) -> Result<Value, SkillsBankError> {
        self.get("/groups").await
    }

    async fn get_group(&self, group_id: &str) -> Result<Value, SkillsBankError> {
        self.get(&format!("/groups/{}", group_id)).await
    }
}

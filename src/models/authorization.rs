use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PERSONAL_ACCESS_TOKEN: &str = "personal access token";

/// One record of `GET /orgs/{org}/credential-authorizations`.
///
/// The record is kept as the raw JSON object so it can be written back out
/// unchanged, field order included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamlAuthorization(Value);

impl SamlAuthorization {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn credential_type(&self) -> Option<&str> {
        self.0.get("credential_type").and_then(Value::as_str)
    }

    pub fn is_personal_access_token(&self) -> bool {
        self.credential_type() == Some(PERSONAL_ACCESS_TOKEN)
    }
}

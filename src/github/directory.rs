use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Organization, SamlAuthorization};

/// The two GitHub collections an audit reads.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Organizations visible to the token (`GET /user/orgs`).
    async fn list_user_orgs(&self) -> Result<Vec<Organization>>;

    /// Every SAML credential authorization of `org`, any credential type.
    /// An org the token cannot see yields an empty list.
    async fn list_credential_authorizations(&self, org: &str) -> Result<Vec<SamlAuthorization>>;
}

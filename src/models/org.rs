use serde::{Deserialize, Serialize};

/// Entry of `GET /user/orgs`. Only the login is needed to address an org.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
}

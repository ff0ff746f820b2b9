use crate::error::{Error, Result};
use crate::github::OrgDirectory;
use crate::models::SamlAuthorization;
use crate::report::SamlReport;

pub struct SamlAudit<'a, D: OrgDirectory> {
    directory: &'a D,
}

impl<'a, D: OrgDirectory> SamlAudit<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Uses `explicit` when given, otherwise every org the token can see.
    pub async fn resolve_orgs(&self, explicit: &[String]) -> Result<Vec<String>> {
        if !explicit.is_empty() {
            return Ok(explicit.to_vec());
        }

        let orgs: Vec<String> = self
            .directory
            .list_user_orgs()
            .await?
            .into_iter()
            .map(|org| org.login)
            .collect();

        if orgs.is_empty() {
            return Err(Error::NoOrganizations);
        }
        Ok(orgs)
    }

    /// PAT authorizations of one org, in API order.
    pub async fn collect_pat_authorizations(&self, org: &str) -> Result<Vec<SamlAuthorization>> {
        let authorizations = self.directory.list_credential_authorizations(org).await?;
        Ok(filter_personal_access_tokens(authorizations))
    }

    /// Checks each org in turn; the first fatal error aborts the whole run.
    pub async fn run(&self, orgs: &[String]) -> Result<SamlReport> {
        let mut report = SamlReport::new();

        for org in orgs {
            println!("Getting SAML authorizations for PATs in org: {}", org);
            let authorizations = self.collect_pat_authorizations(org).await?;
            println!(
                "  Found {} SAML authorizations for PATs in org: {}",
                authorizations.len(),
                org
            );
            report.insert(org, authorizations);
            println!();
        }

        Ok(report)
    }
}

pub fn filter_personal_access_tokens(
    authorizations: Vec<SamlAuthorization>,
) -> Vec<SamlAuthorization> {
    authorizations
        .into_iter()
        .filter(SamlAuthorization::is_personal_access_token)
        .collect()
}

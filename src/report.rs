use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::models::SamlAuthorization;

/// PAT SAML authorizations grouped by organization, in the order the
/// organizations were checked. Organizations without records are never
/// stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamlReport {
    orgs: Vec<(String, Vec<SamlAuthorization>)>,
}

impl SamlReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the records of `org`, replacing any earlier list for it. Returns
    /// false, storing nothing, when the list is empty.
    pub fn insert(&mut self, org: &str, authorizations: Vec<SamlAuthorization>) -> bool {
        if authorizations.is_empty() {
            return false;
        }

        match self.orgs.iter_mut().find(|(name, _)| name == org) {
            Some((_, existing)) => *existing = authorizations,
            None => self.orgs.push((org.to_string(), authorizations)),
        }
        true
    }

    pub fn get(&self, org: &str) -> Option<&[SamlAuthorization]> {
        self.orgs
            .iter()
            .find(|(name, _)| name == org)
            .map(|(_, records)| records.as_slice())
    }

    pub fn orgs(&self) -> impl Iterator<Item = &str> {
        self.orgs.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.orgs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orgs.len()
    }

    pub fn total_authorizations(&self) -> usize {
        self.orgs.iter().map(|(_, records)| records.len()).sum()
    }

    /// JSON object keyed by org, indented with four spaces.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Writes the whole report to `path` in one go, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!("Wrote SAML authorizations for PATs to file: {}", path.display());
        Ok(())
    }
}

impl Serialize for SamlReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.orgs.len()))?;
        for (org, records) in &self.orgs {
            map.serialize_entry(org, records)?;
        }
        map.end()
    }
}

pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "github_orgs_saml_auths_{}.json",
        now.format("%Y-%m-%d_%H-%M-%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn pat(login: &str) -> SamlAuthorization {
        SamlAuthorization::new(json!({
            "login": login,
            "credential_type": "personal access token"
        }))
    }

    #[test]
    fn test_empty_lists_are_not_stored() {
        let mut report = SamlReport::new();
        assert!(!report.insert("globex", Vec::new()));
        assert!(report.insert("acme", vec![pat("octocat")]));

        assert_eq!(report.len(), 1);
        assert!(report.get("globex").is_none());
        assert_eq!(report.get("acme").map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_orgs_keep_insertion_order() {
        let mut report = SamlReport::new();
        report.insert("zeta", vec![pat("a")]);
        report.insert("alpha", vec![pat("b"), pat("c")]);

        assert_eq!(report.orgs().collect::<Vec<_>>(), ["zeta", "alpha"]);
        assert_eq!(report.total_authorizations(), 3);
    }

    #[test]
    fn test_repeated_org_replaces_records() {
        let mut report = SamlReport::new();
        report.insert("acme", vec![pat("first"), pat("second")]);
        report.insert("acme", vec![pat("third")]);

        assert_eq!(report.len(), 1);
        assert_eq!(report.get("acme"), Some(&[pat("third")][..]));
        assert_eq!(report.total_authorizations(), 1);
    }

    #[test]
    fn test_json_uses_four_space_indent() {
        let mut report = SamlReport::new();
        report.insert("acme", vec![pat("octocat")]);

        let text = String::from_utf8(report.to_json().unwrap()).unwrap();
        let expected = r#"{
    "acme": [
        {
            "login": "octocat",
            "credential_type": "personal access token"
        }
    ]
}"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_json_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut report = SamlReport::new();
        report.insert("acme", vec![pat("octocat")]);

        report.write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["acme"][0]["login"], "octocat");
    }

    #[test]
    fn test_default_output_path_has_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            default_output_path(now),
            PathBuf::from("github_orgs_saml_auths_2024-03-09_07-05-01.json")
        );
    }
}

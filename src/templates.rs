//! Query templates ("attack templates")
//!
//! Templates are static input data; the only operation on them is
//! substituting the target into the pattern.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the target identifier
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Risk level advertised by a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A named dork pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
    pub name: String,
    /// Query pattern containing the `{target}` placeholder
    #[serde(alias = "prompt")]
    pub pattern: String,
    pub category: String,
    #[serde(alias = "risk")]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub description: String,
}

impl QueryTemplate {
    pub fn new(
        name: &str,
        pattern: &str,
        category: &str,
        risk_level: RiskLevel,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            category: category.to_string(),
            risk_level,
            description: description.to_string(),
        }
    }

    /// Substitute every placeholder occurrence with the target
    pub fn render(&self, target: &str) -> String {
        self.pattern.replace(TARGET_PLACEHOLDER, target.trim())
    }
}

/// Built-in template catalog
pub fn default_templates() -> Vec<QueryTemplate> {
    use RiskLevel::*;

    vec![
        QueryTemplate::new(
            "Admin Panel Discovery",
            r#"intitle:"admin" inurl:(login|panel|dashboard) site:{target}"#,
            "Admin",
            High,
            "Attempts to find administrative login interfaces.",
        ),
        QueryTemplate::new(
            "Exposed Configuration",
            r#"intitle:"index of" (".env" | "config.php" | "settings.json") site:{target}"#,
            "Config",
            High,
            "Searches for environment files containing secrets.",
        ),
        QueryTemplate::new(
            "Exposed API Keys",
            r#"intext:"api_key" | intext:"apikey" | intext:"secret_key" | intext:"aws_access_key" | intext:"password" site:{target}"#,
            "Secrets",
            High,
            "Searches for hardcoded API keys, secrets, and cloud credentials.",
        ),
        QueryTemplate::new(
            "Firebase & Cloud Secrets",
            r#"inurl:firebaseio.com | "firebaseConfig" | "s3.amazonaws.com" | "digitaloceanspaces.com" site:{target}"#,
            "Cloud",
            High,
            "Finds exposed Firebase databases and cloud storage buckets.",
        ),
        QueryTemplate::new(
            "Public Git Folders",
            r#"intitle:"index of" ".git" site:{target}"#,
            "Config",
            High,
            "Finds exposed source control metadata.",
        ),
        QueryTemplate::new(
            "SQL Database Dumps",
            r#"ext:sql | ext:db | ext:sqlite "insert into" site:{target}"#,
            "Database",
            High,
            "Locates raw database export files.",
        ),
        QueryTemplate::new(
            "Subdomain Enumeration",
            "site:*.{target} -site:www.{target}",
            "Recon",
            Low,
            "Lists all subdomains indexed by search engines.",
        ),
        QueryTemplate::new(
            "Exposed Log Files",
            "ext:log intext:(password|error|fatal|exception) site:{target}",
            "Logs",
            Medium,
            "Finds application logs that may leak sensitive data.",
        ),
        QueryTemplate::new(
            "Backup & Old Files",
            "ext:bak | ext:old | ext:backup | ext:zip | ext:tar site:{target}",
            "Files",
            Medium,
            "Searches for forgotten backups of the site.",
        ),
        QueryTemplate::new(
            "Directory Listing",
            r#"intitle:"index of" site:{target}"#,
            "Recon",
            Medium,
            "Finds directories with auto-indexing enabled.",
        ),
        QueryTemplate::new(
            "PHP Info Leaks",
            r#"ext:php "phpinfo()" site:{target}"#,
            "Info",
            Medium,
            "Detects server configuration leak pages.",
        ),
    ]
}

//! Deployment settings: the one configuration surface shared by the CLI,
//! the orchestrator and the management-plane client.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Plan output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeploySettings {
    /// Controller base URL, e.g. `https://10.0.0.10`.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Request timeout for management-plane calls, seconds.
    pub timeout_secs: u64,
    /// Verify the controller's TLS certificate. Off by default; lab
    /// controllers ship self-signed certificates.
    pub verify_tls: bool,
    /// Compile and validate only, never commit.
    pub dry_run: bool,
    /// Operator abort window before the commit is sent, seconds.
    pub countdown_secs: u64,
    /// Print the serialized plan after the run.
    pub show_output: bool,
    /// Also write the serialized plan to this file.
    pub output_file: Option<PathBuf>,
    /// Persist the per-template audit records.
    pub audit_log: bool,
    /// Audit file path, overwritten every run.
    pub audit_file: PathBuf,
    /// Serialize the plan as XML instead of JSON.
    pub format: OutputFormat,
    /// Base directory for relative audit/output paths.
    pub working_dir: Option<PathBuf>,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            endpoint: "https://127.0.0.1".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            timeout_secs: 180,
            verify_tls: false,
            dry_run: false,
            countdown_secs: 5,
            show_output: false,
            output_file: None,
            audit_log: true,
            audit_file: PathBuf::from("logging.json"),
            format: OutputFormat::Json,
            working_dir: None,
        }
    }
}

impl DeploySettings {
    /// Resolve a possibly-relative artifact path against the working
    /// directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match (&self.working_dir, path.is_relative()) {
            (Some(base), true) => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_the_field_conventions() {
        let settings = DeploySettings::default();
        assert_eq!(settings.timeout_secs, 180);
        assert_eq!(settings.countdown_secs, 5);
        assert!(!settings.verify_tls);
        assert!(settings.audit_log);
        assert_eq!(settings.audit_file, PathBuf::from("logging.json"));
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: DeploySettings = serde_yaml::from_str(
            "endpoint: https://apic.example.net\nformat: xml\ncountdown_secs: 0\n",
        )
        .unwrap();
        assert_eq!(settings.endpoint, "https://apic.example.net");
        assert_eq!(settings.format, OutputFormat::Xml);
        assert_eq!(settings.countdown_secs, 0);
        assert_eq!(settings.timeout_secs, 180);
    }

    #[test]
    fn test_resolve_against_working_dir() {
        let mut settings = DeploySettings::default();
        settings.working_dir = Some(PathBuf::from("/var/lib/moplan"));
        assert_eq!(
            settings.resolve(Path::new("logging.json")),
            PathBuf::from("/var/lib/moplan/logging.json")
        );
        assert_eq!(
            settings.resolve(Path::new("/tmp/plan.json")),
            PathBuf::from("/tmp/plan.json")
        );
    }
}

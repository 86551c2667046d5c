//! Deployment orchestration: drives templates through the renderer and
//! dispatcher into one shared construction plan, then optionally commits
//! the plan to the controller and persists an audit trail.

pub mod countdown;

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::client::{ApicClient, ClientError, ManagementClient};
use crate::config::{DeploySettings, OutputFormat};
use crate::dispatch;
use crate::plan::ConstructionPlan;
use crate::render::{Renderer, VariableSet};

/// One audit entry per processed template, serialized as written to the
/// audit file.
#[derive(Debug, Clone, Serialize)]
pub struct DeployRecord {
    pub date: String,
    pub success: bool,
    pub log: Vec<String>,
    pub path: String,
    pub name: String,
}

impl DeployRecord {
    fn new(name: &str, path: &str, success: bool, log: Vec<String>) -> Self {
        Self {
            date: Local::now().format("%d.%m.%Y_%H.%M.%S").to_string(),
            success,
            log,
            path: path.to_string(),
            name: name.to_string(),
        }
    }
}

/// Runs the full deploy pipeline for a set of template files.
pub struct Orchestrator {
    settings: DeploySettings,
    renderer: Renderer,
}

impl Orchestrator {
    pub fn new(settings: DeploySettings) -> Self {
        Self {
            settings,
            renderer: Renderer::new(),
        }
    }

    /// Render, dispatch and (unless dry-run) commit the given templates.
    pub async fn deploy(
        &self,
        templates: &[PathBuf],
        variables: &VariableSet,
    ) -> Vec<DeployRecord> {
        self.run(templates, variables, !self.settings.dry_run).await
    }

    /// Same pipeline with the commit unconditionally disabled.
    pub async fn check(&self, templates: &[PathBuf], variables: &VariableSet) -> Vec<DeployRecord> {
        self.run(templates, variables, false).await
    }

    async fn run(
        &self,
        templates: &[PathBuf],
        variables: &VariableSet,
        commit: bool,
    ) -> Vec<DeployRecord> {
        let mut records = Vec::with_capacity(templates.len());

        if templates.is_empty() {
            warn!("no templates configured, nothing to deploy");
            records.push(DeployRecord::new(
                "deploy",
                "",
                false,
                vec!["[deploy] -> [ConfigError]: no templates configured.".to_string()],
            ));
        } else {
            let mut plan = ConstructionPlan::new();
            let mut last_pass_ok = false;

            for path in templates {
                let record = self.process(path, variables, &mut plan, &mut last_pass_ok);
                info!(
                    template = %record.name,
                    success = record.success,
                    "template processed"
                );
                records.push(record);
            }

            self.emit_plan(&plan).await;

            if commit && last_pass_ok {
                if let Err(err) = self.commit_plan(&plan).await {
                    error!("commit failed: {err}");
                }
            } else if commit {
                warn!("skipping commit, last template did not dispatch cleanly");
            }
        }

        if self.settings.audit_log {
            if let Err(err) = self.write_audit(&records).await {
                error!("cannot write audit log: {err}");
            }
        }

        records
    }

    fn process(
        &self,
        path: &Path,
        variables: &VariableSet,
        plan: &mut ConstructionPlan,
        last_pass_ok: &mut bool,
    ) -> DeployRecord {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let location = path.display().to_string();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                *last_pass_ok = false;
                return DeployRecord::new(
                    &name,
                    &location,
                    false,
                    vec![format!("[deploy] -> [IoError]: cannot read {location}: {err}.")],
                );
            }
        };

        let report = self.renderer.render(&name, &text, variables);
        let mut log = vec![report.log.clone()];

        let Some(document) = report.document else {
            *last_pass_ok = false;
            return DeployRecord::new(&name, &location, false, log);
        };

        let outcome = dispatch::dispatch(&document, plan);
        log.extend(outcome.entries.iter().map(|entry| entry.message.clone()));
        *last_pass_ok = outcome.success;

        DeployRecord::new(&name, &location, outcome.success, log)
    }

    fn serialized_plan(&self, plan: &ConstructionPlan) -> String {
        match self.settings.format {
            OutputFormat::Json => plan.to_json_pretty(),
            OutputFormat::Xml => plan.to_xml_pretty(),
        }
    }

    async fn emit_plan(&self, plan: &ConstructionPlan) {
        if !self.settings.show_output && self.settings.output_file.is_none() {
            return;
        }
        let rendered = self.serialized_plan(plan);
        if self.settings.show_output {
            println!("{rendered}");
        }
        if let Some(file) = &self.settings.output_file {
            let target = self.settings.resolve(file);
            if let Err(err) = tokio::fs::write(&target, rendered.as_bytes()).await {
                error!("cannot write plan to {}: {err}", target.display());
            }
        }
    }

    async fn commit_plan(&self, plan: &ConstructionPlan) -> Result<(), ClientError> {
        if !countdown::run(self.settings.countdown_secs).await {
            return Ok(());
        }

        let mut client = ApicClient::new(&self.settings)?;
        client.login().await?;
        let outcome = client.commit(&plan.to_value()).await;
        if let Err(err) = client.logout().await {
            warn!("logout failed: {err}");
        }
        if outcome.is_ok() {
            info!("plan committed to {}", self.settings.endpoint);
        }
        outcome
    }

    async fn write_audit(&self, records: &[DeployRecord]) -> Result<(), std::io::Error> {
        let target = self.settings.resolve(&self.settings.audit_file);
        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&target, body).await?;
        info!("audit log written to {}", target.display());
        Ok(())
    }
}

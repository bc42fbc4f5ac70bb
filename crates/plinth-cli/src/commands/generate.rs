//! Implementation of `plinth generate`.
//!
//! Resolves the project configuration (flags over config file), builds the
//! template batch, runs the scaffold service and reports per-file results.
//! No template logic lives here.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use plinth_adapters::{LocalFilesystem, PlaceholderRenderer};
use plinth_core::prelude::*;

use crate::{
    cli::GenerateArgs,
    commands::catalog::Catalog,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute `plinth generate`.
///
/// 1. Merge flags over the loaded config
/// 2. Optionally prompt for missing project values
/// 3. Build the [`ConfigurationContext`]; nothing is defaulted
/// 4. Select templates from the catalog
/// 5. Plan (`--dry-run`) or scaffold, then report
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let settings = Settings::resolve(args, config)?;
    debug!(
        root = %settings.root.display(),
        policy = %settings.policy,
        templates = settings.templates.len(),
        "generate settings resolved"
    );

    if settings.root.exists() && !settings.root.is_dir() {
        return Err(CliError::invalid_input(format!(
            "scaffold root '{}' is not a directory",
            settings.root.display()
        )));
    }

    let context = settings.context()?;

    let catalog = Catalog::load(settings.templates_dir.as_deref())?;
    let templates = catalog.select(&settings.templates)?;
    let total = templates.len();

    let service = ScaffoldService::new(
        Box::new(PlaceholderRenderer::new()),
        Box::new(LocalFilesystem::new(&settings.root)),
        settings.policy,
    );

    let summary = if settings.dry_run {
        let plan = service.plan(&context, templates)?;
        RunSummary::from_plan(&plan, &settings)
    } else {
        output.header(&format!(
            "Scaffolding {} into {}",
            context.project_name(),
            settings.root.display()
        ))?;
        let report = service.scaffold(&context, templates)?;
        info!(run_id = %report.run_id, "scaffold finished");
        RunSummary::from_report(&report, &settings)
    };

    summary.print(&output)?;

    match summary.failures.len() {
        0 => Ok(()),
        failed => Err(CliError::TemplatesFailed { failed, total }),
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Effective options for one run.
#[derive(Debug)]
struct Settings {
    root: PathBuf,
    policy: ConflictPolicy,
    templates_dir: Option<PathBuf>,
    templates: Vec<String>,
    dry_run: bool,
    project_name: Option<String>,
    repository: Option<String>,
    boilerplate: Option<String>,
    variables: Vec<(String, String)>,
}

impl Settings {
    fn resolve(args: GenerateArgs, config: AppConfig) -> CliResult<Self> {
        let project = config.project;

        let boilerplate = match (args.boilerplate, args.boilerplate_file) {
            (Some(text), _) => Some(text),
            (None, Some(file)) => Some(read_boilerplate(&file)?),
            (None, None) => match (project.boilerplate, project.boilerplate_file) {
                (Some(text), _) => Some(text),
                (None, Some(file)) => Some(read_boilerplate(&file)?),
                (None, None) => None,
            },
        };

        // Flags are applied after config, so a flag wins for the same key.
        let mut variables: Vec<(String, String)> = project.variables.into_iter().collect();
        variables.extend(args.vars);

        let mut settings = Self {
            root: args
                .root
                .or(config.scaffold.root)
                .unwrap_or_else(|| PathBuf::from(".")),
            policy: args
                .conflict
                .map(ConflictPolicy::from)
                .unwrap_or(config.scaffold.conflict_policy),
            templates_dir: args.templates_dir.or(config.scaffold.templates_dir),
            templates: args.templates,
            dry_run: args.dry_run,
            project_name: args.project_name.or(project.name),
            repository: args.repository.or(project.repository),
            boilerplate,
            variables,
        };

        if args.interactive {
            settings.prompt_missing()?;
        }

        Ok(settings)
    }

    /// Build the context. A value that is still missing here is reported,
    /// never invented.
    fn context(&self) -> CliResult<ConfigurationContext> {
        let mut builder = ConfigurationContext::builder().variables(self.variables.clone());
        if let Some(name) = &self.project_name {
            builder = builder.project_name(name);
        }
        if let Some(repo) = &self.repository {
            builder = builder.repository(repo);
        }
        if let Some(text) = &self.boilerplate {
            builder = builder.boilerplate(text);
        }
        builder.build().map_err(|e| CliError::Core(e.into()))
    }

    #[cfg(feature = "interactive")]
    fn prompt_missing(&mut self) -> CliResult<()> {
        use dialoguer::Input;

        if self.project_name.is_none() {
            let name: String = Input::new()
                .with_prompt("Project name")
                .interact_text()
                .map_err(|_| CliError::Cancelled)?;
            self.project_name = Some(name);
        }
        if self.repository.is_none() {
            let repo: String = Input::new()
                .with_prompt("Repository (module path)")
                .interact_text()
                .map_err(|_| CliError::Cancelled)?;
            self.repository = Some(repo);
        }
        if self.boilerplate.is_none() {
            let file: String = Input::new()
                .with_prompt("Boilerplate file (empty for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(|_| CliError::Cancelled)?;
            self.boilerplate = Some(if file.trim().is_empty() {
                String::new()
            } else {
                read_boilerplate(Path::new(file.trim()))?
            });
        }
        Ok(())
    }

    #[cfg(not(feature = "interactive"))]
    fn prompt_missing(&mut self) -> CliResult<()> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}

fn read_boilerplate(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .with_cli_context(|| format!("Failed to read boilerplate file '{}'", path.display()))
}

// ── Reporting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EntryView {
    template: String,
    path: String,
    outcome: &'static str,
}

#[derive(Debug, Serialize)]
struct FailureView {
    template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    kind: &'static str,
    message: String,
}

impl From<&TemplateFailure> for FailureView {
    fn from(f: &TemplateFailure) -> Self {
        Self {
            template: f.template.clone(),
            path: f.path.clone(),
            kind: f.kind().as_str(),
            message: f.error.to_string(),
        }
    }
}

/// Per-run document printed in `json` mode.
#[derive(Debug, Serialize)]
struct RunSummary {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    root: PathBuf,
    policy: ConflictPolicy,
    dry_run: bool,
    entries: Vec<EntryView>,
    failures: Vec<FailureView>,
}

impl RunSummary {
    fn from_report(report: &ScaffoldReport, settings: &Settings) -> Self {
        Self {
            run_id: report.run_id,
            generated_at: Utc::now(),
            root: settings.root.clone(),
            policy: report.policy,
            dry_run: false,
            entries: report
                .entries
                .iter()
                .map(|e| EntryView {
                    template: e.template.clone(),
                    path: e.path.to_string(),
                    outcome: outcome_label(e.outcome),
                })
                .collect(),
            failures: report.failures.iter().map(FailureView::from).collect(),
        }
    }

    fn from_plan(plan: &ScaffoldPlan, settings: &Settings) -> Self {
        Self {
            run_id: plan.run_id,
            generated_at: Utc::now(),
            root: settings.root.clone(),
            policy: settings.policy,
            dry_run: true,
            entries: plan
                .files
                .iter()
                .map(|p| EntryView {
                    template: p.template.clone(),
                    path: p.file.path().to_string(),
                    outcome: "planned",
                })
                .collect(),
            failures: plan.failures.iter().map(FailureView::from).collect(),
        }
    }

    fn print(&self, output: &OutputManager) -> CliResult<()> {
        if output.format() == crate::cli::OutputFormat::Json {
            output.json(self)?;
            return Ok(());
        }

        for entry in &self.entries {
            let line = format!("{:<11} {}  ({})", entry.outcome, entry.path, entry.template);
            match entry.outcome {
                "skipped" => output.info(&line)?,
                _ => output.success(&line)?,
            }
        }
        for failure in &self.failures {
            let location = failure
                .path
                .as_deref()
                .map(|p| format!(" ({p})"))
                .unwrap_or_default();
            output.error(&format!(
                "{}{}: [{}] {}",
                failure.template, location, failure.kind, failure.message
            ))?;
        }

        let verb = if self.dry_run { "would write" } else { "written" };
        let written = self
            .entries
            .iter()
            .filter(|e| e.outcome != "skipped")
            .count();
        output.print(&format!(
            "{written} {verb}, {} skipped, {} failed",
            self.entries.len() - written,
            self.failures.len()
        ))?;
        Ok(())
    }
}

fn outcome_label(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Created => "created",
        WriteOutcome::Overwritten => "overwritten",
        WriteOutcome::Skipped => "skipped",
    }
}

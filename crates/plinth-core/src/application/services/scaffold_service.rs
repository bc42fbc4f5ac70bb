//! Scaffold Service - the batch driver.
//!
//! This service coordinates one scaffold run:
//! 1. Inject mixins, run the defaulting hook, freeze (per template)
//! 2. Render (per template)
//! 3. Reject the whole batch if two templates resolve to the same path
//! 4. Write under the run's conflict policy (per template)
//!
//! A failure in steps 1, 2 or 4 is recorded against its template and the
//! batch carries on. Only step 3 aborts the run, before anything is written.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer},
        services::writer::{FileWriter, WriteOutcome},
    },
    domain::{
        ConfigurationContext, ConflictPolicy, DomainError, RenderedFile, ScaffoldPath, Template,
        TemplateBase,
    },
    error::{ErrorKind, PlinthError, PlinthResult},
};

/// One template that did not make it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFailure {
    /// Template name.
    pub template: String,
    /// Default path, when defaulting got far enough to produce one.
    pub path: Option<String>,
    pub error: PlinthError,
}

impl TemplateFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for TemplateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({}): {}", self.template, path, self.error),
            None => write!(f, "{}: {}", self.template, self.error),
        }
    }
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub template: String,
    pub file: RenderedFile,
}

/// Result of the defaulting and rendering phases (nothing written).
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub run_id: Uuid,
    pub files: Vec<PlannedFile>,
    pub failures: Vec<TemplateFailure>,
    /// Every path a template froze to, rendered or not, in registration order.
    claims: Vec<(ScaffoldPath, String)>,
}

/// One written or skipped file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub template: String,
    pub path: ScaffoldPath,
    pub outcome: WriteOutcome,
}

/// Outcome of a full scaffold run.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub run_id: Uuid,
    pub policy: ConflictPolicy,
    /// In registration order.
    pub entries: Vec<ReportEntry>,
    /// Render-phase failures, then write-phase failures, each in
    /// registration order. Empty means full success.
    pub failures: Vec<TemplateFailure>,
}

impl ScaffoldReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Paths that were created or overwritten.
    pub fn written(&self) -> impl Iterator<Item = &ScaffoldPath> {
        self.entries
            .iter()
            .filter(|e| e.outcome != WriteOutcome::Skipped)
            .map(|e| &e.path)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ScaffoldPath> {
        self.entries
            .iter()
            .filter(|e| e.outcome == WriteOutcome::Skipped)
            .map(|e| &e.path)
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    policy: ConflictPolicy,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters and policy.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = ScaffoldService::new(
    ///     Box::new(PlaceholderRenderer::new()),
    ///     Box::new(LocalFilesystem::new("./my-operator")),
    ///     ConflictPolicy::Error,
    /// );
    /// let report = service.scaffold(&context, builtin_templates::all_templates()?)?;
    /// ```
    pub fn new(
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        policy: ConflictPolicy,
    ) -> Self {
        Self {
            renderer,
            filesystem,
            policy,
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Default and render every template without writing.
    ///
    /// # Errors
    ///
    /// `DuplicatePath` if two templates claim the same path, including a
    /// template that froze but then failed to render.
    #[instrument(skip_all, fields(templates = templates.len()))]
    pub fn plan(
        &self,
        context: &ConfigurationContext,
        templates: Vec<Box<dyn Template>>,
    ) -> PlinthResult<ScaffoldPlan> {
        let plan = self.prepare_all(Uuid::new_v4(), context, templates);
        check_duplicates(&plan.claims)?;
        Ok(plan)
    }

    /// Run the full batch.
    ///
    /// # Errors
    ///
    /// Only `DuplicatePath`, and then nothing has been written. Every other
    /// failure is listed in [`ScaffoldReport::failures`].
    #[instrument(
        skip_all,
        fields(run_id = tracing::field::Empty, templates = templates.len(), policy = %self.policy)
    )]
    pub fn scaffold(
        &self,
        context: &ConfigurationContext,
        templates: Vec<Box<dyn Template>>,
    ) -> PlinthResult<ScaffoldReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));
        info!(project = context.project_name(), "Scaffold run started");

        let plan = self.prepare_all(run_id, context, templates);
        if let Err(e) = check_duplicates(&plan.claims) {
            warn!(error = %e, "Duplicate output path, nothing written");
            return Err(e.into());
        }

        let writer = FileWriter::new(self.filesystem.as_ref(), self.policy);
        let mut entries = Vec::with_capacity(plan.files.len());
        let mut failures = plan.failures;

        for planned in plan.files {
            match writer.write(&planned.file) {
                Ok(outcome) => entries.push(ReportEntry {
                    template: planned.template,
                    path: planned.file.path().clone(),
                    outcome,
                }),
                Err(error) => {
                    warn!(template = %planned.template, %error, "Write failed");
                    failures.push(TemplateFailure {
                        template: planned.template,
                        path: Some(planned.file.path().to_string()),
                        error,
                    });
                }
            }
        }

        info!(
            written = entries.iter().filter(|e| e.outcome != WriteOutcome::Skipped).count(),
            skipped = entries.iter().filter(|e| e.outcome == WriteOutcome::Skipped).count(),
            failed = failures.len(),
            "Scaffold run finished"
        );

        Ok(ScaffoldReport {
            run_id,
            policy: self.policy,
            entries,
            failures,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn prepare_all(
        &self,
        run_id: Uuid,
        context: &ConfigurationContext,
        templates: Vec<Box<dyn Template>>,
    ) -> ScaffoldPlan {
        let mut files = Vec::with_capacity(templates.len());
        let mut failures = Vec::new();
        let mut claims = Vec::with_capacity(templates.len());

        for mut template in templates {
            let name = template.name().to_string();
            match self.prepare(template.as_mut(), context) {
                Ok(file) => {
                    claims.push((file.path().clone(), name.clone()));
                    files.push(PlannedFile {
                        template: name,
                        file,
                    });
                }
                Err(failure) => {
                    warn!(template = %failure.template, error = %failure.error, "Template failed");
                    // Frozen templates keep their path claim when rendering fails.
                    let base = template.base();
                    if base.is_frozen() {
                        if let Ok(path) = ScaffoldPath::try_new(base.path()) {
                            claims.push((path, name));
                        }
                    }
                    failures.push(failure);
                }
            }
        }

        ScaffoldPlan {
            run_id,
            files,
            failures,
            claims,
        }
    }

    /// Inject -> default -> require -> freeze -> render for one template.
    fn prepare(
        &self,
        template: &mut dyn Template,
        context: &ConfigurationContext,
    ) -> Result<RenderedFile, TemplateFailure> {
        let name = template.name().to_string();
        let failure = |path: Option<String>, error: PlinthError| TemplateFailure {
            template: name.clone(),
            path,
            error,
        };

        template.base_mut().mixins_mut().inject(context);
        template
            .set_defaults()
            .map_err(|e| failure(known_path(template.base()), e.into()))?;

        let default_path = known_path(template.base());
        template
            .base()
            .mixins()
            .require_all(&name)
            .map_err(|e| failure(default_path.clone(), e.into()))?;

        let frozen = template
            .base_mut()
            .freeze(&name)
            .map_err(|e| failure(default_path.clone(), e.into()))?;

        let file = self
            .renderer
            .render(&frozen, context)
            .map_err(|e| failure(default_path.clone(), e))?;

        debug!(template = %name, path = %file.path(), bytes = file.len(), "Rendered");
        Ok(file)
    }
}

/// The path a failure is reported under, if one is set yet.
fn known_path(base: &TemplateBase) -> Option<String> {
    Some(base.path().to_string()).filter(|p| !p.is_empty())
}

/// Fail on the first path claimed by two templates.
fn check_duplicates(claims: &[(ScaffoldPath, String)]) -> Result<(), DomainError> {
    let mut seen: HashMap<&ScaffoldPath, &str> = HashMap::with_capacity(claims.len());
    for (path, template) in claims {
        if let Some(first) = seen.insert(path, template) {
            return Err(DomainError::DuplicatePath {
                path: path.to_string(),
                first: first.to_string(),
                second: template.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EntryKind;
    use crate::application::ports::output::{MockFilesystem, MockTemplateRenderer};
    use crate::domain::{Bindings, MixinSlot, StaticTemplate};

    fn context() -> ConfigurationContext {
        ConfigurationContext::builder()
            .project_name("demo")
            .repository("example.com/demo")
            .boilerplate("// header")
            .build()
            .unwrap()
    }

    fn template(name: &str, path: &str) -> Box<dyn Template> {
        Box::new(
            StaticTemplate::builder()
                .name(name)
                .slot(MixinSlot::ProjectName)
                .path(path)
                .body("{{ .ProjectName }}")
                .build()
                .unwrap(),
        )
    }

    /// Renderer mock that performs real substitution so assertions can see output.
    fn substituting_renderer() -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|frozen, ctx| {
            let body = Bindings::new(frozen.mixins(), ctx).render(frozen.name(), frozen.body())?;
            Ok(RenderedFile::new(frozen.path().clone(), body))
        });
        renderer
    }

    fn empty_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_entry().returning(|_| Ok(EntryKind::Missing));
        fs
    }

    #[test]
    fn writes_every_template_in_order() {
        let mut fs = empty_fs();
        fs.expect_write_atomic().times(2).returning(|_, _, _| Ok(()));

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Error,
        );
        let report = service
            .scaffold(&context(), vec![template("a", "a.txt"), template("b", "b/b.txt")])
            .unwrap();

        assert!(report.is_success());
        let paths: Vec<String> = report.written().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["a.txt", "b/b.txt"]);
    }

    #[test]
    fn unset_slot_fails_only_that_template() {
        let mut fs = empty_fs();
        fs.expect_write_atomic().times(2).returning(|_, _, _| Ok(()));

        let needs_owner: Box<dyn Template> = Box::new(
            StaticTemplate::builder()
                .name("owners")
                .slot(MixinSlot::Variable("Owner".into()))
                .path("OWNERS")
                .body("{{ .Owner }}")
                .build()
                .unwrap(),
        );

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Error,
        );
        let report = service
            .scaffold(
                &context(),
                vec![template("first", "1.txt"), needs_owner, template("third", "3.txt")],
            )
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].template, "owners");
        assert_eq!(report.failures[0].path.as_deref(), Some("OWNERS"));
        assert_eq!(report.failures[0].kind(), ErrorKind::Configuration);
    }

    #[test]
    fn failed_render_still_claims_its_path() {
        let mut fs = MockFilesystem::new();
        fs.expect_entry().never();
        fs.expect_write_atomic().never();

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Overwrite,
        );
        let broken: Box<dyn Template> = Box::new(
            StaticTemplate::builder()
                .name("broken")
                .path("test/e2e/e2e_test.go")
                .body("{{ .Missing }}")
                .build()
                .unwrap(),
        );
        let err = service
            .scaffold(&context(), vec![broken, template("e2e", "test/e2e/e2e_test.go")])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicatePath);
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn duplicate_paths_abort_before_any_write() {
        let mut fs = MockFilesystem::new();
        fs.expect_entry().never();
        fs.expect_write_atomic().never();

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Overwrite,
        );
        let err = service
            .scaffold(
                &context(),
                vec![
                    template("e2e", "test/e2e/e2e_test.go"),
                    template("e2e-again", "./test/e2e/e2e_test.go"),
                ],
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicatePath);
        assert!(err.to_string().contains("e2e-again"));
    }

    #[test]
    fn renderer_failure_is_recorded_with_default_path() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|frozen, _| {
            Err(DomainError::UnresolvedPlaceholder {
                template: frozen.name().to_string(),
                token: "Missing".into(),
            }
            .into())
        });
        let mut fs = MockFilesystem::new();
        fs.expect_write_atomic().never();

        let service = ScaffoldService::new(Box::new(renderer), Box::new(fs), ConflictPolicy::Skip);
        let report = service
            .scaffold(&context(), vec![template("e2e", "test/e2e/e2e_test.go")])
            .unwrap();

        assert!(!report.is_success());
        let failure = &report.failures[0];
        assert_eq!(failure.path.as_deref(), Some("test/e2e/e2e_test.go"));
        assert_eq!(failure.kind(), ErrorKind::UnresolvedPlaceholder);
        assert!(failure.to_string().starts_with("e2e (test/e2e/e2e_test.go)"));
    }

    #[test]
    fn escaping_path_is_a_path_failure() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_atomic().never();

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Overwrite,
        );
        let report = service
            .scaffold(&context(), vec![template("escape", "../outside.go")])
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind(), ErrorKind::Path);
    }

    #[test]
    fn plan_renders_without_touching_the_filesystem() {
        let mut fs = MockFilesystem::new();
        fs.expect_entry().never();
        fs.expect_write_atomic().never();

        let service = ScaffoldService::new(
            Box::new(substituting_renderer()),
            Box::new(fs),
            ConflictPolicy::Error,
        );
        let plan = service.plan(&context(), vec![template("a", "a.txt")]).unwrap();

        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].file.contents(), b"demo");
    }
}

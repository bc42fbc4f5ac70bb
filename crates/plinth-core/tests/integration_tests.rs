//! Integration tests for plinth-core.
//!
//! Drives `ScaffoldService` end to end against small stateful fakes of the
//! output ports, without any adapter crate.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use plinth_core::application::ApplicationError;
use plinth_core::prelude::*;

#[derive(Clone, Default)]
struct FakeFs {
    files: Arc<Mutex<BTreeMap<ScaffoldPath, Vec<u8>>>>,
    dirs: Arc<Mutex<Vec<ScaffoldPath>>>,
}

impl FakeFs {
    fn seed(&self, path: &str, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(ScaffoldPath::try_new(path).unwrap(), contents.as_bytes().to_vec());
    }

    fn seed_dir(&self, path: &str) {
        self.dirs
            .lock()
            .unwrap()
            .push(ScaffoldPath::try_new(path).unwrap());
    }

    fn read(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(&ScaffoldPath::try_new(path).unwrap())
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }
}

impl Filesystem for FakeFs {
    fn entry(&self, path: &ScaffoldPath) -> PlinthResult<EntryKind> {
        if self.dirs.lock().unwrap().contains(path) {
            return Ok(EntryKind::Directory);
        }
        Ok(if self.files.lock().unwrap().contains_key(path) {
            EntryKind::File
        } else {
            EntryKind::Missing
        })
    }

    fn write_atomic(&self, path: &ScaffoldPath, contents: &[u8], mode: WriteMode) -> PlinthResult<()> {
        let mut files = self.files.lock().unwrap();
        if mode == WriteMode::CreateNew && files.contains_key(path) {
            return Err(ApplicationError::FileExists {
                path: path.as_path().to_path_buf(),
            }
            .into());
        }
        files.insert(path.clone(), contents.to_vec());
        Ok(())
    }
}

/// Renders path and body with the domain bindings, like the real adapter.
struct BindingsRenderer;

impl TemplateRenderer for BindingsRenderer {
    fn render(&self, template: &FrozenTemplate, context: &ConfigurationContext) -> PlinthResult<RenderedFile> {
        let bindings = Bindings::new(template.mixins(), context);
        let path = bindings.render(template.name(), &template.path().to_string())?;
        let body = bindings.render(template.name(), template.body())?;
        Ok(RenderedFile::new(ScaffoldPath::try_new(path)?, body))
    }
}

fn context() -> ConfigurationContext {
    ConfigurationContext::builder()
        .project_name("memcached-operator")
        .repository("github.com/example/memcached-operator")
        .boilerplate("// Copyright 2024 The Authors.")
        .variable("Kind", "Memcached")
        .build()
        .unwrap()
}

fn main_go() -> Box<dyn Template> {
    Box::new(
        StaticTemplate::builder()
            .name("main")
            .slot(MixinSlot::Boilerplate)
            .slot(MixinSlot::Repository)
            .path("cmd/main.go")
            .body("{{ .Boilerplate }}\n\npackage main // {{ .Repo }}\n")
            .build()
            .unwrap(),
    )
}

fn controller() -> Box<dyn Template> {
    Box::new(
        StaticTemplate::builder()
            .name("controller")
            .slot(MixinSlot::Variable("Kind".into()))
            .path("internal/controller/{{ .Kind }}_controller.go")
            .body("type {{ .Kind }}Reconciler struct{}\n")
            .build()
            .unwrap(),
    )
}

fn service(fs: &FakeFs, policy: ConflictPolicy) -> ScaffoldService {
    ScaffoldService::new(Box::new(BindingsRenderer), Box::new(fs.clone()), policy)
}

#[test]
fn full_batch_writes_rendered_files() {
    let fs = FakeFs::default();
    let report = service(&fs, ConflictPolicy::Error)
        .scaffold(&context(), vec![main_go(), controller()])
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs.read("cmd/main.go").unwrap(),
        "// Copyright 2024 The Authors.\n\npackage main // github.com/example/memcached-operator\n"
    );
    assert_eq!(
        fs.read("internal/controller/Memcached_controller.go").unwrap(),
        "type MemcachedReconciler struct{}\n"
    );
}

#[test]
fn skip_policy_leaves_existing_file_byte_for_byte() {
    let fs = FakeFs::default();
    fs.seed("cmd/main.go", "hand edited");

    let report = service(&fs, ConflictPolicy::Skip)
        .scaffold(&context(), vec![main_go(), controller()])
        .unwrap();

    assert!(report.is_success());
    assert_eq!(fs.read("cmd/main.go").unwrap(), "hand edited");
    let skipped: Vec<String> = report.skipped().map(|p| p.to_string()).collect();
    assert_eq!(skipped, vec!["cmd/main.go"]);
}

#[test]
fn overwrite_policy_replaces_existing_file() {
    let fs = FakeFs::default();
    fs.seed("cmd/main.go", "hand edited");

    let report = service(&fs, ConflictPolicy::Overwrite)
        .scaffold(&context(), vec![main_go()])
        .unwrap();

    assert_eq!(report.entries[0].outcome, WriteOutcome::Overwritten);
    assert!(fs.read("cmd/main.go").unwrap().starts_with("// Copyright"));
}

#[test]
fn error_policy_fails_only_the_conflicting_template() {
    let fs = FakeFs::default();
    fs.seed("cmd/main.go", "hand edited");

    let report = service(&fs, ConflictPolicy::Error)
        .scaffold(&context(), vec![main_go(), controller()])
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind(), ErrorKind::FileExists);
    assert_eq!(fs.read("cmd/main.go").unwrap(), "hand edited");
    assert!(fs.read("internal/controller/Memcached_controller.go").is_some());
}

#[test]
fn directory_in_the_way_is_a_path_failure() {
    let fs = FakeFs::default();
    fs.seed_dir("cmd/main.go");

    let report = service(&fs, ConflictPolicy::Overwrite)
        .scaffold(&context(), vec![main_go()])
        .unwrap();

    assert_eq!(report.failures[0].kind(), ErrorKind::Path);
}

#[test]
fn rerun_with_skip_is_a_no_op() {
    let fs = FakeFs::default();
    service(&fs, ConflictPolicy::Error)
        .scaffold(&context(), vec![main_go(), controller()])
        .unwrap();
    let before = fs.files.lock().unwrap().clone();

    let report = service(&fs, ConflictPolicy::Skip)
        .scaffold(&context(), vec![main_go(), controller()])
        .unwrap();

    assert_eq!(report.written().count(), 0);
    assert_eq!(report.skipped().count(), 2);
    assert_eq!(*fs.files.lock().unwrap(), before);
}

#[test]
fn path_placeholder_that_escapes_is_rejected() {
    let fs = FakeFs::default();
    let ctx = ConfigurationContext::builder()
        .project_name("p")
        .repository("r")
        .boilerplate("")
        .variable("Kind", "../../etc")
        .build()
        .unwrap();

    let report = service(&fs, ConflictPolicy::Overwrite)
        .scaffold(&ctx, vec![controller()])
        .unwrap();

    assert_eq!(report.failures[0].kind(), ErrorKind::Path);
    assert!(fs.files.lock().unwrap().is_empty());
}

#[test]
fn failed_template_still_blocks_a_duplicate_path() {
    let fs = FakeFs::default();
    let broken: Box<dyn Template> = Box::new(
        StaticTemplate::builder()
            .name("a")
            .path("test/e2e/e2e_test.go")
            .body("{{ .Missing }}")
            .build()
            .unwrap(),
    );
    let fresh: Box<dyn Template> = Box::new(
        StaticTemplate::builder()
            .name("b")
            .path("test/e2e/e2e_test.go")
            .body("NEW")
            .build()
            .unwrap(),
    );

    let err = service(&fs, ConflictPolicy::Overwrite)
        .scaffold(&context(), vec![broken, fresh])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicatePath);
    assert!(fs.read("test/e2e/e2e_test.go").is_none());
}

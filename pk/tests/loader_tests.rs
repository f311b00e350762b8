//! Loader scenarios against real files

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use promptkit::{Loader, PathAliases, Prompt, PromptError, Variables};
use serial_test::serial;
use tempfile::TempDir;

/// Restores the working directory when dropped
struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().expect("Failed to read current dir");
        env::set_current_dir(dir).expect("Failed to change current dir");
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
#[serial]
fn test_alias_resolves_against_working_directory() {
    let workspace = TempDir::new().expect("Failed to create temp dir");
    let base = TempDir::new().expect("Failed to create temp dir");
    write(&workspace.path().join("prompts/refund/shop.md"), "Refund for {{customer}}");
    // A same-named file under the base path must not be picked up
    write(&base.path().join("prompts/refund/shop.md"), "wrong file");

    let _cwd = CwdGuard::enter(workspace.path());
    let aliases: PathAliases = [("refund", "prompts/refund")].into_iter().collect();
    let loader = Loader::new(aliases);

    assert_eq!(
        loader.resolve_path("@refund/shop.md", base.path()).unwrap(),
        PathBuf::from("prompts/refund/shop.md")
    );

    let text = loader.load("@refund/shop.md", base.path()).unwrap();
    let prompt = Prompt::new(text, Variables::new().with("customer", "Alice")).unwrap();
    assert_eq!(prompt.value(), "Refund for Alice");
}

#[test]
fn test_reference_without_extension_reads_md() {
    let base = TempDir::new().expect("Failed to create temp dir");
    write(&base.path().join("notes.md"), "No extension needed");

    let loader = Loader::default();
    assert_eq!(loader.resolve_path("notes", base.path()).unwrap(), base.path().join("notes.md"));
    assert_eq!(loader.load("notes", base.path()).unwrap(), "No extension needed");
}

#[test]
fn test_unknown_namespace() {
    let base = TempDir::new().expect("Failed to create temp dir");
    let err = Loader::default().load("@unknown/x.md", base.path()).unwrap_err();
    match err {
        PromptError::NamespaceUndefined { namespace } => assert_eq!(namespace, "@unknown"),
        other => panic!("expected NamespaceUndefined, got {other}"),
    }
}

#[test]
fn test_nested_directories() {
    let base = TempDir::new().expect("Failed to create temp dir");
    write(&base.path().join("test-prompts/nested/deep/nested.md"), "Nested content");

    let text = Loader::default().load("test-prompts/nested/deep/nested.md", base.path()).unwrap();
    assert_eq!(Prompt::from_template(text).unwrap().value(), "Nested content");
}

#[test]
fn test_missing_file_reports_path() {
    let base = TempDir::new().expect("Failed to create temp dir");
    let err = Loader::default().load("test-prompts/nonexistent", base.path()).unwrap_err();
    assert!(err.is_load_error());
    match err {
        PromptError::LoadFileRead { path, source } => {
            assert_eq!(path, base.path().join("test-prompts/nonexistent.md"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected LoadFileRead, got {other}"),
    }
}

#[test]
fn test_directory_is_a_read_error() {
    let base = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(base.path().join("folder.md")).unwrap();

    let err = Loader::default().load("folder.md", base.path()).unwrap_err();
    assert!(matches!(err, PromptError::LoadFileRead { .. }));
}

#[test]
fn test_loads_are_not_cached() {
    let base = TempDir::new().expect("Failed to create temp dir");
    let file = base.path().join("live.md");
    let loader = Loader::default();

    write(&file, "first");
    assert_eq!(loader.load("live", base.path()).unwrap(), "first");

    write(&file, "second");
    assert_eq!(loader.load("live", base.path()).unwrap(), "second");
}

#[test]
fn test_loaded_text_is_not_interpolated() {
    let base = TempDir::new().expect("Failed to create temp dir");
    write(&base.path().join("raw.md"), "User {{user}} has {{count}} items");

    let text = Loader::default().load("raw", base.path()).unwrap();
    assert_eq!(text, "User {{user}} has {{count}} items");

    let prompt = Prompt::new(text, Variables::new().with("user", "John").with("count", 5)).unwrap();
    assert_eq!(prompt.value(), "User John has 5 items");
}

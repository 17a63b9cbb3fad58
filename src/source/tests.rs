use std::fs;
use std::path::PathBuf;

use super::*;
use crate::test_fixtures::{
    CollectingSink, ScriptedRunner, StaticFetcher, build_zip, create_temp_dir, create_test_files,
    init_working_copy,
};

fn snapshot() -> Vec<u8> {
    build_zip(&[
        ("ARS-BZ-main/", ""),
        ("ARS-BZ-main/app/", ""),
        ("ARS-BZ-main/app/package.json", "{\"name\":\"ars\"}"),
    ])
}

/// Everything directly below `dir`, sorted
fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_archive_fallback_without_git() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::serving(snapshot());
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert_eq!(fetcher.urls(), vec![app.archive_url.clone()]);
    assert!(runner.commands().is_empty());
    assert!(temp.path().join("ARS-BZ/app/package.json").is_file());
    // Only the canonical directory remains: no archive, no extracted root
    assert_eq!(listing(temp.path()), vec!["ARS-BZ"]);
}

#[test]
fn test_archive_replaces_previous_install() {
    let temp = create_temp_dir();
    create_test_files(temp.path(), &[("ARS-BZ/app/stale.txt", "old")]);
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::serving(snapshot());
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert!(temp.path().join("ARS-BZ/app/package.json").is_file());
    assert!(!temp.path().join("ARS-BZ/app/stale.txt").exists());
    assert_eq!(listing(temp.path()), vec!["ARS-BZ"]);
}

#[test]
fn test_network_failure_is_fatal() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::failing();
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert!(outcome.is_fatal());
    assert!(listing(temp.path()).is_empty());
}

#[test]
fn test_corrupt_archive_is_fatal_and_cleaned_up() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::serving(b"definitely not a zip".to_vec());
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert!(outcome.is_fatal());
    assert!(listing(temp.path()).is_empty());
}

#[test]
fn test_archive_without_expected_root_is_fatal() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::serving(build_zip(&[("other-root/file.txt", "x")]));
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert!(matches!(
        outcome,
        StepOutcome::FatalFailure(ref r) if r.contains("ARS-BZ-main")
    ));
    assert!(!temp.path().join("ARS-BZ").exists());
    // Nothing from the rejected archive is left in the target
    assert!(listing(temp.path()).is_empty());
}

#[test]
fn test_archive_entries_outside_root_are_discarded() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new();
    let fetcher = StaticFetcher::serving(build_zip(&[
        ("ARS-BZ-main/app/package.json", "{}"),
        ("stray/notes.txt", "x"),
        ("README.md", "top level"),
    ]));
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert!(temp.path().join("ARS-BZ/app/package.json").is_file());
    assert_eq!(listing(temp.path()), vec!["ARS-BZ"]);
}

#[test]
fn test_clone_when_no_checkout_exists() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new().with_tools(["git"]);
    let fetcher = StaticFetcher::failing();
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert_eq!(
        runner.commands(),
        vec![format!(
            "git clone https://github.com/benny2744/ARS-BZ.git \"{}\"",
            temp.path().join("ARS-BZ").display()
        )]
    );
    // The archive route is never touched when git is available
    assert!(fetcher.urls().is_empty());
}

#[test]
fn test_pull_when_working_copy_exists() {
    let temp = create_temp_dir();
    let canonical = temp.path().join("ARS-BZ");
    init_working_copy(&canonical);
    let runner = ScriptedRunner::new().with_tools(["git"]);
    let fetcher = StaticFetcher::failing();
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert_eq!(
        runner.commands(),
        vec![format!("git -C \"{}\" pull origin main", canonical.display())]
    );
}

#[test]
fn test_non_git_directory_replaced_by_clone() {
    let temp = create_temp_dir();
    create_test_files(temp.path(), &[("ARS-BZ/app/from-archive.txt", "old")]);
    let staging: PathBuf = temp.path().join("ARS-BZ.staging");
    let staged = staging.clone();
    let runner = ScriptedRunner::new()
        .with_tools(["git"])
        .with_hook("git clone", move |_, _| {
            create_test_files(&staged, &[("app/cloned.txt", "new")]);
        });
    let fetcher = StaticFetcher::failing();
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert_eq!(outcome, StepOutcome::Success);
    assert_eq!(
        runner.commands(),
        vec![format!(
            "git clone https://github.com/benny2744/ARS-BZ.git \"{}\"",
            staging.display()
        )]
    );
    assert!(temp.path().join("ARS-BZ/app/cloned.txt").is_file());
    assert!(!temp.path().join("ARS-BZ/app/from-archive.txt").exists());
    assert!(!staging.exists());
}

#[test]
fn test_git_failure_is_fatal_with_stderr() {
    let temp = create_temp_dir();
    let runner = ScriptedRunner::new()
        .with_tools(["git"])
        .with_failure("git clone", "fatal: unable to access repository");
    let fetcher = StaticFetcher::failing();
    let sink = CollectingSink::default();
    let app = AppConfig::default();

    let outcome = SourceAcquirer::new(&runner, &fetcher, &sink, &app).acquire(temp.path());

    assert!(matches!(
        outcome,
        StepOutcome::FatalFailure(ref r) if r.contains("fatal: unable to access repository")
    ));
}

#[test]
fn test_is_working_copy() {
    let temp = create_temp_dir();
    assert!(!is_working_copy(temp.path()));
    init_working_copy(&temp.path().join("repo"));
    assert!(is_working_copy(&temp.path().join("repo")));
}

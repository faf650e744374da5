use std::error::Error;
use std::fs;

use tempfile::tempdir;
use watchrun::errors::WatchrunError;
use watchrun::watch::build_watch_profiles;
use watchrun_test_utils::builders::{ConfigFileBuilder, WatchConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn python_files_match_and_others_do_not() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("project"))?;

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            "python",
            WatchConfigBuilder::new()
                .root("project")
                .file("**/*.py")
                .task("test")
                .build(),
        )
        .with_task("test", "pytest")
        .build();

    let profiles = build_watch_profiles(dir.path(), &cfg)?;
    assert_eq!(profiles.len(), 1);

    let python = &profiles[0];
    assert_eq!(python.name(), "python");
    assert!(python.matches_rel("a.py"));
    assert!(python.matches_rel("pkg/deg.py"));
    assert!(!python.matches_rel("readme.md"));
    assert!(!python.matches_rel("pkg/data.csv"));

    Ok(())
}

#[test]
fn exclude_patterns_veto_matches() -> TestResult {
    let dir = tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            "python",
            WatchConfigBuilder::new()
                .file("**/*.py")
                .exclude("**/*_tmp.py")
                .task("test")
                .build(),
        )
        .with_task("test", "pytest")
        .build();

    let profiles = build_watch_profiles(dir.path(), &cfg)?;
    let python = &profiles[0];

    assert!(python.matches_rel("pkg/deg.py"));
    assert!(!python.matches_rel("pkg/deg_tmp.py"));

    Ok(())
}

#[test]
fn absolute_paths_relativize_against_the_watch_root() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("project"))?;

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            "python",
            WatchConfigBuilder::new()
                .root("project")
                .file("**/*.py")
                .task("test")
                .build(),
        )
        .with_task("test", "pytest")
        .build();

    let profiles = build_watch_profiles(dir.path(), &cfg)?;
    let python = &profiles[0];

    assert!(python.matches_path(&python.root().join("a.py")));
    // A sibling of the watch root is never a match, pattern or not.
    assert!(!python.matches_path(&dir.path().join("elsewhere/a.py")));

    Ok(())
}

#[test]
fn missing_watch_root_is_a_startup_error() -> TestResult {
    let dir = tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            "python",
            WatchConfigBuilder::new()
                .root("does-not-exist")
                .file("**/*.py")
                .task("test")
                .build(),
        )
        .with_task("test", "pytest")
        .build();

    match build_watch_profiles(dir.path(), &cfg) {
        Err(WatchrunError::MissingWatchRoot(path)) => {
            assert!(path.ends_with("does-not-exist"));
        }
        Err(e) => panic!("Expected MissingWatchRoot error, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }

    Ok(())
}

#[test]
fn each_group_matches_only_under_its_own_root() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::create_dir(dir.path().join("scripts"))?;

    let cfg = ConfigFileBuilder::new()
        .with_watch(
            "rust",
            WatchConfigBuilder::new()
                .root("src")
                .file("**/*.rs")
                .task("check")
                .build(),
        )
        .with_watch(
            "shell",
            WatchConfigBuilder::new()
                .root("scripts")
                .file("**/*.sh")
                .task("lint")
                .build(),
        )
        .with_task("check", "cargo check")
        .with_task("lint", "shellcheck scripts/*.sh")
        .build();

    let profiles = build_watch_profiles(dir.path(), &cfg)?;
    let rust = profiles.iter().find(|p| p.name() == "rust").unwrap();
    let shell = profiles.iter().find(|p| p.name() == "shell").unwrap();

    let rs_file = rust.root().join("main.rs");
    assert!(rust.matches_path(&rs_file));
    assert!(!shell.matches_path(&rs_file));

    let sh_file = shell.root().join("deploy.sh");
    assert!(shell.matches_path(&sh_file));
    assert!(!rust.matches_path(&sh_file));

    Ok(())
}

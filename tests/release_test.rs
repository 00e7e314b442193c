// tests/release_test.rs
mod common;

use std::fs;

use common::{ChartRepo, CHART_YAML, VALUES_YAML};
use helm_release::config::Config;
use helm_release::{run_release, Environment, HelmReleaseError, ReleaseOptions};
use semver::Version;

fn options(repo: &ChartRepo) -> ReleaseOptions {
    ReleaseOptions {
        chart_dir: repo.chart_dir(),
        silent: true,
        ..ReleaseOptions::default()
    }
}

fn tagged_repo() -> ChartRepo {
    let repo = ChartRepo::new();
    repo.commit("chore: initial chart");
    repo.tag("v1.2.0");
    repo
}

#[test]
fn test_feature_commit_bumps_minor() {
    let repo = tagged_repo();
    repo.commit_change("feat: add ingress template");

    let outcome = run_release(&options(&repo), &Config::default(), &Environment::default()).unwrap();

    assert_eq!(outcome.version, Version::new(1, 3, 0));
    assert_eq!(outcome.previous, Some(Version::new(1, 2, 0)));
    assert!(outcome.chart_updated);
    assert!(!outcome.values_updated);
    assert_eq!(
        repo.read("Chart.yaml"),
        CHART_YAML.replace("version: 1.2.0", "version: 1.3.0")
    );
    assert_eq!(repo.read("values.yaml"), VALUES_YAML);
}

#[test]
fn test_tag_is_written_to_values() {
    let repo = tagged_repo();
    repo.commit_change("fix: correct probe path");

    let opts = ReleaseOptions {
        tag: Some("myimg:2.0.1".to_string()),
        ..options(&repo)
    };
    let outcome = run_release(&opts, &Config::default(), &Environment::default()).unwrap();

    assert_eq!(outcome.version.to_string(), "1.2.1");
    assert!(outcome.values_updated);
    assert_eq!(
        repo.read("values.yaml"),
        VALUES_YAML.replace("  tag: \"\"", "  tag: \"myimg:2.0.1\"")
    );
}

#[test]
fn test_print_only_touches_nothing() {
    let repo = tagged_repo();
    repo.commit_change("feat!: rename values keys");

    let opts = ReleaseOptions {
        tag: Some("myimg:2.0.1".to_string()),
        print_only: true,
        ..options(&repo)
    };
    let outcome = run_release(&opts, &Config::default(), &Environment::default()).unwrap();

    assert_eq!(outcome.version, Version::new(2, 0, 0));
    assert!(!outcome.chart_updated);
    assert!(!outcome.values_updated);
    assert_eq!(repo.read("Chart.yaml"), CHART_YAML);
    assert_eq!(repo.read("values.yaml"), VALUES_YAML);
}

#[test]
fn test_untagged_repository_uses_baseline() {
    let repo = ChartRepo::new();
    repo.commit("feat: initial chart");
    repo.commit_change("feat!: breaking anyway");

    let outcome = run_release(&options(&repo), &Config::default(), &Environment::default()).unwrap();
    assert_eq!(outcome.version.to_string(), "0.1.0");
    assert_eq!(outcome.previous, None);
}

#[test]
fn test_repeated_resolution_is_stable() {
    let repo = tagged_repo();
    repo.commit_change("fix: one");

    let opts = ReleaseOptions {
        print_only: true,
        ..options(&repo)
    };
    let first = run_release(&opts, &Config::default(), &Environment::default()).unwrap();
    let second = run_release(&opts, &Config::default(), &Environment::default()).unwrap();
    assert_eq!(first.version, second.version);
}

#[test]
fn test_annotated_tags_and_feature_branch() {
    let repo = ChartRepo::new();
    repo.commit("chore: initial chart");
    repo.annotated_tag("v1.2.0");
    repo.checkout_branch("feature/Login-Page");
    repo.commit_change("feat: login page");
    repo.commit_change("fix: login typo");

    let opts = ReleaseOptions {
        print_only: true,
        ..options(&repo)
    };
    let outcome = run_release(&opts, &Config::default(), &Environment::default()).unwrap();
    assert_eq!(outcome.version.to_string(), "1.3.0-feature-login-page.2");

    let env = Environment {
        prerelease: Some("rc.1".to_string()),
        build: Some("build.7".to_string()),
        ..Environment::default()
    };
    let outcome = run_release(&opts, &Config::default(), &env).unwrap();
    assert_eq!(outcome.version.to_string(), "1.3.0-rc.1+build.7");
}

#[test]
fn test_custom_tag_path_from_config() {
    let repo = tagged_repo();
    repo.write(
        "charts/demo/values.yaml",
        "app:\n  image:\n    tag: 0.0.1 # pinned\n",
    );
    repo.commit("fix: move image settings");

    let mut config = Config::default();
    config.values.tag_path = "app.image.tag".to_string();
    let opts = ReleaseOptions {
        tag: Some("2.0.1".to_string()),
        ..options(&repo)
    };
    run_release(&opts, &config, &Environment::default()).unwrap();
    assert_eq!(repo.read("values.yaml"), "app:\n  image:\n    tag: 2.0.1 # pinned\n");

    // an explicit path wins over the configured one
    let opts = ReleaseOptions {
        tag: Some("2.0.2".to_string()),
        tag_path: Some("image.tag".to_string()),
        ..options(&repo)
    };
    let err = run_release(&opts, &config, &Environment::default()).unwrap_err();
    assert!(matches!(err, HelmReleaseError::FieldNotFound { .. }));
}

#[test]
fn test_missing_tag_field_keeps_descriptor_change() {
    let repo = tagged_repo();
    repo.commit_change("fix: x");

    let opts = ReleaseOptions {
        tag: Some("1.0".to_string()),
        tag_path: Some("image.digest".to_string()),
        ..options(&repo)
    };
    let err = run_release(&opts, &Config::default(), &Environment::default()).unwrap_err();

    assert!(matches!(err, HelmReleaseError::FieldNotFound { .. }));
    assert!(repo.read("Chart.yaml").contains("version: 1.2.1"));
    assert_eq!(repo.read("values.yaml"), VALUES_YAML);
}

#[test]
fn test_directory_outside_git() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("Chart.yaml"), CHART_YAML).unwrap();
    if git2::Repository::discover(dir.path()).is_ok() {
        // the temp dir sits inside a repository on this machine
        return;
    }

    let opts = ReleaseOptions {
        chart_dir: dir.path().to_path_buf(),
        silent: true,
        ..ReleaseOptions::default()
    };
    let err = run_release(&opts, &Config::default(), &Environment::default()).unwrap_err();
    assert!(matches!(err, HelmReleaseError::NotAVersionedTree { .. }));
    assert_eq!(fs::read_to_string(dir.path().join("Chart.yaml")).unwrap(), CHART_YAML);
}

#[test]
fn test_missing_chart_is_not_found() {
    let repo = ChartRepo::new();
    let opts = ReleaseOptions {
        chart_dir: repo.dir.path().join("charts").join("other"),
        silent: true,
        ..ReleaseOptions::default()
    };
    let err = run_release(&opts, &Config::default(), &Environment::default()).unwrap_err();
    assert!(matches!(err, HelmReleaseError::NotFound { .. }));
}

#[test]
fn test_invalid_baseline_leaves_files_untouched() {
    let repo = ChartRepo::new();
    repo.commit("chore: initial chart");

    let mut config = Config::default();
    config.release.baseline = "first".to_string();
    let err = run_release(&options(&repo), &config, &Environment::default()).unwrap_err();

    assert!(matches!(err, HelmReleaseError::UnresolvableVersion(_)));
    assert_eq!(repo.read("Chart.yaml"), CHART_YAML);
}

#[test]
fn test_only_malformed_tags_are_unresolvable() {
    let repo = ChartRepo::new();
    repo.commit("chore: initial chart");
    repo.tag("v2.1");
    repo.commit_change("fix: x");

    let err = run_release(&options(&repo), &Config::default(), &Environment::default()).unwrap_err();

    match err {
        HelmReleaseError::UnresolvableVersion(msg) => assert!(msg.contains("v2.1"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.read("Chart.yaml"), CHART_YAML);
    assert_eq!(repo.read("values.yaml"), VALUES_YAML);
}

#[test]
fn test_tag_path_is_ignored_without_tag() {
    let repo = tagged_repo();
    repo.commit_change("fix: x");

    let mut config = Config::default();
    config.values.tag_path = "image..tag".to_string();
    let opts = ReleaseOptions {
        tag_path: Some("a..b".to_string()),
        ..options(&repo)
    };
    let outcome = run_release(&opts, &config, &Environment::default()).unwrap();
    assert_eq!(outcome.version.to_string(), "1.2.1");

    let opts = ReleaseOptions {
        tag: Some("1.0".to_string()),
        ..opts
    };
    let err = run_release(&opts, &config, &Environment::default()).unwrap_err();
    assert!(matches!(err, HelmReleaseError::Config(_)));
}

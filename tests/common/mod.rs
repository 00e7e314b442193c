//! Throwaway git repositories holding a chart
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

pub const CHART_YAML: &str = "\
apiVersion: v2
name: demo
description: A Helm chart for Kubernetes

# This is the chart version.
version: 1.2.0

appVersion: \"1.16.0\"
";

pub const VALUES_YAML: &str = "\
# Default values for demo.
replicaCount: 1

image:
  repository: nginx
  pullPolicy: IfNotPresent
  # Overrides the image tag whose default is the chart appVersion.
  tag: \"\"

service:
  type: ClusterIP
  port: 80
";

pub struct ChartRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl ChartRepo {
    /// A repository on branch `main` with the chart under `charts/demo`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &options).unwrap();

        let chart = dir.path().join("charts").join("demo");
        fs::create_dir_all(&chart).unwrap();
        fs::write(chart.join("Chart.yaml"), CHART_YAML).unwrap();
        fs::write(chart.join("values.yaml"), VALUES_YAML).unwrap();

        ChartRepo { dir, repo }
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.dir.path().join("charts").join("demo")
    }

    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.chart_dir().join(file)).unwrap()
    }

    /// Write a file relative to the repository root
    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// Stage everything and commit on top of HEAD
    pub fn commit(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Commit a change to an unrelated file
    pub fn commit_change(&self, message: &str) -> Oid {
        self.write(format!("notes/{}.txt", self.commit_count()), message);
        self.commit(message)
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().unwrap();
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }

    pub fn tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
    }

    pub fn annotated_tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        self.repo
            .tag(name, head.as_object(), &sig, "release", false)
            .unwrap();
    }

    /// Create `name` at HEAD and check it out
    pub fn checkout_branch(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(name, &head, false).unwrap();
        self.repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    }
}

//! Release history inspection
//!
//! Walks the commits reachable from HEAD to find the nearest release tag and
//! classifies what changed since. The result is an immutable [VersionFacts]
//! snapshot; everything after this point is pure.

use std::collections::HashMap;
use std::path::Path;

use git2::Oid;
use semver::Version;

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::domain::{ChangeKind, ReleaseTag, TagConvention, TagMatch};
use crate::error::Result;
use crate::git::{Git2Repository, Repository};

/// What history says about the next release
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VersionFacts {
    /// Nearest release tag reachable from HEAD
    pub last_release: Option<ReleaseTag>,
    /// Tags shaped like the convention that are not releases
    /// (malformed or pre-release)
    pub skipped_tags: Vec<String>,
    /// Number of commits since `last_release` (or since the root)
    pub commits_since: usize,
    /// Highest severity of those commits
    pub change: ChangeKind,
    /// Tracked files differ from HEAD
    pub dirty: bool,
    /// Checked out branch, `None` when detached
    pub branch: Option<String>,
    /// Abbreviated HEAD commit id
    pub head: Option<String>,
    /// Non-fatal findings made while reading history
    pub warnings: Vec<BoundaryWarning>,
}

/// Reads release facts out of a repository
pub struct HistoryInspector {
    convention: TagConvention,
    analyzer: VersionAnalyzer,
}

impl HistoryInspector {
    pub fn new(convention: TagConvention, analyzer: VersionAnalyzer) -> Self {
        HistoryInspector {
            convention,
            analyzer,
        }
    }

    /// Inspect the git repository enclosing `dir`
    pub fn inspect_dir(&self, dir: &Path) -> Result<VersionFacts> {
        let repo = Git2Repository::open(dir)?;
        self.inspect(&repo)
    }

    /// Inspect any [Repository] implementation
    pub fn inspect<R: Repository>(&self, repo: &R) -> Result<VersionFacts> {
        let mut facts = VersionFacts {
            branch: repo.current_branch()?,
            dirty: repo.is_dirty()?,
            ..VersionFacts::default()
        };

        if facts.dirty {
            facts.warnings.push(BoundaryWarning::DirtyWorkingTree);
        }

        let head = match repo.head_oid()? {
            Some(head) => head,
            None => {
                tracing::debug!("repository has no commits yet");
                return Ok(facts);
            }
        };
        let head_hash = head.to_string();
        facts.head = Some(head_hash[..7.min(head_hash.len())].to_string());

        let releases = self.release_tags(repo, &mut facts)?;

        let mut nearest: Option<(Oid, ReleaseTag)> = None;
        for oid in repo.ancestors(head)? {
            if let Some(tags) = releases.get(&oid) {
                if let Some(tag) = tags.iter().max_by(|a, b| a.version.cmp(&b.version)) {
                    nearest = Some((oid, tag.clone()));
                    break;
                }
            }
        }

        let commits = repo.commits_between(nearest.as_ref().map(|(oid, _)| *oid), head)?;
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        facts.commits_since = commits.len();
        facts.change = self.analyzer.analyze_messages(&messages);

        if let Some((_, tag)) = &nearest {
            if commits.is_empty() {
                facts.warnings.push(BoundaryWarning::NoNewCommits {
                    latest_tag: tag.name.clone(),
                    current_commit_hash: head_hash.clone(),
                });
            }
            tracing::debug!(
                tag = %tag.name,
                commits = facts.commits_since,
                change = %facts.change,
                "found last release"
            );
        } else {
            tracing::debug!(commits = facts.commits_since, "no release tag reachable from HEAD");
        }

        facts.last_release = nearest.map(|(_, tag)| tag);
        Ok(facts)
    }

    /// Release tags grouped by the commit they point at
    fn release_tags<R: Repository>(
        &self,
        repo: &R,
        facts: &mut VersionFacts,
    ) -> Result<HashMap<Oid, Vec<ReleaseTag>>> {
        let mut releases: HashMap<Oid, Vec<ReleaseTag>> = HashMap::new();

        for (name, oid) in repo.tags()? {
            match self.convention.classify(&name) {
                Some(TagMatch::Release(version)) => {
                    releases
                        .entry(oid)
                        .or_default()
                        .push(ReleaseTag::new(name, version));
                }
                Some(TagMatch::Prerelease(version)) => {
                    tracing::debug!(tag = %name, %version, "ignoring pre-release tag");
                    facts.skipped_tags.push(name);
                }
                Some(TagMatch::Malformed { reason }) => {
                    facts.skipped_tags.push(name.clone());
                    facts
                        .warnings
                        .push(BoundaryWarning::UnparsableTag { tag: name, reason });
                }
                None => {}
            }
        }

        Ok(releases)
    }
}

impl Default for HistoryInspector {
    fn default() -> Self {
        HistoryInspector::new(TagConvention::default(), VersionAnalyzer::default())
    }
}

impl VersionFacts {
    /// Version of the last release, if any
    pub fn last_version(&self) -> Option<&Version> {
        self.last_release.as_ref().map(|tag| &tag.version)
    }
}

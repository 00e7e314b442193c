use crate::error::{HelmReleaseError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the git repository enclosing `path`
    ///
    /// Fails with [HelmReleaseError::NotAVersionedTree] when no repository is
    /// found in `path` or any of its parents.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| HelmReleaseError::NotAVersionedTree {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn walk_from(&self, head: Oid) -> Result<git2::Revwalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;
        Ok(revwalk)
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(|s| s.to_string()))
    }

    fn tags(&self) -> Result<Vec<(String, Oid)>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = match self.repo.find_reference(&format!("refs/tags/{}", name)) {
                Ok(reference) => reference,
                Err(_) => continue,
            };
            // Annotated tags peel through the tag object to the commit
            if let Ok(commit) = reference.peel_to_commit() {
                tags.push((name.to_string(), commit.id()));
            }
        }

        Ok(tags)
    }

    fn ancestors(&self, head: Oid) -> Result<Vec<Oid>> {
        let mut oids = Vec::new();
        for oid in self.walk_from(head)? {
            oids.push(oid?);
        }
        Ok(oids)
    }

    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.walk_from(to_oid)?;
        if let Some(from_oid) = from_oid {
            revwalk.hide(from_oid)?;
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let message = commit.message().unwrap_or("(empty message)").to_string();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message,
            });
        }

        commits.reverse();
        Ok(commits)
    }

    fn is_dirty(&self) -> Result<bool> {
        if self.repo.is_bare() {
            return Ok(false);
        }
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}

use crate::error::Result;
use crate::git::{CommitInfo, Repository};
use git2::Oid;

/// Mock repository with a linear history, for testing without git
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    /// Oldest first; the last commit is HEAD
    commits: Vec<(Oid, CommitInfo)>,
    tags: Vec<(String, Oid)>,
    branch: Option<String>,
    dirty: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository::default()
    }

    /// Append a commit on top of HEAD and return its id
    pub fn commit(&mut self, message: impl Into<String>) -> Oid {
        let index = self.commits.len() as u32 + 1;
        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&index.to_be_bytes());
        let oid = Oid::from_bytes(&bytes).expect("20 bytes make an oid");

        self.commits.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.into(),
            },
        ));
        oid
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push((name.into(), oid));
    }

    /// Tag the current HEAD
    pub fn tag_head(&mut self, name: impl Into<String>) {
        if let Some((oid, _)) = self.commits.last() {
            let oid = *oid;
            self.add_tag(name, oid);
        }
    }

    /// Set the checked out branch
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = Some(branch.into());
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    fn position(&self, oid: Oid) -> Option<usize> {
        self.commits.iter().position(|(id, _)| *id == oid)
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Option<Oid>> {
        Ok(self.commits.last().map(|(oid, _)| *oid))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn tags(&self) -> Result<Vec<(String, Oid)>> {
        Ok(self.tags.clone())
    }

    fn ancestors(&self, head: Oid) -> Result<Vec<Oid>> {
        let end = self.position(head).map(|i| i + 1).unwrap_or(0);
        Ok(self.commits[..end].iter().rev().map(|(oid, _)| *oid).collect())
    }

    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let end = self.position(to_oid).map(|i| i + 1).unwrap_or(0);
        let start = from_oid
            .and_then(|oid| self.position(oid))
            .map(|i| i + 1)
            .unwrap_or(0)
            .min(end);
        Ok(self.commits[start..end]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }
}

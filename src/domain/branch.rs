/// Represents a git branch with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_release: bool,
}

impl BranchContext {
    /// Create a new branch context
    ///
    /// `refs/heads/` and `origin/` style prefixes are stripped before the name is
    /// compared against the release branches.
    pub fn new<S: AsRef<str>>(name: impl Into<String>, release_branches: &[S]) -> Self {
        let raw = name.into();
        let name_str = raw
            .strip_prefix("refs/heads/")
            .or_else(|| raw.strip_prefix("origin/"))
            .unwrap_or(&raw)
            .to_string();
        let is_release = release_branches.iter().any(|b| b.as_ref() == name_str);

        BranchContext {
            name: name_str,
            is_release,
        }
    }

    /// Check if builds of this branch produce plain releases
    pub fn is_release_branch(&self) -> bool {
        self.is_release
    }
}

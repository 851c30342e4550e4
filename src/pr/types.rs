/// Metadata and raw diff of a pull request, as returned by the source-control
/// collaborator. Owned by the single review that fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    /// PR title
    pub title: String,
    /// PR description, empty when the author left none
    pub body: String,
    /// Name of the branch the PR merges from (e.g. "feat/PAB-2197-fix-bug")
    pub head_branch: String,
    /// Unified diff of the whole PR
    pub diff: String,
}

/// An `owner/repo` pair identifying a repository on the source-control host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Parse `owner/repo`. Both halves must be non-empty and contain no
    /// further slashes.
    pub fn parse(value: &str) -> Option<Repository> {
        let (owner, name) = value.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Repository {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

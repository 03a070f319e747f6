//! Repository acquisition
//!
//! Clones the remote into a fresh working copy, or fast-forwards an
//! existing one to the remote's current state.

use git2::build::CheckoutBuilder;
use git2::Repository;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot derive a repository name from '{0}'")]
    InvalidUrl(String),

    #[error("failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to update existing working copy at {}", path.display())]
    Update {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("working copy at {} has diverged from origin/{branch}", path.display())]
    Diverged { path: PathBuf, branch: String },
}

/// Something that leaves a working tree at `dest` reflecting `url`.
pub trait RepositorySource {
    fn acquire(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Acquisition through libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitSource;

impl RepositorySource for GitSource {
    fn acquire(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        if dest.exists() {
            info!("Repository already exists at {}. Pulling latest changes.", dest.display());
            match update(dest) {
                Ok(None) => Ok(()),
                Ok(Some(branch)) => Err(FetchError::Diverged { path: dest.to_path_buf(), branch }),
                Err(source) => Err(FetchError::Update { path: dest.to_path_buf(), source }),
            }
        } else {
            info!("Cloning repository to: {}", dest.display());
            Repository::clone(url, dest)
                .map(drop)
                .map_err(|source| FetchError::Clone { url: url.to_string(), source })
        }
    }
}

/// Fetch `origin` and fast-forward the checked-out branch.
///
/// Returns `Ok(Some(branch))` when the branch cannot be fast-forwarded.
fn update(path: &Path) -> Result<Option<String>, git2::Error> {
    let repo = Repository::open(path)?;
    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&[] as &[&str], None, None)?;

    let head = repo.head()?;
    let branch = head
        .shorthand()
        .ok_or_else(|| git2::Error::from_str("HEAD is not a named branch"))?
        .to_string();
    let head_ref = head
        .name()
        .ok_or_else(|| git2::Error::from_str("HEAD reference name is not UTF-8"))?
        .to_string();

    let upstream = repo.find_reference(&format!("refs/remotes/origin/{branch}"))?;
    let target = repo.reference_to_annotated_commit(&upstream)?;
    let (analysis, _) = repo.merge_analysis(&[&target])?;

    if analysis.is_up_to_date() {
        debug!(%branch, "already up to date");
        return Ok(None);
    }
    if !analysis.is_fast_forward() {
        return Ok(Some(branch));
    }

    repo.find_reference(&head_ref)?.set_target(target.id(), "fast-forward")?;
    repo.set_head(&head_ref)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
    debug!(%branch, commit = %target.id(), "fast-forwarded");
    Ok(None)
}

/// Working-copy directory name for a repository location: the last path
/// segment with any `.git` suffix removed.
pub fn repo_name_from_url(url: &str) -> Result<String, FetchError> {
    let is_separator = |c: char| c == '/' || c == '\\';
    let trimmed = url.trim().trim_end_matches(is_separator);
    let last = trimmed.rsplit(is_separator).next().unwrap_or(trimmed);
    // scp-style `git@host:repo.git` has no slash before the name
    let last = last.rsplit(':').next().unwrap_or(last);
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name == "." || name == ".." {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{repo_name_from_url, FetchError, GitSource, RepositorySource};
    use git2::{Repository, Signature};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn commit_file(repo: &Repository, rel: &str, content: &str, message: &str) {
        let workdir = repo.workdir().expect("non-bare repo");
        fs::write(workdir.join(rel), content).expect("write file");

        let mut index = repo.index().expect("index");
        index.add_path(Path::new(rel)).expect("add path");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let sig = Signature::now("Fixture", "fixture@example.com").expect("signature");

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).expect("commit");
    }

    #[test]
    fn names_from_common_url_shapes() {
        let cases = [
            ("https://github.com/org/demo.git", "demo"),
            ("https://github.com/org/demo", "demo"),
            ("https://github.com/org/demo/", "demo"),
            ("git@github.com:org/demo.git", "demo"),
            ("git@host:demo.git", "demo"),
            ("/srv/git/demo.git", "demo"),
            ("../local/demo", "demo"),
        ];
        for (url, expected) in cases {
            assert_eq!(repo_name_from_url(url).expect(url), expected, "{url}");
        }
    }

    #[test]
    fn rejects_urls_without_a_name() {
        for url in ["", "/", ".git", "https://host/.."] {
            assert!(matches!(repo_name_from_url(url), Err(FetchError::InvalidUrl(_))), "{url}");
        }
    }

    #[test]
    fn clones_then_fast_forwards() {
        let tmp = TempDir::new().expect("temp dir");
        let origin_path = tmp.path().join("origin");
        let origin = Repository::init(&origin_path).expect("init origin");
        commit_file(&origin, "a.txt", "one", "first");

        let dest = tmp.path().join("work");
        GitSource.acquire(origin_path.to_str().expect("utf8"), &dest).expect("clone");
        assert_eq!(fs::read_to_string(dest.join("a.txt")).expect("read a"), "one");

        commit_file(&origin, "b.txt", "two", "second");
        GitSource.acquire(origin_path.to_str().expect("utf8"), &dest).expect("update");
        assert_eq!(fs::read_to_string(dest.join("b.txt")).expect("read b"), "two");
    }

    #[test]
    fn clone_of_missing_remote_fails() {
        let tmp = TempDir::new().expect("temp dir");
        let missing = tmp.path().join("no-such-repo");
        let dest = tmp.path().join("work");

        let err = GitSource.acquire(missing.to_str().expect("utf8"), &dest).unwrap_err();
        assert!(matches!(err, FetchError::Clone { .. }));
    }
}

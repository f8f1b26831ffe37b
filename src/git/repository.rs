use crate::domain::Version;
use crate::error::Result;
use crate::git::ReleaseSource;
use crate::retry::RetryPolicy;
use git2::{Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Release source reading tags and history from a local git repository
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn commit_oid(&self, revision: &str) -> Result<Oid> {
        Ok(self.repo.revparse_single(revision)?.peel_to_commit()?.id())
    }

    /// Parseable release tags grouped by the commit they point at.
    ///
    /// Annotated and lightweight tags are both peeled to their commit.
    /// Tags that are not versions are skipped.
    fn release_tags_by_commit(&self) -> Result<HashMap<Oid, Vec<(String, Version)>>> {
        let mut by_commit: HashMap<Oid, Vec<(String, Version)>> = HashMap::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let version = match Version::parse(name) {
                Ok(version) => version,
                Err(e) => {
                    warn!(tag = name, error = %e, "skipping tag that is not a release version");
                    continue;
                }
            };

            let commit = self
                .repo
                .find_reference(&format!("refs/tags/{}", name))
                .and_then(|reference| reference.peel_to_commit());

            match commit {
                Ok(commit) => by_commit
                    .entry(commit.id())
                    .or_default()
                    .push((name.to_string(), version)),
                Err(e) => {
                    warn!(tag = name, error = %e, "skipping tag that does not point at a commit")
                }
            }
        }

        Ok(by_commit)
    }

    fn fetch_tags(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name)?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(ssh_dir) = dirs::home_dir().map(|home| home.join(".ssh")) {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = ssh_dir.join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        remote.fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)?;

        Ok(())
    }
}

impl ReleaseSource for Git2Repository {
    /// The nearest commit reachable from `revision` that carries a release
    /// tag. Among several release tags on that commit the most advanced one
    /// wins, by [`Version::cmp_progress`].
    fn latest_release(&self, revision: &str) -> Result<Option<String>> {
        let head = self.commit_oid(revision)?;
        let tags = self.release_tags_by_commit()?;

        if tags.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        for oid in revwalk {
            let oid = oid?;

            if let Some(candidates) = tags.get(&oid) {
                let latest = candidates
                    .iter()
                    .max_by(|(_, a), (_, b)| a.cmp_progress(b))
                    .map(|(name, _)| name.clone());

                debug!(commit = %oid, tag = ?latest, "latest release found");
                return Ok(latest);
            }
        }

        Ok(None)
    }

    fn commit_messages(&self, from_tag: &str, to_revision: &str) -> Result<Vec<String>> {
        let tag_commit = self
            .repo
            .find_reference(&format!("refs/tags/{}", from_tag))?
            .peel_to_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(self.commit_oid(to_revision)?)?;
        revwalk.hide(tag_commit.id())?;

        let mut messages = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            messages.push(commit.message().unwrap_or_default().to_string());
        }

        Ok(messages)
    }

    fn refresh(&self, remote: &str, policy: &RetryPolicy) -> Result<()> {
        policy.run(&format!("fetch tags from {}", remote), |attempt| {
            debug!(remote, attempt, "fetching tags");
            self.fetch_tags(remote)
        })
    }

    fn resolve_revision(&self, revision: &str) -> Result<String> {
        Ok(self.commit_oid(revision)?.to_string())
    }
}

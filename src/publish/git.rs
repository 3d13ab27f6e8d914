// src/publish/git.rs

//! Pushes the refreshed corpus so the static site redeploys.
//!
//! Publication is best effort: a failed push is logged and reported, the
//! corpus already on disk stays valid.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::errors::PublishError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Pushed,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
    remote: String,
    branch: String,
}

pub fn commit_message(now: &DateTime<Local>) -> String {
    format!("Auto: veille immobilière {}", now.format("%Y-%m-%d %H:%M"))
}

impl GitPublisher {
    pub fn new(repo_dir: impl Into<PathBuf>, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Stage `paths`, commit, push. Never returns an error.
    pub fn publish(&self, paths: &[PathBuf], now: &DateTime<Local>) -> PublishOutcome {
        if paths.is_empty() {
            info!("nothing to publish");
            return PublishOutcome::Skipped;
        }

        match self.stage_commit_push(paths, now) {
            Ok(()) => {
                info!(remote = %self.remote, branch = %self.branch, "pushed to remote");
                PublishOutcome::Pushed
            }
            Err(e) => {
                warn!(error = %e, "git publication failed, corpus left as saved");
                PublishOutcome::Failed(e.to_string())
            }
        }
    }

    fn stage_commit_push(&self, paths: &[PathBuf], now: &DateTime<Local>) -> Result<(), PublishError> {
        // git runs inside the repository, so paths are given relative to it.
        let mut add = vec!["add".to_string(), "--".to_string()];
        add.extend(paths.iter().map(|p| {
            p.strip_prefix(&self.repo_dir)
                .unwrap_or(p)
                .to_string_lossy()
                .into_owned()
        }));
        self.git(&add)?;

        self.git(&["commit".to_string(), "-m".to_string(), commit_message(now)])?;
        self.git(&["push".to_string(), self.remote.clone(), self.branch.clone()])?;
        Ok(())
    }

    fn git(&self, args: &[String]) -> Result<String, PublishError> {
        let joined = args.join(" ");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| PublishError::GitSpawn {
                args: joined.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PublishError::GitFailed {
                args: joined,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn run_git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap_or_else(|e| panic!("git {args:?} did not start: {e}"));
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// A working clone with a local bare remote, both in one temp dir.
    fn repo_with_remote() -> (TempDir, PathBuf, PathBuf) {
        let root = TempDir::new().unwrap();
        let remote = root.path().join("remote.git");
        let work = root.path().join("site");
        fs::create_dir_all(&remote).unwrap();
        fs::create_dir_all(&work).unwrap();

        run_git(&remote, &["init", "-q", "--bare"]);
        run_git(&work, &["init", "-q"]);
        run_git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(&work, &["config", "user.name", "Veille"]);
        run_git(&work, &["config", "user.email", "veille@example.ch"]);
        run_git(&work, &["config", "commit.gpgsign", "false"]);
        run_git(&work, &["remote", "add", "origin", &remote.to_string_lossy()]);
        (root, work, remote)
    }

    #[test]
    fn commit_message_carries_timestamp() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 7, 5, 0).unwrap();
        assert_eq!(commit_message(&now), "Auto: veille immobilière 2026-03-14 07:05");
    }

    #[test]
    fn no_paths_is_skipped() {
        let publisher = GitPublisher::new(".", "origin", "main");
        assert_eq!(publisher.publish(&[], &Local::now()), PublishOutcome::Skipped);
    }

    #[test]
    fn outside_a_repository_fails_softly() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("data.json"), "[]").unwrap();
        let publisher = GitPublisher::new(dir.path(), "origin", "main");

        let outcome = publisher.publish(&[PathBuf::from("data.json")], &Local::now());

        assert!(matches!(outcome, PublishOutcome::Failed(_)));
    }

    #[test]
    fn stages_commits_and_pushes_the_written_files() {
        let (_root, work, remote) = repo_with_remote();
        fs::create_dir_all(work.join("exports")).unwrap();
        fs::write(work.join("data.json"), "[]").unwrap();
        fs::write(work.join("exports").join("data.csv"), "\u{feff}").unwrap();
        fs::write(work.join("notes.txt"), "not published").unwrap();
        let now = Local.with_ymd_and_hms(2026, 5, 2, 18, 30, 0).unwrap();

        // The test process runs elsewhere; the paths point into the repository.
        let paths = vec![work.join("data.json"), work.join("exports").join("data.csv")];
        let publisher = GitPublisher::new(&work, "origin", "main");

        assert_eq!(publisher.publish(&paths, &now), PublishOutcome::Pushed);

        let subject = run_git(&remote, &["log", "-1", "--format=%s", "main"]);
        assert_eq!(subject, "Auto: veille immobilière 2026-05-02 18:30");
        let files = run_git(&remote, &["ls-tree", "-r", "--name-only", "main"]);
        assert_eq!(files, "data.json\nexports/data.csv");
    }
}

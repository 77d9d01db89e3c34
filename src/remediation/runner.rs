//! Per-project remediation pipeline
//!
//! For one selected project: force-remove any stale clone, clone the
//! repository at the fixed branch, run the vulnerability auto-fix in every
//! manifest directory, then commit and push. Each step's failure is
//! isolated: a failed clone skips the rest of that project, a failed fix
//! skips only that directory, and a failed publish is reported without
//! retry. There is no resumption; a failed step requires re-running the
//! whole remediation for that project.

use crate::core::config::{COMMIT_MESSAGE, GIT_REMOTE_BASE, MANIFEST_FILENAME, REMEDIATION_BRANCH};
use crate::core::error::RemediateError;
use crate::projects::ProjectRecord;
use crate::remediation::manifest::find_manifest_dirs;
use crate::security::{CommandOutput, CommandRunner};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

lazy_static! {
    static ref PROJECT_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
}

/// Check that an identifier is safe to use in a repository URL and as a
/// local directory name
pub fn is_valid_project_id(id: &str) -> bool {
    PROJECT_ID_PATTERN.is_match(id)
}

/// Outcome of one project's remediation
#[derive(Debug, Clone)]
pub struct RemediationReport {
    pub project_id: String,
    pub success: bool,
    pub cloned: bool,
    pub manifest_dirs: usize,
    pub manifests_fixed: usize,
    pub fix_failures: Vec<String>,
    pub pushed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration: u64,
}

impl RemediationReport {
    fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            success: false,
            cloned: false,
            manifest_dirs: 0,
            manifests_fixed: 0,
            fix_failures: Vec::new(),
            pushed: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            duration: 0,
        }
    }
}

/// Runs the clone → fix → publish sequence for selected projects, one at
/// a time
pub struct RemediationRunner {
    workdir: PathBuf,
    remote_base: String,
    branch: String,
    commit_message: String,
    executor: Arc<dyn CommandRunner>,
}

impl RemediationRunner {
    /// Create a runner that clones under `workdir`.
    ///
    /// Remote base, branch, and commit message use the fixed workflow
    /// constants.
    pub fn new<P: AsRef<Path>>(workdir: P, executor: Arc<dyn CommandRunner>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
            remote_base: GIT_REMOTE_BASE.to_string(),
            branch: REMEDIATION_BRANCH.to_string(),
            commit_message: COMMIT_MESSAGE.to_string(),
            executor,
        }
    }

    /// Deterministic repository URL for a project identifier
    pub fn repository_url(&self, project_id: &str) -> String {
        format!("{}/{}.git", self.remote_base, project_id)
    }

    /// Deterministic local clone directory for a project identifier
    pub fn clone_dir(&self, project_id: &str) -> PathBuf {
        self.workdir.join(project_id)
    }

    /// Remediate one project and report the outcome.
    ///
    /// Never returns an error: every failure is captured in the report so
    /// the caller can continue with the next project.
    pub async fn remediate(&self, project: &ProjectRecord) -> RemediationReport {
        let start = Instant::now();
        let mut report = RemediationReport::new(&project.id);

        if let Err(error) = self.remediate_inner(project, &mut report).await {
            eprintln!("  ❌ {}", error);
            report.errors.push(error.to_string());
        }

        report.success = report.errors.is_empty();
        report.duration = start.elapsed().as_millis() as u64;
        report
    }

    async fn remediate_inner(
        &self,
        project: &ProjectRecord,
        report: &mut RemediationReport,
    ) -> Result<(), RemediateError> {
        if !is_valid_project_id(&project.id) {
            return Err(RemediateError::InvalidProjectId {
                project: project.id.clone(),
            });
        }

        let repo_url = self.repository_url(&project.id);
        let clone_dir = self.clone_dir(&project.id);

        // The clone directory is owned exclusively by this run: always
        // start from a clean, current checkout
        remove_stale_clone(&clone_dir)
            .await
            .map_err(|e| RemediateError::CloneFailed {
                project: project.id.clone(),
                message: format!("failed to remove stale directory: {}", e),
            })?;

        println!("  📥 Cloning {} (branch: {})", repo_url, self.branch);
        let clone_target = clone_dir.to_string_lossy();
        let output = self
            .executor
            .run(
                &self.workdir,
                "git",
                &[
                    "clone",
                    "--branch",
                    &self.branch,
                    "--single-branch",
                    &repo_url,
                    clone_target.as_ref(),
                ],
            )
            .await
            .map_err(|e| RemediateError::CloneFailed {
                project: project.id.clone(),
                message: e.to_string(),
            })?;

        if !output.success() {
            return Err(RemediateError::CloneFailed {
                project: project.id.clone(),
                message: failure_message(&output),
            });
        }
        report.cloned = true;

        let manifest_dirs = find_manifest_dirs(&clone_dir);
        report.manifest_dirs = manifest_dirs.len();
        if manifest_dirs.is_empty() {
            println!("  ⚠️  No {} found in clone", MANIFEST_FILENAME);
            report
                .warnings
                .push(format!("no {} found in clone", MANIFEST_FILENAME));
        }

        for dir in &manifest_dirs {
            println!("  🔧 Running npm audit fix in {}", dir.display());
            let failure = match self.executor.run(dir, "npm", &["audit", "fix"]).await {
                Ok(output) if output.success() => {
                    report.manifests_fixed += 1;
                    None
                }
                Ok(output) => Some(failure_message(&output)),
                Err(error) => Some(error.to_string()),
            };

            if let Some(message) = failure {
                let error = RemediateError::FixFailed {
                    project: project.id.clone(),
                    dir: dir.display().to_string(),
                    message,
                };
                eprintln!("  ⚠️  {}", error);
                report.fix_failures.push(error.to_string());
            }
        }

        if self.publish_changes(&clone_dir, &project.id).await? {
            report.pushed = true;
            println!("  📤 Changes committed and pushed");
        } else {
            println!("  ✅ Working tree clean, nothing to publish");
        }

        Ok(())
    }

    /// Commit and push the working tree; returns false when there was
    /// nothing to commit
    async fn publish_changes(
        &self,
        clone_dir: &Path,
        project: &str,
    ) -> Result<bool, RemediateError> {
        let status = self
            .run_git(clone_dir, project, &["status", "--porcelain"])
            .await?;
        if status.stdout.trim().is_empty() {
            return Ok(false);
        }

        self.run_git(clone_dir, project, &["add", "-A"]).await?;
        self.run_git(clone_dir, project, &["commit", "-m", &self.commit_message])
            .await?;
        self.run_git(clone_dir, project, &["push"]).await?;

        Ok(true)
    }

    async fn run_git(
        &self,
        dir: &Path,
        project: &str,
        args: &[&str],
    ) -> Result<CommandOutput, RemediateError> {
        let output = self
            .executor
            .run(dir, "git", args)
            .await
            .map_err(|e| RemediateError::PublishFailed {
                project: project.to_string(),
                message: e.to_string(),
            })?;

        if !output.success() {
            return Err(RemediateError::PublishFailed {
                project: project.to_string(),
                message: failure_message(&output),
            });
        }

        Ok(output)
    }
}

/// Remove a previous clone; an absent directory is success
async fn remove_stale_clone(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn failure_message(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        format!(
            "command exited with status {}",
            output
                .status_code
                .map(|code| code.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        )
    } else {
        stderr.to_string()
    }
}

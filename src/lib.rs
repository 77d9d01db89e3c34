pub mod auth;
pub mod core;
pub mod projects;
pub mod remediation;
pub mod security;

pub use auth::{BearerToken, OtpGenerator, Passcode, TokenAcquirer, mask_token};
pub use crate::core::*;
pub use projects::{
    AutoSelector, InteractiveSelector, ProjectLister, ProjectRecord, ProjectSelector,
};
pub use remediation::{RemediationReport, RemediationRunner, find_manifest_dirs};
pub use security::{CommandError, CommandOutput, CommandRunner, SafeCommandExecutor};

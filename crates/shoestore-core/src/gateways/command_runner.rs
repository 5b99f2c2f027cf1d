//! External process port used by backup and restore

use async_trait::async_trait;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout and stderr
    pub output: String,
    pub success: bool,
    pub code: Option<i32>,
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` to completion. Spawn failures are errors, non-zero exits are not.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput, DomainError>;
}

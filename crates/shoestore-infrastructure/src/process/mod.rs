//! OS process runner for pg_dump and psql

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use shoestore_core::error::DomainError;
use shoestore_core::gateways::{CommandOutput, CommandRunner};

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput, DomainError> {
        debug!("Running {} with {} args", program, args.len());

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                error!("Failed to start {}: {}", program, e);
                DomainError::InternalError(format!("Failed to start {}: {}", program, e))
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            output: combined,
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_and_exit_status() {
        let runner = TokioCommandRunner::new();
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];

        let result = runner.run("sh", &args, &[]).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(3));
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[tokio::test]
    async fn test_env_is_passed() {
        let runner = TokioCommandRunner::new();
        let args = vec!["-c".to_string(), "printf %s \"$PGPASSWORD\"".to_string()];
        let env = vec![("PGPASSWORD".to_string(), "secret".to_string())];

        let result = runner.run("sh", &args, &env).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "secret");
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let runner = TokioCommandRunner::new();
        assert!(runner.run("definitely-not-a-real-binary", &[], &[]).await.is_err());
    }
}

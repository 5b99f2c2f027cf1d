//! Database backup and restore through the PostgreSQL command-line tools

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shoestore_shared::constants::{BACKUP_FILE_PREFIX, BACKUP_FILE_SUFFIX};
use shoestore_shared::Clock;
use tracing::{error, info, warn};

use crate::domain::{BackupFile, DatabaseParams};
use crate::error::DomainError;
use crate::gateways::{CommandOutput, CommandRunner};

const VERSION_MISMATCH: &str = "server version mismatch";

pub struct BackupService {
    runner: Arc<dyn CommandRunner>,
    clock: Arc<dyn Clock>,
    directory: PathBuf,
    pg_dump: String,
    psql: String,
    database_url: String,
}

impl BackupService {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        clock: Arc<dyn Clock>,
        directory: impl Into<PathBuf>,
        pg_dump: impl Into<String>,
        psql: impl Into<String>,
        database_url: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            clock,
            directory: directory.into(),
            pg_dump: pg_dump.into(),
            psql: psql.into(),
            database_url: database_url.into(),
        }
    }

    /// Dumps the database into a new timestamped file.
    ///
    /// Tries the full flag set first. When the tool reports a server version
    /// mismatch it retries with `--no-sync`, and if that fails too, with the
    /// minimal flag set.
    pub async fn create(&self) -> Result<BackupFile, DomainError> {
        let params = DatabaseParams::parse(&self.database_url)?;
        tokio::fs::create_dir_all(&self.directory).await?;

        let filename = BackupFile::name_for(self.clock.now());
        let path = self.directory.join(&filename);
        let env = password_env(&params);

        let first = self.runner.run(&self.pg_dump, &dump_args(&params, &path, DumpMode::Full), &env).await?;
        if !first.success {
            if !first.output.contains(VERSION_MISMATCH) {
                error!("pg_dump failed: {}", first.output);
                return Err(DomainError::BackupFailed(describe(&first)));
            }

            warn!("pg_dump version mismatch, retrying with --no-sync");
            let retry = self.runner.run(&self.pg_dump, &dump_args(&params, &path, DumpMode::NoSync), &env).await?;
            if !retry.success {
                warn!("pg_dump --no-sync failed, retrying with minimal flags");
                let minimal = self.runner.run(&self.pg_dump, &dump_args(&params, &path, DumpMode::Minimal), &env).await?;
                if !minimal.success {
                    error!("pg_dump failed with minimal flags: {}", minimal.output);
                    return Err(DomainError::BackupFailed(format!(
                        "pg_dump may need to match the server version: {}",
                        describe(&minimal)
                    )));
                }
            }
        }

        let file = describe_file(&path, &filename).await.map_err(|_| {
            DomainError::BackupFailed("backup file was not created".into())
        })?;
        info!("Backup created: {} ({:.2} MB)", file.filename, file.size_mb);
        Ok(file)
    }

    /// Backup files in the backup directory, newest first
    pub async fn list(&self) -> Result<Vec<BackupFile>, DomainError> {
        let mut files = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(BACKUP_FILE_PREFIX) || !name.ends_with(BACKUP_FILE_SUFFIX) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            files.push(describe_file(&entry.path(), &name).await?);
        }

        files.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.filename.cmp(&a.filename)));
        Ok(files)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolves a backup name to an existing file inside the backup directory.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf, DomainError> {
        BackupFile::check_name(filename)?;
        let path = self.directory.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(DomainError::NotFound("Backup file")),
        }
    }

    pub async fn delete(&self, filename: &str) -> Result<(), DomainError> {
        let path = self.locate(filename).await?;
        tokio::fs::remove_file(&path).await?;
        info!("Backup deleted: {}", filename);
        Ok(())
    }

    /// Replays an uploaded SQL dump through psql.
    pub async fn restore(&self, upload_name: &str, contents: &[u8]) -> Result<(), DomainError> {
        if !upload_name.ends_with(BACKUP_FILE_SUFFIX) {
            return Err(DomainError::ValidationError("Backup file must have the .sql extension".into()));
        }
        let params = DatabaseParams::parse(&self.database_url)?;

        let temp = std::env::temp_dir().join(format!("restore_backup_{}.sql", uuid::Uuid::new_v4()));
        tokio::fs::write(&temp, contents).await?;

        let args = vec![
            format!("--host={}", params.host),
            format!("--port={}", params.port),
            format!("--username={}", params.user),
            format!("--dbname={}", params.database),
            format!("--file={}", temp.display()),
        ];
        let result = self.runner.run(&self.psql, &args, &password_env(&params)).await;

        if let Err(e) = tokio::fs::remove_file(&temp).await {
            warn!("Could not remove {}: {}", temp.display(), e);
        }

        let output = result?;
        if !output.success {
            error!("psql restore failed: {}", output.output);
            return Err(DomainError::RestoreFailed(describe(&output)));
        }
        info!("Database restored from {}", upload_name);
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum DumpMode {
    Full,
    NoSync,
    Minimal,
}

fn dump_args(params: &DatabaseParams, path: &Path, mode: DumpMode) -> Vec<String> {
    let mut args = vec![
        format!("--host={}", params.host),
        format!("--port={}", params.port),
        format!("--username={}", params.user),
        format!("--dbname={}", params.database),
    ];
    if !matches!(mode, DumpMode::Minimal) {
        args.extend(
            ["--verbose", "--clean", "--no-owner", "--no-privileges", "--no-tablespaces"]
                .into_iter()
                .map(String::from),
        );
    }
    if matches!(mode, DumpMode::NoSync) {
        args.push("--no-sync".into());
    }
    args.push(format!("--file={}", path.display()));
    args
}

fn password_env(params: &DatabaseParams) -> Vec<(String, String)> {
    vec![("PGPASSWORD".to_string(), params.password.clone())]
}

fn describe(output: &CommandOutput) -> String {
    match output.code {
        Some(code) => format!("exit status {}: {}", code, output.output.trim()),
        None => format!("terminated: {}", output.output.trim()),
    }
}

async fn describe_file(path: &Path, filename: &str) -> Result<BackupFile, DomainError> {
    let meta = tokio::fs::metadata(path).await?;
    let created: DateTime<Utc> = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let size_bytes = meta.len();

    Ok(BackupFile {
        filename: filename.to_string(),
        path: path.display().to_string(),
        size_bytes,
        size_mb: size_bytes as f64 / (1024.0 * 1024.0),
        created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::MockCommandRunner;
    use chrono::TimeZone;
    use shoestore_shared::ManualClock;

    const URL: &str = "postgres://shop:pw@localhost:5432/shoes";

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("shoestore-backup-test-{}", uuid::Uuid::new_v4()))
    }

    fn output(success: bool, text: &str) -> CommandOutput {
        CommandOutput { output: text.into(), success, code: Some(if success { 0 } else { 1 }) }
    }

    fn write_target(args: &[String]) {
        if let Some(path) = args.iter().find_map(|a| a.strip_prefix("--file=")) {
            std::fs::write(path, "-- dump").unwrap();
        }
    }

    fn service(runner: MockCommandRunner, dir: &Path) -> BackupService {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap());
        BackupService::new(Arc::new(runner), Arc::new(clock), dir, "pg_dump", "psql", URL)
    }

    #[tokio::test]
    async fn test_create_with_full_flags() {
        let dir = temp_dir();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, env| {
                program == "pg_dump"
                    && args.contains(&"--no-owner".to_string())
                    && args.contains(&"--username=shop".to_string())
                    && env.len() == 1
                    && env[0].0 == "PGPASSWORD"
                    && env[0].1 == "pw"
            })
            .times(1)
            .returning(|_, args, _| {
                write_target(args);
                Ok(output(true, ""))
            });

        let file = service(runner, &dir).create().await.unwrap();
        assert_eq!(file.filename, "shoes_store_backup_20240309_140507.sql");
        assert_eq!(file.size_bytes, 7);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_version_mismatch_falls_back_twice() {
        let dir = temp_dir();
        let mut seq = mockall::Sequence::new();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|_, args, _| args.contains(&"--verbose".to_string()) && !args.contains(&"--no-sync".to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(output(false, "pg_dump: error: server version mismatch")));
        runner
            .expect_run()
            .withf(|_, args, _| args.contains(&"--no-sync".to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(output(false, "still failing")));
        runner
            .expect_run()
            .withf(|_, args, _| args.len() == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, args, _| {
                write_target(args);
                Ok(output(true, ""))
            });

        assert!(service(runner, &dir).create().await.is_ok());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_other_failures_do_not_retry() {
        let dir = temp_dir();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _, _| Ok(output(false, "connection refused")));

        let err = service(runner, &dir).create().await.unwrap_err();
        assert!(matches!(err, DomainError::BackupFailed(msg) if msg.contains("connection refused")));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_list_delete_and_locate() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("shoes_store_backup_20240101_000000.sql"), "a").unwrap();
        std::fs::write(dir.join("notes.txt"), "b").unwrap();

        let service = service(MockCommandRunner::new(), &dir);
        let files = service.list().await.unwrap();
        assert_eq!(files.len(), 1);

        assert!(matches!(
            service.locate("../etc/passwd.sql").await,
            Err(DomainError::InvalidBackupName(_))
        ));
        assert!(matches!(
            service.delete("shoes_store_backup_20990101_000000.sql").await,
            Err(DomainError::NotFound(_))
        ));
        service.delete("shoes_store_backup_20240101_000000.sql").await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let service = service(MockCommandRunner::new(), &temp_dir());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_runs_psql_and_cleans_up() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, _| program == "psql" && args.iter().any(|a| a.starts_with("--file=")))
            .times(1)
            .returning(|_, args, _| {
                let path = args.iter().find_map(|a| a.strip_prefix("--file=")).unwrap();
                assert_eq!(std::fs::read_to_string(path).unwrap(), "SELECT 1;");
                Ok(output(true, ""))
            });

        service(runner, &temp_dir()).restore("dump.sql", b"SELECT 1;").await.unwrap();
    }

    #[tokio::test]
    async fn test_restore_rejects_other_extensions() {
        let err = service(MockCommandRunner::new(), &temp_dir())
            .restore("dump.txt", b"")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}

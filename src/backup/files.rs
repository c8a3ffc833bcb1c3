//! Backup files on disk
//!
//! Encrypted backups are written to the backup directory as
//! `bimil-backup-YYYYMMDD-HHMMSS-mmm.bimil`. The timestamp in the name is
//! used for ordering and retention; the file contents are opaque here.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::config::paths::BimilPaths;
use crate::config::settings::BackupRetention;
use crate::error::{BimilError, BimilResult};
use crate::storage::write_bytes_atomic;

const FILE_PREFIX: &str = "bimil-backup-";

/// File extension of encrypted backups
pub const BACKUP_EXTENSION: &str = "bimil";

/// Name that resolves to the newest backup
pub const LATEST: &str = "latest";

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Parsed from the file name
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Manages the backup directory
pub struct BackupFiles {
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl BackupFiles {
    /// Create a new BackupFiles over the configured backup directory
    pub fn new(paths: &BimilPaths, retention: BackupRetention) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention,
        }
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Write an encrypted blob to a new timestamped file
    pub fn write(&self, blob: &[u8]) -> BimilResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| BimilError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "{}{}-{:03}.{}",
            FILE_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis(),
            BACKUP_EXTENSION
        );
        let path = self.backup_dir.join(filename);
        if path.exists() {
            return Err(BimilError::duplicate(
                "Backup file",
                path.display().to_string(),
            ));
        }

        write_bytes_atomic(&path, blob)?;
        Ok(path)
    }

    /// List all backups, newest first
    pub fn list(&self) -> BimilResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| BimilError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| BimilError::Io(format!("Failed to read directory entry: {}", e)))?;

            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Get the most recent backup
    pub fn latest(&self) -> BimilResult<Option<BackupInfo>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Resolve `latest`, a path, or a file name inside the backup directory
    pub fn resolve(&self, target: &str) -> BimilResult<PathBuf> {
        if target == LATEST {
            return self
                .latest()?
                .map(|info| info.path)
                .ok_or_else(|| BimilError::NotFound {
                    entity_type: "Backup",
                    identifier: LATEST.to_string(),
                });
        }

        let direct = PathBuf::from(target);
        if direct.is_file() {
            return Ok(direct);
        }

        let in_dir = self.backup_dir.join(target);
        if in_dir.is_file() {
            return Ok(in_dir);
        }

        Err(BimilError::NotFound {
            entity_type: "Backup",
            identifier: target.to_string(),
        })
    }

    /// Read a backup file's bytes
    pub fn read(&self, path: &Path) -> BimilResult<Vec<u8>> {
        fs::read(path).map_err(|e| {
            BimilError::Io(format!(
                "Failed to read backup file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Backups that fall outside the retention limit, oldest last
    pub fn excess(&self) -> BimilResult<Vec<BackupInfo>> {
        Ok(self
            .list()?
            .into_iter()
            .skip(self.retention.max_backups as usize)
            .collect())
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> BimilResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self.excess()? {
            fs::remove_file(&backup.path)
                .map_err(|e| BimilError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }
}

/// Parse backup info from a backup file path
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();

    let stamp = filename
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let created_at = parse_backup_timestamp(stamp)?;

    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm` from a backup file name
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let (date_part, time_part, millis_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis_part.parse().ok()?,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn create_test_files(max_backups: u32) -> (BackupFiles, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BimilPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let files = BackupFiles::new(&paths, BackupRetention { max_backups });
        (files, temp_dir)
    }

    fn write_spaced(files: &BackupFiles, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                std::thread::sleep(std::time::Duration::from_millis(5));
                files.write(&[i as u8; 32]).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_write_backup() {
        let (files, _temp) = create_test_files(10);

        let path = files.write(b"blob").unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("bimil-backup-"));
        assert!(name.ends_with(".bimil"));
        assert_eq!(files.read(&path).unwrap(), b"blob");
    }

    #[test]
    fn test_list_newest_first() {
        let (files, _temp) = create_test_files(10);

        let written = write_spaced(&files, 3);
        let listed = files.list().unwrap();

        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].path, written[2]);
        assert_eq!(listed[2].path, written[0]);
        assert_eq!(listed[0].size_bytes, 32);
    }

    #[test]
    fn test_unrelated_files_ignored() {
        let (files, _temp) = create_test_files(10);
        fs::write(files.backup_dir().join("notes.txt"), "hi").unwrap();
        fs::write(files.backup_dir().join("bimil-backup-garbage.bimil"), "x").unwrap();

        assert!(files.list().unwrap().is_empty());
    }

    #[test]
    fn test_resolve() {
        let (files, _temp) = create_test_files(10);

        assert!(files.resolve(LATEST).unwrap_err().is_not_found());

        let written = write_spaced(&files, 2);
        assert_eq!(files.resolve(LATEST).unwrap(), written[1]);

        let name = written[0].file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(files.resolve(&name).unwrap(), written[0]);
        assert_eq!(
            files.resolve(written[0].to_str().unwrap()).unwrap(),
            written[0]
        );
        assert!(files.resolve("missing.bimil").unwrap_err().is_not_found());
    }

    #[test]
    fn test_retention() {
        let (files, _temp) = create_test_files(2);

        let written = write_spaced(&files, 5);
        assert_eq!(files.excess().unwrap().len(), 3);

        let deleted = files.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 3);

        let remaining: Vec<_> = files.list().unwrap().into_iter().map(|b| b.path).collect();
        assert_eq!(remaining, vec![written[4].clone(), written[3].clone()]);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.hour(), 14);
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251127-143022").is_none());
        assert!(parse_backup_timestamp("20251399-143022-000").is_none());
    }
}

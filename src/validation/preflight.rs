//! Preflight checks for the source dump and the destination directory.
//!
//! Both checks run before any splitting starts so that predictable
//! problems (a missing dump, a read-only destination) surface as clean
//! configuration errors instead of mid-run write failures.

use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Verifies that the source dump exists and is a readable file.
pub async fn check_source(path: &Path) -> Result<(), AppError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        AppError::InvalidConfig(format!(
            "Source file {} is not accessible: {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_file() {
        return Err(AppError::InvalidConfig(format!(
            "Source path {} is not a regular file",
            path.display()
        )));
    }

    // Open probe so permission problems surface here, not mid-split
    tokio::fs::File::open(path).await.map_err(|e| {
        AppError::InvalidConfig(format!(
            "Source file {} cannot be opened: {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Verifies that the destination directory exists and accepts new files.
pub async fn check_destination(dir: &Path) -> Result<(), AppError> {
    let metadata = tokio::fs::metadata(dir).await.map_err(|e| {
        AppError::InvalidConfig(format!(
            "Destination directory {} is not accessible: {}",
            dir.display(),
            e
        ))
    })?;

    if !metadata.is_dir() {
        return Err(AppError::InvalidConfig(format!(
            "Destination path {} is not a directory",
            dir.display()
        )));
    }

    // Write probe with a throwaway temp file, removed as soon as it drops
    let dir = dir.to_owned();
    tokio::task::spawn_blocking(move || {
        NamedTempFile::new_in(&dir).map(drop).map_err(|e| {
            AppError::InvalidConfig(format!(
                "Destination directory {} is not writable: {}",
                dir.display(),
                e
            ))
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_valid_source_and_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("dump.csv");
        fs::write(&source, "city,region,mobile\n").unwrap();

        assert!(check_source(&source).await.is_ok());
        assert!(check_destination(dir.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing.csv");

        let result = check_source(&source).await;
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_directory_source_is_rejected() {
        let dir = TempDir::new().unwrap();

        let result = check_source(dir.path()).await;
        match result {
            Err(AppError::InvalidConfig(msg)) => {
                assert!(
                    msg.contains("not a regular file"),
                    "Unexpected message: {}",
                    msg
                );
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_destination_is_rejected() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nope");

        let result = check_destination(&dest).await;
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_file_destination_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = check_destination(&file).await;
        match result {
            Err(AppError::InvalidConfig(msg)) => {
                assert!(msg.contains("not a directory"), "Unexpected message: {}", msg);
            }
            other => panic!("Expected InvalidConfig error, got {:?}", other),
        }
    }
}

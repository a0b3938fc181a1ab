use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Configuration ─────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input ─────────────────────────────────────────────────────────────────
    #[error("Malformed row {row}: found {found} fields but at least {expected} are required")]
    MalformedRow {
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV read error: {0}")]
    CsvRead(String),

    // ── Output ────────────────────────────────────────────────────────────────
    #[error("CSV write error: {0}")]
    CsvWrite(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_message_names_all_counts() {
        let err = AppError::MalformedRow {
            row: 7,
            expected: 3,
            found: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("row 7"), "Message should name the row: {}", msg);
        assert!(
            msg.contains("found 1") && msg.contains("at least 3"),
            "Message should name both field counts: {}",
            msg
        );
    }

    #[test]
    fn test_string_variants_carry_their_payload() {
        let cases = vec![
            (
                AppError::InvalidConfig("dest is not a directory".into()),
                "Invalid configuration: dest is not a directory",
            ),
            (
                AppError::CsvRead("failed to open source".into()),
                "CSV read error: failed to open source",
            ),
            (
                AppError::CsvWrite("failed to persist file".into()),
                "CSV write error: failed to persist file",
            ),
            (
                AppError::Encoding("not representable in windows-1251".into()),
                "Encoding error: not representable in windows-1251",
            ),
            (
                AppError::Internal("task join error".into()),
                "Internal error: task join error",
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}

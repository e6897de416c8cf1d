//! # Log Record Inspection (`common::logs`)
//!
//! File: harness/src/common/logs.rs
//!
//! ## Overview
//!
//! Counting and parsing of the subject's log output. The subject writes its
//! error log as rotated, numbered JSON files on disk and *mirrors* every
//! entry into the container's combined stdout/stderr stream. Verifying that
//! no entries are lost across rotation means summing line counts over every
//! rotated file copied out of the container, and comparing the total to a
//! count of mirrored entries in the stream. That cross-source check is the
//! one property in the suite requiring correlated state from multiple
//! artifacts, and this module holds all of its moving parts.
//!
//! ## Architecture
//!
//! - **`count_lines`**: newline-delimited records in a byte stream. A final
//!   unterminated line counts as a record, matching how the subject's last
//!   buffered entry appears when a file is copied mid-write.
//! - **`count_archived_lines`**: `count_lines` summed over every entry of a
//!   tar archive, for copy-out paths that resolve to several file segments.
//! - **`LogRecord`**: the typed view of one mirrored JSON entry. Only the
//!   fields the suite asserts on are modelled; unknown fields pass through
//!   deserialization untouched.
//! - **`mirrored_entry_count`**: mirrored product entries in a combined
//!   stream, recognized by the product's message-ID prefix.
//!
use std::io::{BufRead, BufReader, Read};

use anyhow::Context;
use serde::Deserialize;

use crate::core::error::Result;

/// Prefix of every product message identifier (e.g. `AMQ6206I`).
const MESSAGE_PREFIX: &str = "AMQ";

/// Counts newline-delimited records in a byte stream.
///
/// Counts bytewise, so a record that is not valid UTF-8 still counts; a
/// trailing record without a final newline counts as well.
pub fn count_lines<R: Read>(reader: R) -> Result<usize> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read line-delimited stream")?;
        if n == 0 {
            break;
        }
        count += 1;
    }
    Ok(count)
}

/// Sums [`count_lines`] across every entry of an uncompressed tar archive.
///
/// Non-file entries contribute nothing (they have no data), so archives
/// that carry directory segments are handled transparently.
///
/// # Errors
///
/// Propagates malformed-archive and read errors.
pub fn count_archived_lines(archive: &[u8]) -> Result<usize> {
    let mut reader = tar::Archive::new(archive);
    let mut total = 0;
    for entry in reader.entries().context("Failed to read tar entries")? {
        let entry = entry.context("Failed to read tar entry header")?;
        total += count_lines(entry)?;
    }
    Ok(total)
}

/// One structured error-log entry as mirrored into the combined stream.
///
/// The subject emits many more fields (timestamps, inserts, host details);
/// the suite only cross-references on the message text, the severity, and
/// the message identifier, so only those are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    /// Full message text, beginning with the product message identifier.
    pub message: String,
    /// Severity, when present (`INFO`, `WARNING`, `ERROR`).
    #[serde(default)]
    pub loglevel: Option<String>,
    /// The bare message identifier, when present.
    #[serde(rename = "ibm_messageId", default)]
    pub message_id: Option<String>,
}

impl LogRecord {
    /// Parses one line of a line-delimited JSON stream.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Counts the mirrored product log entries in a combined output stream.
///
/// A line counts when it parses as a [`LogRecord`] whose message carries
/// the product's message-ID prefix. Lines the subject writes that are not
/// mirrored entries (startup chatter, non-JSON diagnostics) are ignored,
/// whatever their format.
pub fn mirrored_entry_count(log: &str) -> usize {
    log.lines()
        .filter_map(|line| LogRecord::parse(line).ok())
        .filter(|record| record.message.starts_with(MESSAGE_PREFIX))
        .count()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines_empty_stream() -> Result<()> {
        assert_eq!(count_lines(&b""[..])?, 0);
        Ok(())
    }

    #[test]
    fn test_count_lines_with_and_without_trailing_newline() -> Result<()> {
        assert_eq!(count_lines(&b"one\ntwo\n"[..])?, 2);
        assert_eq!(count_lines(&b"one\ntwo"[..])?, 2);
        assert_eq!(count_lines(&b"\n\n\n"[..])?, 3);
        Ok(())
    }

    #[test]
    fn test_count_archived_lines_sums_entries() -> Result<()> {
        let mut bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut bytes);
            for (name, body) in [
                ("AMQERR01.json", "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n"),
                ("AMQERR02.json", "{\"a\":4}\n{\"a\":5}\n"),
                ("AMQERR03.json", ""),
            ] {
                let mut header = tar::Header::new_gnu();
                header.set_size(body.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append_data(&mut header, name, body.as_bytes())?;
            }
            builder.finish()?;
        }
        assert_eq!(count_archived_lines(&bytes)?, 5);
        Ok(())
    }

    #[test]
    fn test_log_record_parses_subject_fields() {
        let line = r#"{"ibm_datetime":"2018-03-01T10:01:18.968Z","loglevel":"INFO","message":"AMQ6206I: Queue manager started.","ibm_messageId":"AMQ6206I"}"#;
        let record = LogRecord::parse(line).expect("valid record");
        assert!(record.message.starts_with("AMQ6206I"));
        assert_eq!(record.loglevel.as_deref(), Some("INFO"));
        assert_eq!(record.message_id.as_deref(), Some("AMQ6206I"));
    }

    #[test]
    fn test_mirrored_entry_count_ignores_non_entries() {
        let log = concat!(
            "{\"message\":\"AMQ6287I: Version info.\"}\n",
            "plain text line from the entrypoint\n",
            "{\"message\":\"Launching queue manager\"}\n", // JSON but not a product entry
            "{\"message\":\"AMQ5051I: The agent process has started.\"}\n",
            "{not json at all\n",
        );
        assert_eq!(mirrored_entry_count(log), 2);
    }

    #[test]
    fn test_mirrored_entry_count_empty_log() {
        assert_eq!(mirrored_entry_count(""), 0);
    }
}

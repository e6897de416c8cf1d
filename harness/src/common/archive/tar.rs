//! # TAR Archive Operations (`common::archive::tar`)
//!
//! File: harness/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module handles the two tar shapes the harness meets: the gzipped
//! build context it *sends* to the daemon when building an ephemeral image,
//! and the plain archives the daemon *produces* when a file is copied out of
//! a container filesystem.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for the archive structure and the
//! `flate2` crate for Gzip compression.
//!
//! - **`create_fileset_tar`**: build contexts here are generated, not read
//!   from disk, so the archive is assembled from in-memory `(name, content)`
//!   pairs with synthetic headers rather than by walking a directory.
//! - **`unpack_single_file`**: the copy-out endpoint wraps even a single
//!   file in a tar stream; this extracts the first regular entry for callers
//!   that expect exactly one file (the termination log). Callers expecting
//!   several entries iterate the archive themselves (see
//!   `common::logs::count_archived_lines`).
//!
use crate::core::error::{HarnessError, Result};
use anyhow::{anyhow, Context};
use std::io::Read;

/// Creates a gzipped TAR build context from in-memory `(name, content)`
/// pairs.
///
/// Entries are written in the order given, as regular files with mode 0644.
/// The daemon only cares that the instructions file named by the build
/// options is present; validation of that is the image builder's job.
///
/// # Arguments
///
/// * `files` - The file set to archive.
///
/// # Returns
///
/// * `Result<Vec<u8>>` - The raw bytes of the generated `.tar.gz` archive.
///
/// # Errors
///
/// Returns an `Err` if appending an entry, finalizing the TAR structure, or
/// finishing the Gzip stream fails.
pub fn create_fileset_tar(files: &[(&str, &str)]) -> Result<Vec<u8>> {
    let mut tar_gz_bytes = Vec::new();
    let enc = flate2::write::GzEncoder::new(&mut tar_gz_bytes, flate2::Compression::default());
    let mut builder = tar::Builder::new(enc);

    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .with_context(|| format!("Failed to add '{}' to the build context", name))?;
    }

    // Finalize the TAR structure, then the compression stream.
    let encoder = builder
        .into_inner()
        .context("Failed to finalize tar archive structure")?;
    encoder
        .finish()
        .context("Failed to finish gzip compression stream")?;

    Ok(tar_gz_bytes)
}

/// Extracts the first regular file from an uncompressed tar archive.
///
/// This is the inverse convenience for the daemon's copy-out format when
/// the requested path was a single file.
///
/// # Errors
///
/// * `HarnessError::Archive` - If the archive holds no regular file entry.
/// * Plus any read error from malformed archive bytes.
pub fn unpack_single_file(archive: &[u8]) -> Result<Vec<u8>> {
    let mut reader = tar::Archive::new(archive);
    for entry in reader.entries().context("Failed to read tar entries")? {
        let mut entry = entry.context("Failed to read tar entry header")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .context("Failed to read tar entry contents")?;
        return Ok(contents);
    }
    Err(anyhow!(HarnessError::Archive(
        "archive contains no regular file entry".to_string()
    )))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::collections::HashMap;
    use tar::Archive;

    #[test]
    fn test_create_fileset_tar_round_trips() -> Result<()> {
        let files = [
            ("Dockerfile", "FROM subject:latest\nADD test.mqsc /etc/mqm/\n"),
            ("test.mqsc", "DEFINE QLOCAL(test)\n"),
        ];
        let tar_gz = create_fileset_tar(&files)?;
        assert!(!tar_gz.is_empty());

        let mut archive = Archive::new(GzDecoder::new(tar_gz.as_slice()));
        let mut found = HashMap::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            let name = entry.path()?.to_string_lossy().to_string();
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            found.insert(name, contents);
        }
        assert_eq!(found.len(), 2);
        assert_eq!(found["test.mqsc"], "DEFINE QLOCAL(test)\n");
        assert!(found["Dockerfile"].starts_with("FROM subject:latest"));
        Ok(())
    }

    #[test]
    fn test_create_fileset_tar_empty_set_is_valid_archive() -> Result<()> {
        let tar_gz = create_fileset_tar(&[])?;
        let mut archive = Archive::new(GzDecoder::new(tar_gz.as_slice()));
        assert_eq!(archive.entries()?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_unpack_single_file_returns_first_file() -> Result<()> {
        // Copy-out archives are uncompressed; build one directly.
        let mut bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut bytes);
            let body = b"AMQ7xxxE: startup failed\n";
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, "termination-log", &body[..])?;
            builder.finish()?;
        }
        let contents = unpack_single_file(&bytes)?;
        assert_eq!(contents, b"AMQ7xxxE: startup failed\n");
        Ok(())
    }

    #[test]
    fn test_unpack_single_file_rejects_empty_archive() {
        let mut bytes = Vec::new();
        {
            let mut builder = tar::Builder::new(&mut bytes);
            builder.finish().expect("empty archive");
        }
        let err = unpack_single_file(&bytes).expect_err("no file entry");
        assert!(err.to_string().contains("no regular file"));
    }
}

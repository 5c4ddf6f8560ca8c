//! Filesystem utilities for code generation

use std::fs;
use std::io;
use std::path::Path;

use super::Artifact;

/// Write content to a file, creating parent directories if needed.
///
/// Existing files are replaced in full.
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, contents)
}

/// Write a rendered artifact to its target path
pub fn write_artifact(artifact: &Artifact) -> io::Result<()> {
    write_file(&artifact.path, &artifact.contents)
}

/// Read a file, treating a missing file as empty
pub fn read_or_empty<P: AsRef<Path>>(path: P) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app/Models/orders.php");

        write_file(&path, "first version, which is longer").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_read_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes/web.php");
        assert_eq!(read_or_empty(&path).unwrap(), "");

        write_file(&path, "<?php\n").unwrap();
        assert_eq!(read_or_empty(&path).unwrap(), "<?php\n");
    }

    #[test]
    fn test_write_file_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("app");
        write_file(&blocker, "not a directory").unwrap();

        assert!(write_file(blocker.join("Models/orders.php"), "x").is_err());
    }
}

//! Raw access to the statistics source.

use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::FileSystem;

/// Error type for collection failures.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// The statistics source is missing, unreadable or failed mid-read.
    #[error("stat source {} unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads the whole statistics source at `path`.
///
/// Invalid UTF-8 is replaced with U+FFFD, so a stray byte only spoils the
/// token it belongs to.
pub fn read_stat<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<String, CollectError> {
    let bytes = fs
        .read(path)
        .map_err(|source| CollectError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::collector::traits::RealFs;

    #[test]
    fn test_read_stat_mock() {
        let fs = MockFs::with_stat("ctxt 1\n");
        let content = read_stat(&fs, Path::new("/proc/stat")).unwrap();
        assert_eq!(content, "ctxt 1\n");
    }

    #[test]
    fn test_read_stat_missing() {
        let fs = MockFs::new();
        let err = read_stat(&fs, Path::new("/proc/stat")).unwrap_err();
        let CollectError::SourceUnavailable { path, source } = &err;
        assert_eq!(path, Path::new("/proc/stat"));
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/proc/stat"));
    }

    #[test]
    fn test_read_stat_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stat");
        std::fs::write(&path, "btime 1690000000\n").unwrap();

        let content = read_stat(&RealFs::new(), &path).unwrap();
        assert_eq!(content, "btime 1690000000\n");
    }

    #[test]
    fn test_read_stat_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stat");
        std::fs::write(&path, b"btime 1690000000\nweird\xff 1\n").unwrap();

        let content = read_stat(&RealFs::new(), &path).unwrap();
        assert_eq!(content, "btime 1690000000\nweird\u{FFFD} 1\n");
    }
}

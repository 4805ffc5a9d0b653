//! Reads shader sources from disk.
//!
//! The loader never compiles anything; it only decides what text the compiler
//! sees. Under the default [`MissingSourcePolicy::Degrade`] a file that cannot
//! be opened becomes an empty string, so compilation still runs and produces
//! its own diagnostic. Bytes that are not valid UTF-8 are decoded lossily; the
//! compiler reports whatever that leaves behind.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::{MissingSourcePolicy, StageKind};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {stage} shader at {path}: {source}")]
    Open {
        stage: StageKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Text read for one stage, remembering whether the file was actually found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: StageKind,
    pub path: PathBuf,
    pub text: String,
    pub missing: bool,
}

/// Reads the whole file at `path` as the source for `stage`.
pub fn load_source(
    stage: StageKind,
    path: &Path,
    policy: MissingSourcePolicy,
) -> Result<ShaderSource, LoadError> {
    match fs::read(path) {
        Ok(bytes) => {
            let text = decode(stage, path, bytes);
            tracing::debug!(%stage, path = %path.display(), bytes = text.len(), "loaded shader source");
            Ok(ShaderSource {
                stage,
                path: path.to_path_buf(),
                text,
                missing: false,
            })
        }
        Err(source) => {
            tracing::debug!(%stage, path = %path.display(), error = %source, ?policy, "shader file unreadable");
            match policy {
                MissingSourcePolicy::Degrade => Ok(ShaderSource {
                    stage,
                    path: path.to_path_buf(),
                    text: String::new(),
                    missing: true,
                }),
                MissingSourcePolicy::FailFast => Err(LoadError::Open {
                    stage,
                    path: path.to_path_buf(),
                    source,
                }),
            }
        }
    }
}

fn decode(stage: StageKind, path: &Path, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                %stage,
                path = %path.display(),
                valid_up_to = err.utf8_error().valid_up_to(),
                "shader source is not valid UTF-8; decoding lossily"
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn reads_entire_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("RT_Shader.frag");
        fs::write(&path, "#version 450\nvoid main() {}\n").unwrap();

        let source = load_source(StageKind::Fragment, &path, MissingSourcePolicy::Degrade).unwrap();
        assert_eq!(source.text, "#version 450\nvoid main() {}\n");
        assert!(!source.missing);
        assert_eq!(source.stage, StageKind::Fragment);
    }

    #[test]
    fn missing_file_degrades_to_empty_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.frag");

        let source = load_source(StageKind::Fragment, &path, MissingSourcePolicy::Degrade).unwrap();
        assert!(source.text.is_empty());
        assert!(source.missing);
        assert_eq!(source.path, path);
    }

    #[test]
    fn non_utf8_file_is_read_not_reported_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.frag");
        fs::write(&path, b"// caf\xe9\nvoid main() {}\n").unwrap();

        let source = load_source(StageKind::Fragment, &path, MissingSourcePolicy::FailFast).unwrap();
        assert!(!source.missing);
        assert!(source.text.contains('\u{FFFD}'));
        assert!(source.text.ends_with("void main() {}\n"));
    }

    #[test]
    fn missing_file_fails_fast_when_requested() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.vert");

        let err = load_source(StageKind::Vertex, &path, MissingSourcePolicy::FailFast).unwrap_err();
        let LoadError::Open { stage, path: failed, source } = err;
        assert_eq!(stage, StageKind::Vertex);
        assert_eq!(failed, path);
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }
}

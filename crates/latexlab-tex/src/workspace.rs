//! Ephemeral per-compile directory

use latexlab_core::config::consts::workspace::{DIR_PREFIX, JOB_NAME};
use latexlab_core::{LatexlabError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Uniquely named scratch directory owned by one compile call
///
/// Holds `temp.tex`, the engine's `temp.log` and the artifact. The directory
/// and everything in it is removed when the workspace is dropped, whichever
/// way the compile call exits.
#[derive(Debug)]
pub struct CompileWorkspace {
    dir: TempDir,
}

impl CompileWorkspace {
    /// Create a fresh workspace under `parent`, or the system temp dir
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        tracing::debug!("created compile workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_path(&self) -> PathBuf {
        self.file(format!("{}.tex", JOB_NAME))
    }

    pub fn log_path(&self) -> PathBuf {
        self.file(format!("{}.log", JOB_NAME))
    }

    pub fn artifact_path(&self, extension: &str) -> PathBuf {
        self.file(format!("{}.{}", JOB_NAME, extension))
    }

    fn file(&self, name: String) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write the source text as UTF-8
    pub fn write_source(&self, source: &str) -> Result<()> {
        std::fs::write(self.source_path(), source.as_bytes())?;
        Ok(())
    }

    /// Contents of the engine log, or `None` if the engine wrote none
    ///
    /// Logs are not guaranteed to be UTF-8; invalid bytes are replaced.
    pub fn read_log(&self) -> Result<Option<String>> {
        match std::fs::read(self.log_path()) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Bytes of the produced artifact
    pub fn read_artifact(&self, extension: &str) -> Result<Vec<u8>> {
        let path = self.artifact_path(extension);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LatexlabError::ArtifactMissing { path })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latexlab_testkit::{count_entries, temp_dir_in_workspace};

    #[test]
    fn test_workspace_layout() {
        let workspace = CompileWorkspace::create(None).unwrap();
        let dir = workspace.path();
        assert!(dir.is_dir());
        assert!(
            dir.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("latexlab-")
        );
        assert_eq!(workspace.source_path(), dir.join("temp.tex"));
        assert_eq!(workspace.log_path(), dir.join("temp.log"));
        assert_eq!(workspace.artifact_path("dvi"), dir.join("temp.dvi"));
    }

    #[test]
    fn test_workspace_removed_on_drop() {
        let parent = temp_dir_in_workspace();
        let workspace = CompileWorkspace::create(Some(parent.path())).unwrap();
        workspace.write_source("\\relax").unwrap();
        std::fs::write(workspace.log_path(), "log").unwrap();
        let dir = workspace.path().to_path_buf();
        assert_eq!(count_entries(parent.path()), 1);

        drop(workspace);
        assert!(!dir.exists());
        assert_eq!(count_entries(parent.path()), 0);
    }

    #[test]
    fn test_source_written_as_utf8() {
        let workspace = CompileWorkspace::create(None).unwrap();
        workspace.write_source("Grüße").unwrap();
        let bytes = std::fs::read(workspace.source_path()).unwrap();
        assert_eq!(bytes, "Grüße".as_bytes());
    }

    #[test]
    fn test_missing_log_is_none() {
        let workspace = CompileWorkspace::create(None).unwrap();
        assert_eq!(workspace.read_log().unwrap(), None);
    }

    #[test]
    fn test_log_with_invalid_utf8() {
        let workspace = CompileWorkspace::create(None).unwrap();
        std::fs::write(workspace.log_path(), b"caf\xe9 run").unwrap();
        let log = workspace.read_log().unwrap().unwrap();
        assert!(log.ends_with(" run"));
    }

    #[test]
    fn test_missing_artifact() {
        let workspace = CompileWorkspace::create(None).unwrap();
        match workspace.read_artifact("pdf") {
            Err(LatexlabError::ArtifactMissing { path }) => {
                assert_eq!(path, workspace.artifact_path("pdf"));
            }
            other => panic!("Expected ArtifactMissing, got {:?}", other),
        }
    }
}

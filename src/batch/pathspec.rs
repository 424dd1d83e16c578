//! `-f/--file` and `-d/--dir` path specs, validated before any comparison.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::decode::sniff_path;
use crate::matching::FileKey;

/// One side of a comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    File(PathBuf),
    Dir(PathBuf),
}

/// Why a path spec was rejected before the run started.
#[derive(Debug, Error)]
pub enum PathSpecError {
    /// The flag is neither a file nor a directory spec.
    #[error("Incorrect pathspec.")]
    UnknownFlag { flag: String },
    /// A file spec names something that is not a regular file.
    #[error("File {path} does not exist.")]
    MissingFile { path: PathBuf },
    /// A directory spec names something that is not a directory.
    #[error("Directory {path} does not exist.")]
    MissingDir { path: PathBuf },
    /// Directory specs must be flat.
    #[error("Sub-Directory {path} exists.")]
    SubDirectory { path: PathBuf },
    /// A directory spec listed no files.
    #[error("Directory {path} contains no audio files.")]
    EmptyDir { path: PathBuf },
    /// The content sniffs as none of the supported formats.
    #[error("Unsupported audio format of {path}")]
    Unsupported { path: PathBuf },
    /// Listing, sniffing or canonicalising a path failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PathSpec {
    /// Build a spec from a CLI flag and its path argument.
    pub fn from_flag(flag: &str, path: impl Into<PathBuf>) -> Result<Self, PathSpecError> {
        match flag {
            "-f" | "--file" => Ok(Self::File(path.into())),
            "-d" | "--dir" => Ok(Self::Dir(path.into())),
            other => Err(PathSpecError::UnknownFlag {
                flag: other.to_string(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Dir(path) => path,
        }
    }

    /// Validate the spec and list its files, sorted by file name for
    /// directories.
    pub fn resolve(&self) -> Result<Vec<FileKey>, PathSpecError> {
        match self {
            Self::File(path) => {
                if !path.is_file() {
                    return Err(PathSpecError::MissingFile { path: path.clone() });
                }
                Ok(vec![audio_file_key(path)?])
            }
            Self::Dir(path) => resolve_dir(path),
        }
    }
}

fn resolve_dir(dir: &Path) -> Result<Vec<FileKey>, PathSpecError> {
    if !dir.is_dir() {
        return Err(PathSpecError::MissingDir {
            path: dir.to_path_buf(),
        });
    }
    let read_err = |source| PathSpecError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        entries.push(entry.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut keys = Vec::with_capacity(entries.len());
    for path in entries {
        if path.is_dir() {
            return Err(PathSpecError::SubDirectory { path });
        }
        keys.push(audio_file_key(&path)?);
    }
    if keys.is_empty() {
        return Err(PathSpecError::EmptyDir {
            path: dir.to_path_buf(),
        });
    }
    Ok(keys)
}

fn audio_file_key(path: &Path) -> Result<FileKey, PathSpecError> {
    let read_err = |source| PathSpecError::Read {
        path: path.to_path_buf(),
        source,
    };
    if sniff_path(path).map_err(read_err)?.is_none() {
        return Err(PathSpecError::Unsupported {
            path: path.to_path_buf(),
        });
    }
    let resolved = std::fs::canonicalize(path).map_err(read_err)?;
    Ok(FileKey::new(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WAV_HEADER: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

    #[test]
    fn flags_map_to_spec_kinds() {
        assert_eq!(
            PathSpec::from_flag("--file", "a.wav").unwrap(),
            PathSpec::File("a.wav".into())
        );
        assert_eq!(
            PathSpec::from_flag("-d", "songs").unwrap(),
            PathSpec::Dir("songs".into())
        );
        let err = PathSpec::from_flag("-x", "a.wav").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect pathspec.");
    }

    #[test]
    fn directory_listing_is_sorted_by_name() {
        let dir = tempdir().unwrap();
        for name in ["c.wav", "a.wav", "b.wav"] {
            std::fs::write(dir.path().join(name), WAV_HEADER).unwrap();
        }
        let keys = PathSpec::Dir(dir.path().to_path_buf()).resolve().unwrap();
        let names: Vec<String> = keys.iter().map(FileKey::display_name).collect();
        assert_eq!(names, vec!["a.wav", "b.wav", "c.wav"]);
    }

    #[test]
    fn sub_directory_is_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.wav"), WAV_HEADER).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let err = PathSpec::Dir(dir.path().to_path_buf()).resolve().unwrap_err();
        assert!(matches!(err, PathSpecError::SubDirectory { .. }));
        assert!(err.to_string().starts_with("Sub-Directory "));
    }

    #[test]
    fn non_audio_content_is_rejected_regardless_of_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        std::fs::write(&path, b"plain text").unwrap();
        let err = PathSpec::File(path).resolve().unwrap_err();
        assert!(matches!(err, PathSpecError::Unsupported { .. }));
    }

    #[test]
    fn missing_paths_are_reported_by_kind() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(matches!(
            PathSpec::File(missing.clone()).resolve(),
            Err(PathSpecError::MissingFile { .. })
        ));
        assert!(matches!(
            PathSpec::Dir(missing).resolve(),
            Err(PathSpecError::MissingDir { .. })
        ));
        // A directory passed as a file is not a file.
        assert!(matches!(
            PathSpec::File(dir.path().to_path_buf()).resolve(),
            Err(PathSpecError::MissingFile { .. })
        ));
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            PathSpec::Dir(dir.path().to_path_buf()).resolve(),
            Err(PathSpecError::EmptyDir { .. })
        ));
    }
}

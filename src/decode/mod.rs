//! Decoding collaborator: turns an audio file into canonical mono 16-bit PCM.

mod pcm;
pub mod sniff;
mod symphonia_io;
mod wav;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use sniff::{AudioFormat, sniff_path};

/// Canonical decoded audio for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream {
    /// Mono signed 16-bit little-endian PCM.
    pub pcm: Vec<u8>,
    /// Byte length promised by the container; may exceed `pcm.len()` for
    /// truncated files.
    pub declared_len: usize,
    pub sample_rate: u32,
    /// Channel count of the source before downmixing.
    pub channels: u16,
}

/// Source of decoded sample streams for the comparator.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedStream, DecodeError>;
}

/// Errors raised while turning a file into PCM.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or sniffed.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content is not WAV, MP3, FLAC or AIFF.
    #[error("Unsupported audio format of {path}")]
    Unsupported { path: PathBuf },
    /// `hound` rejected the WAV header or data.
    #[error("Invalid WAV {path}: {source}")]
    Wav { path: PathBuf, source: hound::Error },
    /// `symphonia` failed to probe, read or decode the stream.
    #[error("Audio decode failed for {path}: {source}")]
    Symphonia {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },
    /// The container has no default track.
    #[error("No default track in {path}")]
    MissingTrack { path: PathBuf },
    /// The track does not state a required codec parameter.
    #[error("Missing {field} for {path}")]
    MissingParameter { path: PathBuf, field: &'static str },
    /// The stream decoded to zero samples.
    #[error("Decoded 0 samples for {path}")]
    NoSamples { path: PathBuf },
}

/// Interleaved float samples straight out of a container decoder.
#[derive(Debug)]
pub(crate) struct RawAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    /// Frames the container header promises, when it states a count.
    pub(crate) declared_frames: Option<usize>,
}

/// Decodes WAV through `hound` and MP3/FLAC/AIFF through `symphonia`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecoder {
    resample_to: Option<u32>,
}

impl DefaultDecoder {
    pub fn new(resample_to: Option<u32>) -> Self {
        Self { resample_to }
    }
}

impl AudioDecoder for DefaultDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedStream, DecodeError> {
        let format = sniff_path(path)
            .map_err(|source| DecodeError::Open {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| DecodeError::Unsupported {
                path: path.to_path_buf(),
            })?;
        let raw = match format {
            AudioFormat::Wav => wav::decode_wav(path)?,
            other => symphonia_io::decode_with_symphonia(path, other)?,
        };
        Ok(pcm::canonicalize(raw, self.resample_to))
    }
}

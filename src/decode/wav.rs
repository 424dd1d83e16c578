//! WAV reading through `hound`.

use std::io::{self, BufReader};
use std::path::Path;

use hound::SampleFormat;

use super::{DecodeError, RawAudio};

const READ_BUFFER_BYTES: usize = 1024 * 1024;

/// Read every sample the file actually holds.
///
/// A data chunk shorter than its header promises is not an error here: the
/// samples present are returned and `declared_frames` keeps the header count,
/// so the shortfall surfaces during magnitude extraction.
pub(super) fn decode_wav(path: &Path) -> Result<RawAudio, DecodeError> {
    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let file_len = file.metadata().map(|meta| meta.len()).unwrap_or(0);
    let buf_reader = BufReader::with_capacity(READ_BUFFER_BYTES, file);
    let mut reader = hound::WavReader::new(buf_reader).map_err(|source| wav_error(path, source))?;
    let spec = reader.spec();
    let declared_frames = reader.duration() as usize;

    // Headers can claim far more data than the file holds.
    let bytes_per_sample = u64::from(spec.bits_per_sample.div_ceil(8).max(1));
    let capacity = u64::from(reader.len()).min(file_len / bytes_per_sample);
    let mut samples = Vec::with_capacity(capacity as usize);
    match spec.sample_format {
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                match sample {
                    Ok(value) => samples.push(value),
                    Err(err) if is_truncation(&err) => break,
                    Err(err) => return Err(wav_error(path, err)),
                }
            }
        }
        SampleFormat::Int => {
            let scale = (1_i64 << spec.bits_per_sample.saturating_sub(1)).max(1) as f32;
            for sample in reader.samples::<i32>() {
                match sample {
                    Ok(value) => samples.push(value as f32 / scale),
                    Err(err) if is_truncation(&err) => break,
                    Err(err) => return Err(wav_error(path, err)),
                }
            }
        }
    }

    Ok(RawAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        declared_frames: Some(declared_frames),
    })
}

fn is_truncation(err: &hound::Error) -> bool {
    matches!(err, hound::Error::IoError(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof)
}

fn wav_error(path: &Path, source: hound::Error) -> DecodeError {
    DecodeError::Wav {
        path: path.to_path_buf(),
        source,
    }
}

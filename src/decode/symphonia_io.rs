use std::fs::File;
use std::io;
use std::path::Path;

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

use super::{AudioFormat, DecodeError, RawAudio};

/// Decode MP3, FLAC or AIFF into interleaved `f32` samples.
///
/// Compressed containers give no trustworthy byte length up front, so the
/// decoded length stands in for the declared one. Only a clean end of stream
/// stops the packet loop; any other read failure fails the file.
pub(super) fn decode_with_symphonia(
    path: &Path,
    format: AudioFormat,
) -> Result<RawAudio, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    hint.with_extension(format.extension_hint());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| symphonia_error(path, source))?;
    let mut reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| DecodeError::MissingTrack {
            path: path.to_path_buf(),
        })?;
    let track_id = track.id;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| missing(path, "sample rate"))?;
    let channels = codec_params
        .channels
        .ok_or_else(|| missing(path, "channel count"))?
        .count() as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|source| symphonia_error(path, source))?;

    let mut samples = Vec::new();
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(err) if is_end_of_stream(&err) => break,
            Err(err) => return Err(symphonia_error(path, err)),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(_)) => continue,
            Err(err) => return Err(symphonia_error(path, err)),
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(DecodeError::NoSamples {
            path: path.to_path_buf(),
        });
    }

    Ok(RawAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
        declared_frames: None,
    })
}

fn is_end_of_stream(err: &Error) -> bool {
    matches!(err, Error::IoError(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof)
}

fn symphonia_error(path: &Path, source: Error) -> DecodeError {
    DecodeError::Symphonia {
        path: path.to_path_buf(),
        source,
    }
}

fn missing(path: &Path, field: &'static str) -> DecodeError {
    DecodeError::MissingParameter {
        path: path.to_path_buf(),
        field,
    }
}

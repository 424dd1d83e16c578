use super::{DecodedStream, RawAudio};

/// Average interleaved frames down to one channel.
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().copied().map(sanitize_sample).collect();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().copied().map(sanitize_sample).sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono samples using linear interpolation.
pub fn resample_linear_into(
    out: &mut Vec<f32>,
    samples: &[f32],
    input_rate: u32,
    output_rate: u32,
) {
    let input_rate = input_rate.max(1);
    let output_rate = output_rate.max(1);
    out.clear();
    if samples.is_empty() || input_rate == output_rate {
        out.extend_from_slice(samples);
        return;
    }
    let out_len = resampled_len(samples.len(), input_rate, output_rate);
    out.reserve(out_len);
    for i in 0..out_len {
        let t = i as f64 / output_rate as f64;
        let pos = t * input_rate as f64;
        out.push(lerp_sample(samples, pos));
    }
}

/// Signed 16-bit little-endian PCM, clipping out-of-range samples.
pub fn quantize_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let scaled = (sample * 32_768.0).round().clamp(i16::MIN as f32, i16::MAX as f32);
        pcm.extend_from_slice(&(scaled as i16).to_le_bytes());
    }
    pcm
}

pub(super) fn canonicalize(raw: RawAudio, resample_to: Option<u32>) -> DecodedStream {
    let mono = downmix_to_mono(&raw.samples, raw.channels);
    let decoded_frames = mono.len();
    let declared_frames = raw.declared_frames.unwrap_or(decoded_frames);

    let (mono, sample_rate, declared_frames) = match resample_to {
        Some(rate) if rate != raw.sample_rate => {
            let mut resampled = Vec::new();
            resample_linear_into(&mut resampled, &mono, raw.sample_rate, rate);
            let declared = if declared_frames == decoded_frames {
                resampled.len()
            } else {
                resampled_len(declared_frames, raw.sample_rate, rate)
            };
            (resampled, rate, declared)
        }
        _ => (mono, raw.sample_rate, declared_frames),
    };

    DecodedStream {
        pcm: quantize_to_pcm16(&mono),
        declared_len: declared_frames.saturating_mul(2),
        sample_rate,
        channels: raw.channels,
    }
}

fn resampled_len(frames: usize, input_rate: u32, output_rate: u32) -> usize {
    if frames == 0 {
        return 0;
    }
    let duration_seconds = frames as f64 / input_rate.max(1) as f64;
    (duration_seconds * output_rate.max(1) as f64).round().max(1.0) as usize
}

fn lerp_sample(samples: &[f32], pos: f64) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let idx0 = pos.floor().max(0.0) as usize;
    let frac = (pos - idx0 as f64).clamp(0.0, 1.0) as f32;
    let idx1 = idx0.saturating_add(1).min(samples.len().saturating_sub(1));
    let a = samples.get(idx0).copied().unwrap_or(0.0);
    let b = samples.get(idx1).copied().unwrap_or(a);
    a + (b - a) * frac
}

fn sanitize_sample(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

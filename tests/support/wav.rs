use std::path::Path;

/// Rate used by every fixture; one trend window is 800 samples.
pub const FIXTURE_RATE: u32 = 8_000;
const WINDOW: usize = FIXTURE_RATE as usize / 10;
const HALF_PERIOD: usize = 20;

pub fn write_pcm16_wav(path: &Path, samples: &[i16], channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: FIXTURE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        for _ in 0..channels {
            writer.write_sample(sample).expect("write wav sample");
        }
    }
    writer.finalize().expect("finalize wav");
}

/// Square wave whose amplitude is held for one trend window per entry.
pub fn square_wave(amplitudes: &[i16]) -> Vec<i16> {
    amplitudes
        .iter()
        .flat_map(|&amplitude| {
            (0..WINDOW).map(move |idx| {
                if (idx / HALF_PERIOD) % 2 == 0 {
                    amplitude
                } else {
                    -amplitude
                }
            })
        })
        .collect()
}

/// Four seconds with two falling and two rising stretches.
pub fn song_amplitudes() -> Vec<i16> {
    (0..40)
        .map(|window: i16| match window {
            0..=9 => 20_000 - 1_500 * window,
            10..=19 => 8_000 + 1_500 * (window - 10),
            20..=28 => 20_000 - 1_500 * (window - 20),
            _ => 9_500 + 1_500 * (window - 29),
        })
        .collect()
}

/// Full song samples.
pub fn song() -> Vec<i16> {
    square_wave(&song_amplitudes())
}

/// Seconds one to three of [`song`].
pub fn excerpt() -> Vec<i16> {
    song()[8_000..24_000].to_vec()
}

/// Cut `bytes` off the end of a file so its header over-promises.
pub fn truncate_file(path: &Path, bytes: usize) {
    let data = std::fs::read(path).expect("read fixture");
    std::fs::write(path, &data[..data.len() - bytes]).expect("truncate fixture");
}

/// Rewrite the data chunk size the way an unfinished stream leaves it.
pub fn overstate_data_chunk(path: &Path, declared: u32) {
    let mut data = std::fs::read(path).expect("read fixture");
    let data_at = data
        .windows(4)
        .position(|window| window == b"data")
        .expect("data chunk");
    data[data_at + 4..data_at + 8].copy_from_slice(&declared.to_le_bytes());
    std::fs::write(path, &data).expect("rewrite fixture");
}

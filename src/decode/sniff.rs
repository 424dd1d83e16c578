//! Content sniffing for the audio containers the decoder understands.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const SNIFF_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Aiff,
}

impl AudioFormat {
    /// Extension passed to the demuxer as a probe hint.
    pub fn extension_hint(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Flac => "flac",
            AudioFormat::Aiff => "aiff",
        }
    }
}

/// Identify the container from its leading bytes.
pub fn sniff_bytes(header: &[u8]) -> Option<AudioFormat> {
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WAVE" {
        return Some(AudioFormat::Wav);
    }
    if header.len() >= 12
        && &header[0..4] == b"FORM"
        && matches!(&header[8..12], b"AIFF" | b"AIFC")
    {
        return Some(AudioFormat::Aiff);
    }
    if header.starts_with(b"fLaC") {
        return Some(AudioFormat::Flac);
    }
    if header.starts_with(b"ID3") || is_mpeg_layer3_sync(header) {
        return Some(AudioFormat::Mp3);
    }
    None
}

/// Sniff a file on disk. `Ok(None)` means the content is not a supported format.
pub fn sniff_path(path: &Path) -> io::Result<Option<AudioFormat>> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(sniff_bytes(&header))
}

// 11 sync bits, then layer bits `01` (layer III).
fn is_mpeg_layer3_sync(header: &[u8]) -> bool {
    match header {
        [first, second, ..] => {
            *first == 0xFF && second & 0xE0 == 0xE0 && (second >> 1) & 0b11 == 0b01
        }
        _ => false,
    }
}

pub mod controller;
pub mod engine;
pub mod equalizer;
pub mod playlist;
pub mod scanner;
pub mod track;

pub use controller::PlayerController;
pub use engine::{PlaybackEngine, PlaybackState, RodioEngine};
pub use equalizer::{EqSettings, EqualizedAudio};
pub use playlist::{Playlist, PlaylistError};
pub use scanner::MusicScanner;
pub use track::{Track, TrackMetadata};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Unknown,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "mp3" => AudioFormat::Mp3,
            "wav" => AudioFormat::Wav,
            _ => AudioFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("mp3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_extension("MP3"), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_extension("wav"), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_extension("flac"), AudioFormat::Unknown);
        assert!(!AudioFormat::from_extension("m4a").is_supported());
    }
}

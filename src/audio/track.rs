use super::AudioFormat;
use anyhow::Result;
use id3::TagLike;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Track {
    pub file_path: PathBuf,
    pub metadata: TrackMetadata,
    pub format: AudioFormat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Build a track for `file_path`, reading embedded tags when present.
    /// Tag failures are logged and fall back to filename-derived display.
    pub fn load(file_path: PathBuf) -> Self {
        let format = file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .unwrap_or(AudioFormat::Unknown);

        let metadata = match TrackMetadata::read(&file_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("No readable tags in {}: {}", file_path.display(), e);
                TrackMetadata::default()
            }
        };

        Self {
            file_path,
            metadata,
            format,
        }
    }

    pub fn display_title(&self) -> String {
        self.metadata.title.clone().unwrap_or_else(|| {
            self.file_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Unknown")
                .to_string()
        })
    }

    pub fn display_artist(&self) -> String {
        self.metadata
            .artist
            .clone()
            .unwrap_or_else(|| "Unknown Artist".to_string())
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.file_path)
    }

    pub fn is_playable(&self) -> bool {
        self.format.is_supported() && self.file_path.exists()
    }
}

impl TrackMetadata {
    /// Read title/artist/album/duration from the file's id3 tag. Errors are
    /// returned so the caller can decide to keep a stale display instead.
    pub fn read(path: &Path) -> Result<Self> {
        let tag = id3::Tag::read_from_path(path)?;
        Ok(Self::from_id3_tag(&tag))
    }

    pub fn from_id3_tag(tag: &id3::Tag) -> Self {
        Self {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            duration_ms: tag.duration().map(|d| d as u64),
        }
    }

    pub fn duration_string(&self) -> String {
        match self.duration_ms {
            Some(ms) => {
                let secs = ms / 1000;
                format!("{}:{:02}", secs / 60, secs % 60)
            }
            None => "?:??".to_string(),
        }
    }
}

/// Last path component as shown in the playlist pane and notifications.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_falls_back_to_filename() {
        let track = Track {
            file_path: PathBuf::from("/music/Heavy Is the Crown.mp3"),
            metadata: TrackMetadata::default(),
            format: AudioFormat::Mp3,
        };
        assert_eq!(track.display_title(), "Heavy Is the Crown");
        assert_eq!(track.display_artist(), "Unknown Artist");
        assert_eq!(track.file_name(), "Heavy Is the Crown.mp3");
    }

    #[test]
    fn test_load_without_tags_keeps_default_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untitled.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let track = Track::load(path);
        assert_eq!(track.metadata, TrackMetadata::default());
        assert_eq!(track.display_title(), "untitled");
        assert_eq!(track.format, AudioFormat::Wav);
    }

    #[test]
    fn test_metadata_read_failure_is_an_error() {
        assert!(TrackMetadata::read(Path::new("/nonexistent/file.mp3")).is_err());
    }

    #[test]
    fn test_duration_string() {
        let metadata = TrackMetadata {
            duration_ms: Some(245_000),
            ..Default::default()
        };
        assert_eq!(metadata.duration_string(), "4:05");
        assert_eq!(TrackMetadata::default().duration_string(), "?:??");
    }
}

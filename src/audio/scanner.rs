use super::{AudioFormat, Track};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Walks the configured music directories and yields the mp3/wav files the
/// browser pane offers for loading.
#[derive(Clone, Default)]
pub struct MusicScanner;

impl MusicScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Track>> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(Result::ok) {
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            // Skip hidden files (dotfiles)
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with('.'))
            {
                continue;
            }

            // Skip empty files
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() == 0 {
                    continue;
                }
            }

            if self.is_supported_file(path) {
                tracks.push(Track::load(path.to_path_buf()));
            }
        }

        tracks.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        Ok(tracks)
    }

    pub fn scan_directories(&self, paths: &[PathBuf]) -> Result<Vec<Track>> {
        let mut all_tracks = Vec::new();

        for path in paths {
            if path.exists() {
                let mut tracks = self.scan_directory(path)?;
                all_tracks.append(&mut tracks);
            }
        }

        info!("Library scan found {} tracks", all_tracks.len());
        Ok(all_tracks)
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(AudioFormat::from_extension)
            .map_or(false, |f| f.is_supported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp3", "a.wav", "notes.txt", ".hidden.mp3", "clip.flac"] {
            fs::write(dir.path().join(name), b"data").unwrap();
        }
        fs::write(dir.path().join("empty.mp3"), b"").unwrap();

        let tracks = MusicScanner::new().scan_directory(dir.path()).unwrap();
        let names: Vec<String> = tracks.iter().map(|t| t.file_name()).collect();
        assert_eq!(names, vec!["a.wav", "b.mp3"]);
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let tracks = MusicScanner::new()
            .scan_directories(&[PathBuf::from("/definitely/not/here")])
            .unwrap();
        assert!(tracks.is_empty());
    }
}

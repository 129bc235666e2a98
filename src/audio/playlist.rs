use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum PlaylistError {
    #[error("Playlist is empty")]
    Empty,
}

/// In-memory play queue. Entries keep insertion order; `cursor` is the index
/// the next play starts from and is only meaningful while the playlist is
/// non-empty.
#[derive(Debug, Default)]
pub struct Playlist {
    entries: Vec<PathBuf>,
    cursor: usize,
    shuffle: bool,
    repeat: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf) {
        info!("Added track to playlist: {}", path.display());
        self.entries.push(path);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.cursor = index;
        }
    }

    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.cursor).map(|p| p.as_path())
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    /// Move the cursor forward. Repeat keeps the cursor in place, shuffle
    /// picks a uniform random index (the current one included), otherwise the
    /// cursor advances by one and wraps at the end.
    pub fn advance(&mut self, rng: &mut impl Rng) -> Result<usize, PlaylistError> {
        if self.entries.is_empty() {
            return Err(PlaylistError::Empty);
        }
        if self.repeat {
            return Ok(self.cursor);
        }
        self.cursor = if self.shuffle {
            rng.gen_range(0..self.entries.len())
        } else {
            (self.cursor + 1) % self.entries.len()
        };
        Ok(self.cursor)
    }

    /// Move the cursor back by one, wrapping to the last entry at index 0.
    /// Repeat keeps the cursor in place here as well.
    pub fn previous(&mut self) -> Result<usize, PlaylistError> {
        if self.entries.is_empty() {
            return Err(PlaylistError::Empty);
        }
        if !self.repeat {
            self.cursor = (self.cursor + self.entries.len() - 1) % self.entries.len();
        }
        Ok(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn playlist_of(n: usize) -> Playlist {
        let mut playlist = Playlist::new();
        for i in 0..n {
            playlist.add(PathBuf::from(format!("track{}.mp3", i)));
        }
        playlist
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut playlist = Playlist::new();
        playlist.add(PathBuf::from("a.mp3"));
        playlist.add(PathBuf::from("b.mp3"));
        assert_eq!(
            playlist.entries(),
            &[PathBuf::from("a.mp3"), PathBuf::from("b.mp3")]
        );
        assert_eq!(playlist.current(), Some(Path::new("a.mp3")));
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut playlist = playlist_of(4);
        let mut rng = StdRng::seed_from_u64(7);

        let mut visited = Vec::new();
        for _ in 0..4 {
            visited.push(playlist.advance(&mut rng).unwrap());
        }
        assert_eq!(visited, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut playlist = playlist_of(5);
        assert_eq!(playlist.previous().unwrap(), 4);
        assert_eq!(playlist.previous().unwrap(), 3);
    }

    #[test]
    fn test_empty_navigation_is_a_defined_failure() {
        let mut playlist = Playlist::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(playlist.advance(&mut rng), Err(PlaylistError::Empty));
        assert_eq!(playlist.previous(), Err(PlaylistError::Empty));
    }

    #[test]
    fn test_shuffle_stays_in_range() {
        let mut playlist = playlist_of(3);
        playlist.toggle_shuffle();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let idx = playlist.advance(&mut rng).unwrap();
            assert!(idx < 3);
        }
    }

    #[test]
    fn test_repeat_replays_current_index() {
        let mut playlist = playlist_of(3);
        playlist.select(1);
        playlist.toggle_repeat();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(playlist.advance(&mut rng).unwrap(), 1);
        assert_eq!(playlist.previous().unwrap(), 1);
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let mut playlist = playlist_of(2);
        playlist.select(5);
        assert_eq!(playlist.cursor(), 0);
    }
}

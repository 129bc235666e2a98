//! The bare text-menu player: one loaded song, one paused flag, and direct
//! delegation to the playback engine. Invalid transitions (double pause,
//! resume without pause, play without load) are reported, never errors.

use crate::audio::PlaybackEngine;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct ConsolePlayer<E: PlaybackEngine> {
    engine: E,
    current_song: Option<PathBuf>,
    paused: bool,
}

impl<E: PlaybackEngine> ConsolePlayer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            current_song: None,
            paused: false,
        }
    }

    pub fn current_song(&self) -> Option<&Path> {
        self.current_song.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replace the loaded song. A missing path is reported and leaves the
    /// player untouched; `paused` survives a load either way.
    pub fn load(&mut self, path: &Path) -> String {
        if path.exists() {
            self.current_song = Some(path.to_path_buf());
            format!("Loaded: {}", path.display())
        } else {
            format!("File not found: {}", path.display())
        }
    }

    /// Start the loaded song from the beginning.
    pub fn play(&mut self) -> Result<String> {
        match self.current_song.clone() {
            Some(song) => {
                self.engine.play(&song)?;
                Ok(format!("Playing: {}", song.display()))
            }
            None => Ok("No song loaded".to_string()),
        }
    }

    pub fn pause(&mut self) -> Result<String> {
        if self.paused {
            Ok("Already paused".to_string())
        } else {
            self.engine.pause()?;
            self.paused = true;
            Ok("Paused".to_string())
        }
    }

    pub fn resume(&mut self) -> Result<String> {
        if self.paused {
            self.engine.resume()?;
            self.paused = false;
            Ok("Resumed".to_string())
        } else {
            Ok("Not paused".to_string())
        }
    }

    /// Unconditional stop; neither the loaded song nor `paused` is cleared.
    pub fn stop(&mut self) -> Result<String> {
        self.engine.stop()?;
        Ok("Stopped".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::engine::fake::{EngineCall, FakeEngine};

    fn player() -> ConsolePlayer<FakeEngine> {
        ConsolePlayer::new(FakeEngine::new())
    }

    #[test]
    fn test_load_missing_path_changes_nothing() {
        let mut player = player();
        let msg = player.load(Path::new("/no/such/song.mp3"));
        assert!(msg.starts_with("File not found"));
        assert!(player.current_song().is_none());
        assert!(player.engine.calls.is_empty());
    }

    #[test]
    fn test_load_replaces_current_song_and_keeps_paused() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("song.mp3");
        std::fs::write(&song, b"data").unwrap();

        let mut player = player();
        player.pause().unwrap();
        let msg = player.load(&song);
        assert!(msg.starts_with("Loaded"));
        assert_eq!(player.current_song(), Some(song.as_path()));
        assert!(player.is_paused());
    }

    #[test]
    fn test_play_without_load_reports_only() {
        let mut player = player();
        assert_eq!(player.play().unwrap(), "No song loaded");
        assert!(player.engine.calls.is_empty());
    }

    #[test]
    fn test_double_pause_issues_one_engine_call() {
        let mut player = player();
        assert_eq!(player.pause().unwrap(), "Paused");
        assert_eq!(player.pause().unwrap(), "Already paused");
        assert!(player.is_paused());
        assert_eq!(
            player
                .engine
                .calls
                .iter()
                .filter(|c| **c == EngineCall::Pause)
                .count(),
            1
        );
    }

    #[test]
    fn test_resume_without_pause_is_a_no_op() {
        let mut player = player();
        assert_eq!(player.resume().unwrap(), "Not paused");
        assert!(!player.is_paused());
        assert!(player.engine.calls.is_empty());
    }

    #[test]
    fn test_stop_is_unconditional_and_clears_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("song.mp3");
        std::fs::write(&song, b"data").unwrap();

        let mut player = player();
        player.load(&song);
        player.pause().unwrap();
        assert_eq!(player.stop().unwrap(), "Stopped");
        assert_eq!(player.current_song(), Some(song.as_path()));
        assert!(player.is_paused());
        assert!(player.engine.calls.contains(&EngineCall::Stop));
    }
}

use super::engine::{PlaybackEngine, PlaybackState};
use super::equalizer::{self, EqSettings, EqualizedAudio};
use super::playlist::Playlist;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Playlist, equalizer and mixer orchestration for the deck UI.
///
/// Generic over the engine so the whole control surface can be exercised
/// against a recording fake. The engine's state enum is the single source of
/// truth for "playing vs paused vs never started".
pub struct PlayerController<E: PlaybackEngine> {
    engine: E,
    playlist: Playlist,
    current: Option<PathBuf>,
    volume: f32,
    equalized: Option<EqualizedAudio>,
    // Keeps the exported WAV alive while the engine reads from it; replaced
    // (and the old file deleted) on the next equalized play.
    eq_export: Option<NamedTempFile>,
}

impl<E: PlaybackEngine> PlayerController<E> {
    pub fn new(engine: E, volume: f32) -> Self {
        Self {
            engine,
            playlist: Playlist::new(),
            current: None,
            volume,
            equalized: None,
            eq_export: None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn has_equalizer(&self) -> bool {
        self.equalized.is_some()
    }

    /// Append a track to the playlist without selecting it as current.
    pub fn add_track(&mut self, path: PathBuf) {
        self.playlist.add(path);
    }

    pub fn select(&mut self, index: usize) {
        self.playlist.select(index);
    }

    /// Start playback of the track under the playlist cursor. When a rendered
    /// equalizer buffer exists it is exported to a fresh scoped WAV and that
    /// file is played instead of the original.
    pub fn play_current(&mut self) -> Result<PathBuf> {
        let path = self
            .playlist
            .current()
            .ok_or(super::playlist::PlaylistError::Empty)?
            .to_path_buf();
        self.current = Some(path.clone());

        if let Some(audio) = &self.equalized {
            let export = equalizer::export(audio)?;
            self.engine.play(export.path())?;
            self.eq_export = Some(export);
        } else {
            self.engine.play(&path)?;
        }
        self.engine.set_volume(self.volume)?;

        info!("Now playing: {}", path.display());
        Ok(path)
    }

    /// Space-bar semantics. Returns the started path when a cold start
    /// happened so the caller can refresh metadata and notify.
    pub fn play_pause(&mut self) -> Result<Option<PathBuf>> {
        match self.engine.state() {
            PlaybackState::Playing => {
                self.engine.pause()?;
                Ok(None)
            }
            PlaybackState::Paused => {
                self.engine.resume()?;
                Ok(None)
            }
            PlaybackState::Idle | PlaybackState::Stopped => self.play_current().map(Some),
        }
    }

    /// Stop playback. Playlist, cursor and current track are untouched.
    pub fn stop(&mut self) -> Result<()> {
        self.engine.stop()
    }

    pub fn next(&mut self) -> Result<PathBuf> {
        self.playlist.advance(&mut rand::thread_rng())?;
        self.play_current()
    }

    pub fn previous(&mut self) -> Result<PathBuf> {
        self.playlist.previous()?;
        self.play_current()
    }

    /// Store the volume and forward it to the engine exactly as given.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        self.engine.set_volume(volume)
    }

    /// Render the current song through the three bands and keep the result
    /// for the next play. Returns false when nothing has been played yet.
    pub fn apply_equalizer(&mut self, settings: &EqSettings) -> Result<bool> {
        let Some(path) = self.current.clone() else {
            debug!("Equalizer apply ignored, no current song");
            return Ok(false);
        };
        self.equalized = Some(equalizer::render(&path, settings)?);
        Ok(true)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.playlist.toggle_shuffle()
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.playlist.toggle_repeat()
    }

    /// Poll for track completion; advances to the next track when the sink
    /// has drained while we still believe we are playing.
    pub fn poll_finished(&mut self) -> Result<Option<PathBuf>> {
        if self.engine.state() == PlaybackState::Playing
            && self.engine.is_finished()
            && !self.playlist.is_empty()
        {
            return self.next().map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::engine::fake::{EngineCall, FakeEngine};
    use crate::audio::playlist::PlaylistError;

    fn controller_with(paths: &[&str]) -> PlayerController<FakeEngine> {
        let mut controller = PlayerController::new(FakeEngine::new(), 0.7);
        for p in paths {
            controller.add_track(PathBuf::from(p));
        }
        controller
    }

    #[test]
    fn test_add_keeps_order_and_does_not_select() {
        let controller = controller_with(&["a.mp3", "b.mp3"]);
        assert_eq!(
            controller.playlist().entries(),
            &[PathBuf::from("a.mp3"), PathBuf::from("b.mp3")]
        );
        assert!(controller.current().is_none());
        assert!(controller.engine.calls.is_empty());
    }

    #[test]
    fn test_play_next_next_wraps() {
        let mut controller = controller_with(&["a.mp3", "b.mp3"]);

        assert_eq!(controller.play_current().unwrap(), PathBuf::from("a.mp3"));
        assert_eq!(controller.next().unwrap(), PathBuf::from("b.mp3"));
        assert_eq!(controller.next().unwrap(), PathBuf::from("a.mp3"));
        assert_eq!(
            controller.engine.played_paths(),
            vec![
                PathBuf::from("a.mp3"),
                PathBuf::from("b.mp3"),
                PathBuf::from("a.mp3"),
            ]
        );
    }

    #[test]
    fn test_navigation_on_empty_playlist_fails() {
        let mut controller = controller_with(&[]);
        let err = controller.next().unwrap_err();
        assert_eq!(err.downcast::<PlaylistError>().unwrap(), PlaylistError::Empty);
        assert!(controller.previous().is_err());
        assert!(controller.play_current().is_err());
        assert!(controller.engine.calls.is_empty());
    }

    #[test]
    fn test_play_pause_dispatches_on_engine_state() {
        let mut controller = controller_with(&["a.mp3"]);

        // Cold start
        let started = controller.play_pause().unwrap();
        assert_eq!(started, Some(PathBuf::from("a.mp3")));

        // Playing -> pause
        assert_eq!(controller.play_pause().unwrap(), None);
        assert_eq!(controller.state(), PlaybackState::Paused);

        // Paused -> resume
        assert_eq!(controller.play_pause().unwrap(), None);
        assert_eq!(controller.state(), PlaybackState::Playing);

        // Stopped -> cold start again, not a resume of nothing
        controller.stop().unwrap();
        assert_eq!(controller.play_pause().unwrap(), Some(PathBuf::from("a.mp3")));
    }

    #[test]
    fn test_volume_forwarded_unclamped() {
        let mut controller = controller_with(&["a.mp3"]);
        controller.set_volume(0.3).unwrap();
        assert_eq!(controller.volume(), 0.3);
        assert!(controller
            .engine
            .calls
            .contains(&EngineCall::SetVolume(0.3)));

        // The controller imposes no range of its own
        controller.set_volume(1.7).unwrap();
        assert!(controller
            .engine
            .calls
            .contains(&EngineCall::SetVolume(1.7)));
    }

    #[test]
    fn test_apply_equalizer_without_current_song_is_a_no_op() {
        let mut controller = controller_with(&["a.mp3"]);
        let applied = controller
            .apply_equalizer(&EqSettings::default())
            .unwrap();
        assert!(!applied);
        assert!(!controller.has_equalizer());
    }

    #[test]
    fn test_equalizer_only_affects_the_next_play() {
        let mut controller = controller_with(&["a.mp3"]);
        controller.play_current().unwrap();

        let calls_before = controller.engine.calls.len();
        controller.equalized = Some(EqualizedAudio {
            channels: 1,
            sample_rate: 8000,
            samples: vec![0.0; 16],
        });
        // Storing the rendered buffer issues no engine call
        assert_eq!(controller.engine.calls.len(), calls_before);

        // The next play reports the playlist entry but hands the engine the
        // exported WAV instead
        let reported = controller.play_current().unwrap();
        assert_eq!(reported, PathBuf::from("a.mp3"));
        let played = controller.engine.played_paths();
        let last = played.last().unwrap();
        assert_ne!(last, &PathBuf::from("a.mp3"));
        assert!(last.extension().map_or(false, |e| e == "wav"));
        assert!(last.exists());
    }

    #[test]
    fn test_stop_keeps_current_track() {
        let mut controller = controller_with(&["a.mp3"]);
        controller.play_current().unwrap();
        controller.stop().unwrap();
        assert_eq!(controller.current(), Some(Path::new("a.mp3")));
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_poll_finished_auto_advances() {
        let mut controller = controller_with(&["a.mp3", "b.mp3"]);
        controller.play_current().unwrap();

        // Still playing: no advance
        assert_eq!(controller.poll_finished().unwrap(), None);

        controller.engine.finished = true;
        assert_eq!(
            controller.poll_finished().unwrap(),
            Some(PathBuf::from("b.mp3"))
        );
    }

    #[test]
    fn test_poll_finished_ignores_paused_and_stopped() {
        let mut controller = controller_with(&["a.mp3"]);
        controller.play_current().unwrap();
        controller.engine.finished = true;

        controller.engine.state = PlaybackState::Paused;
        assert_eq!(controller.poll_finished().unwrap(), None);
        controller.engine.state = PlaybackState::Stopped;
        assert_eq!(controller.poll_finished().unwrap(), None);
    }

    #[test]
    fn test_repeat_replays_current_track() {
        let mut controller = controller_with(&["a.mp3", "b.mp3"]);
        controller.play_current().unwrap();
        controller.toggle_repeat();
        assert_eq!(controller.next().unwrap(), PathBuf::from("a.mp3"));
        assert_eq!(controller.previous().unwrap(), PathBuf::from("a.mp3"));
    }

    #[test]
    fn test_shuffle_next_stays_in_playlist() {
        let mut controller = controller_with(&["a.mp3", "b.mp3", "c.mp3"]);
        controller.play_current().unwrap();
        controller.toggle_shuffle();
        for _ in 0..20 {
            let played = controller.next().unwrap();
            assert!(controller
                .playlist()
                .entries()
                .contains(&played));
        }
    }
}

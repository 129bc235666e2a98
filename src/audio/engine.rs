use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing has ever been started on this engine.
    Idle,
    Playing,
    Paused,
    Stopped,
}

/// Seam between the player logic and the actual audio output.
///
/// The real implementation wraps rodio; tests substitute a recording fake so
/// controller semantics can be checked without an audio device. Completion is
/// exposed as a pollable status (`is_finished`) so callers can auto-advance.
pub trait PlaybackEngine {
    /// Start playback of `path` from the beginning, replacing whatever was
    /// playing before.
    fn play(&mut self, path: &Path) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    /// Forward `volume` to the output as given. No clamping happens here; the
    /// UI owns the 0..1 range.
    fn set_volume(&mut self, volume: f32) -> Result<()>;
    fn state(&self) -> PlaybackState;
    /// True once the current sink has drained (or nothing was ever queued).
    fn is_finished(&self) -> bool;
}

pub struct RodioEngine {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Sink>,
    state: PlaybackState,
    volume: f32,
}

impl RodioEngine {
    pub fn new(volume: f32) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            state: PlaybackState::Idle,
            volume,
        })
    }
}

impl PlaybackEngine for RodioEngine {
    fn play(&mut self, path: &Path) -> Result<()> {
        // Drop the previous sink so the new track starts from a clean slate
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open audio file '{}': {}", path.display(), e))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            anyhow::anyhow!(
                "Failed to decode audio file '{}': {}. This file may be corrupted or use an unsupported format.",
                path.display(),
                e
            )
        })?;

        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(self.volume);
        sink.append(source);

        debug!("Started playback: {}", path.display());
        self.sink = Some(sink);
        self.state = PlaybackState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.state = PlaybackState::Stopped;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(volume);
        }
        Ok(())
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().map(|sink| sink.empty()).unwrap_or(true)
    }
}

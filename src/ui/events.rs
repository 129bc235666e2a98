use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // UI events
    Quit,
    Tick,
    Render,
    SwitchPane,

    // Playback events
    TogglePlayPause,
    Stop,
    NextTrack,
    PreviousTrack,

    // Navigation events
    Up,
    Down,
    Left,
    Right,
    Enter,

    // Volume events
    VolumeUp,
    VolumeDown,

    // Playlist events
    ToggleShuffle,
    ToggleRepeat,

    // Equalizer events
    ApplyEqualizer,

    // Library events
    RefreshLibrary,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.recv().await
    }

    /// Poll the terminal and forward key events; spawned once by the app so
    /// the main loop stays a plain receiver.
    pub async fn poll_loop(sender: mpsc::UnboundedSender<AppEvent>) -> Result<()> {
        loop {
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            if let Some(app_event) = key_to_app_event(key) {
                                if sender.send(app_event).is_err() {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    Event::Resize(_, _) => {
                        let _ = sender.send(AppEvent::Render);
                    }
                    _ => {}
                }
            }

            // Periodic tick drives completion polling and redraws
            if sender.send(AppEvent::Tick).is_err() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),

        // Playback controls
        KeyCode::Char(' ') => Some(AppEvent::TogglePlayPause),
        KeyCode::Char('s') => Some(AppEvent::Stop),
        KeyCode::Char('n') => Some(AppEvent::NextTrack),
        KeyCode::Char('b') => Some(AppEvent::PreviousTrack),

        // Navigation
        KeyCode::Up => Some(AppEvent::Up),
        KeyCode::Down => Some(AppEvent::Down),
        KeyCode::Left => Some(AppEvent::Left),
        KeyCode::Right => Some(AppEvent::Right),
        KeyCode::Enter => Some(AppEvent::Enter),
        KeyCode::Tab => Some(AppEvent::SwitchPane),

        // Volume
        KeyCode::Char('+') | KeyCode::Char('=') => Some(AppEvent::VolumeUp),
        KeyCode::Char('-') => Some(AppEvent::VolumeDown),

        // Playlist controls
        KeyCode::Char('z') => Some(AppEvent::ToggleShuffle),
        KeyCode::Char('r') => Some(AppEvent::ToggleRepeat),

        // Equalizer
        KeyCode::Char('e') => Some(AppEvent::ApplyEqualizer),

        // Library
        KeyCode::F(5) => Some(AppEvent::RefreshLibrary),

        _ => None,
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

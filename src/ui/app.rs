use super::{AppEvent, EventHandler, TerminalManager};
use crate::audio::equalizer::{EqSettings, GAIN_LIMIT_DB};
use crate::audio::track::{file_name_of, Track, TrackMetadata};
use crate::audio::{MusicScanner, PlaybackState, PlayerController, RodioEngine};
use crate::config::Config;
use crate::notify;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pane {
    Browser,
    Playlist,
    Equalizer,
}

const EQ_BANDS: [&str; 3] = ["Bass", "Mid", "Treble"];

/// Everything the render pass needs, snapshotted so the draw closure never
/// reaches back into the app.
struct DeckView {
    playlist_names: Vec<String>,
    playlist_cursor: usize,
    current_name: Option<String>,
    state: PlaybackState,
    volume: f32,
    shuffle: bool,
    repeat: bool,
    eq: EqSettings,
    eq_band: usize,
    eq_active: bool,
    now_playing: Option<TrackMetadata>,
    status: String,
    focus: Pane,
}

pub struct App {
    config: Config,
    terminal: TerminalManager,
    event_handler: EventHandler,
    controller: PlayerController<RodioEngine>,

    // Library browser (stands in for the native file chooser)
    library: Vec<Track>,
    browser_state: ListState,
    playlist_state: ListState,
    focus: Pane,

    // Equalizer sliders
    eq_settings: EqSettings,
    eq_band: usize,

    // Metadata display; deliberately left stale when a read fails
    now_playing: Option<TrackMetadata>,

    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let terminal = TerminalManager::new()?;
        let event_handler = EventHandler::new();
        let engine = RodioEngine::new(config.audio.volume)?;
        let controller = PlayerController::new(engine, config.audio.volume);

        let scanner = MusicScanner::new();
        let library = scanner.scan_directories(&config.music_directories)?;

        let mut browser_state = ListState::default();
        if !library.is_empty() {
            browser_state.select(Some(0));
        }

        Ok(Self {
            config,
            terminal,
            event_handler,
            controller,
            library,
            browser_state,
            playlist_state: ListState::default(),
            focus: Pane::Browser,
            eq_settings: EqSettings::default(),
            eq_band: 0,
            now_playing: None,
            status: "Load a track from the library with Enter".to_string(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let sender = self.event_handler.sender();
        tokio::spawn(async move {
            let _ = EventHandler::poll_loop(sender).await;
        });

        while !self.should_quit {
            self.draw()?;

            if let Some(event) = self.event_handler.next_event().await {
                self.handle_event(event)?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Quit => {
                self.controller.stop()?;
                self.should_quit = true;
            }
            AppEvent::Tick => match self.controller.poll_finished() {
                Ok(Some(path)) => self.on_track_started(&path),
                Ok(None) => {}
                Err(e) => self.set_status(format!("Auto-advance failed: {}", e)),
            },
            AppEvent::TogglePlayPause => match self.controller.play_pause() {
                Ok(Some(path)) => self.on_track_started(&path),
                Ok(None) => match self.controller.state() {
                    PlaybackState::Paused => self.set_status("Paused"),
                    _ => self.set_status("Resumed"),
                },
                Err(e) => self.set_status(format!("{}", e)),
            },
            AppEvent::Stop => {
                self.controller.stop()?;
                self.set_status("Stopped");
            }
            AppEvent::NextTrack => self.skip(true),
            AppEvent::PreviousTrack => self.skip(false),
            AppEvent::Up => self.move_vertical(-1),
            AppEvent::Down => self.move_vertical(1),
            AppEvent::Left => {
                if self.focus == Pane::Equalizer {
                    self.eq_band = self.eq_band.checked_sub(1).unwrap_or(EQ_BANDS.len() - 1);
                } else {
                    self.skip(false);
                }
            }
            AppEvent::Right => {
                if self.focus == Pane::Equalizer {
                    self.eq_band = (self.eq_band + 1) % EQ_BANDS.len();
                } else {
                    self.skip(true);
                }
            }
            AppEvent::Enter => self.activate_selection(),
            AppEvent::SwitchPane => {
                self.focus = match self.focus {
                    Pane::Browser => Pane::Playlist,
                    Pane::Playlist => Pane::Equalizer,
                    Pane::Equalizer => Pane::Browser,
                };
            }
            AppEvent::VolumeUp => self.change_volume(0.1)?,
            AppEvent::VolumeDown => self.change_volume(-0.1)?,
            AppEvent::ToggleShuffle => {
                let on = self.controller.toggle_shuffle();
                self.set_status(if on { "Shuffle: On" } else { "Shuffle: Off" });
            }
            AppEvent::ToggleRepeat => {
                let on = self.controller.toggle_repeat();
                self.set_status(if on { "Repeat: On" } else { "Repeat: Off" });
            }
            AppEvent::ApplyEqualizer => self.apply_equalizer(),
            AppEvent::RefreshLibrary => {
                let scanner = MusicScanner::new();
                self.library = scanner.scan_directories(&self.config.music_directories)?;
                if !self.library.is_empty() && self.browser_state.selected().is_none() {
                    self.browser_state.select(Some(0));
                }
                self.set_status(format!("Library refreshed: {} tracks", self.library.len()));
            }
            AppEvent::Render => {}
        }

        Ok(())
    }

    fn skip(&mut self, forward: bool) {
        let result = if forward {
            self.controller.next()
        } else {
            self.controller.previous()
        };
        match result {
            Ok(path) => self.on_track_started(&path),
            Err(e) => self.set_status(format!("{}", e)),
        }
    }

    fn move_vertical(&mut self, delta: i32) {
        match self.focus {
            Pane::Browser => Self::move_list(&mut self.browser_state, self.library.len(), delta),
            Pane::Playlist => Self::move_list(
                &mut self.playlist_state,
                self.controller.playlist().len(),
                delta,
            ),
            Pane::Equalizer => {
                let band = match self.eq_band {
                    0 => &mut self.eq_settings.bass_db,
                    1 => &mut self.eq_settings.mid_db,
                    _ => &mut self.eq_settings.treble_db,
                };
                // Sliders step by 1 dB; Up raises the gain
                *band = (*band - delta as f32).clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB);
            }
        }
    }

    fn move_list(state: &mut ListState, len: usize, delta: i32) {
        if len == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub((-delta) as usize)
        } else {
            (current + delta as usize).min(len - 1)
        };
        state.select(Some(new_index));
    }

    fn activate_selection(&mut self) {
        match self.focus {
            Pane::Browser => {
                if let Some(selected) = self.browser_state.selected() {
                    if let Some(track) = self.library.get(selected) {
                        if !track.is_playable() {
                            let name = track.file_name();
                            self.set_status(format!("Not playable: {}", name));
                            return;
                        }
                        let path = track.file_path.clone();
                        self.controller.add_track(path.clone());
                        if self.playlist_state.selected().is_none() {
                            self.playlist_state.select(Some(0));
                        }
                        self.refresh_metadata(&path);
                        self.set_status(format!("Added to playlist: {}", file_name_of(&path)));
                    }
                }
            }
            Pane::Playlist => {
                if let Some(selected) = self.playlist_state.selected() {
                    self.controller.select(selected);
                    match self.controller.play_current() {
                        Ok(path) => self.on_track_started(&path),
                        Err(e) => self.set_status(format!("{}", e)),
                    }
                }
            }
            Pane::Equalizer => self.apply_equalizer(),
        }
    }

    fn apply_equalizer(&mut self) {
        match self.controller.apply_equalizer(&self.eq_settings) {
            Ok(true) => self.set_status("Equalizer applied - audible on the next play"),
            Ok(false) => self.set_status("No song playing - equalizer not applied"),
            Err(e) => self.set_status(format!("Equalizer failed: {}", e)),
        }
    }

    fn change_volume(&mut self, delta: f32) -> Result<()> {
        let volume = (self.controller.volume() + delta).clamp(0.0, 1.0);
        self.controller.set_volume(volume)?;
        self.set_status(format!("Volume: {}%", (volume * 100.0).round() as u32));
        Ok(())
    }

    fn on_track_started(&mut self, path: &Path) {
        let name = file_name_of(path);
        self.refresh_metadata(path);
        self.playlist_state
            .select(Some(self.controller.playlist().cursor()));
        notify::now_playing(&name, &self.config.ui);
        self.set_status(format!("Playing: {}", name));
    }

    /// Update the metadata block; a failed read keeps the previous display.
    fn refresh_metadata(&mut self, path: &Path) {
        match TrackMetadata::read(path) {
            Ok(metadata) => self.now_playing = Some(metadata),
            Err(e) => warn!("Failed to read tags from {}: {}", path.display(), e),
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn draw(&mut self) -> Result<()> {
        let view = DeckView {
            playlist_names: self
                .controller
                .playlist()
                .entries()
                .iter()
                .map(|p| file_name_of(p))
                .collect(),
            playlist_cursor: self.controller.playlist().cursor(),
            current_name: self.controller.current().map(file_name_of),
            state: self.controller.state(),
            volume: self.controller.volume(),
            shuffle: self.controller.playlist().shuffle(),
            repeat: self.controller.playlist().repeat(),
            eq: self.eq_settings,
            eq_band: self.eq_band,
            eq_active: self.controller.has_equalizer(),
            now_playing: self.now_playing.clone(),
            status: self.status.clone(),
            focus: self.focus,
        };

        let library = &self.library;
        let mut browser_state = self.browser_state.clone();
        let mut playlist_state = self.playlist_state.clone();

        self.terminal.draw(|f| {
            Self::render(f, &view, library, &mut browser_state, &mut playlist_state);
        })?;

        self.browser_state = browser_state;
        self.playlist_state = playlist_state;
        Ok(())
    }

    fn render(
        f: &mut Frame,
        view: &DeckView,
        library: &[Track],
        browser_state: &mut ListState,
        playlist_state: &mut ListState,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Player bar
                Constraint::Length(3), // Status
            ])
            .split(f.area());

        Self::render_header(f, chunks[0]);
        Self::render_main(f, chunks[1], view, library, browser_state, playlist_state);
        Self::render_player_bar(f, chunks[2], view);
        Self::render_status(f, chunks[3], view);
    }

    fn pane_block(title: &str, focused: bool) -> Block<'_> {
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style)
    }

    fn render_header(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("aulos - terminal music deck  [Tab] pane  [Space] play/pause  [n/b] skip  [e] apply EQ  [q] quit")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(title, area);
    }

    fn render_main(
        f: &mut Frame,
        area: Rect,
        view: &DeckView,
        library: &[Track],
        browser_state: &mut ListState,
        playlist_state: &mut ListState,
    ) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        // Library browser
        let items: Vec<ListItem> = library
            .iter()
            .map(|track| {
                ListItem::new(format!(
                    "{} - {}",
                    track.display_artist(),
                    track.display_title()
                ))
            })
            .collect();
        let browser = List::new(items)
            .block(Self::pane_block("Library", view.focus == Pane::Browser))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        f.render_stateful_widget(browser, columns[0], browser_state);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Playlist
                Constraint::Length(6), // Now playing
                Constraint::Length(5), // Equalizer
            ])
            .split(columns[1]);

        // Playlist, insertion order, current track marked
        let items: Vec<ListItem> = view
            .playlist_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let is_current = i == view.playlist_cursor && view.current_name.is_some();
                let prefix = if is_current { "♪ " } else { "  " };
                let style = if is_current {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{}{}", prefix, name)).style(style)
            })
            .collect();
        let playlist = List::new(items)
            .block(Self::pane_block("Playlist", view.focus == Pane::Playlist))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        f.render_stateful_widget(playlist, right[0], playlist_state);

        Self::render_now_playing(f, right[1], view);
        Self::render_equalizer(f, right[2], view);
    }

    fn render_now_playing(f: &mut Frame, area: Rect, view: &DeckView) {
        let lines = match (&view.now_playing, &view.current_name) {
            (Some(metadata), current) => vec![
                Line::from(format!(
                    "Title:  {}",
                    metadata.title.as_deref().unwrap_or("Unknown")
                )),
                Line::from(format!(
                    "Artist: {}",
                    metadata.artist.as_deref().unwrap_or("Unknown Artist")
                )),
                Line::from(format!("Length: {}", metadata.duration_string())),
                Line::from(format!("File:   {}", current.as_deref().unwrap_or("-"))),
            ],
            (None, Some(current)) => vec![Line::from(format!("File:   {}", current))],
            (None, None) => vec![Line::from("Nothing playing")],
        };

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Now Playing"));
        f.render_widget(widget, area);
    }

    fn render_equalizer(f: &mut Frame, area: Rect, view: &DeckView) {
        let gains = [view.eq.bass_db, view.eq.mid_db, view.eq.treble_db];
        let mut lines = Vec::new();
        for (i, (name, gain)) in EQ_BANDS.iter().zip(gains).enumerate() {
            let marker = if view.focus == Pane::Equalizer && i == view.eq_band {
                ">"
            } else {
                " "
            };
            lines.push(Line::from(format!("{} {:<6} {:+5.0} dB", marker, name, gain)));
        }

        let title = if view.eq_active {
            "Equalizer (active)"
        } else {
            "Equalizer"
        };
        let widget = Paragraph::new(lines)
            .block(Self::pane_block(title, view.focus == Pane::Equalizer));
        f.render_widget(widget, area);
    }

    fn render_player_bar(f: &mut Frame, area: Rect, view: &DeckView) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Track info
                Constraint::Percentage(25), // Volume
                Constraint::Percentage(25), // Modes + state
            ])
            .split(area);

        let track_info = view
            .current_name
            .as_deref()
            .map(|name| format!("♪ {}", name))
            .unwrap_or_else(|| "No track selected".to_string());
        let info_widget = Paragraph::new(track_info)
            .block(Block::default().borders(Borders::ALL).title("Track"));
        f.render_widget(info_widget, chunks[0]);

        let volume_widget = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Volume"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(view.volume.clamp(0.0, 1.0) as f64);
        f.render_widget(volume_widget, chunks[1]);

        let state_text = match view.state {
            PlaybackState::Idle => "Idle",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        };
        let modes = format!(
            "{} | shuffle {} | repeat {}",
            state_text,
            if view.shuffle { "on" } else { "off" },
            if view.repeat { "on" } else { "off" },
        );
        let status_widget = Paragraph::new(modes)
            .block(Block::default().borders(Borders::ALL).title("State"));
        f.render_widget(status_widget, chunks[2]);
    }

    fn render_status(f: &mut Frame, area: Rect, view: &DeckView) {
        let widget = Paragraph::new(view.status.clone())
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(widget, area);
    }
}

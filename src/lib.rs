// Aulos - two thin players over one small audio core
// The deck binary gets the TUI; the console binary gets the bare prompt loop

pub mod audio;   // engine, playlist, equalizer, tags, scanning
pub mod config;  // settings with defaults
pub mod console; // the text-menu player
pub mod notify;  // now-playing desktop toasts
pub mod ui;      // terminal interface for the deck

// Export the stuff the binaries actually use
pub use audio::{
    MusicScanner, PlaybackEngine, PlaybackState, PlayerController, RodioEngine, Track,
    TrackMetadata,
};
pub use config::Config;
pub use console::ConsolePlayer;

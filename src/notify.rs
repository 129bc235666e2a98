// Desktop notifications - fire-and-forget, a missing notification backend
// must never break playback

use crate::config::UiConfig;
use notify_rust::{Notification, Timeout};
use tracing::warn;

/// One-shot "Now Playing" toast when a track starts.
pub fn now_playing(track_name: &str, ui: &UiConfig) {
    if !ui.show_notifications {
        return;
    }

    let result = Notification::new()
        .summary("Now Playing")
        .body(track_name)
        .timeout(Timeout::Milliseconds(ui.notification_duration_ms as u32))
        .show();

    if let Err(e) = result {
        warn!("Desktop notification failed: {}", e);
    }
}

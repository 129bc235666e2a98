// aulos - terminal music deck
// Playlist, volume, three-band equalizer and metadata display in one screen

use anyhow::Result;
use aulos::config::Config;
use aulos::ui::App;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aulos")]
#[command(about = "A terminal music deck with playlist, equalizer and metadata display")]
struct Args {
    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Scan this directory instead of the configured music directories
    #[arg(long)]
    music_dir: Option<PathBuf>,
}

fn init_logging(dev: bool) -> Result<()> {
    // The alternate screen owns stdout/stderr, so logs go to files
    let log_dir = PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "aulos.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if dev { "info,aulos=debug" } else { "info" }));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Keep the non-blocking writer alive for the whole process
    std::mem::forget(guard);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.dev)?;

    let mut config = Config::load()?;
    if let Some(dir) = args.music_dir {
        config.music_directories = vec![dir];
    }

    info!("aulos deck starting up");

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}

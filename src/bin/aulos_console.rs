// aulos_console - the bare text-menu player
// One loaded song, one paused flag, a prompt loop, everything else is the mixer

use anyhow::Result;
use aulos::audio::RodioEngine;
use aulos::console::ConsolePlayer;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn read_line(stdin: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // end of input behaves like quit
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let engine = RodioEngine::new(1.0)?;
    let mut player = ConsolePlayer::new(engine);

    let stdin = io::stdin();
    let mut stdin = stdin.lock();

    loop {
        println!("\nOptions: load, play, pause, resume, stop, quit");
        print!("Select an action: ");
        io::stdout().flush()?;

        let Some(action) = read_line(&mut stdin) else {
            println!("{}", player.stop()?);
            break;
        };

        match action.to_lowercase().as_str() {
            "load" => {
                print!("Enter the path of the song: ");
                io::stdout().flush()?;
                let Some(path) = read_line(&mut stdin) else {
                    println!("{}", player.stop()?);
                    break;
                };
                println!("{}", player.load(Path::new(&path)));
            }
            "play" => println!("{}", player.play()?),
            "pause" => println!("{}", player.pause()?),
            "resume" => println!("{}", player.resume()?),
            "stop" => println!("{}", player.stop()?),
            "quit" => {
                println!("{}", player.stop()?);
                break;
            }
            _ => println!("Invalid action. Please choose again."),
        }
    }

    Ok(())
}

mod config;
mod error;
mod paths;
mod terminal;
mod viewer;

use std::fs::{self, File};
use std::io;

use arbor::input::convert_key_event;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use log::info;
use simplelog::{Config, WriteLogger};
use tokio_util::sync::CancellationToken;

use crate::config::ViewerConfig;
use crate::error::CliError;
use crate::terminal::TerminalGuard;
use crate::viewer::{Flow, Viewer};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let mut config = ViewerConfig::load(paths::config_file().as_deref())?;
    if let Some(path) = std::env::args_os().nth(1) {
        config.data_file = Some(path.into());
    }
    init_logging(&config)?;
    info!("Starting viewer with {:?}", config);

    let cancel = CancellationToken::new();
    let mut viewer = Viewer::new(&config, cancel.clone()).await?;

    let _guard = TerminalGuard::new()?;
    let mut stdout = io::stdout();
    let mut events = EventStream::new();
    viewer.render(&mut stdout)?;

    while let Some(event) = events.next().await {
        match event? {
            Event::Key(key) => {
                let Some(combo) = convert_key_event(key) else {
                    continue;
                };
                if viewer.handle_key(&combo).await? == Flow::Quit {
                    break;
                }
                if viewer.is_dirty() {
                    viewer.render(&mut stdout)?;
                }
            }
            Event::Resize(..) => viewer.render(&mut stdout)?,
            _ => {}
        }
    }

    cancel.cancel();
    info!("Viewer closed");
    Ok(())
}

fn init_logging(config: &ViewerConfig) -> Result<(), CliError> {
    let Some(path) = paths::log_file() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(config.level_filter()?, Config::default(), File::create(path)?)?;
    Ok(())
}

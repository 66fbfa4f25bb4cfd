use anyhow::Result;
use chatwidget_core::{ChatApi, ChatClient, Config};
use tracing::{info, warn};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    // best effort
    let log_path = logging::init().ok();

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });

    let server_url = config.server_url();
    let client = ChatClient::with_poll_interval(ChatApi::new(&server_url), config.poll_interval());
    info!(server = %server_url, log = ?log_path, "starting chat widget");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(client);
    app.client.start_polling();

    let result = run(&mut terminal, &mut app).await;

    app.client.stop_polling();
    tui::restore()?;
    info!("chat widget closed");

    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }

    Ok(())
}

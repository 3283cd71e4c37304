use anyhow::Result;

mod app;
mod backend;
mod config;
mod documents;
mod handler;
mod reveal;
mod tui;
mod ui;

use app::App;
use backend::BackendError;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|_| Config::new());
    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event)?,
            None => break,
        }

        settle_finished_tasks(&mut app).await;
    }

    tui::restore()?;
    Ok(())
}

/// Collect results from backend tasks that finished since the last event.
/// The reveal tick keeps the loop turning, so completion is picked up
/// promptly even when the user is idle.
async fn settle_finished_tasks(app: &mut App) {
    if app.ask_task.as_ref().is_some_and(|task| task.is_finished()) {
        if let Some(task) = app.ask_task.take() {
            let result = task
                .await
                .unwrap_or_else(|e| Err(BackendError::Query(e.to_string())));
            app.settle_ask(result);
        }
    }

    if app.upload_task.as_ref().is_some_and(|task| task.is_finished()) {
        if let Some(task) = app.upload_task.take() {
            let result = task
                .await
                .unwrap_or_else(|e| Err(BackendError::Upload(e.to_string())));
            app.settle_upload(result);
        }
    }
}

//! Terminal event loop.
//!
//! Handles:
//! - Terminal setup and restore (raw mode, alternate screen, panic hook)
//! - Reading key presses on a dedicated input thread
//! - Executing [`Task`]s on the tokio runtime
//! - Redrawing after every message

use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use spark_source::Source;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use crate::app::App;
use crate::keys;
use crate::message::Message;
use crate::task::Task;
use crate::view;

/// How often the input thread wakes up when no key is pressed.
const TICK_RATE: Duration = Duration::from_millis(250);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the editor until the user quits.
pub async fn run(app: App, source: Arc<dyn Source>) -> anyhow::Result<()> {
    let mut terminal = setup_terminal().context("failed to initialize terminal")?;

    let result = event_loop(&mut terminal, app, source).await;

    restore_terminal(&mut terminal).context("failed to restore terminal")?;
    result
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

async fn event_loop(
    terminal: &mut Tui,
    mut app: App,
    source: Arc<dyn Source>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = unbounded_channel();
    spawn_input_thread(tx.clone());

    let boot = app.boot();
    execute_task(boot, &source, &tx);

    loop {
        terminal
            .draw(|frame| view::render(frame, app.state()))
            .context("failed to draw frame")?;

        let Some(message) = rx.recv().await else {
            tracing::debug!("Input channel closed");
            break;
        };
        let task = app.update(message);
        if matches!(task, Task::Quit) {
            tracing::info!("Quit requested");
            break;
        }
        execute_task(task, &source, &tx);
    }
    Ok(())
}

/// Poll crossterm on a plain thread and forward key presses.
///
/// The thread stops once the receiver is gone.
fn spawn_input_thread(tx: UnboundedSender<Message>) {
    thread::spawn(move || {
        loop {
            let message = match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match keys::translate(key) {
                        Some(key) => Message::Key(key),
                        None => continue,
                    },
                    Ok(Event::Resize(..)) => Message::Tick,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::error!("Failed to read terminal event: {e}");
                        break;
                    }
                },
                Ok(false) => Message::Tick,
                Err(e) => {
                    tracing::error!("Failed to poll terminal events: {e}");
                    break;
                }
            };
            if tx.send(message).is_err() {
                break;
            }
        }
    });
}

/// Start a backend operation and post its completion back to the loop.
fn execute_task(task: Task, source: &Arc<dyn Source>, tx: &UnboundedSender<Message>) {
    if !task.is_backend() {
        return;
    }
    let source = Arc::clone(source);
    let tx = tx.clone();
    match task {
        Task::None | Task::Quit => {}
        Task::FetchIndex => {
            tokio::spawn(async move {
                let result = source.fetch_index().await;
                if let Err(e) = &result {
                    tracing::warn!("Manifest fetch failed: {e}");
                }
                let _ = tx.send(Message::IndexLoaded(result));
            });
        }
        Task::FetchCollection { path } => {
            tokio::spawn(async move {
                let result = source.fetch_collection(&path).await;
                if let Err(e) = &result {
                    tracing::warn!("Fetch of {path} failed: {e}");
                }
                let _ = tx.send(Message::CollectionLoaded { path, result });
            });
        }
        Task::Publish(request) => {
            tracing::info!("Publishing {} file(s)", request.file_count());
            tokio::spawn(async move {
                let result = source.publish(&request).await;
                match &result {
                    Ok(published) => tracing::info!("Publish finished: {published}"),
                    Err(e) => tracing::warn!("Publish failed: {e}"),
                }
                let _ = tx.send(Message::Published(result));
            });
        }
    }
}

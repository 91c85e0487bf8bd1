use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, error, info};
use rand::Rng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::app::App;
use crate::render::Renderer;

/// Frame period; also the resolution of the game clock
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Drives an [`App`] against the real terminal until the user quits
pub struct InteractiveMode<R> {
    app: App<R>,
    renderer: Renderer,
}

impl<R: Rng> InteractiveMode<R> {
    pub fn new(app: App<R>) -> Self {
        Self {
            app,
            renderer: Renderer::new(),
        }
    }

    pub fn app(&self) -> &App<R> {
        &self.app
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        info!("terminal ready, entering main loop");

        // Run the session with cleanup
        let result = self.run_loop(&mut terminal).await;

        // Cleanup terminal
        let cleanup = self.cleanup_terminal(&mut terminal);
        if cleanup.is_ok() {
            info!("terminal restored");
        }

        combine_with_cleanup(result, cleanup)
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.app.request_quit(),
                    }
                }

                // Advance the clock, then draw
                _ = frame_timer.tick() => {
                    self.app.update(Instant::now());
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.app);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    debug!("interrupt signal received");
                    self.app.request_quit();
                }
            }

            if self.app.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind == KeyEventKind::Press {
                self.app.handle_key(key, Instant::now());
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Loop errors take precedence; a cleanup failure after one is only logged
fn combine_with_cleanup(result: Result<()>, cleanup: Result<()>) -> Result<()> {
    match (result, cleanup) {
        (Err(err), Err(cleanup_err)) => {
            error!("terminal cleanup failed: {:#}", cleanup_err);
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), cleanup) => cleanup,
    }
}

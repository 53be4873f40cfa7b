//! Terminal arcade runner (default binary).
//!
//! Reads `ARCADE_*` configuration, optionally logs to a file, then runs the
//! menu and games on a fixed tick with a framebuffer diff renderer.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use tui_arcade::app::App;
use tui_arcade::config::Config;
use tui_arcade::logging;
use tui_arcade::term::{FrameBuffer, TerminalRenderer, Viewport};
use tui_arcade::types::TICK_MS;

fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init(&config)?;
    let mut app = App::new(&config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app);

    // Restore the terminal even when the loop failed.
    if let Err(e) = term.exit() {
        log::warn!("terminal restore failed: {e:#}");
    }
    if let Err(e) = &result {
        log::error!("arcade stopped: {e:#}");
    }
    result
}

fn run(term: &mut TerminalRenderer, app: &mut App) -> Result<()> {
    let tick = Duration::from_millis(u64::from(TICK_MS));
    let (mut width, mut height) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(width, height);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        fb.resize(width, height);
        app.render_into(Viewport::new(width, height), &mut fb);
        term.draw_swap(&mut fb)?;

        // Drain input until the next tick is due.
        let mut wait = tick.saturating_sub(last_tick.elapsed());
        while event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(w, h) => {
                    (width, height) = (w, h);
                    term.invalidate();
                }
                _ => {}
            }
            if app.should_quit() {
                break;
            }
            wait = tick.saturating_sub(last_tick.elapsed());
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            last_tick = Instant::now();
            app.tick(u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX));
        }
    }
    log::info!("quit");
    Ok(())
}

//! Terminal lifecycle: raw mode, alternate screen, and panic-safe
//! restoration so a crash never leaves the shell in raw mode.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Backend = CrosstermBackend<Stdout>;

/// Undo everything [`Tui::enter`] did. Every step is best-effort: a failing
/// step must not stop the later ones, or a broken alternate screen would
/// leave raw mode stuck too. Shared by `exit`, `Drop`, and the panic hook.
fn restore() {
    let _ = stdout().execute(cursor::Show);
    let _ = stdout().execute(DisableMouseCapture);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Owns the ratatui terminal and its crossterm mode switches.
pub struct Tui {
    pub terminal: Terminal<Backend>,
}

impl Tui {
    /// Build the terminal handle. The shell is untouched until [`enter`].
    ///
    /// [`enter`]: Tui::enter
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
        })
    }

    /// Switch the shell into TUI mode: raw mode, alternate screen, mouse
    /// capture, cursor hidden, screen cleared.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(EnableMouseCapture)?;
        stdout().execute(cursor::Hide)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Hand the shell back.
    pub fn exit(&mut self) -> Result<()> {
        restore();
        Ok(())
    }

    /// Draw one frame through the render closure.
    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Current size as (cols, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
    }
}

/// Install the color-eyre error and panic hooks, with the panic hook
/// restoring the terminal before the report prints.
///
/// Call before [`Tui::enter`] so a panic during startup also reports
/// onto a sane screen.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::sync::CancelableTimer;

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

/// Coalesces bursts of resize events into the last size.
pub(super) struct ResizeDebouncer {
    timer: CancelableTimer,
    size: Option<(u16, u16)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            timer: CancelableTimer::new(delay_ms),
            size: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.size = Some((width, height));
        self.timer.start(now_ms);
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        if self.timer.take_ready(now_ms) {
            self.size.take()
        } else {
            None
        }
    }

    pub(super) const fn deadline(&self) -> Option<u64> {
        self.timer.deadline()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// How long to wait for input before something is due.
pub(super) fn poll_timeout_ms(now_ms: u64, deadlines: impl IntoIterator<Item = Option<u64>>) -> u64 {
    deadlines
        .into_iter()
        .flatten()
        .map(|deadline| deadline.saturating_sub(now_ms))
        .fold(IDLE_POLL_MS, u64::min)
}

impl App {
    /// Run the interactive terminal UI until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or an I/O
    /// error occurs while reading events or drawing.
    pub fn run(self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; splitmark requires an interactive terminal")?;
        let size = terminal.size()?;
        let mut model = self.build_model((size.width, size.height));

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();
        result
    }

    /// Feed `msg` through `update`, then through its side effect and any
    /// follow-up messages.
    pub(super) fn dispatch(model: &mut Model, msg: Message) {
        let mut next = Some(msg);
        while let Some(msg) = next.take() {
            tracing::trace!(?msg, "message");
            let side = msg.clone();
            *model = update(std::mem::take(model), msg);
            next = Self::handle_message_side_effects(model, &side);
        }
        model.finish_pending_reload();
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        loop {
            let now_ms = elapsed_ms(start);
            if model.tick(now_ms) {
                needs_render = true;
            }
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                Self::dispatch(model, Message::Resize(width, height));
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
            if model.should_quit {
                break;
            }

            let timeout =
                poll_timeout_ms(now_ms, [model.next_deadline(), resize_debouncer.deadline()]);
            if !event::poll(Duration::from_millis(timeout))? {
                continue;
            }

            // Drain everything queued so key repeat bursts cost one frame.
            loop {
                let event_ms = elapsed_ms(start);
                needs_render |= model.tick(event_ms);
                let event = event::read()?;
                if let Some(msg) =
                    Self::handle_event(&event, model, event_ms, &mut resize_debouncer)
                {
                    Self::dispatch(model, msg);
                    needs_render = true;
                }
                if model.should_quit || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        Ok(())
    }
}

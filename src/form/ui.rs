//! Terminal screen for the transcription form.
//!
//! One ratatui screen: mode tabs (URL / File), a text input per mode, a
//! read-only transcript area, and an inline error banner. Keyboard only.
//! The 50 ms poll loop also drains completed request outcomes from the
//! controller, so the screen stays responsive while a request is in flight.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Tabs, Wrap},
};
use std::io::{self, Stdout};
use std::path::PathBuf;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::controller::{FormController, InputMode};

/// Common colors/styles.
const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const DIM_FG: Color = Color::Rgb(100, 100, 100);
const ACCENT_BG: Color = Color::Rgb(20, 20, 20);
const ERROR_BG: Color = Color::Rgb(255, 0, 0);

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Interactive transcription form screen.
pub struct FormScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    controller: FormController,
    url_input: Input,
    file_input: Input,
    spinner_tick: usize,
    cleaned_up: bool,
}

impl FormScreen {
    /// Creates the screen and enters alternate screen mode.
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    pub fn new(controller: FormController) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            controller,
            url_input: Input::default(),
            file_input: Input::default(),
            spinner_tick: 0,
            cleaned_up: false,
        })
    }

    /// Runs the form loop until the user exits.
    pub fn run(&mut self) -> Result<()> {
        tracing::debug!("Transcription form started");

        loop {
            self.controller.pump();
            if self.controller.state().is_busy {
                self.spinner_tick = self.spinner_tick.wrapping_add(1);
            }

            self.draw()?;

            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }

        self.cleanup()?;
        Ok(())
    }

    /// Handles one key event. Returns `true` when the form should exit.
    ///
    /// Editing and mode switching stay available while a request is in
    /// flight; only the submit guard itself rejects input.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                tracing::debug!("Form exited via Escape");
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                tracing::debug!("Form exited via Ctrl+C");
                return true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.controller.state().mode {
                    InputMode::Url => InputMode::File,
                    InputMode::File => InputMode::Url,
                };
                self.controller.select_mode(next);
            }
            KeyCode::Enter => {
                self.controller.submit();
            }
            _ => {
                let ev = Event::Key(key);
                match self.controller.state().mode {
                    InputMode::Url => {
                        self.url_input.handle_event(&ev);
                        self.controller.set_url_text(self.url_input.value());
                    }
                    InputMode::File => {
                        self.file_input.handle_event(&ev);
                        let value = self.file_input.value();
                        if value.is_empty() {
                            self.controller.clear_file();
                        } else {
                            self.controller.set_file(PathBuf::from(value));
                        }
                    }
                }
            }
        }
        false
    }

    /// Renders the current state of the form.
    fn draw(&mut self) -> Result<()> {
        // Extract data before the closure to avoid borrow conflicts
        let state = self.controller.state().clone();
        let can_submit = self.controller.can_submit();
        let spinner = SPINNER_FRAMES[(self.spinner_tick / 2) % SPINNER_FRAMES.len()];
        let active_input = match state.mode {
            InputMode::Url => &self.url_input,
            InputMode::File => &self.file_input,
        };
        let input_value = active_input.value().to_string();
        let input_cursor = active_input.visual_cursor();

        self.terminal.draw(|frame| {
            let area = frame.area();

            let padding_block = Block::default()
                .padding(Padding::uniform(1))
                .style(Style::default().bg(BG));
            frame.render_widget(&padding_block, area);
            let inner_area = padding_block.inner(area);

            let [header_area, tabs_area, input_area, status_area, transcript_area, error_area, footer_area] =
                Layout::vertical([
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(3),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .areas(inner_area);

            // Logo header
            let header = Paragraph::new(" ╻╻╋╋┏╸\n ┗┛┗┗╹ \n")
                .style(Style::default().fg(FG))
                .alignment(Alignment::Left);
            frame.render_widget(header, header_area);

            // Mode selector
            let selected = match state.mode {
                InputMode::Url => 0,
                InputMode::File => 1,
            };
            let tabs = Tabs::new(vec!["URL", "File"])
                .select(selected)
                .style(Style::default().fg(DIM_FG))
                .highlight_style(Style::default().fg(FG).bg(ACCENT_BG))
                .divider("│");
            frame.render_widget(tabs, tabs_area);

            // Active input field
            let (input_title, placeholder) = match state.mode {
                InputMode::Url => (" Audio URL ", "https://example.com/audio.mp3"),
                InputMode::File => (" Audio File ", "path/to/audio.mp3"),
            };
            let input_block = Block::default().title(input_title).borders(Borders::ALL);
            frame.render_widget(&input_block, input_area);
            let input_inner = input_block.inner(input_area);

            let input_width = input_inner.width.saturating_sub(1) as usize;
            let scroll = scroll_offset(input_cursor, input_width);
            let input_widget = if input_value.is_empty() {
                Paragraph::new(placeholder).style(Style::default().fg(DIM_FG))
            } else {
                Paragraph::new(input_value.as_str())
                    .style(Style::default().fg(FG))
                    .scroll((0, scroll as u16))
            };
            frame.render_widget(input_widget, input_inner);

            let cursor_x = input_inner.x + (input_cursor - scroll) as u16;
            frame.set_cursor_position(Position::new(cursor_x, input_inner.y));

            // Submit status: busy spinner, ready hint, or what is missing
            let status = if state.is_busy {
                Line::styled(
                    format!("{spinner} Transcribing..."),
                    Style::default().fg(FG),
                )
            } else if can_submit {
                let label = match state.mode {
                    InputMode::Url => "↵ transcribe URL",
                    InputMode::File => "↵ transcribe file",
                };
                Line::styled(label, Style::default().fg(FG))
            } else {
                let hint = match state.mode {
                    InputMode::Url => "enter an audio URL to transcribe",
                    InputMode::File => "enter an audio file path to transcribe",
                };
                Line::styled(hint, Style::default().fg(DIM_FG))
            };
            frame.render_widget(Paragraph::new(status), status_area);

            // Transcript output
            let transcript_block = Block::default()
                .title(" Transcript ")
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1));
            let transcript = if state.transcript_text.is_empty() {
                Paragraph::new("Transcription will appear here...")
                    .style(Style::default().fg(DIM_FG))
            } else {
                Paragraph::new(state.transcript_text.as_str()).style(Style::default().fg(FG))
            };
            frame.render_widget(
                transcript.block(transcript_block).wrap(Wrap { trim: false }),
                transcript_area,
            );

            // Inline error banner, only when a failure is pending
            if let Some(message) = &state.error_message {
                let banner = Paragraph::new(format!(" {message} "))
                    .style(Style::default().bg(ERROR_BG).fg(FG));
                frame.render_widget(banner, error_area);
            }

            // Help footer
            let help_text = "tab switch source, ↵ transcribe, esc quit";
            let help = Paragraph::new(help_text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(DIM_FG));
            frame.render_widget(help, footer_area);
        })?;

        Ok(())
    }

    /// Cleans up terminal and restores normal mode.
    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.cleaned_up = true;

        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        tracing::debug!("Form terminal cleanup complete");
        Ok(())
    }
}

impl Drop for FormScreen {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Horizontal scroll keeping the cursor inside a field of the given width.
fn scroll_offset(cursor: usize, width: usize) -> usize {
    if width == 0 {
        return cursor;
    }
    cursor.saturating_sub(width)
}

//! Crossterm terminal frontend.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::{self, Color},
    terminal,
};

use crate::core::error::Result;
use crate::core::types::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::render::glyph_char;
use crate::script::text::ScrollModel;
use crate::world::{InputState, World};

/// What the event pump asked the game loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Raw-mode alternate-screen renderer. Restores the terminal on drop.
pub struct TerminalRenderer {
    out: Stdout,
}

impl TerminalRenderer {
    pub fn new() -> Result<TerminalRenderer> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        queue!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        out.flush()?;
        Ok(TerminalRenderer { out })
    }

    /// Draw the board grid plus the status and message lines.
    pub fn draw(&mut self, world: &World) -> Result<()> {
        let cells = world.paint();
        for y in 0..BOARD_HEIGHT {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            for x in 0..BOARD_WIDTH {
                let (glyph, color) = cells[(y * BOARD_WIDTH + x) as usize];
                queue!(
                    self.out,
                    style::SetForegroundColor(dos_foreground(color)),
                    style::SetBackgroundColor(dos_background(color)),
                    style::Print(glyph_char(glyph)),
                )?;
            }
        }

        let state = &world.state;
        let status = format!(
            " Health:{:<4} Ammo:{:<4} Torches:{:<3} Gems:{:<4} Score:{:<6}",
            state.health, state.ammo, state.torches, state.gems, state.score
        );
        queue!(
            self.out,
            cursor::MoveTo(0, BOARD_HEIGHT as u16),
            style::SetForegroundColor(Color::White),
            style::SetBackgroundColor(Color::DarkBlue),
            style::Print(format!("{status:<60}")),
        )?;

        let message = world
            .board()
            .message
            .as_ref()
            .map(|m| m.text.clone())
            .unwrap_or_default();
        queue!(
            self.out,
            cursor::MoveTo(0, BOARD_HEIGHT as u16 + 1),
            style::SetForegroundColor(Color::Yellow),
            style::SetBackgroundColor(Color::Black),
            style::Print(format!("{message:<60}")),
        )?;

        self.out.flush()?;
        Ok(())
    }

    /// Present a multi-line text model and wait for a dismissing key.
    /// Returns the label of a picked menu line, if any.
    pub fn show_scroll(&mut self, scroll: &ScrollModel) -> Result<Option<String>> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            style::SetForegroundColor(Color::Yellow),
            style::SetBackgroundColor(Color::DarkBlue),
            style::Print(format!("{:^60}", scroll.title)),
        )?;
        let menu: Vec<&crate::script::text::ScrollLine> =
            scroll.lines.iter().filter(|l| l.label.is_some()).collect();
        for (i, line) in scroll.lines.iter().enumerate() {
            let text = if line.label.is_some() {
                let pick = menu.iter().position(|m| std::ptr::eq(*m, line)).unwrap_or(0);
                format!("  [{}] {}", pick + 1, line.text)
            } else if line.pretty {
                format!("   {}", line.text)
            } else {
                line.text.clone()
            };
            queue!(
                self.out,
                cursor::MoveTo(0, i as u16 + 2),
                style::SetForegroundColor(if line.pretty { Color::White } else { Color::Yellow }),
                style::SetBackgroundColor(Color::DarkBlue),
                style::Print(format!("{text:<60}")),
            )?;
        }
        self.out.flush()?;

        loop {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => return Ok(None),
                    KeyCode::Char(c) => {
                        if let Some(digit) = c.to_digit(10) {
                            if digit >= 1 {
                                if let Some(line) = menu.get(digit as usize - 1) {
                                    return Ok(line.label.clone());
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Poll pending key events into the world's input state.
    pub fn pump_input(&mut self, input: &mut InputState) -> Result<Control> {
        while event::poll(std::time::Duration::ZERO)? {
            let Event::Key(key) = event::read()? else { continue };
            if let Control::Quit = apply_key(key, input) {
                return Ok(Control::Quit);
            }
        }
        Ok(Control::Continue)
    }
}

fn apply_key(key: KeyEvent, input: &mut InputState) -> Control {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc => return Control::Quit,
        KeyCode::Char('q') => return Control::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Control::Quit;
        }
        KeyCode::Up => {
            input.up = true;
            input.shoot = shift;
        }
        KeyCode::Down => {
            input.down = true;
            input.shoot = shift;
        }
        KeyCode::Left => {
            input.left = true;
            input.shoot = shift;
        }
        KeyCode::Right => {
            input.right = true;
            input.shoot = shift;
        }
        KeyCode::Char('t') => input.light_torch = true,
        _ => {}
    }
    Control::Continue
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = queue!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = self.out.flush();
        let _ = terminal::disable_raw_mode();
    }
}

/// DOS attribute low nibble to a terminal color.
fn dos_foreground(attr: u8) -> Color {
    dos_color(attr & 0x0f)
}

/// DOS attribute high nibble (background, no blink support).
fn dos_background(attr: u8) -> Color {
    dos_color((attr >> 4) & 0x07)
}

fn dos_color(nibble: u8) -> Color {
    match nibble {
        0 => Color::Black,
        1 => Color::DarkBlue,
        2 => Color::DarkGreen,
        3 => Color::DarkCyan,
        4 => Color::DarkRed,
        5 => Color::DarkMagenta,
        6 => Color::DarkYellow,
        7 => Color::Grey,
        8 => Color::DarkGrey,
        9 => Color::Blue,
        10 => Color::Green,
        11 => Color::Cyan,
        12 => Color::Red,
        13 => Color::Magenta,
        14 => Color::Yellow,
        _ => Color::White,
    }
}

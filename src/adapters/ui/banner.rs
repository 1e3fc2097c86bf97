//! ASCII startup banner.

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

const BANNER_COLOR: Color = Color::Cyan;

/// Prints the tool name in figlet lettering plus the version line.
/// Falls back to nothing if stdout rejects the escape sequences.
pub fn print_welcome() {
    let mut out = stdout();
    let Ok(font) = FIGfont::standard() else {
        return;
    };
    let Some(figure) = font.convert("gmail-extract") else {
        return;
    };
    let _ = out.execute(SetForegroundColor(BANNER_COLOR));
    for line in figure.to_string().lines() {
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
    }
    let _ = out.execute(Print(format!("v{}\r\n", env!("CARGO_PKG_VERSION"))));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

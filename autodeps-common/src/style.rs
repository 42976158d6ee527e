// autodeps-common/src/style.rs
//! ANSI styling for log output. `colored` drops the escapes when `NO_COLOR`
//! is set or colouring has been turned off through `colored::control`.
use colored::Colorize;

/// Forces styling on or off regardless of the environment.
pub fn set_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}

/// Goes back to deciding from the environment.
pub fn reset() {
    colored::control::unset_override();
}

pub fn red(s: &str) -> String {
    s.red().to_string()
}

pub fn green(s: &str) -> String {
    s.green().to_string()
}

pub fn bright_blue(s: &str) -> String {
    s.bright_blue().to_string()
}

/// Formats `s` as a quoted string literal.
pub fn string(s: &str) -> String {
    green(&format!("\"{s}\""))
}

/// Formats `s` as a symbol.
pub fn sym(s: &str) -> String {
    bright_blue(s)
}

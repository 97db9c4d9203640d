//! Status lines on stderr.

use console::style;

pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Respects `NO_COLOR` and `FORCE_COLOR`, then asks the terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply `--no-color` to every styled line.
pub fn init_colors(no_color: bool) {
    if no_color || !should_use_color() {
        console::set_colors_enabled_stderr(false);
    }
}

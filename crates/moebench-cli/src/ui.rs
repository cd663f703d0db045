//! Styled terminal output.

use console::style;

/// Whether color output is disabled through `NO_COLOR`.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// Print a section header.
pub fn print_header(text: &str) {
    if is_color_disabled() {
        println!("=== {text} ===");
    } else {
        println!("{}", style(format!("=== {text} ===")).bold().cyan());
    }
}

pub fn print_success(text: &str) {
    if is_color_disabled() {
        println!("[OK] {text}");
    } else {
        println!("{} {text}", style("[OK]").green().bold());
    }
}

/// Print a warning to stderr.
pub fn print_warning(text: &str) {
    if is_color_disabled() {
        eprintln!("[WARN] {text}");
    } else {
        eprintln!("{} {text}", style("[WARN]").yellow().bold());
    }
}

/// Print an error to stderr.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}

/// Color a pairwise verdict: `+` green, `-` red, anything else dim.
#[must_use]
pub fn paint_verdict(verdict: &str) -> String {
    if is_color_disabled() {
        return verdict.to_string();
    }
    match verdict {
        "+" => style(verdict).green().to_string(),
        "-" => style(verdict).red().to_string(),
        _ => style(verdict).dim().to_string(),
    }
}

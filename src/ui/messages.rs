use std::fmt;
use std::io::{self, Write};

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_TEAL: &str = "\x1b[36m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Section header, used for the invoice and preview panels
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}── {} ──{}", FG_TEAL, BOLD, msg, RESET);
}

/// Print `prompt` and read one trimmed line from stdin.
/// Returns `None` on end of input.
pub fn ask<T: fmt::Display>(prompt: T) -> Option<String> {
    print!("{}{}{} ", BOLD, prompt, RESET);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Yes/no question; `default` is used for an empty answer or closed input.
pub fn confirm<T: fmt::Display>(prompt: T, default: bool) -> bool {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    match ask(format!("{prompt} {hint}:")) {
        Some(a) if a.is_empty() => default,
        Some(a) => matches!(a.to_lowercase().as_str(), "y" | "yes"),
        None => default,
    }
}

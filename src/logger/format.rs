//! Log formatting and console output with ANSI colors and text wrapping

use super::config::get_logger_config;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 8;
const LEVEL_WIDTH: usize = 7;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let use_colors = get_logger_config().use_colors;
    let time = Local::now().format("%H:%M:%S").to_string();

    let plain_prefix = format!(
        "{} [{:<tw$}] [{:<lw$}] ",
        time,
        tag.to_plain_string(),
        level.as_str(),
        tw = TAG_WIDTH,
        lw = LEVEL_WIDTH
    );
    let prefix = if use_colors {
        format!(
            "{} [{}] [{}] ",
            time.dimmed(),
            format_tag(&tag),
            format_level(level)
        )
    } else {
        plain_prefix.clone()
    };

    let available = MAX_LINE_LENGTH.saturating_sub(plain_prefix.len()).max(40);
    let chunks = wrap_text(message, available);

    print_stdout_safe(&format!("{}{}", prefix, chunks[0]));
    let continuation = " ".repeat(plain_prefix.len());
    for chunk in &chunks[1..] {
        print_stdout_safe(&format!("{}{}", continuation, chunk));
    }
}

/// Format a tag with appropriate color
fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::Session => label.bright_cyan().bold(),
        LogTag::Wallet => label.bright_magenta().bold(),
        LogTag::Tokens => label.bright_blue().bold(),
        LogTag::Router => label.bright_yellow().bold(),
        LogTag::Swap => label.bright_green().bold(),
        LogTag::System => label.white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.yellow().bold(),
        LogLevel::Info => label.white(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", message) {
        if e.kind() != ErrorKind::BrokenPipe {
            let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
        }
        return;
    }
    let _ = out.flush();
}

/// Wrap text at word boundaries, respecting existing newlines
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_width) {
                    result.push(piece.iter().collect());
                }
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

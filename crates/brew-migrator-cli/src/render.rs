use std::io::{self, IsTerminal};
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use brew_migrator_core::MigrationReport;
use brew_migrator_engine::PageView;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

/// Spinner shown while a blocking external command runs. Inert in plain
/// output.
pub(crate) struct TerminalSpinner {
    progress_bar: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        let line = match (self.style, render_status_badge(status)) {
            (OutputStyle::Rich, Some(badge)) => {
                format!("{} {message}", colorize(status_style(status), badge))
            }
            _ => render_status_line(self.style, status, message),
        };
        if is_diagnostic_status(status) {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub(crate) fn print_section(self, title: &str) {
        if let Some(line) = render_section_header(self.style, title) {
            println!();
            println!("{}", colorize(section_style(), &line));
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn start_spinner(self, message: &str) -> TerminalSpinner {
        if self.style == OutputStyle::Plain {
            return TerminalSpinner { progress_bar: None };
        }

        let progress_bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}") {
            progress_bar.set_style(style.tick_chars("|/-\\ "));
        }
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));
        TerminalSpinner {
            progress_bar: Some(progress_bar),
        }
    }
}

impl TerminalSpinner {
    pub(crate) fn finish(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn current_output_style(force_plain: bool) -> OutputStyle {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
    if force_plain || no_color {
        return OutputStyle::Plain;
    }
    resolve_output_style(io::stdout().is_terminal())
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool) -> OutputStyle {
    if stdout_is_tty {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn render_status_badge(status: &str) -> Option<&'static str> {
    match status {
        "ok" => Some("[OK]"),
        "step" => Some("[STEP]"),
        "info" => Some("[INFO]"),
        "skip" => Some("[SKIP]"),
        "warn" => Some("[WARN]"),
        "error" => Some("[ERR]"),
        _ => None,
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match (style, render_status_badge(status)) {
        (OutputStyle::Rich, Some(badge)) => format!("{badge} {message}"),
        _ => message.to_string(),
    }
}

fn is_diagnostic_status(status: &str) -> bool {
    matches!(status, "warn" | "error")
}

fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(format!("== {title} ==")),
    }
}

fn status_style(status: &str) -> Style {
    let (color, effects) = match status {
        "ok" => (AnsiColor::BrightGreen, Effects::BOLD),
        "warn" | "skip" => (AnsiColor::Yellow, Effects::BOLD),
        "error" => (AnsiColor::BrightRed, Effects::BOLD),
        "step" => (AnsiColor::BrightCyan, Effects::new()),
        _ => (AnsiColor::BrightBlue, Effects::new()),
    };
    Style::new().fg_color(Some(color.into())).effects(effects)
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn format_page_lines(page: &PageView<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(page.entries.len() + 2);
    lines.push(format!(
        "matches {}-{} of {}:",
        page.offset + 1,
        page.last_number(),
        page.total
    ));
    for (number, candidate) in page.numbered_entries() {
        lines.push(format!("  [{number}] {candidate}"));
    }

    let mut options = Vec::with_capacity(4);
    if page.has_previous {
        options.push("[P] previous page");
    }
    if page.has_next {
        options.push("[N] next page");
    }
    options.push("[S] skip");
    options.push("[Q] quit");
    lines.push(format!("  {}", options.join("  ")));
    lines
}

pub(crate) fn format_report_lines(report: &MigrationReport) -> Vec<String> {
    let mut lines = vec!["newly migrated applications:".to_string()];
    if report.newly_migrated.is_empty() {
        lines.push("  (none)".to_string());
    }
    for entry in &report.newly_migrated {
        lines.push(format!("  - {} -> {}", entry.app, entry.detail));
    }

    if !report.failed.is_empty() {
        lines.push("failed applications:".to_string());
        for entry in &report.failed {
            lines.push(format!("  - {}: {}", entry.app, entry.detail));
        }
    }

    if !report.newly_skipped.is_empty() {
        lines.push("skipped applications:".to_string());
        for entry in &report.newly_skipped {
            lines.push(format!("  - {}: {}", entry.app, entry.detail));
        }
    }

    lines
}

pub(crate) fn format_summary_line(report: &MigrationReport) -> String {
    format!(
        "migration summary: migrated={} failed={} skipped={}",
        report.newly_migrated.len(),
        report.failed.len(),
        report.newly_skipped.len()
    )
}

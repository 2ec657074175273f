use std::io::{self, BufRead, Write};

use anyhow::Result;
use brew_migrator_engine::{Catalog, Console, PageView, StatusKind};
use brew_migrator_homebrew::{InstallOutcome, PackageKind};

use crate::render::{format_page_lines, TerminalRenderer};

const CHOICE_PROMPT: &str = "select option> ";

/// Interactive console over a line-oriented input stream.
pub(crate) struct TerminalConsole<R> {
    renderer: TerminalRenderer,
    input: R,
}

impl<R: BufRead> TerminalConsole<R> {
    pub(crate) fn new(renderer: TerminalRenderer, input: R) -> Self {
        Self { renderer, input }
    }
}

impl<R: BufRead> Console for TerminalConsole<R> {
    fn status(&mut self, kind: StatusKind, message: &str) {
        self.renderer.print_status(kind.as_str(), message);
    }

    fn show_page(&mut self, page: &PageView<'_>) {
        self.renderer
            .print_section(&format!("Processing: {}", page.app));
        self.renderer.print_lines(&format_page_lines(page));
    }

    fn read_choice(&mut self) -> Option<String> {
        print!("{CHOICE_PROMPT}");
        let _ = io::stdout().flush();
        read_input_line(&mut self.input).unwrap_or_else(|err| {
            self.renderer
                .print_status("warn", &format!("failed reading input: {err}"));
            None
        })
    }
}

/// Next line from `input` without its terminator; `None` at end of input.
pub(crate) fn read_input_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Catalog wrapper that shows a spinner while the inner catalog blocks.
pub(crate) struct ProgressCatalog<'a, C: ?Sized> {
    inner: &'a mut C,
    renderer: TerminalRenderer,
}

impl<'a, C: Catalog + ?Sized> ProgressCatalog<'a, C> {
    pub(crate) fn new(inner: &'a mut C, renderer: TerminalRenderer) -> Self {
        Self { inner, renderer }
    }
}

impl<C: Catalog + ?Sized> Catalog for ProgressCatalog<'_, C> {
    fn search(&mut self, query: &str, kind: PackageKind) -> Result<Vec<String>> {
        let spinner = self
            .renderer
            .start_spinner(&format!("searching {} catalog for {query}", kind.as_str()));
        let result = self.inner.search(query, kind);
        spinner.finish();
        result
    }

    fn is_installed(&mut self, package: &str, kind: PackageKind) -> bool {
        self.inner.is_installed(package, kind)
    }

    fn install(&mut self, package: &str, kind: PackageKind) -> InstallOutcome {
        let spinner = self
            .renderer
            .start_spinner(&format!("installing {package}"));
        let outcome = self.inner.install(package, kind);
        spinner.finish();
        outcome
    }
}

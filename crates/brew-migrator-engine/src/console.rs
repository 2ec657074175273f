#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Step,
    Ok,
    Skip,
    Warn,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Step => "step",
            Self::Ok => "ok",
            Self::Skip => "skip",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// One page of candidates as presented to the user. Entry numbers are
/// 1-based positions in the full candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub app: &'a str,
    pub offset: usize,
    pub total: usize,
    pub entries: &'a [String],
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageView<'_> {
    pub fn numbered_entries(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(index, entry)| (self.offset + index + 1, entry.as_str()))
    }

    /// Last 1-based entry number shown on this page.
    pub fn last_number(&self) -> usize {
        self.offset + self.entries.len()
    }
}

/// User-facing side of a run: status lines, candidate pages and input.
pub trait Console {
    fn status(&mut self, kind: StatusKind, message: &str);

    fn show_page(&mut self, page: &PageView<'_>);

    /// Next line of user input, or `None` once input is exhausted.
    fn read_choice(&mut self) -> Option<String>;
}

use crate::console::{Console, PageView, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// 1-based candidate number.
    Select(usize),
    Next,
    Previous,
    Skip,
    Quit,
}

pub fn parse_choice(input: &str) -> Option<Choice> {
    let input = input.trim();
    if !input.is_empty() && input.chars().all(|ch| ch.is_ascii_digit()) {
        return input.parse().ok().map(Choice::Select);
    }

    match input.to_ascii_uppercase().as_str() {
        "N" => Some(Choice::Next),
        "P" => Some(Choice::Previous),
        "S" => Some(Choice::Skip),
        "Q" => Some(Choice::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Browsing { offset: usize },
    /// 0-based index into the candidate list.
    Selected { index: usize },
    Skipped,
    Quit,
}

impl SelectionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Browsing { .. })
    }
}

/// Transition out of `Browsing { offset }`. `None` means the choice is
/// rejected and the state stays where it was.
pub fn step(
    offset: usize,
    choice: Option<Choice>,
    total: usize,
    page_size: usize,
) -> Option<SelectionState> {
    let page_size = page_size.max(1);
    match choice? {
        Choice::Select(number) if (1..=total).contains(&number) => {
            Some(SelectionState::Selected { index: number - 1 })
        }
        Choice::Select(_) => None,
        Choice::Next if offset + page_size < total => Some(SelectionState::Browsing {
            offset: offset + page_size,
        }),
        Choice::Previous if offset > 0 => Some(SelectionState::Browsing {
            offset: offset.saturating_sub(page_size),
        }),
        Choice::Next | Choice::Previous => None,
        Choice::Skip => Some(SelectionState::Skipped),
        Choice::Quit => Some(SelectionState::Quit),
    }
}

pub fn page_view<'a>(
    app: &'a str,
    candidates: &'a [String],
    offset: usize,
    page_size: usize,
) -> PageView<'a> {
    let total = candidates.len();
    let start = offset.min(total);
    let end = start.saturating_add(page_size.max(1)).min(total);
    PageView {
        app,
        offset: start,
        total,
        entries: &candidates[start..end],
        has_previous: start > 0,
        has_next: end < total,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(String),
    Skipped,
    Quit,
}

/// Pages through `candidates` until the user picks one, skips, or quits.
/// Exhausted input counts as quit.
pub fn run_selection_loop<K>(
    app: &str,
    candidates: &[String],
    page_size: usize,
    console: &mut K,
) -> Selection
where
    K: Console + ?Sized,
{
    let mut state = SelectionState::Browsing { offset: 0 };
    while let SelectionState::Browsing { offset } = state {
        console.show_page(&page_view(app, candidates, offset, page_size));

        let Some(input) = console.read_choice() else {
            state = SelectionState::Quit;
            break;
        };
        match step(offset, parse_choice(&input), candidates.len(), page_size) {
            Some(next) => state = next,
            None => console.status(StatusKind::Warn, "invalid choice, please try again"),
        }
    }

    match state {
        SelectionState::Selected { index } => Selection::Chosen(candidates[index].clone()),
        SelectionState::Skipped => Selection::Skipped,
        SelectionState::Quit | SelectionState::Browsing { .. } => Selection::Quit,
    }
}

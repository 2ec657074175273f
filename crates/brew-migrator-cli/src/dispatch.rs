use std::io;

use anyhow::{Context, Result};
use brew_migrator_core::{build_report, History, MigrationReport};
use brew_migrator_engine::{
    compute_worklist, plan_worklist, Catalog, Console, PageView, Reconciler, RunFlags,
    RunOptions, RunOutcome, StatusKind, WorklistEntry,
};
use brew_migrator_history::{list_applications, HistoryStore};
use brew_migrator_homebrew::{Homebrew, HomebrewVersion};

use crate::completion::write_completions_script;
use crate::config::{
    default_config_path, load_config_file, resolve_settings, Settings, SettingsOverrides,
};
use crate::console::{ProgressCatalog, TerminalConsole};
use crate::render::{
    current_output_style, format_report_lines, format_summary_line, TerminalRenderer,
};
use crate::Cli;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MigrationRun {
    pub report: MigrationReport,
    pub outcome: RunOutcome,
    pub saved: bool,
}

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let renderer = TerminalRenderer::from_style(current_output_style(cli.plain));

    if let Some(shell) = cli.completions {
        return write_completions_script(shell, &mut io::stdout().lock());
    }

    let settings = resolve_cli_settings(&cli)?;
    let store = HistoryStore::new(&settings.history_file);

    if cli.reset_history {
        run_reset_history_command(&store, renderer);
        return Ok(());
    }

    let apps = list_applications(&settings.applications_dir)?;
    if cli.list_apps {
        renderer.print_section(&format!(
            "Applications in {}",
            settings.applications_dir.display()
        ));
        renderer.print_lines(&apps);
        return Ok(());
    }

    let flags = RunFlags {
        specific_app: cli.app.clone(),
        retry_skipped: cli.retry_skipped,
    };
    if let Some(app) = &flags.specific_app {
        if !apps.contains(app) {
            renderer.print_status(
                "warn",
                &format!(
                    "no application named '{app}' in {}",
                    settings.applications_dir.display()
                ),
            );
        }
    }

    if cli.dry_run {
        let history = load_history_best_effort(&store, &mut RendererConsole(renderer));
        let plan = plan_worklist(&apps, &history, &flags);
        renderer.print_section("Dry run");
        renderer.print_lines(&format_worklist_lines(&plan));
        return Ok(());
    }

    let mut brew = Homebrew::new(&settings.brew_program);
    let version = match brew.ensure_available() {
        Ok(version) => version,
        Err(err) => {
            renderer.print_status("error", &format!("{err:#}"));
            return Ok(());
        }
    };
    renderer.print_status("info", &format!("using {}", describe_homebrew(&version)));

    let options = RunOptions {
        page_size: settings.page_size,
        batch: cli.batch,
    };
    let mut catalog = ProgressCatalog::new(&mut brew, renderer);
    let mut console = TerminalConsole::new(renderer, io::stdin().lock());
    let run = run_migration(&store, &apps, &flags, options, &mut catalog, &mut console);

    renderer.print_section("Migration report");
    if cli.json {
        let payload = serde_json::to_string_pretty(&run.report)
            .context("failed serializing migration report")?;
        println!("{payload}");
    } else {
        renderer.print_lines(&format_report_lines(&run.report));
        renderer.print_status("info", &format_summary_line(&run.report));
    }
    if run.outcome.quit {
        renderer.print_status(
            "info",
            "quit requested; remaining applications are left for the next run",
        );
    }
    if run.saved {
        renderer.print_status(
            "ok",
            &format!("history file updated: {}", store.path().display()),
        );
    }

    Ok(())
}

fn resolve_cli_settings(cli: &Cli) -> Result<Settings> {
    let lookup = |name: &str| std::env::var(name).ok();
    let fallback = default_config_path(&lookup);
    let file = load_config_file(cli.config.as_deref(), fallback.as_deref())?;
    let overrides = SettingsOverrides {
        history_file: cli.history_file.clone(),
        applications_dir: cli.applications_dir.clone(),
        page_size: cli.page_size,
    };
    resolve_settings(file, &overrides, &lookup)
}

/// Loads history, reconciles the worklist and saves once at the end, even
/// when the user quit part way through.
pub(crate) fn run_migration<C, K>(
    store: &HistoryStore,
    apps: &[String],
    flags: &RunFlags,
    options: RunOptions,
    catalog: &mut C,
    console: &mut K,
) -> MigrationRun
where
    C: Catalog + ?Sized,
    K: Console + ?Sized,
{
    let mut history = load_history_best_effort(store, console);
    console.status(
        StatusKind::Info,
        &format!("loaded migration history with {} entries", history.len()),
    );

    let snapshot = history.snapshot();
    let worklist = compute_worklist(apps, &history, flags);
    if worklist.is_empty() {
        console.status(StatusKind::Info, "no applications need migration");
    }

    let outcome = Reconciler::new(catalog, console, options).run(&worklist, &mut history);
    let saved = save_history_best_effort(store, &history, console);

    MigrationRun {
        report: build_report(&history, &snapshot),
        outcome,
        saved,
    }
}

pub(crate) fn load_history_best_effort<K>(store: &HistoryStore, console: &mut K) -> History
where
    K: Console + ?Sized,
{
    store.load().unwrap_or_else(|err| {
        console.status(StatusKind::Error, &format!("error loading history: {err:#}"));
        History::new()
    })
}

pub(crate) fn save_history_best_effort<K>(
    store: &HistoryStore,
    history: &History,
    console: &mut K,
) -> bool
where
    K: Console + ?Sized,
{
    match store.save(history) {
        Ok(()) => true,
        Err(err) => {
            console.status(StatusKind::Error, &format!("error saving history: {err:#}"));
            false
        }
    }
}

fn run_reset_history_command(store: &HistoryStore, renderer: TerminalRenderer) {
    match store.reset() {
        Ok(true) => renderer.print_status(
            "ok",
            &format!("migration history cleared: {}", store.path().display()),
        ),
        Ok(false) => renderer.print_status(
            "info",
            &format!("no migration history at {}", store.path().display()),
        ),
        Err(err) => renderer.print_status("error", &format!("error clearing history: {err:#}")),
    }
}

pub(crate) fn format_worklist_lines(plan: &[WorklistEntry]) -> Vec<String> {
    if plan.is_empty() {
        return vec!["no applications need migration".to_string()];
    }
    plan.iter()
        .map(|entry| format!("{}\t{}", entry.app, entry.reason.as_str()))
        .collect()
}

fn describe_homebrew(version: &HomebrewVersion) -> String {
    match &version.version {
        Some(parsed) => format!("Homebrew {parsed}"),
        None if !version.banner.is_empty() => version.banner.clone(),
        None => "Homebrew (unknown version)".to_string(),
    }
}

/// Status-only console for flows that never prompt.
struct RendererConsole(TerminalRenderer);

impl Console for RendererConsole {
    fn status(&mut self, kind: StatusKind, message: &str) {
        self.0.print_status(kind.as_str(), message);
    }

    fn show_page(&mut self, _page: &PageView<'_>) {}

    fn read_choice(&mut self) -> Option<String> {
        None
    }
}

use super::*;
use std::collections::{BTreeMap, VecDeque};
use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use brew_migrator_core::{
    History, MigrationRecord, MigrationReport, MigrationStatus, ReportEntry, SkipReason,
};
use brew_migrator_engine::{
    page_view, Catalog, Console, PageView, RunFlags, RunOptions, StatusKind, WorkReason,
    WorklistEntry,
};
use brew_migrator_history::HistoryStore;
use brew_migrator_homebrew::{InstallOutcome, PackageKind};
use clap::error::ErrorKind;
use clap::Parser;

use crate::completion::write_completions_script;
use crate::config::{
    default_config_path, expand_home, load_config_file, parse_config_file, resolve_settings,
    ConfigFile, SettingsOverrides,
};
use crate::console::{read_input_line, TerminalConsole};
use crate::dispatch::{format_worklist_lines, run_cli, run_migration};
use crate::render::{
    format_page_lines, format_report_lines, format_summary_line, render_status_line,
    resolve_output_style, OutputStyle, TerminalRenderer,
};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let seq = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "brew-migrator-cli-tests-{}-{nanos}-{seq}",
        std::process::id()
    ));
    fs::create_dir_all(&path).expect("must create test dir");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<BTreeMap<_, _>>();
    move |name: &str| vars.get(name).cloned()
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[derive(Default)]
struct FakeCatalog {
    results: BTreeMap<String, Vec<String>>,
    failures: BTreeMap<String, String>,
    searches: Vec<String>,
}

impl FakeCatalog {
    fn with_results(entries: &[(&str, &[&str])]) -> Self {
        let mut catalog = Self::default();
        for (query, candidates) in entries {
            catalog.results.insert(
                query.to_string(),
                candidates.iter().map(ToString::to_string).collect(),
            );
        }
        catalog
    }
}

impl Catalog for FakeCatalog {
    fn search(&mut self, query: &str, _kind: PackageKind) -> anyhow::Result<Vec<String>> {
        self.searches.push(query.to_string());
        self.results
            .get(query)
            .cloned()
            .ok_or_else(|| anyhow!("unexpected search for {query}"))
    }

    fn is_installed(&mut self, _package: &str, _kind: PackageKind) -> bool {
        false
    }

    fn install(&mut self, package: &str, _kind: PackageKind) -> InstallOutcome {
        match self.failures.get(package) {
            Some(detail) => InstallOutcome::Failed(detail.clone()),
            None => InstallOutcome::Installed,
        }
    }
}

#[derive(Default)]
struct ScriptedConsole {
    inputs: VecDeque<String>,
    statuses: Vec<(StatusKind, String)>,
}

impl ScriptedConsole {
    fn with_inputs(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(ToString::to_string).collect(),
            statuses: Vec::new(),
        }
    }
}

impl Console for ScriptedConsole {
    fn status(&mut self, kind: StatusKind, message: &str) {
        self.statuses.push((kind, message.to_string()));
    }

    fn show_page(&mut self, _page: &PageView<'_>) {}

    fn read_choice(&mut self) -> Option<String> {
        self.inputs.pop_front()
    }
}

#[test]
fn cli_parses_migration_flags() {
    let cli = Cli::try_parse_from([
        "brew-migrator",
        "--app",
        "Slack",
        "--retry-skipped",
        "--batch",
        "--page-size",
        "8",
    ])
    .expect("must parse");
    assert_eq!(cli.app.as_deref(), Some("Slack"));
    assert!(cli.retry_skipped);
    assert!(cli.batch);
    assert_eq!(cli.page_size, Some(8));
    assert!(!cli.list_apps);
    assert!(!cli.reset_history);
}

#[test]
fn cli_rejects_non_numeric_page_size() {
    let err = Cli::try_parse_from(["brew-migrator", "--page-size", "five"])
        .expect_err("page size must be numeric");
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn cli_rejects_unknown_completion_shell() {
    let err = Cli::try_parse_from(["brew-migrator", "--completions", "tcsh"])
        .expect_err("unknown shell must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn completions_script_names_binary() {
    let mut out = Vec::new();
    write_completions_script(CliCompletionShell::Bash, &mut out).expect("must generate");
    let script = String::from_utf8(out).expect("utf8");
    assert!(script.contains("brew-migrator"));
    assert!(script.contains("--retry-skipped"));
}

#[test]
fn config_file_parses_known_keys() {
    let config = parse_config_file(
        r#"
history_file = "~/state/history"
applications_dir = "/Volumes/Apps"
page_size = 10
brew_program = "/opt/homebrew/bin/brew"
"#,
    )
    .expect("must parse");
    assert_eq!(config.history_file.as_deref(), Some("~/state/history"));
    assert_eq!(config.page_size, Some(10));
    assert_eq!(
        config.brew_program.as_deref(),
        Some("/opt/homebrew/bin/brew")
    );
}

#[test]
fn config_file_rejects_unknown_keys() {
    let err = parse_config_file("pagesize = 3\n").expect_err("unknown key must fail");
    assert!(err.to_string().contains("failed parsing brew-migrator config"));
}

#[test]
fn resolve_settings_uses_defaults() {
    let settings = resolve_settings(
        ConfigFile::default(),
        &SettingsOverrides::default(),
        &env_from(&[("HOME", "/Users/sam")]),
    )
    .expect("must resolve");
    assert_eq!(
        settings.history_file,
        PathBuf::from("/Users/sam/.brew_migrator_history")
    );
    assert_eq!(settings.applications_dir, PathBuf::from("/Applications"));
    assert_eq!(settings.page_size, 5);
    assert_eq!(settings.brew_program, "brew");
}

#[test]
fn resolve_settings_prefers_cli_then_env_then_file() {
    let file = ConfigFile {
        history_file: Some("~/from-file".to_string()),
        applications_dir: Some("/from-file/apps".to_string()),
        page_size: Some(3),
        brew_program: Some("/usr/local/bin/brew".to_string()),
    };
    let env = env_from(&[
        ("HOME", "/Users/sam"),
        ("BREW_MIGRATOR_HISTORY", "/from-env/history"),
    ]);

    let from_env = resolve_settings(file.clone(), &SettingsOverrides::default(), &env)
        .expect("must resolve");
    assert_eq!(from_env.history_file, PathBuf::from("/from-env/history"));
    assert_eq!(from_env.applications_dir, PathBuf::from("/from-file/apps"));
    assert_eq!(from_env.page_size, 3);
    assert_eq!(from_env.brew_program, "/usr/local/bin/brew");

    let overrides = SettingsOverrides {
        history_file: Some(PathBuf::from("/from-cli/history")),
        applications_dir: None,
        page_size: Some(9),
    };
    let from_cli = resolve_settings(file, &overrides, &env).expect("must resolve");
    assert_eq!(from_cli.history_file, PathBuf::from("/from-cli/history"));
    assert_eq!(from_cli.page_size, 9);
}

#[test]
fn resolve_settings_expands_home_in_file_paths() {
    let file = ConfigFile {
        history_file: Some("~/state/history".to_string()),
        ..ConfigFile::default()
    };
    let settings = resolve_settings(
        file,
        &SettingsOverrides::default(),
        &env_from(&[("HOME", "/Users/sam")]),
    )
    .expect("must resolve");
    assert_eq!(
        settings.history_file,
        PathBuf::from("/Users/sam/state/history")
    );
}

#[test]
fn resolve_settings_rejects_zero_page_size() {
    let overrides = SettingsOverrides {
        page_size: Some(0),
        ..SettingsOverrides::default()
    };
    let err = resolve_settings(
        ConfigFile::default(),
        &overrides,
        &env_from(&[("HOME", "/Users/sam")]),
    )
    .expect_err("zero page size must fail");
    assert_eq!(err.to_string(), "page size must be at least 1");
}

#[test]
fn resolve_settings_requires_home_without_history_override() {
    let err = resolve_settings(
        ConfigFile::default(),
        &SettingsOverrides::default(),
        &env_from(&[]),
    )
    .expect_err("missing HOME must fail");
    assert!(err.to_string().contains("HOME is not set"));

    let overrides = SettingsOverrides {
        history_file: Some(PathBuf::from("/tmp/history")),
        ..SettingsOverrides::default()
    };
    resolve_settings(ConfigFile::default(), &overrides, &env_from(&[]))
        .expect("explicit history file needs no HOME");
}

#[test]
fn expand_home_only_touches_tilde_prefix() {
    let home = Path::new("/Users/sam");
    assert_eq!(expand_home("~/x", Some(home)), PathBuf::from("/Users/sam/x"));
    assert_eq!(expand_home("~", Some(home)), PathBuf::from("/Users/sam"));
    assert_eq!(expand_home("/abs/~/x", Some(home)), PathBuf::from("/abs/~/x"));
    assert_eq!(expand_home("~/x", None), PathBuf::from("~/x"));
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let xdg = default_config_path(&env_from(&[
        ("XDG_CONFIG_HOME", "/xdg"),
        ("HOME", "/Users/sam"),
    ]));
    assert_eq!(xdg, Some(PathBuf::from("/xdg/brew-migrator/config.toml")));

    let home = default_config_path(&env_from(&[("HOME", "/Users/sam")]));
    assert_eq!(
        home,
        Some(PathBuf::from("/Users/sam/.config/brew-migrator/config.toml"))
    );
    assert_eq!(default_config_path(&env_from(&[])), None);
}

#[test]
fn load_config_file_requires_explicit_path_to_exist() {
    let dir = test_dir();
    let missing = dir.join("missing.toml");

    let err = load_config_file(Some(missing.as_path()), None).expect_err("explicit file must exist");
    assert!(err.to_string().contains("failed reading config file"));
    assert_eq!(
        load_config_file(None, Some(missing.as_path())).expect("absent fallback is fine"),
        ConfigFile::default()
    );

    let present = dir.join("config.toml");
    fs::write(&present, "page_size = 7\n").expect("must write config");
    let config = load_config_file(None, Some(present.as_path())).expect("must load");
    assert_eq!(config.page_size, Some(7));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "installed slack for Slack"),
        "installed slack for Slack"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "installed slack for Slack"),
        "[OK] installed slack for Slack"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "error", "installing docker failed"),
        "[ERR] installing docker failed"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "unknown", "as is"),
        "as is"
    );
}

#[test]
fn resolve_output_style_follows_stdout_tty() {
    assert_eq!(resolve_output_style(true), OutputStyle::Rich);
    assert_eq!(resolve_output_style(false), OutputStyle::Plain);
}

#[test]
fn format_page_lines_shows_global_numbers_and_available_options() {
    let candidates = (1..=7).map(|n| format!("cask-{n}")).collect::<Vec<_>>();

    let first = format_page_lines(&page_view("Zoom", &candidates, 0, 5));
    assert_eq!(first[0], "matches 1-5 of 7:");
    assert_eq!(first[1], "  [1] cask-1");
    assert_eq!(
        first.last().map(String::as_str),
        Some("  [N] next page  [S] skip  [Q] quit")
    );

    let second = format_page_lines(&page_view("Zoom", &candidates, 5, 5));
    assert_eq!(
        second,
        vec![
            "matches 6-7 of 7:".to_string(),
            "  [6] cask-6".to_string(),
            "  [7] cask-7".to_string(),
            "  [P] previous page  [S] skip  [Q] quit".to_string(),
        ]
    );
}

#[test]
fn format_report_lines_lists_each_section() {
    let report = MigrationReport {
        newly_migrated: vec![ReportEntry {
            app: "Slack".to_string(),
            detail: "slack".to_string(),
        }],
        failed: vec![ReportEntry {
            app: "Docker".to_string(),
            detail: "conflict".to_string(),
        }],
        newly_skipped: Vec::new(),
    };
    assert_eq!(
        format_report_lines(&report),
        vec![
            "newly migrated applications:".to_string(),
            "  - Slack -> slack".to_string(),
            "failed applications:".to_string(),
            "  - Docker: conflict".to_string(),
        ]
    );
    assert_eq!(
        format_summary_line(&report),
        "migration summary: migrated=1 failed=1 skipped=0"
    );
}

#[test]
fn format_report_lines_marks_empty_migration_section() {
    assert_eq!(
        format_report_lines(&MigrationReport::default()),
        vec![
            "newly migrated applications:".to_string(),
            "  (none)".to_string()
        ]
    );
}

#[test]
fn format_worklist_lines_include_reasons() {
    let lines = format_worklist_lines(&[
        WorklistEntry {
            app: "Docker".to_string(),
            reason: WorkReason::RetryFailed,
        },
        WorklistEntry {
            app: "Zoom".to_string(),
            reason: WorkReason::Unprocessed,
        },
    ]);
    assert_eq!(lines, vec!["Docker\tretry-failed", "Zoom\tunprocessed"]);
    assert_eq!(
        format_worklist_lines(&[]),
        vec!["no applications need migration"]
    );
}

#[test]
fn read_input_line_strips_terminators_and_reports_end() {
    let mut input = Cursor::new("n\r\n2\n");
    assert_eq!(
        read_input_line(&mut input).expect("must read"),
        Some("n".to_string())
    );
    assert_eq!(
        read_input_line(&mut input).expect("must read"),
        Some("2".to_string())
    );
    assert_eq!(read_input_line(&mut input).expect("must read"), None);
}

#[test]
fn terminal_console_reads_choices_until_end_of_input() {
    let renderer = TerminalRenderer::from_style(OutputStyle::Plain);
    let mut console = TerminalConsole::new(renderer, Cursor::new("s\n"));
    assert_eq!(console.read_choice(), Some("s".to_string()));
    assert_eq!(console.read_choice(), None);
}

#[test]
fn run_migration_persists_outcomes_and_reports_deltas() {
    let dir = test_dir();
    let store = HistoryStore::new(dir.join("history"));
    let mut catalog = FakeCatalog::with_results(&[("Foo", &["foo-cask"]), ("Bar", &[])]);
    let mut console = ScriptedConsole::with_inputs(&["1"]);

    let run = run_migration(
        &store,
        &names(&["Foo", "Bar"]),
        &RunFlags::default(),
        RunOptions::default(),
        &mut catalog,
        &mut console,
    );

    assert!(run.saved);
    assert!(!run.outcome.quit);
    assert_eq!(
        fs::read_to_string(store.path()).expect("history must exist"),
        "Bar:skipped:no_candidate_found\nFoo:migrated:foo-cask\n"
    );
    assert_eq!(run.report.newly_migrated.len(), 1);
    assert_eq!(run.report.newly_skipped.len(), 1);
    assert!(run.report.failed.is_empty());
    assert!(console
        .statuses
        .iter()
        .any(|(kind, message)| *kind == StatusKind::Info
            && message == "loaded migration history with 0 entries"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_migration_saves_partial_history_on_quit() {
    let dir = test_dir();
    let store = HistoryStore::new(dir.join("history"));
    let mut seeded = History::new();
    seeded.record("Old", MigrationRecord::failed("old failure"));
    seeded.record("Kept", MigrationRecord::migrated("kept"));
    store.save(&seeded).expect("must seed");

    let mut catalog = FakeCatalog::with_results(&[("A", &["a"]), ("B", &["b"]), ("C", &["c"])]);
    let mut console = ScriptedConsole::with_inputs(&["1", "Q"]);

    let run = run_migration(
        &store,
        &names(&["A", "B", "C", "Kept"]),
        &RunFlags::default(),
        RunOptions::default(),
        &mut catalog,
        &mut console,
    );

    assert!(run.outcome.quit);
    assert_eq!(catalog.searches, names(&["A", "B"]));
    let saved = store.load().expect("must load");
    assert_eq!(saved.len(), 3);
    assert_eq!(saved.status("A"), Some(MigrationStatus::Migrated));
    assert!(saved.get("B").is_none());
    assert!(saved.get("C").is_none());
    assert_eq!(saved.get("Old"), Some(&MigrationRecord::failed("old failure")));
    assert_eq!(run.report.failed.len(), 1, "stale failures are still reported");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_migration_rerun_is_idempotent_for_settled_apps() {
    let dir = test_dir();
    let store = HistoryStore::new(dir.join("history"));
    let mut seeded = History::new();
    seeded.record("Arc", MigrationRecord::migrated("arc"));
    seeded.record("Notes", MigrationRecord::skipped(SkipReason::NoCandidateFound));
    store.save(&seeded).expect("must seed");
    let before = fs::read_to_string(store.path()).expect("must read");

    let mut catalog = FakeCatalog::default();
    let mut console = ScriptedConsole::default();
    let run = run_migration(
        &store,
        &names(&["Arc", "Notes"]),
        &RunFlags::default(),
        RunOptions::default(),
        &mut catalog,
        &mut console,
    );

    assert!(catalog.searches.is_empty());
    assert!(run.report.is_empty());
    assert_eq!(fs::read_to_string(store.path()).expect("must read"), before);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_migration_keeps_settled_apps_when_history_has_undecodable_line() {
    let dir = test_dir();
    let store = HistoryStore::new(dir.join("history"));
    fs::write(
        store.path(),
        b"Arc:migrated:arc\nSlack:migrated:slack\nOdd:failed:bad \xff byte\n",
    )
    .expect("must seed");

    let mut catalog = FakeCatalog::with_results(&[("Zed", &[])]);
    let mut console = ScriptedConsole::default();
    let run = run_migration(
        &store,
        &names(&["Arc", "Slack", "Zed"]),
        &RunFlags::default(),
        RunOptions::default(),
        &mut catalog,
        &mut console,
    );

    assert!(run.saved);
    assert_eq!(catalog.searches, names(&["Zed"]));
    assert_eq!(
        fs::read_to_string(store.path()).expect("must read"),
        "Arc:migrated:arc\nSlack:migrated:slack\nZed:skipped:no_candidate_found\n"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_migration_continues_when_history_is_unreadable() {
    let dir = test_dir();
    let store = HistoryStore::new(&dir);
    let mut catalog = FakeCatalog::with_results(&[("Foo", &[])]);
    let mut console = ScriptedConsole::default();

    let run = run_migration(
        &store,
        &names(&["Foo"]),
        &RunFlags::default(),
        RunOptions::default(),
        &mut catalog,
        &mut console,
    );

    assert!(!run.saved);
    assert_eq!(catalog.searches, names(&["Foo"]));
    assert_eq!(run.report.newly_skipped.len(), 1);
    let errors = console
        .statuses
        .iter()
        .filter(|(kind, _)| *kind == StatusKind::Error)
        .map(|(_, message)| message.as_str())
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("error loading history"));
    assert!(errors[1].starts_with("error saving history"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn list_apps_does_not_touch_history() {
    let dir = test_dir();
    let apps_dir = dir.join("Applications");
    fs::create_dir_all(apps_dir.join("B.app")).expect("must create bundle");
    fs::create_dir_all(apps_dir.join("A.app")).expect("must create bundle");
    let history = dir.join("history");
    let config = dir.join("config.toml");
    fs::write(&config, "").expect("must write config");

    let args: Vec<OsString> = vec![
        "brew-migrator".into(),
        "--plain".into(),
        "--list-apps".into(),
        "--config".into(),
        config.clone().into_os_string(),
        "--applications-dir".into(),
        apps_dir.clone().into_os_string(),
        "--history-file".into(),
        history.clone().into_os_string(),
    ];
    let cli = Cli::try_parse_from(args).expect("must parse");
    run_cli(cli).expect("listing must succeed");
    assert!(!history.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_homebrew_reports_error_without_touching_history() {
    let dir = test_dir();
    let apps_dir = dir.join("Applications");
    fs::create_dir_all(apps_dir.join("Slack.app")).expect("must create bundle");
    let history = dir.join("history");
    let config = dir.join("config.toml");
    let missing_brew = dir.join("no-such-brew");
    fs::write(
        &config,
        format!("brew_program = \"{}\"\n", missing_brew.display()),
    )
    .expect("must write config");

    let args: Vec<OsString> = vec![
        "brew-migrator".into(),
        "--plain".into(),
        "--config".into(),
        config.clone().into_os_string(),
        "--applications-dir".into(),
        apps_dir.clone().into_os_string(),
        "--history-file".into(),
        history.clone().into_os_string(),
    ];
    let cli = Cli::try_parse_from(args).expect("must parse");
    run_cli(cli).expect("missing homebrew ends the run without a failure status");
    assert!(!history.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reset_history_without_file_is_not_an_error() {
    let dir = test_dir();
    let history = dir.join("history");
    let config = dir.join("config.toml");
    fs::write(&config, "").expect("must write config");

    let args: Vec<OsString> = vec![
        "brew-migrator".into(),
        "--plain".into(),
        "--reset-history".into(),
        "--config".into(),
        config.clone().into_os_string(),
        "--history-file".into(),
        history.clone().into_os_string(),
    ];
    let cli = Cli::try_parse_from(args).expect("must parse");
    run_cli(cli).expect("reset must succeed");
    assert!(!history.exists());

    let _ = fs::remove_dir_all(&dir);
}

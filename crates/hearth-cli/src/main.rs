//! Hearth - game launcher settings from the shell
//!
//! Usage:
//!   hearth settings show default            # Global defaults
//!   hearth settings show mygame -c wine     # One game's wine page
//!   hearth settings set mygame --field showFps=true
//!   hearth fields --scope override          # Membership table

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearth_core::gateway::clipboard::ClipboardTarget;
use hearth_core::gateway::local::LibraryEntry;
use hearth_core::prelude::*;
use hearth_core::settings::FieldIssue;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Game launcher settings", long_about = None)]
struct Cli {
    /// Settings store directory (overrides hearth.toml)
    #[arg(long, global = true, value_name = "DIR")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit settings for the defaults or one game
    Settings(SettingsArgs),

    /// Show which scope persists each field
    Fields {
        /// Only list fields persisted by this scope
        #[arg(long)]
        scope: Option<ScopeFilter>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage library entries used for game titles
    Library(LibraryArgs),
}

#[derive(Args)]
struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand)]
enum SettingsSubcommand {
    /// Show the loaded settings
    Show {
        /// Game id, or `default` for the global defaults
        entity: String,

        /// Category page (general, wine, sync, other, log, advanced)
        #[arg(short, long)]
        category: Option<String>,

        /// Runner the game is installed through
        #[arg(long)]
        runner: Option<String>,

        /// Opened from a library card
        #[arg(long)]
        from_game_card: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Change one or more fields and save them in a single write
    Set {
        /// Game id, or `default` for the global defaults
        entity: String,

        /// Field assignment
        #[arg(long = "field", value_name = "NAME=VALUE", required = true)]
        fields: Vec<String>,

        /// Runner the game is installed through
        #[arg(long)]
        runner: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Copy `{ entityId, title, ...settings }` to the clipboard
    Copy {
        /// Game id, or `default` for the global defaults
        entity: String,

        /// Write the snapshot to a file instead of the terminal clipboard
        #[arg(long, value_name = "PATH")]
        to_file: Option<PathBuf>,

        /// Runner the game is installed through
        #[arg(long)]
        runner: Option<String>,
    },

    /// Open the folder holding the settings record
    Reveal {
        /// Game id, or `default` for the global defaults
        entity: String,
    },
}

#[derive(Args)]
struct LibraryArgs {
    #[command(subcommand)]
    command: LibrarySubcommand,
}

#[derive(Subcommand)]
enum LibrarySubcommand {
    /// List library entries
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add or replace a library entry
    Add {
        /// Game id
        entity: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Runner (legendary, gog, sideload)
        #[arg(long, default_value = "legendary")]
        runner: String,

        /// Whether the game can be started without a connection
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        can_run_offline: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeFilter {
    /// Global defaults
    Default,
    /// Per-game overrides
    Override,
}

impl ScopeFilter {
    fn includes(self, membership: Membership) -> bool {
        match (self, membership) {
            (_, Membership::Both) => true,
            (ScopeFilter::Default, Membership::Global) => true,
            (ScopeFilter::Override, Membership::Override) => true,
            _ => false,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearth=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut ctx = AppContext::with_defaults()?;
    if let Some(store) = cli.store {
        ctx = ctx.with_store_dir(store);
    }
    tracing::debug!(store = %ctx.store_dir().display(), "using settings store");

    match cli.command {
        Commands::Settings(args) => run_settings(&ctx, args)?,
        Commands::Fields { scope, format } => run_fields(scope, format)?,
        Commands::Library(args) => run_library(&ctx, args)?,
    }

    Ok(())
}

fn run_settings(ctx: &AppContext, args: SettingsArgs) -> Result<()> {
    match args.command {
        SettingsSubcommand::Show {
            entity,
            category,
            runner,
            from_game_card,
            format,
        } => {
            let nav = NavigationContext::new(entity.as_str(), category.unwrap_or_default())
                .from_game_card(from_game_card);
            run_show(ctx, &nav, runner.as_deref(), format)?;
        }
        SettingsSubcommand::Set {
            entity,
            fields,
            runner,
            format,
        } => {
            run_set(ctx, &entity, &fields, runner.as_deref(), format)?;
        }
        SettingsSubcommand::Copy {
            entity,
            to_file,
            runner,
        } => {
            let mut gateway = ctx.local_gateway();
            if let Some(path) = to_file {
                gateway = gateway.with_clipboard(ClipboardTarget::File(path));
            }
            let screen = open_screen(ctx, gateway, &entity, runner.as_deref(), false)?;
            let text = screen.copy_to_clipboard()?;
            println!();
            println!("{text}");
        }
        SettingsSubcommand::Reveal { entity } => {
            let gateway = ctx.local_gateway();
            let entity = EntityId::new(entity);
            let path = gateway.config_path(&entity)?;
            gateway.reveal_config_file(&entity)?;
            println!("Opened {}", path.display());
        }
    }
    Ok(())
}

fn run_show(
    ctx: &AppContext,
    nav: &NavigationContext,
    runner: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let gateway = ctx.local_gateway();
    let options = MountOptions {
        runner: resolve_runner(&gateway, &nav.entity_id, runner)?,
        ..MountOptions::default()
    };
    let selection = select_scope(nav);
    let mut buffer = SettingsBuffer::new(
        selection.clone(),
        options,
        ctx.environment(),
        ctx.language(),
    );

    // Showing settings never writes; only the buffer is loaded.
    block_on(buffer.load(&gateway))?;
    if let LoadState::Failed(reason) = buffer.state() {
        anyhow::bail!("Failed to load settings for '{}': {}", nav.entity_id, reason);
    }

    let fields: Vec<FieldName> = match selection.category {
        Some(_) => selection.visible_fields(),
        None => FieldName::for_scope(&selection.scope).collect(),
    };
    let issues = buffer.fields().issues();

    match format {
        OutputFormat::Table => {
            println!("{}", buffer.title().unwrap_or_default());
            println!(
                "  scope: {}  page: {}  back: {}",
                scope_label(&selection.scope),
                selection.category.map(|c| c.as_str()).unwrap_or("-"),
                selection.return_target.path()
            );
            println!();
            println!("{:<26} {:<10} Value", "Field", "Kind");
            println!("{}", "-".repeat(70));
            for field in &fields {
                let value = buffer
                    .get(*field)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<26} {:<10} {}", field.as_str(), field.kind(), truncate(&value, 60));
            }
            print_issues(&issues);
        }
        OutputFormat::Json => {
            let values: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .filter_map(|field| buffer.get(*field).map(|v| (field.as_str().to_string(), v.to_json())))
                .collect();
            let output = serde_json::json!({
                "entityId": nav.entity_id,
                "title": buffer.title(),
                "scope": scope_label(&selection.scope),
                "category": selection.category.map(|c| c.as_str()),
                "returnTarget": selection.return_target.path(),
                "fields": values,
                "issues": issues
                    .iter()
                    .map(|issue| serde_json::json!({
                        "field": issue.field.as_str(),
                        "message": issue.message,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_set(
    ctx: &AppContext,
    entity: &str,
    assignments: &[String],
    runner: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let edits = assignments
        .iter()
        .map(|pair| split_assignment(pair))
        .collect::<Result<Vec<_>>>()?;

    // Load and edits settle together: one write per invocation.
    let mut screen = open_screen(ctx, ctx.local_gateway(), entity, runner, true)?;
    let changed = screen
        .edit(edits.iter().map(|(name, value)| (name.as_str(), value.as_str())))
        .with_context(|| format!("Failed to update settings for '{}'", entity))?;

    if let Some(notice) = screen.write_notice() {
        anyhow::bail!("{}", notice);
    }

    let issues = screen.buffer().fields().issues();
    match format {
        OutputFormat::Table => {
            if changed > 0 {
                println!("✓ Updated {} field(s) for '{}'", changed, entity);
            } else {
                println!("• No changes for '{}'", entity);
            }
            print_issues(&issues);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "entityId": entity,
                "changed": changed,
                "writes": screen.flush_count(),
                "warnings": issues.iter().map(|i| i.message.clone()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_fields(scope: Option<ScopeFilter>, format: OutputFormat) -> Result<()> {
    let fields: Vec<FieldName> = FieldName::ALL
        .iter()
        .copied()
        .filter(|field| scope.is_none_or(|s| s.includes(field.membership())))
        .collect();

    match format {
        OutputFormat::Table => {
            println!("{:<26} {:<10} Scope", "Field", "Kind");
            println!("{}", "-".repeat(50));
            for field in &fields {
                println!(
                    "{:<26} {:<10} {}",
                    field.as_str(),
                    field.kind(),
                    field.membership().as_str()
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = fields
                .iter()
                .map(|field| {
                    serde_json::json!({
                        "name": field.as_str(),
                        "kind": field.kind().to_string(),
                        "scope": field.membership().as_str(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_library(ctx: &AppContext, args: LibraryArgs) -> Result<()> {
    let gateway = ctx.local_gateway();

    match args.command {
        LibrarySubcommand::List { format } => {
            let library = gateway.load_library()?;
            let mut ids: Vec<&String> = library.keys().collect();
            ids.sort();

            match format {
                OutputFormat::Table => {
                    if ids.is_empty() {
                        println!("No games in library.");
                        println!("Add one with: hearth library add <id> --title <title>");
                        return Ok(());
                    }
                    println!("{:<24} {:<12} {:<8} Title", "Id", "Runner", "Offline");
                    println!("{}", "-".repeat(70));
                    for id in ids {
                        let entry = &library[id];
                        println!(
                            "{:<24} {:<12} {:<8} {}",
                            id,
                            entry.runner.as_str(),
                            if entry.can_run_offline { "yes" } else { "no" },
                            entry.title
                        );
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&library)?);
                }
            }
        }
        LibrarySubcommand::Add {
            entity,
            title,
            runner,
            can_run_offline,
        } => {
            let entity = EntityId::new(entity);
            if entity.is_default() {
                anyhow::bail!("'{}' is reserved for the global defaults", entity);
            }
            gateway.config_path(&entity)?;

            let mut library: HashMap<String, LibraryEntry> = gateway.load_library()?;
            let replaced = library
                .insert(
                    entity.to_string(),
                    LibraryEntry {
                        title: title.clone(),
                        runner: Runner::try_from(runner.as_str())?,
                        can_run_offline,
                    },
                )
                .is_some();
            gateway.save_library(&library)?;

            if replaced {
                println!("✓ Updated '{}' ({})", entity, title);
            } else {
                println!("✓ Added '{}' ({})", entity, title);
            }
        }
    }

    Ok(())
}

/// Mount a screen over `gateway` and wait for its load. Unless
/// `defer_flush` is set, the load itself issues the screen's first write.
fn open_screen(
    ctx: &AppContext,
    gateway: LocalGateway,
    entity: &str,
    runner: Option<&str>,
    defer_flush: bool,
) -> Result<SettingsScreen<LocalGateway>> {
    let entity = EntityId::new(entity);
    let options = MountOptions {
        runner: resolve_runner(&gateway, &entity, runner)?,
        ..MountOptions::default()
    };
    let mut screen = SettingsScreen::mount(
        gateway,
        &NavigationContext::new(entity.clone(), ""),
        options,
        ctx.environment(),
        ctx.language(),
    );

    if defer_flush {
        block_on(screen.load_deferred())?;
    } else {
        block_on(screen.load())?;
    }
    if let LoadState::Failed(reason) = screen.load_state() {
        anyhow::bail!("Failed to load settings for '{}': {}", entity, reason);
    }
    Ok(screen)
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Explicit runner, else the one recorded in the library.
fn resolve_runner(gateway: &LocalGateway, entity: &EntityId, runner: Option<&str>) -> Result<Runner> {
    if let Some(runner) = runner {
        return Runner::try_from(runner);
    }
    if entity.is_default() {
        return Ok(Runner::default());
    }
    let library = gateway.load_library()?;
    Ok(library
        .get(entity.as_str())
        .map(|entry| entry.runner)
        .unwrap_or_default())
}

fn split_assignment(pair: &str) -> Result<(String, String)> {
    let Some((name, value)) = pair.split_once('=') else {
        anyhow::bail!("Invalid field assignment: '{}'. Use NAME=VALUE", pair);
    };
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Invalid field assignment: '{}'. Field name is empty", pair);
    }
    Ok((name.to_string(), value.to_string()))
}

fn print_issues(issues: &[FieldIssue]) {
    for issue in issues {
        println!("  ⚠ {}: {}", issue.field, issue.message);
    }
}

fn scope_label(scope: &ConfigScope) -> &'static str {
    match scope {
        ConfigScope::Default => "default",
        ConfigScope::Override(_) => "override",
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, OutputFormat, ScopeFilter, open_screen, run_set, split_assignment, truncate};
    use clap::Parser;
    use hearth_core::prelude::AppContext;
    use hearth_core::settings::Membership;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> AppContext {
        AppContext::new(
            temp.path().join("home"),
            temp.path().join("config"),
            temp.path().join("store"),
        )
    }

    #[test]
    fn assignment_splits_on_first_equals() {
        let (name, value) = split_assignment("otherOptions=DXVK_HUD=fps").unwrap();
        assert_eq!(name, "otherOptions");
        assert_eq!(value, "DXVK_HUD=fps");
    }

    #[test]
    fn assignment_without_equals_is_rejected() {
        assert!(split_assignment("showFps").is_err());
        assert!(split_assignment("=true").is_err());
    }

    #[test]
    fn assignment_allows_empty_value() {
        let (_, value) = split_assignment("launcherArgs=").unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn scope_filter_keeps_shared_fields() {
        assert!(ScopeFilter::Default.includes(Membership::Both));
        assert!(ScopeFilter::Override.includes(Membership::Override));
        assert!(!ScopeFilter::Override.includes(Membership::Global));
        assert!(!ScopeFilter::Default.includes(Membership::Derived));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ääääääääää", 6), "äää...");
    }

    #[test]
    fn parse_set_with_repeated_fields() {
        let cli = Cli::try_parse_from([
            "hearth",
            "settings",
            "set",
            "mygame",
            "--field",
            "showFps=true",
            "--field",
            "maxSharpness=3",
        ])
        .unwrap();
        let super::Commands::Settings(args) = cli.command else {
            panic!("expected settings command");
        };
        let super::SettingsSubcommand::Set { fields, .. } = args.command else {
            panic!("expected set");
        };
        assert_eq!(fields, vec!["showFps=true", "maxSharpness=3"]);
    }

    #[test]
    fn store_flag_is_global() {
        let cli = Cli::try_parse_from(["hearth", "fields", "--store", "/tmp/store"]).unwrap();
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/store")));
    }

    #[test]
    fn set_requires_a_field() {
        assert!(Cli::try_parse_from(["hearth", "settings", "set", "mygame"]).is_err());
    }

    #[test]
    fn set_loads_and_edits_with_one_write() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);

        let mut screen = open_screen(&ctx, ctx.local_gateway(), "default", None, true).unwrap();
        assert_eq!(screen.flush_count(), 0);
        screen.edit([("showFps", "true"), ("maxWorkers", "4")]).unwrap();
        assert_eq!(screen.flush_count(), 1);

        let stored = std::fs::read_to_string(temp.path().join("store").join("config.json")).unwrap();
        let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored["showFps"], true);
        assert_eq!(stored["maxWorkers"], 4);
    }

    #[test]
    fn set_with_a_bad_field_saves_nothing() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let fields = vec!["showFps=true".to_string(), "notAField=1".to_string()];

        assert!(run_set(&ctx, "default", &fields, None, OutputFormat::Json).is_err());
        assert!(!temp.path().join("store").join("config.json").exists());
    }
}

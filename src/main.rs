use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use eera_skills::ErrorCode;
use eera_skills::loader::preload::{preload_common, preload_hub};
use eera_skills::loader::{ComponentLibrary, ComponentLoader, IconProps, IconView, MountOptions, SvgIconLibrary};
use eera_skills::skills::telemetry::MemoryTelemetry;
use eera_skills::skills::{SkillDispatcher, SkillOutcome, SkillRegistry, SkillRequest, SkillsConfig};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing icon directory; pass --icon-dir or set EERA_ICON_DIR")]
    MissingIconDir,
    #[error("invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Registry(#[from] eera_skills::skills::registry::RegistryError),
    #[error(transparent)]
    Transport(#[from] eera_skills::skills::TransportError),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingIconDir => "E_MISSING_ICON_DIR",
            Self::InvalidJson(_) => "E_INVALID_JSON",
            Self::Registry(e) => e.error_code(),
            Self::Transport(e) => e.error_code(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "eera-skills", about = "Invoke EERA skills and load dashboard icons")]
struct Cli {
    /// YAML registry replacing the built-in skill list.
    #[arg(long, env = "SKILLS_REGISTRY_FILE")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered skills.
    Skills,
    /// Invoke one skill and print the normalized outcome.
    Invoke {
        skill_id: String,
        #[arg(long, default_value = "{}")]
        input: String,
        #[arg(long)]
        user_id: Option<String>,
        /// Defaults to a fresh v4 UUID.
        #[arg(long)]
        trace_id: Option<String>,
        /// Also print the telemetry event recorded for the call.
        #[arg(long)]
        events: bool,
    },
    /// Probe every registered skill.
    Health,
    Icons(IconsCommand),
}

#[derive(Args, Debug)]
struct IconsCommand {
    #[arg(long, env = "EERA_ICON_DIR")]
    icon_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: IconsSubcommand,
}

#[derive(Subcommand, Debug)]
enum IconsSubcommand {
    /// Warm the common icon set, or one hub's set.
    Preload {
        #[arg(long)]
        hub: Option<String>,
    },
    /// Render one icon as markup.
    Render {
        name: String,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        class: Option<String>,
        /// Icon rendered when `name` cannot be loaded.
        #[arg(long)]
        fallback: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let registry = match &cli.registry {
        Some(path) => SkillRegistry::from_yaml_file(path).await?,
        None => SkillRegistry::builtin(),
    };

    match cli.command {
        Command::Skills => {
            let skills: Vec<_> = registry.iter().collect();
            print_json(&json!(skills));
            Ok(ExitCode::SUCCESS)
        }
        Command::Invoke { skill_id, input, user_id, trace_id, events } => {
            let input: Value = serde_json::from_str(&input)?;
            let sink = Arc::new(MemoryTelemetry::default());
            let mut dispatcher = SkillDispatcher::with_reqwest(registry, SkillsConfig::from_env())?;
            if events {
                dispatcher = dispatcher.with_telemetry(sink.clone());
            }

            let mut request =
                SkillRequest::new(skill_id, input).with_trace_id(trace_id.unwrap_or_else(|| Uuid::new_v4().to_string()));
            if let Some(user_id) = user_id {
                request = request.with_user(user_id);
            }
            let outcome: SkillOutcome<Value> = dispatcher.invoke(&request).await;
            let code = if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE };

            if events {
                print_json(&json!({ "outcome": outcome, "events": sink.events() }));
            } else {
                print_json(&json!(outcome));
            }
            Ok(code)
        }
        Command::Health => {
            let dispatcher = SkillDispatcher::with_reqwest(registry, SkillsConfig::from_env())?;
            let snapshot = dispatcher.probe_health().await;
            print_json(&json!(snapshot));
            Ok(if snapshot.dispatcher_available { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Icons(icons) => run_icons(icons).await,
    }
}

async fn run_icons(icons: IconsCommand) -> Result<ExitCode, CliError> {
    let dir = icons.icon_dir.ok_or(CliError::MissingIconDir)?;
    let loader = ComponentLoader::new(SvgIconLibrary::new(dir));

    match icons.command {
        IconsSubcommand::Preload { hub } => {
            let report = match hub.as_deref() {
                Some(hub) => preload_hub(&loader, hub).await,
                None => preload_common(&loader).await,
            };
            print_json(&json!(report));
            Ok(ExitCode::SUCCESS)
        }
        IconsSubcommand::Render { name, size, class, fallback } => {
            let options = fallback_options(&loader, fallback.as_deref()).await;
            let props = IconProps { size, class, color: None };
            let mut view = IconView::mount(&loader, &name, props, options);
            view.settled().await;
            println!("{}", view.to_html());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Mount options carrying the fallback icon when it loads. A fallback that
/// fails to load is logged and skipped; the render still goes ahead.
async fn fallback_options<L: ComponentLibrary>(
    loader: &ComponentLoader<L>,
    fallback: Option<&str>,
) -> MountOptions<L::Component> {
    let options = MountOptions::default();
    let Some(name) = fallback else {
        return options;
    };
    match loader.resolve(name).await {
        Ok(component) => options.with_fallback(component),
        Err(e) => {
            tracing::warn!(name, code = e.error_code(), error = %e, "fallback icon unavailable; rendering without it");
            options
        }
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: output encode failed: {e}"),
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (environment + flags)
//! - runs the fetch-then-render pipeline
//! - prints or writes the result

use clap::Parser;

use crate::cli::{Command, FetchArgs, HtmlArgs};
use crate::config::{Config, ProviderKind, usable_key};
use crate::error::AppError;
use crate::render::RatesSection;

pub mod pipeline;

/// Entry point for the `rates` binary.
pub fn run() -> Result<(), AppError> {
    // `rates` and `rates -s CA` behave like `rates show ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let config = Config::from_env()?;

    match cli.command {
        Command::Show(args) => handle_show(&config, &args),
        Command::Html(args) => handle_html(&config, &args),
        Command::Tui(args) => handle_tui(&config, &args),
    }
}

/// A resolved fetch: config with flag overrides plus the region to request.
struct FetchPlan {
    config: Config,
    region: Option<String>,
}

fn plan_fetch(base: &Config, args: &FetchArgs) -> Result<FetchPlan, AppError> {
    let config = apply_overrides(base, args);
    let region = if config.provider.is_regional() {
        Some(config.resolve_region(args.state.as_deref())?)
    } else {
        None
    };
    Ok(FetchPlan { config, region })
}

/// Layer CLI flags over the environment config.
pub fn apply_overrides(base: &Config, args: &FetchArgs) -> Config {
    let mut config = base.clone();
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(key) = usable_key(args.api_key.clone()) {
        match config.provider {
            ProviderKind::Fred => config.fred_api_key = Some(key),
            ProviderKind::Regional => config.regional_api_key = Some(key),
            ProviderKind::Demo => {}
        }
    }
    config
}

fn load(plan: &FetchPlan) -> Result<RatesSection, AppError> {
    let provider = crate::data::build_provider(&plan.config)?;
    let mut section = RatesSection::new();
    pipeline::load_rates(
        &mut section,
        provider.as_deref(),
        plan.region.as_deref(),
        pipeline::today(),
    );
    Ok(section)
}

fn handle_show(config: &Config, args: &FetchArgs) -> Result<(), AppError> {
    let plan = plan_fetch(config, args)?;
    let section = load(&plan)?;
    println!(
        "{}",
        crate::render::format_section(&section, plan.config.provider, plan.region.as_deref())
    );
    Ok(())
}

fn handle_html(config: &Config, args: &HtmlArgs) -> Result<(), AppError> {
    let plan = plan_fetch(config, &args.fetch)?;
    let section = load(&plan)?;

    match &args.out {
        Some(path) => {
            crate::io::export::write_html(path, &section)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", section.to_html()),
    }

    if let Some(path) = &args.json {
        crate::io::export::write_cards_json(
            path,
            &section,
            plan.config.provider.display_name(),
            plan.region.as_deref(),
        )?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_tui(config: &Config, args: &FetchArgs) -> Result<(), AppError> {
    let plan = plan_fetch(config, args)?;
    crate::tui::run(plan.config, plan.region)
}

const SUBCOMMANDS: [&str; 4] = ["show", "html", "tui", "help"];

/// Insert the implicit `show` subcommand.
///
/// A bare `rates`, or one whose first argument is a fetch flag such as
/// `-p regional`, prints the rate table. Help and version flags still reach
/// the top-level parser.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let needs_show = match argv.get(1).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version") => false,
        Some(first) if SUBCOMMANDS.contains(&first) => false,
        Some(first) => first.starts_with('-'),
    };
    if needs_show {
        argv.insert(1.min(argv.len()), "show".to_string());
    }
    argv
}

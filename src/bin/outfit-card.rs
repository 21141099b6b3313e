use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::Parser;
use outfit_card::{CardConfig, CardError, ErrorPayload, HttpFetcher};

#[derive(Parser, Debug)]
#[command(name = "outfit-card", version, about = "Render a player's outfit card as PNG")]
struct Cli {
    /// Player profile id.
    #[arg(long, required_unless_present = "profile_json")]
    id: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON config file; missing values use built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read the profile payload from this file instead of the profile API.
    #[arg(long)]
    profile_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "outfit-card failed");
            let (payload, code) = match e.downcast_ref::<CardError>() {
                Some(card) => (card.to_payload(), exit_code(card.status_code())),
                None => (ErrorPayload::internal(), 1),
            };
            match serde_json::to_string(&payload) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", payload.error),
            }
            ExitCode::from(code)
        }
    }
}

fn exit_code(status: u16) -> u8 {
    match status {
        400 => 2,
        404 => 3,
        _ => 1,
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = match &cli.config {
        Some(path) => CardConfig::from_path(path)?,
        None => CardConfig::default(),
    }
    .with_env_overrides();
    let fetcher = HttpFetcher::new(cfg.timeout())?;

    let png = match &cli.profile_json {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read profile '{}'", path.display()))?;
            let profile: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("parse profile '{}'", path.display()))?;
            outfit_card::render_profile(&profile, &cfg, &fetcher)?
        }
        None => outfit_card::render_outfit(cli.id.as_deref().unwrap_or_default(), &cfg, &fetcher)?,
    };

    if let Some(parent) = cli.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&cli.out, &png)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

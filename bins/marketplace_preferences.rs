//! Buyer preference CLI
//!
//! Usage:
//!   marketplace_preferences build --set min_lot_area=500 --set max_lot_area=5000
//!   marketplace_preferences save --form prefs.json --client-id 3 --token abc
//!   marketplace_preferences recommend --client-id 3 --mock --set max_sale_price=200000

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use marketplace::api::{HttpApi, MockApi, RecommendationClient};
use marketplace::config::Config;
use marketplace::flow::PreferenceFlow;
use marketplace::form::FieldValue;
use marketplace::preferences::PreferenceForm;
use marketplace::receipts;
use marketplace::session::Session;

#[derive(Parser)]
#[command(name = "marketplace_preferences")]
#[command(about = "Validate buyer preference ranges, save them and fetch recommendations")]
struct Cli {
    #[arg(long, default_value = "config/marketplace.toml")]
    config: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FormArgs {
    /// key=value, applied after --form
    #[arg(long = "set")]
    sets: Vec<String>,
    /// JSON object of preference values
    #[arg(long)]
    form: Option<PathBuf>,
}

#[derive(Args)]
struct IdentityArgs {
    #[arg(long)]
    session: Option<PathBuf>,
    #[arg(long)]
    client_id: Option<u64>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    mock: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the ranges and print the query
    Build {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Validate, then store the preferences for the client
    Save {
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Fetch recommendations, saving the given preferences first if any
    Recommend {
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        identity: IdentityArgs,
    },
}

fn load_form(args: &FormArgs) -> Result<PreferenceForm> {
    let mut form = PreferenceForm::new();
    if let Some(path) = &args.form {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preference form: {}", path.display()))?;
        let values: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preference form: {}", path.display()))?;
        for (key, value) in &values {
            form.set(key, FieldValue::from_json(value));
        }
    }
    for raw in &args.sets {
        let (key, value) = raw
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", raw))?;
        form.set(key.trim(), FieldValue::from_input(value));
    }
    Ok(form)
}

fn build_flow(config: &Config, form: PreferenceForm, identity: &IdentityArgs) -> Result<PreferenceFlow> {
    let session = match &identity.session {
        Some(path) => Session::load(path)?,
        None => Session::default(),
    }
    .with_overrides(identity.token.clone(), None, identity.client_id);

    let client: Arc<dyn RecommendationClient> = if identity.mock || config.mock.enabled {
        Arc::new(MockApi::new(config.mock.model_type.clone()))
    } else {
        Arc::new(HttpApi::new(&config.api)?)
    };
    Ok(PreferenceFlow::new(form, session, client))
}

fn report_ranges(form: &PreferenceForm) {
    for pair in form.invalid_pairs() {
        eprintln!("  {} > {}", pair.min_key, pair.max_key);
    }
}

async fn save(flow: &mut PreferenceFlow, data_dir: &str) -> Result<()> {
    match flow.save().await {
        Ok(query) => {
            let receipt = receipts::append_jsonl(data_dir, receipts::PREFERENCES, &query)?;
            println!("Saved {} active constraints", query.active_count());
            println!("Receipt written to {}", receipt.display());
            Ok(())
        }
        Err(e) => {
            report_ranges(flow.form());
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Build { form } => {
            let mut form = load_form(&form)?;
            match form.submit() {
                Ok(query) => println!("{}", serde_json::to_string_pretty(&query)?),
                Err(e) => {
                    report_ranges(&form);
                    return Err(e.into());
                }
            }
        }
        Commands::Save { form, identity } => {
            let form = load_form(&form)?;
            let mut flow = build_flow(&config, form, &identity)?;
            save(&mut flow, &config.storage.data_dir).await?;
        }
        Commands::Recommend { form, identity } => {
            let has_values = !form.sets.is_empty() || form.form.is_some();
            let form = load_form(&form)?;
            let mut flow = build_flow(&config, form, &identity)?;
            if has_values {
                save(&mut flow, &config.storage.data_dir).await?;
            }
            let recs = flow.recommendations().await?;
            println!("{}", serde_json::to_string_pretty(&recs)?);
        }
    }

    Ok(())
}

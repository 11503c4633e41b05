//! Listing publication CLI
//!
//! Usage:
//!   marketplace_publish --mock --demo
//!   marketplace_publish --mode full --demo --seed 7 --mock
//!   marketplace_publish --demo --set LotArea=9000 --set Neighborhood=NAmes
//!   marketplace_publish --demo --create --session profile.json \
//!       --title "Casa en CollgCr" --phone 555-0123 --email vendor@example.com

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use marketplace::api::{HttpApi, ListingCreator, MockApi, PredictionClient};
use marketplace::catalog::DatasetCatalog;
use marketplace::config::Config;
use marketplace::flow::PublishFlow;
use marketplace::form::FieldValue;
use marketplace::listing::DraftField;
use marketplace::receipts;
use marketplace::session::Session;
use marketplace::wizard::{FormMode, WizardAction, WizardController};

#[derive(Parser)]
#[command(name = "marketplace_publish")]
#[command(about = "Fill the listing wizard, get a price prediction and publish the house")]
struct Cli {
    #[arg(long, default_value = "config/marketplace.toml")]
    config: String,
    #[arg(long, default_value = "quick")]
    mode: FormMode,
    /// Autofill the whole form with demo values
    #[arg(long)]
    demo: bool,
    /// Seed for the random categorical picks of the demo fill
    #[arg(long)]
    seed: Option<u64>,
    /// Field=Value, applied after the demo fill
    #[arg(long = "set")]
    sets: Vec<String>,
    /// Stored login profile (JSON)
    #[arg(long)]
    session: Option<PathBuf>,
    #[arg(long)]
    vendor_id: Option<u64>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Publish the listing after the prediction
    #[arg(long)]
    create: bool,
    #[arg(long)]
    mock: bool,
}

fn parse_sets(sets: &[String]) -> Result<Vec<(String, String)>> {
    sets.iter()
        .map(|raw| {
            raw.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .with_context(|| format!("Expected Field=Value, got '{}'", raw))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;
    let catalog = Arc::new(DatasetCatalog::load(&config.catalog.path)?);

    let session = match &cli.session {
        Some(path) => Session::load(path)?,
        None => Session::default(),
    }
    .with_overrides(cli.token.clone(), cli.vendor_id, None);

    let (predictor, creator): (Arc<dyn PredictionClient>, Arc<dyn ListingCreator>) =
        if cli.mock || config.mock.enabled {
            let api = Arc::new(MockApi::new(config.mock.model_type.clone()));
            (api.clone(), api)
        } else {
            let api = Arc::new(HttpApi::new(&config.api)?);
            (api.clone(), api)
        };

    let overrides = parse_sets(&cli.sets)?;
    let wizard = WizardController::new(catalog, &config.wizard);
    let mut flow = PublishFlow::new(wizard, session, predictor, creator);
    flow.wizard_mut().apply(WizardAction::SelectMode(cli.mode))?;

    for (field, _) in &overrides {
        if !flow.wizard().fields().any(|f| f == field) {
            bail!("Field {} is not part of the {:?} form", field, cli.mode);
        }
    }

    let mut rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let bar = ProgressBar::new(flow.wizard().sections().len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:30.cyan/blue} {pos}/{len} {msg}",
    )?);

    if cli.demo {
        let filled = flow.wizard_mut().demo_fill_with(&mut rng)?;
        tracing::info!("Demo filled {} fields", filled);
    }

    loop {
        let wizard = flow.wizard_mut();
        let fields = wizard
            .current_section()
            .map(|s| s.fields.clone())
            .unwrap_or_default();
        for (field, value) in overrides.iter().filter(|(f, _)| fields.contains(f)) {
            wizard.set_field(field, FieldValue::from_input(value))?;
        }
        if let Some(section) = wizard.current_section() {
            bar.set_message(section.label.clone());
        }
        bar.inc(1);
        if wizard.is_last_section() {
            break;
        }
        wizard.apply(WizardAction::Next)?;
    }

    let progress = flow.wizard().progress();
    bar.finish_with_message(format!("{:.0}% of fields filled", progress * 100.0));

    let wait = flow.wizard().cooldown_remaining_at(Instant::now());
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }

    let prediction = flow.submit().await?;
    println!(
        "Predicted price: {} ({})",
        prediction.predicted_price, prediction.model_type
    );

    if !cli.create {
        return Ok(());
    }

    let wizard = flow.wizard_mut();
    wizard.set_draft_field(DraftField::Title, cli.title.clone().unwrap_or_default())?;
    wizard.set_draft_field(DraftField::ContactPhone, cli.phone.clone().unwrap_or_default())?;
    wizard.set_draft_field(DraftField::ContactEmail, cli.email.clone().unwrap_or_default())?;

    let record = flow.create_listing().await?;
    let receipt = receipts::append_jsonl(&config.storage.data_dir, receipts::LISTINGS, &record)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    println!("Receipt written to {}", receipt.display());

    Ok(())
}

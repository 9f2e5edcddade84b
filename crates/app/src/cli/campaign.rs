use std::path::PathBuf;

use clap::Args;
use hamper_app::api::records::CampaignRecord;
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::cli::Settings;

#[derive(Debug, Args)]
pub(crate) struct CampaignArgs {
    /// Campaign JSON file
    #[arg(long)]
    file: PathBuf,

    /// Units to commit before reporting
    #[arg(long)]
    commit: Option<u32>,
}

pub(crate) async fn run(args: CampaignArgs, settings: &Settings) -> Result<(), String> {
    let json = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let record: CampaignRecord =
        serde_json::from_str(&json).map_err(|error| format!("invalid campaign: {error}"))?;

    let mut campaign = record
        .into_campaign(settings.currency)
        .map_err(|error| format!("invalid campaign: {error}"))?;

    let now = Timestamp::now();

    if let Some(quantity) = args.commit {
        campaign
            .commit(quantity, now)
            .map_err(|error| format!("commitment refused: {error}"))?;
    }

    let savings = campaign
        .savings_per_unit()
        .map_err(|error| format!("invalid campaign prices: {error}"))?;

    println!("product: {}", campaign.product_id);
    println!("status: {:?}", campaign.status(now));
    println!(
        "progress: {}/{} ({}%)",
        campaign.committed_quantity,
        campaign.target_quantity,
        (campaign.progress() * Decimal::ONE_HUNDRED).round_dp(1)
    );
    println!("remaining: {}", campaign.remaining());
    println!("unit_price: {}", campaign.unit_price(now));
    println!("group_savings: {savings}");

    Ok(())
}

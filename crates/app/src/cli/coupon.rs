use clap::Args;
use hamper::prices::price_from_major;
use hamper_app::domain::coupons::redeem;
use jiff::Timestamp;

use crate::cli::Settings;

#[derive(Debug, Args)]
pub(crate) struct CouponArgs {
    /// Coupon code
    code: String,

    /// Order total in major units of the shop currency
    #[arg(long)]
    total: f64,
}

pub(crate) async fn run(args: CouponArgs, settings: &Settings) -> Result<(), String> {
    let total = price_from_major(args.total, settings.currency)
        .ok_or_else(|| format!("invalid order total: {}", args.total))?;

    let context = settings.context()?;

    match redeem(context.coupons.as_ref(), &args.code, total, Timestamp::now()).await {
        Ok(applied) => {
            println!("coupon: {}", applied.code);
            println!("discount: {}", applied.discount);
            println!("total: {}", applied.total);
        }
        Err(rejection) => {
            println!("coupon not applied: {rejection}");
            println!("total: {total}");
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;

use crate::app::TwapRequest;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Get cryptocurrency OHLC data and calculate TWAP"
)]
pub struct Cli {
    /// Cryptocurrency ID (e.g. "bitcoin")
    pub coin_id: String,

    /// Currency to convert to
    #[arg(long, default_value = "usd")]
    pub currency: String,

    /// Number of days of data to retrieve
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// Log this run to history and regenerate the report
    #[arg(long)]
    pub log: bool,

    /// Description of this run (used with --log)
    #[arg(long)]
    pub description: Option<String>,

    /// Path to a TOML config file (file locations, provider settings)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn to_request(&self) -> TwapRequest {
        TwapRequest {
            coin_id: self.coin_id.clone(),
            currency: self.currency.clone(),
            days: self.days,
            log: self.log,
            description: self.description.clone(),
        }
    }
}

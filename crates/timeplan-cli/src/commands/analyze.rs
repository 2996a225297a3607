//! Schedule analysis command.

use clap::Args;
use timeplan_core::{Config, EventStore, ScheduleAnalyzer};

use super::parse_datetime;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Window start; defaults to now
    #[arg(long)]
    pub from: Option<String>,
    /// Window end; defaults to the configured lookahead
    #[arg(long)]
    pub to: Option<String>,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = EventStore::open()?;
    let analyzer = ScheduleAnalyzer::with_config(config.analyzer_config());

    let from = args.from.as_deref().map(parse_datetime).transpose()?;
    let to = args.to.as_deref().map(parse_datetime).transpose()?;

    let report = analyzer.analyze(&store, from, to)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

//! Time-block suggestion command.

use clap::Args;
use timeplan_core::{Config, EventStore, SuggestRequest, TimeBlocker};

use super::parse_datetime;

#[derive(Args)]
pub struct SuggestArgs {
    /// Requested duration in minutes
    #[arg(long)]
    pub duration: i64,
    /// Event category (meeting, call, focus, lunch, break, ...)
    #[arg(long, default_value = "meeting")]
    pub category: String,
    /// Window start; defaults to now
    #[arg(long)]
    pub from: Option<String>,
    /// Window end; defaults to the configured lookahead
    #[arg(long)]
    pub to: Option<String>,
    /// Maximum number of suggestions
    #[arg(long)]
    pub max: Option<usize>,
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = EventStore::open()?;
    let blocker = TimeBlocker::with_config(config.blocker_config());

    let mut request = SuggestRequest::new(args.duration, args.category);
    request.window_start = args.from.as_deref().map(parse_datetime).transpose()?;
    request.window_end = args.to.as_deref().map(parse_datetime).transpose()?;
    request.max_suggestions = args.max;

    let blocks = blocker.suggest_time_blocks(&store, &request)?;
    println!("{}", serde_json::to_string_pretty(&blocks)?);
    Ok(())
}

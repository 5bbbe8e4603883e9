use clap::Parser;
use parley_common::ModelVariant;

/// Parley: a terminal chat client for Gemini models with streamed replies.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Model variant to start with (flash or pro).
    #[arg(short = 'm', long)]
    pub model: Option<ModelVariant>,

    /// System instruction override for new sessions.
    #[arg(long)]
    pub system: Option<String>,

    /// Log level override (e.g. debug, or a full filter like parley_ai=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

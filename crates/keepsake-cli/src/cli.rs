use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "keepsake",
    about = "Keepsake — personal memory journal backend",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Log level implied by the verbosity flag.
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Keepsake HTTP server
    Serve(ServeArgs),
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory for durable entry and media storage; omit to run fully
    /// in memory with sandboxed media
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Reject image/video/audio entries that carry no media reference
    #[arg(long)]
    pub strict_media: bool,

    /// Seed a few starter entries into an empty archive
    #[arg(long)]
    pub seed_demo: bool,

    /// TOML config file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,
}

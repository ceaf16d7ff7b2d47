use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "datestream")]
#[command(about = "Extract publication dates from web pages, or search them")]
#[command(version)]
pub struct Cli {
    /// Path to the RON config file
    #[arg(long, global = true, default_value = "./datestream.ron")]
    pub config: PathBuf,

    /// Server base URL, overrides the config file
    #[arg(long, global = true)]
    pub server: Option<Url>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one extraction job and stream its results
    Extract {
        /// File with one URL per line; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Search the given pages for a term
    Search {
        #[arg(short, long)]
        query: String,
        /// File with one URL per line; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

impl Command {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Command::Extract { input } | Command::Search { input, .. } => input.as_ref(),
        }
    }
}

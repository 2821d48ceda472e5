use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recent-tweets")]
#[command(about = "Retrieve, cache and display your most recent tweets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the tweet list as HTML for the widget area
    Render {
        /// Widget title shown above the list
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print the tweet list as JSON
    List,

    /// Delete the cached tweet list so the next request refetches it
    ClearCache,

    /// Show what is currently cached and when it expires
    Status,
}

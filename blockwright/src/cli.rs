use clap::{Args, Parser, Subcommand};

/// Blockwright - let a language model build in a block world
#[derive(Parser, Debug)]
#[command(name = "blockwright")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show tool arguments and results, and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the agent until Ctrl-C, the turn limit, or the stop policy ends it
    Run(RunArgs),

    /// Print the tool catalog sent to the model
    Tools {
        /// Leave out the declaration tools
        #[arg(long)]
        no_memory: bool,
    },

    /// Fetch the world state once and print it
    WorldState {
        /// World service base URL (default: BLOCKWRIGHT_WORLD_URL)
        #[arg(long, value_name = "URL")]
        world_url: Option<String>,
    },
}

/// Flags for `run`. Anything left unset falls back to the environment.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// World service base URL
    #[arg(long, value_name = "URL")]
    pub world_url: Option<String>,

    /// OpenAI-compatible API base, e.g. https://api.openai.com/v1
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Stop after this many model turns
    #[arg(long, env = "BLOCKWRIGHT_MAX_TURNS")]
    pub max_turns: Option<usize>,

    /// Reset the conversation (or stop, with --single-shot) after this many tool turns
    #[arg(long)]
    pub max_tool_turns: Option<usize>,

    /// Stop the first time the model answers without calling a tool
    #[arg(long)]
    pub single_shot: bool,

    /// Do not offer the declaration tools
    #[arg(long)]
    pub no_memory: bool,
}

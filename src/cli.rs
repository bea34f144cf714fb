mod color;

use clap::{ArgAction, Parser, Subcommand};
pub use color::ColorMode;
use std::path::PathBuf;

/// Compile OData-style $filter expressions into document-store predicates
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file with limits and resource defaults
    #[arg(long, global = true, env = "ODATA_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(short, long, global = true)]
    pub compact: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to use colored output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter expression and print the predicate as JSON
    Compile {
        /// Filter expression, e.g. "name eq 'Bob' and stars gt 2"
        filter: String,
    },
    /// Print the tokens of a filter expression
    Tokens {
        /// Filter expression
        filter: String,
    },
    /// Print the parsed syntax tree of a filter expression
    Ast {
        /// Filter expression
        filter: String,
    },
    /// Build a full query spec from OData query options
    Query {
        /// $filter expression
        #[arg(long)]
        filter: Option<String>,

        /// $orderby clause, e.g. "title asc,pages desc"
        #[arg(long)]
        orderby: Option<String>,

        /// $top: maximum number of results
        #[arg(long)]
        top: Option<u64>,

        /// $skip: number of results to skip
        #[arg(long)]
        skip: Option<u64>,

        /// $select projection, ignored when the config sets one
        #[arg(long)]
        select: Option<String>,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}

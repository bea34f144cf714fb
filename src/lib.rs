pub mod cli;
pub mod config;
pub mod display;
pub mod filter;
pub mod logger;
pub mod query;

use anyhow::Context;
use log::debug;
use serde::Serialize;

pub use cli::{ColorMode, Commands, cli_parse};
pub use config::{CompilerConfig, load_config};
pub use filter::{BooleanGroup, FilterError, LexError, ParseError, Predicate, parse};
pub use query::{QueryOptions, QuerySpec, build_query, translate_orderby};

/// Compile a filter string into a predicate using the default limits
pub fn compile_filter(filter: &str) -> Result<Predicate, FilterError> {
    compile_filter_with(filter, config::default_config())
}

/// Compile a filter string into a predicate using the limits in `config`
pub fn compile_filter_with(filter: &str, config: &CompilerConfig) -> Result<Predicate, FilterError> {
    let root = filter::parse_with_depth(filter, config.max_depth)?;
    let predicate = filter::compile(root);
    debug!("Compiled filter \"{}\" into {} top-level keys", filter, predicate.len());
    Ok(predicate)
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    logger::init_logger(cli.verbose, cli.quiet);
    cli.color.apply();

    let compiler_config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    debug!("Config profile: {}", compiler_config.profile_name);
    if let Some(config_path) = &cli.config {
        debug!("Config file: {}", config_path.display());
    }

    match &cli.command {
        Commands::Compile { filter } => {
            let predicate = compile_filter_with(filter, &compiler_config)?;
            print_json(&predicate, cli.compact)?;
        }
        Commands::Tokens { filter } => {
            let tokens = filter::tokenize(filter).map_err(FilterError::from)?;
            println!("{}", display::format_tokens_table(&tokens));
        }
        Commands::Ast { filter } => {
            let root = filter::parse_with_depth(filter, compiler_config.max_depth)?;
            println!("{:#?}", root);
        }
        Commands::Query {
            filter,
            orderby,
            top,
            skip,
            select,
        } => {
            let options = QueryOptions {
                filter: filter.clone(),
                orderby: orderby.clone(),
                top: *top,
                skip: *skip,
                select: select.clone(),
            };
            let spec = build_query(&options, &compiler_config)?;
            print_json(&spec, cli.compact)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_filter_uses_config_depth() {
        let config = CompilerConfig {
            max_depth: 1,
            ..Default::default()
        };
        assert!(compile_filter_with("(a eq 1)", &config).is_ok());
        assert!(matches!(
            compile_filter_with("((a eq 1))", &config),
            Err(FilterError::Parse(ParseError::NestingTooDeep { limit: 1, .. }))
        ));
    }

    #[test]
    fn test_compile_filter() {
        assert_eq!(
            compile_filter("name eq 'Bob'").unwrap().to_json(),
            json!({"name": {"$eq": "Bob"}})
        );
    }
}

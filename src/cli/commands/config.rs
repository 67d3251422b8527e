use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::config::CONFIG;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Print the effective configuration (APP_ENV profile plus overrides)")]
    Show,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => handle_show(&output_format),
    }
}

fn handle_show(output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&*CONFIG)?);
        }
        OutputFormat::Text => {
            let store = &CONFIG.store;
            let filter = &CONFIG.filter;
            println!("Environment:        {:?}", CONFIG.environment);
            println!("Cache TTL:          {} ms", store.cache_ttl_ms);
            println!("Cache max size:     {}", display_limit(store.cache_max_size));
            println!("Persist directory:  {}", store.persist_dir.display());
            println!("Persist version:    {}", store.persist_version);
            println!("Store logging:      {} ({})", store.logging_enabled, store.log_level);
            println!("Filter max limit:   {}", display_limit(filter.max_limit));
            println!("Filter max depth:   {}", filter.max_nested_depth);
            println!("Filter debug logs:  {}", filter.debug_logging);
        }
    }
    Ok(())
}

fn display_limit(limit: Option<usize>) -> String {
    limit.map_or_else(|| "unbounded".to_string(), |l| l.to_string())
}

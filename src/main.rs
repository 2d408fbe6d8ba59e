//! Rail customer CLI - resolve customer profiles and manage preferences
//!
//! Front-end over the resolver and preferences service: resolves a customer
//! id against the partner web service (through the in-process cache) and
//! prints the result as JSON.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use railcust::cache::InMemoryCustomerCache;
use railcust::cli::{parse_language_arg, parse_seat_arg, Cli, Command, PrefsCommand};
use railcust::partner::PartnerClient;
use railcust::preferences::{JsonFileStore, PreferencesService};
use railcust::resolver::Resolver;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("railcust=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Resolve { customer_id } => {
            let cache = Arc::new(InMemoryCustomerCache::new(Duration::from_secs(
                cli.cache_ttl_seconds,
            )));
            let partner = Arc::new(PartnerClient::new(cli.partner_url));
            let resolver = Resolver::new(cache, partner);

            let customer = resolver.resolve(&customer_id).await?;
            println!("{}", serde_json::to_string_pretty(&customer)?);
        }
        Command::Prefs { command } => {
            let store = JsonFileStore::new()
                .ok_or("could not determine the preferences data directory")?;
            let service = PreferencesService::new(Arc::new(store));

            match command {
                PrefsCommand::Create {
                    customer_id,
                    seat,
                    class_preference,
                    profile_name,
                    language,
                } => {
                    let seat_preference = parse_seat_arg(&seat)?;
                    let language = language.as_deref().map(parse_language_arg).transpose()?;

                    let created = service
                        .create(
                            &customer_id,
                            seat_preference,
                            class_preference,
                            &profile_name,
                            language,
                        )
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&created)?);
                }
                PrefsCommand::List { customer_id } => {
                    let profiles = service.list(&customer_id).await?;
                    println!("{}", serde_json::to_string_pretty(&profiles)?);
                }
            }
        }
    }
    Ok(())
}

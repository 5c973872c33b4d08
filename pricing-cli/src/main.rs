//! Pricing CLI
//!
//! Command-line interface for storefront pricing: the currency catalog, the
//! exchange-rate proxy, price formatting and viewer preferences.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pricing_client::RatesClient;
use pricing_hex::{
    CountryDirectory, CurrencyService, CurrencySession, NoPreferences, RefreshOutcome,
    UserCurrencyPreference,
};
use pricing_repo::{RestCountriesSource, StaticRateSource, build_preference_store};
use pricing_types::{
    CurrencyCode, CurrencyInfo, ExchangeRatesResponse, FormattedPrice, RateSource, ViewerId,
};

#[derive(Parser)]
#[command(name = "pricing")]
#[command(author, version, about = "Storefront pricing CLI", long_about = None)]
struct Cli {
    /// Base URL of the exchange-rate proxy
    #[arg(
        long,
        env = "PRICING_PROXY_URL",
        default_value = "http://localhost:3000"
    )]
    proxy_url: String,

    /// Gateway key sent with proxy requests
    #[arg(long, env = "PRICING_API_KEY")]
    api_key: Option<String>,

    /// Use the reference rates instead of calling the proxy
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported display currencies
    Currencies,
    /// Fetch the current exchange rates
    Rates,
    /// Render a USD price in a display currency
    Format {
        /// Price in USD
        #[arg(long)]
        amount: f64,
        /// Display currency (USD, PHP, JPY, CAD, EUR)
        #[arg(long, default_value = "USD")]
        currency: String,
    },
    /// Keep a pricing session open and print prices after each refresh
    Watch {
        /// Prices in USD to render
        #[arg(long, value_delimiter = ',', default_value = "100")]
        amounts: Vec<f64>,
        /// Display currency (USD, PHP, JPY, CAD, EUR)
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Seconds between refreshes
        #[arg(long, default_value = "3600")]
        interval_secs: u64,
    },
    /// List sign-up countries with their default currency
    Countries,
    /// Viewer currency preferences
    Preference {
        /// Preference storage (`memory:`, `sqlite:...`, `postgres://...`)
        #[arg(long, env = "PRICING_DATABASE_URL", default_value = "memory:")]
        database_url: String,

        #[command(subcommand)]
        action: PreferenceCommands,
    },
    /// Check proxy health
    Health,
}

#[derive(Subcommand)]
enum PreferenceCommands {
    /// Show the currency a viewer will see
    Get {
        /// Viewer id
        viewer: String,
    },
    /// Store a viewer's currency choice
    Set {
        /// Viewer id
        viewer: String,
        /// Currency (USD, PHP, JPY, CAD, EUR)
        currency: String,
    },
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse().map_err(|e| {
        let supported: Vec<&str> = CurrencyCode::all().iter().map(|c| c.code()).collect();
        anyhow::anyhow!("{e}. Supported: {}", supported.join(", "))
    })
}

fn proxy_client(cli: &Cli) -> RatesClient {
    let client = RatesClient::new(&cli.proxy_url);
    match &cli.api_key {
        Some(key) => client.with_api_key(key.clone()),
        None => client,
    }
}

fn rate_source(cli: &Cli) -> Arc<dyn RateSource> {
    if cli.offline {
        return Arc::new(StaticRateSource::reference());
    }
    Arc::new(proxy_client(cli))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Refresh failures are reported through tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Health => {
            let healthy = proxy_client(&cli).health().await?;
            if healthy {
                println!("✓ Proxy is healthy");
            } else {
                println!("✗ Proxy is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Currencies => {
            let currencies: Vec<CurrencyInfo> =
                CurrencyCode::all().iter().copied().map(CurrencyInfo::from).collect();
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }

        Commands::Rates => {
            let table = rate_source(&cli).fetch_rates().await?;
            let response = ExchangeRatesResponse::from(&table);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Format { amount, currency } => {
            let currency = parse_currency(currency)?;
            let service = CurrencyService::new(rate_source(&cli));
            service.set_active_currency(currency.code())?;
            if let RefreshOutcome::Failed(err) = service.refresh().await {
                eprintln!("⚠ Rates unavailable ({err}), showing unconverted amount");
            }
            let price = FormattedPrice {
                amount_usd: *amount,
                currency,
                converted: service.convert(*amount)?,
                display: service.format_price(*amount)?,
            };
            println!("{}", serde_json::to_string_pretty(&price)?);
        }

        Commands::Watch {
            amounts,
            currency,
            interval_secs,
        } => {
            let currency = parse_currency(currency)?;
            let preferences = UserCurrencyPreference::new(NoPreferences);
            let session = CurrencySession::start(
                CurrencyService::new(rate_source(&cli)),
                &preferences,
                None,
                Duration::from_secs(*interval_secs),
            )
            .await;
            session.service().set_active_currency(currency.code())?;
            let display = session.display();

            let mut seen = None;
            loop {
                let refreshed = session.service().last_refreshed_at();
                if refreshed != seen {
                    seen = refreshed;
                    let stamp = refreshed
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".into());
                    println!("rates as of {stamp}");
                    for amount in amounts {
                        println!("  ${amount:.2} -> {}", display.render(*amount));
                    }
                }
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(Duration::from_millis(250)) => {}
                }
            }
            session.end();
        }

        Commands::Countries => {
            let directory = CountryDirectory::new(RestCountriesSource::default());
            for country in directory.list_countries().await {
                println!("{}\t{}\t{}", country.code, country.currency, country.name);
            }
        }

        Commands::Preference {
            database_url,
            action,
        } => {
            let preferences =
                UserCurrencyPreference::new(build_preference_store(database_url).await?);
            match action {
                PreferenceCommands::Get { viewer } => {
                    let viewer = ViewerId::new(viewer.as_str())?;
                    let currency = preferences.resolve_preference(Some(&viewer)).await;
                    println!("{viewer}\t{currency}");
                }
                PreferenceCommands::Set { viewer, currency } => {
                    let viewer = ViewerId::new(viewer.as_str())?;
                    let currency = parse_currency(currency)?;
                    preferences.update_preference(&viewer, currency).await?;
                    println!("✓ {viewer} will see prices in {}", currency.name());
                }
            }
        }
    }

    Ok(())
}

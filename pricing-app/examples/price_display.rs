//! Storefront pricing walkthrough against a local proxy.
//!
//! Starts the proxy with the reference rates, then runs a viewer session that
//! sources its rates through `RatesClient` and renders a few catalog prices.
//!
//! Run with: cargo run -p pricing-app --example price_display

use std::time::Duration;

use pricing_client::RatesClient;
use pricing_hex::{
    CurrencyService, CurrencySession, UserCurrencyPreference, inbound::HttpServer,
};
use pricing_repo::{InMemoryPreferenceStore, StaticRateSource};
use pricing_types::{CurrencyCode, ViewerId};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let router = HttpServer::new(StaticRateSource::reference()).router();
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            tracing::error!(error = %err, "Proxy stopped");
        }
    });

    println!("🚀 Proxy listening on {base_url}");

    // A viewer who chose pesos at sign-up
    let preferences = UserCurrencyPreference::new(InMemoryPreferenceStore::new());
    let viewer = ViewerId::new("maria")?;
    preferences
        .update_preference(&viewer, CurrencyCode::PHP)
        .await?;

    let service = CurrencyService::new(RatesClient::new(&base_url));
    let session = CurrencySession::start(
        service,
        &preferences,
        Some(&viewer),
        pricing_hex::DEFAULT_REFRESH_PERIOD,
    )
    .await;
    let display = session.display();

    // Wait for the initial refresh
    while session.service().last_refreshed_at().is_none() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let catalog = [("Silver hoop earrings", 39.0), ("Pearl pendant", 120.5), ("Gold band", 499.99)];

    println!("\n💱 Prices in {}", display.currency().name());
    for (item, usd) in catalog {
        println!("   {item:<22} {}", display.render(usd));
    }

    for code in ["JPY", "EUR"] {
        session.service().set_active_currency(code)?;
        println!("\n💱 Prices in {}", display.currency().name());
        for (item, usd) in catalog {
            println!("   {item:<22} {}", display.render(usd));
        }
    }

    session.end();
    println!("\n✅ Session ended");
    Ok(())
}

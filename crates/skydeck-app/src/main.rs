use anyhow::Result;

use skydeck_backend::ProfileClient;
use skydeck_core::Config;
use skydeck_dashboard::{Dashboard, DashboardOptions, Slice};
use skydeck_weather::{CountryClient, GeoCountryResolver, OpenWeatherClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skydeck_core::init()?;

    let (config, _validation) = Config::load_validated()?;

    let backend = ProfileClient::new(&config.backend.base_url)?;
    let provider = OpenWeatherClient::new(config.provider.api_key.clone())?;
    let countries = CountryClient::new()?;
    let resolver = GeoCountryResolver::new(provider.clone(), countries);

    let mut dashboard = Dashboard::new(
        backend,
        provider,
        resolver,
        DashboardOptions::from_config(&config),
    );

    dashboard.mount().await;
    dashboard.refresh_weather().await;
    dashboard.poll_clock();

    tracing::info!("SkyDeck dashboard mounted");

    println!("SkyDeck - Weather Locations");
    println!("Backend: {}", config.backend.base_url);
    println!();

    if dashboard.profiles().is_empty() {
        println!("No saved locations yet. Add one to get started.");
        return Ok(());
    }

    let ids: Vec<i64> = dashboard.profiles().iter().map(|p| p.id).collect();
    for id in ids {
        let Some(view) = dashboard.view(id) else { continue };

        let clock = match &view.time {
            Slice::Ready(time) => format!("{} ({})", time.clock, time.time_of_day),
            Slice::Loading => "Loading...".to_string(),
        };

        println!("{} - {}", view.profile.location_name, clock);

        match &view.weather {
            Slice::Ready(snapshot) => {
                match snapshot.current.as_ready() {
                    Some(current) => println!(
                        "  {}°C, {} (humidity {}%, wind {} m/s)",
                        current.temperature_rounded(),
                        current.description,
                        current.humidity,
                        current.wind_speed
                    ),
                    None => println!("  Weather unavailable"),
                }
                match snapshot.forecast.as_ready() {
                    Some(forecast) => {
                        for entry in forecast {
                            println!(
                                "  {} {} - {}°C, {}",
                                entry.date_display(),
                                entry.time_display(),
                                entry.temperature_rounded(),
                                entry.description
                            );
                        }
                    }
                    None => println!("  5-day forecast unavailable"),
                }
            }
            Slice::Loading => println!("  Loading weather..."),
        }
    }

    dashboard.unmount();

    Ok(())
}

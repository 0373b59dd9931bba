//! demos/live_dashboard.rs
//!
//! Connects to a running forecast service, loads every dashboard section, requests a
//! forecast and prints what a renderer would draw.
//!
//! To run this example:
//! FORECAST_API_URL=http://localhost:8000 cargo run --example live_dashboard

use chrono::Local;
use demand_dashboard::{
    Dashboard, DashboardError, DashboardView, ForecastField, HttpForecastApi, SubmitOutcome,
};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // 1. Point the dashboard at the service
    let dashboard = Dashboard::builder()
        .api(HttpForecastApi::from_env()?)
        .build();

    // 2. Load the four startup resources; failures only leave their section empty
    for handle in dashboard.start() {
        let _ = handle.await;
    }

    // 3. Ask for a forecast on a hot afternoon
    dashboard.update_field(ForecastField::Temperature, "38.5");
    dashboard.update_field(ForecastField::Humidity, "35");
    if let SubmitOutcome::Dispatched(handle) = dashboard.submit()? {
        let _ = handle.await;
    }

    print_view(&dashboard.render(Local::now().date_naive()));
    Ok(())
}

fn print_view(view: &DashboardView) {
    if let Some(model) = &view.model {
        println!("[{}] {} - {}", model.badge, model.assignment, model.location);
    }

    match (&view.forecast_chart, &view.forecast_error) {
        (Some(chart), _) => {
            println!("\n{}", chart.title);
            for (label, value) in chart.labels.iter().zip(&chart.series[0].values) {
                println!("  {label}  {value:>10.1} kW");
            }
        }
        (None, Some(message)) => println!("\n{message}"),
        (None, None) => println!("\nNo forecast yet."),
    }

    if let Some(header) = &view.weather_header {
        println!("\nWeather for {} ({})", header.location, header.forecast_period);
        for card in &view.weather_cards {
            println!(
                "  {}  {}  {}  {}  {}",
                card.time, card.temperature, card.humidity, card.wind_speed, card.cloud_cover
            );
        }
    }

    println!("\nUpcoming holidays:");
    for holiday in &view.upcoming_holidays {
        println!("  {}  {}", holiday.date, holiday.name);
    }

    println!("\nRecent history:");
    for row in &view.recent_history {
        let cells: Vec<String> = row.cells().iter().map(|c| c.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }
}

// Main entry point - Dependency injection and command dispatch
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::{Local, NaiveDate, Timelike};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::aggregation_service::AggregationService;
use crate::application::data_shaper::greeting;
use crate::application::display::DisplaySurface;
use crate::application::fetch_trigger::FetchTrigger;
use crate::application::renderer::{ReadinessGatedRenderer, RenderOutcome};
use crate::infrastructure::config::{AppConfig, load_config};
use crate::infrastructure::fixture_repository::FixtureRepository;
use crate::infrastructure::http_source::HttpDashboardSource;
use crate::infrastructure::terminal_charts::TerminalCharts;
use crate::infrastructure::terminal_surface::TerminalSurface;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[derive(Parser)]
#[command(name = "employee-performance", about = "Employee performance dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard aggregator over HTTP (default)
    Serve,
    /// Fetch one employee's dashboard from the aggregator and draw it in the terminal
    Preview {
        /// Employee record to load
        #[arg(long)]
        employee: Option<String>,
        /// Session user whose linked employee is loaded when no employee is given
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        from_date: Option<NaiveDate>,
        #[arg(long)]
        to_date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Preview {
            employee,
            user,
            from_date,
            to_date,
        } => preview(config, employee, user, from_date, to_date).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    // Create repository (infrastructure layer)
    let repository = Arc::new(FixtureRepository::load(&config.records.path).await?);

    // Create services (application layer)
    let aggregation_service = AggregationService::new(repository, config.dashboard.date_range_mode);
    let state = Arc::new(AppState { aggregation_service });

    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    tracing::info!("Starting employee-performance aggregator on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}

async fn preview(
    config: AppConfig,
    employee: Option<String>,
    user: Option<String>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let surface = Arc::new(TerminalSurface::new(greeting(Local::now().hour())));
    let charts = Arc::new(TerminalCharts::new(config.renderer.warmup_checks));
    let renderer = Arc::new(ReadinessGatedRenderer::new(
        charts.clone(),
        surface.clone(),
        config.renderer.to_settings(),
    ));
    let source = Arc::new(HttpDashboardSource::new(
        &config.client.base_url,
        Duration::from_secs(config.client.timeout_secs),
    )?);
    let trigger = FetchTrigger::new(
        source.clone(),
        source,
        surface.clone(),
        renderer.clone(),
        config.dashboard.date_range_mode,
    );

    let result = match (employee, user) {
        (Some(employee), _) => {
            surface.select_employee(&employee);
            trigger.request_refresh(&employee, from_date, to_date).await.map(Some)
        }
        (None, Some(user)) => trigger.initial_load(&user).await,
        (None, None) => trigger.request_refresh("", from_date, to_date).await.map(Some),
    };

    // Failures are reported on the surface; the preview still prints what it has
    match result {
        Ok(Some(RenderOutcome::Rendered { checks })) => {
            tracing::info!("Charts rendered after {} availability checks", checks)
        }
        Ok(Some(outcome)) => tracing::warn!("Charts not rendered: {:?}", outcome),
        Ok(None) => tracing::info!("No employee linked to the session user"),
        Err(e) if e.is_validation() => tracing::debug!("{}", e),
        Err(e) => tracing::error!("{}", e),
    }

    println!("{}", surface.report());
    for drawing in charts.drawings() {
        println!("\n{}", drawing);
    }
    tracing::debug!("{} live chart handles", renderer.live_slots().await.len());

    Ok(())
}

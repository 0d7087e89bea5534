use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use reach::{
    ActivityType, AgeGroup, AppConfig, DataSource, DurationBucket, GeoJsonMap, ReachApp,
    Selection,
    config::DEFAULT_DATA_PATH,
    ui::{ControlEvent, Controls, parse_condition},
};

/// Reachable evacuation area around Tenri Station.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Speed dataset, a file path or an http(s) URL
    #[arg(long, env = "SPEED_DATA", default_value = DEFAULT_DATA_PATH)]
    data: DataSource,

    #[arg(long, default_value = "adult")]
    age: AgeGroup,

    #[arg(long, default_value = "walking")]
    transport: ActivityType,

    /// Evacuation time in minutes (5, 10 or 15)
    #[arg(long, default_value = "10")]
    duration: DurationBucket,

    /// Physical condition, 0-100
    #[arg(long, default_value = "100", value_parser = parse_condition)]
    condition: u8,

    /// Write the map scene as GeoJSON to this path
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Print the panel as JSON
    #[arg(long)]
    json: bool,

    /// Read `<control> <value>` events from stdin until `quit`
    #[arg(long)]
    interactive: bool,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_panel(app: &ReachApp<GeoJsonMap>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(app.panel())?);
    } else {
        println!("{}", app.panel());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = AppConfig::default().with_data_source(cli.data);
    tracing::info!("Loading speed data from {}", config.data_source);

    let map = GeoJsonMap::new(config.viewport_width_px, config.viewport_height_px);
    let controls = Controls::new(Selection {
        age_group: cli.age,
        activity_type: cli.transport,
        duration: cli.duration,
        condition_percent: cli.condition,
    });
    let mut app = ReachApp::start(config, map, controls).await;
    print_panel(&app, cli.json)?;

    if cli.interactive {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" {
                break;
            }
            match line.parse::<ControlEvent>() {
                Ok(event) => {
                    app.dispatch(event);
                    print_panel(&app, cli.json)?;
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
    }

    if let Some(path) = cli.geojson {
        let geojson = serde_json::to_string_pretty(&app.map().to_geojson())?;
        tokio::fs::write(&path, geojson).await?;
        tracing::info!("Wrote map scene to {}", path.display());
    }

    Ok(())
}

//! skycast: weather lookup with locally persisted favorite cities

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use skycast_core::{App, AppError, Config, ConfigError};
use skycast_favorites::{FileSlots, MemorySlots, SlotStorage};
use skycast_weather::{
    render_chart, ChartOptions, CityReport, DateHeader, Location, TemperatureUnit,
};

#[derive(Parser)]
#[command(name = "skycast")]
#[command(about = "Weather lookup with favorite cities", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory for persisted favorites (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep favorites in memory only for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Temperature unit: c or f (default from config)
    #[arg(long, short, global = true)]
    unit: Option<TemperatureUnit>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up current weather and forecast for a city
    Search {
        /// City name (letters and spaces only)
        city: String,

        /// Write the forecast chart as SVG to this file
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Show weather for the city at the given coordinates
    Here {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Write the forecast chart as SVG to this file
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Manage favorite cities
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites in order
    List,

    /// Add a city, or refresh its saved reading
    Add { city: String },

    /// Add the city if missing, remove it otherwise
    Toggle { city: String },

    /// Remove a city
    Remove { city: String },

    /// Move the favorite at FROM to position TO (1-based)
    Move { from: usize, to: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = skycast_core::init() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{} {}", "error:".red().bold(), e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Ephemeral runs leave the disk untouched, config file included
    let loaded = if cli.ephemeral {
        Config::read()
    } else {
        Config::load()
    };
    let mut config = loaded.map_err(|e| ConfigError::from_load_error(&e))?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let slots: Box<dyn SlotStorage> = if cli.ephemeral {
        Box::new(MemorySlots::new())
    } else {
        Box::new(FileSlots::new(config.storage.effective_data_dir()))
    };

    let mut app = App::from_config(config, slots)?;
    if let Some(unit) = cli.unit {
        app.set_unit(unit);
    }

    match cli.command {
        Commands::Search { city, chart } => {
            let report = app.search(&city).await?;
            print_header(DateHeader::long(today()));
            print_report(&report, app.unit());
            write_chart(&report, chart)?;
        }
        Commands::Here { lat, lon, chart } => {
            let landing = app.landing(&Location::new(lat, lon)).await;
            print_header(DateHeader::short(today()));
            match landing.report {
                Some(report) => {
                    print_report(&report, app.unit());
                    write_chart(&report, chart)?;
                }
                None => {
                    println!("{}", landing.city_label.bold());
                    println!("{}", "Weather unavailable for this location.".dimmed());
                }
            }
        }
        Commands::Favorites { action } => run_favorites(&mut app, action).await?,
    }

    Ok(())
}

async fn run_favorites(app: &mut App, action: FavoritesAction) -> Result<(), AppError> {
    match action {
        FavoritesAction::List => {}
        FavoritesAction::Add { city } => {
            app.add_favorite(&city).await?;
            println!("{} {}", "★".yellow(), city);
        }
        FavoritesAction::Toggle { city } => {
            if app.toggle_favorite(&city).await? {
                println!("{} {}", "★".yellow(), city);
            } else {
                println!("{} {}", "☆".dimmed(), city);
            }
        }
        FavoritesAction::Remove { city } => {
            app.remove_favorite(&city);
        }
        FavoritesAction::Move { from, to } => {
            // 1-based on the command line; zero falls out of range and is ignored
            let moved = app.move_favorite(from.wrapping_sub(1), to.wrapping_sub(1));
            if !moved {
                tracing::warn!("Ignoring move {} -> {}: position out of range", from, to);
            }
        }
    }

    print_favorites(app);
    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_header(header: DateHeader) {
    println!("{}", header.to_string().dimmed());
}

fn print_report(report: &CityReport, unit: TemperatureUnit) {
    let star = if report.is_favorite { "★" } else { "☆" };
    println!("{} {}", report.city_name.bold(), star.yellow());

    if let Some(temp) = report.temperature_display(unit) {
        println!("  {}", temp.bold());
    }
    if let Some(desc) = report.current.description() {
        println!("  {}", desc);
    }
    if let Some(feels) = report.current.feels_like(unit) {
        println!("  Feels like {}{}", feels, unit.symbol());
    }
    if let Some(humidity) = &report.current.humidity {
        println!("  Humidity {}%", humidity);
    }
    if let Some(wind) = &report.current.windspeed_kmph {
        println!("  Wind {} km/h", wind);
    }

    if !report.forecast.is_empty() {
        println!();
        for point in &report.forecast {
            println!(
                "  {}  {:>5.1}°C",
                point.date.format("%a %d %b").dimmed(),
                point.avg_temp_c
            );
        }
    }
}

fn print_favorites(app: &App) {
    let favorites = app.favorites().list();
    if favorites.is_empty() {
        println!("{}", "No favorite cities yet.".dimmed());
        return;
    }

    let unit = app.unit();
    for (i, city) in favorites.iter().enumerate() {
        let temp = match unit {
            TemperatureUnit::Celsius => city.temperature_c,
            TemperatureUnit::Fahrenheit => city.temperature_f,
        };
        let temp = temp
            .map(|t| format!("{}{}", t, unit.symbol()))
            .unwrap_or_else(|| "--".to_string());
        let desc = city.weather_desc.as_deref().unwrap_or("");
        println!("{:>3}. {:<20} {:>6}  {}", i + 1, city.name, temp, desc.dimmed());
    }
}

fn write_chart(report: &CityReport, path: Option<PathBuf>) -> Result<(), AppError> {
    let Some(path) = path else {
        return Ok(());
    };

    match render_chart(&report.forecast, ChartOptions::default()) {
        Some(svg) => {
            std::fs::write(&path, svg)
                .with_context(|| format!("Failed to write chart to {}", path.display()))?;
            println!("Chart written to {}", path.display());
        }
        None => println!("{}", "No forecast data to chart.".dimmed()),
    }
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use daytour_agents::TourPlanner;
use daytour_core::{parse_interests, ItineraryOutcome, PreferenceStore, TripRequest};
use daytour_observability::{init_tracing, AppMetrics};
use daytour_providers::env as provider_env;
use daytour_providers::{
    FixedGeocoder, GazetteerExtractor, GenerationBackend, GeocodeBackend, IpLocator, NewsBackend,
    ScriptedGeneration, StaticNews, StaticWeather, WeatherBackend,
};

type Planner = TourPlanner<
    GenerationBackend,
    GazetteerExtractor,
    GeocodeBackend,
    WeatherBackend,
    NewsBackend,
>;

#[derive(Debug, Parser)]
#[command(name = "daytour")]
#[command(about = "Single-day tour planner")]
struct Cli {
    /// Use offline backends for every provider (no API keys required).
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a single-day tour.
    Plan {
        #[arg(long)]
        destination: String,
        /// Tour start, HH:MM.
        #[arg(long)]
        start: String,
        /// Tour end, HH:MM.
        #[arg(long)]
        end: String,
        #[arg(long)]
        budget: f64,
        /// Comma-separated interests, e.g. "history, food".
        #[arg(long, default_value = "")]
        interests: String,
        /// Tour date, defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Starting point; resolved from your IP when omitted.
        #[arg(long)]
        from: Option<String>,
        /// Print the raw plan as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },
    /// Suggest up to five activities in a city.
    Suggest { city: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("daytour_cli");
    let cli = Cli::parse();

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(6))
        .timeout(Duration::from_secs(20))
        .build()
        .context("failed to build HTTP client")?;

    let planner = build_planner(&http, cli.offline);

    match cli.command {
        Command::Plan {
            destination,
            start,
            end,
            budget,
            interests,
            date,
            from,
            json,
        } => {
            let start_time = parse_clock(&start).context("invalid --start value")?;
            let end_time = parse_clock(&end).context("invalid --end value")?;

            let starting_point = match from {
                Some(point) if !point.trim().is_empty() => point.trim().to_string(),
                _ => default_starting_point(&http, cli.offline, &destination).await,
            };

            let request = TripRequest {
                destination,
                interests: parse_interests(&interests),
                budget,
                start_time,
                end_time,
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                starting_point,
            };

            let mut prefs = PreferenceStore::new();
            let plan = planner.plan_tour(request, &mut prefs).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        Command::Suggest { city } => {
            for suggestion in planner.suggest_activities(&city).await {
                println!("- {suggestion}");
            }
        }
    }

    Ok(())
}

fn build_planner(http: &reqwest::Client, offline: bool) -> Planner {
    let metrics = AppMetrics::shared();

    let (generation, geocoder, weather, news) = if offline {
        (
            GenerationBackend::Scripted(ScriptedGeneration::canned(
                "Morning walk through the old town, lunch at the bazaar, sunset viewpoint.",
            )),
            GeocodeBackend::Fixed(FixedGeocoder::with_known_cities()),
            WeatherBackend::Static(StaticWeather::clear_skies()),
            NewsBackend::Static(StaticNews::empty()),
        )
    } else {
        (
            provider_env::generation_from_env(http),
            provider_env::geocoder_from_env(http),
            provider_env::weather_from_env(http),
            provider_env::news_from_env(http),
        )
    };

    TourPlanner::new(
        Arc::new(generation),
        Arc::new(GazetteerExtractor::new()),
        Arc::new(geocoder),
        Arc::new(weather),
        Arc::new(news),
        metrics,
    )
}

async fn default_starting_point(
    http: &reqwest::Client,
    offline: bool,
    destination: &str,
) -> String {
    if !offline {
        if let Ok(Some(city)) = IpLocator::new(http.clone()).current_city().await {
            return city;
        }
    }
    destination.to_string()
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .ok()
}

fn print_plan(plan: &daytour_core::TourPlan) {
    println!("{}\n", plan.weather_summary);

    match &plan.itinerary {
        ItineraryOutcome::Optimized { text } => println!("{text}"),
        ItineraryOutcome::OptimizationFailed { draft } => {
            println!("{draft}");
            println!("\n(optimization failed; this draft may not fit your budget or time window)");
        }
    }
    if plan.used_draft_fallback {
        println!("\n(the itinerary draft could not be generated)");
    }

    println!("\nNews that might affect your plan:");
    println!("{}", plan.advisories);

    println!("\nTour map:");
    match &plan.map_url {
        Some(url) => println!("{url}"),
        None => println!("No mappable places were found in the itinerary."),
    }
}

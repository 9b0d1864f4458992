use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use gpsstore::cli::{Cli, Command};
use gpsstore::config::Config;
use gpsstore::render::{self, AddOutcome, OutputFormat};
use gpsstore::{Bindings, ChannelKey, GpsStore, Point};

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    Ok(())
}

fn channel_key(cli: &Cli, config: &Config) -> Result<ChannelKey> {
    let server = cli
        .server
        .clone()
        .or_else(|| config.server.clone())
        .ok_or_else(|| eyre::eyre!("No server id given; pass --server or set `server` in the config"))?;
    let channel = cli
        .channel
        .clone()
        .or_else(|| config.channel.clone())
        .ok_or_else(|| eyre::eyre!("No channel id given; pass --channel or set `channel` in the config"))?;
    Ok(ChannelKey::new(server, channel)?)
}

fn parse_reference(text: &str) -> Result<Point> {
    text.parse::<Point>()
        .map_err(|e| eyre::eyre!("Invalid reference GPS point: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(store_path) = &cli.store {
        config.store_path = store_path.clone();
    }
    info!("gpsstore starting");

    let key = channel_key(&cli, &config)?;
    let store = GpsStore::open(&config.store_path)?;
    debug!(store = %store.base_path().display(), %key, "Resolved channel");

    let bindings_path = store.bindings_path();
    let mut bindings = Bindings::load(&bindings_path)?;

    match cli.command {
        Command::Bind => {
            bindings.bind(&key);
            bindings.save(&bindings_path)?;
            println!(
                "{} Bound server {} to channel {}",
                "✓".green(),
                key.server().cyan(),
                key.channel().cyan()
            );
        }
        Command::Unbind => {
            if bindings.unbind(key.server()) {
                bindings.save(&bindings_path)?;
                println!("{} Unbound server {}", "✓".green(), key.server().cyan());
            } else {
                println!("Server {} has no bound channel", key.server());
            }
        }
        Command::Add { text } => {
            ensure_permitted(&bindings, &key)?;
            add(&store, &key, &text.join("\n"), cli.format)?;
        }
        Command::List => {
            ensure_permitted(&bindings, &key)?;
            list(&store, &key, cli.format)?;
        }
        Command::Search {
            name,
            reference,
            distance_km,
        } => {
            ensure_permitted(&bindings, &key)?;
            search(&store, &key, name, reference, distance_km, cli.format)?;
        }
        Command::Remove { start, end } => {
            ensure_permitted(&bindings, &key)?;
            if !store.remove_range(&key, start, end)? {
                return Err(eyre::eyre!("Invalid index range: {} to {}", start, end));
            }
            println!("{} Removed GPS points from index {} to {}.", "✓".green(), start, end);
        }
    }

    Ok(())
}

fn ensure_permitted(bindings: &Bindings, key: &ChannelKey) -> Result<()> {
    if let Some(bound) = bindings.bound_channel(key.server())
        && !bindings.permits(key)
    {
        return Err(eyre::eyre!("This command can only be used in the bound channel ({})", bound));
    }
    Ok(())
}

fn add(store: &GpsStore, key: &ChannelKey, raw: &str, format: OutputFormat) -> Result<()> {
    let outcomes: Vec<AddOutcome> = store.add_points(key, raw)?.iter().map(AddOutcome::from).collect();
    if format == OutputFormat::Json {
        println!("{}", render::to_json(&outcomes)?);
        return Ok(());
    }

    let mut added = 0usize;
    for outcome in &outcomes {
        match outcome {
            AddOutcome::Identified { .. } => {
                added += 1;
                println!("{} {}", "✓".green(), outcome);
            }
            AddOutcome::Rejected { .. } => println!("{} {}", "✗".red(), outcome),
        }
    }
    if added > 0 {
        println!("Successfully stashed {} GPS point(s).", added);
    } else {
        println!("No GPS points identified.");
    }
    Ok(())
}

fn list(store: &GpsStore, key: &ChannelKey, format: OutputFormat) -> Result<()> {
    let points = store.list_all(key)?;
    if format == OutputFormat::Json {
        println!("{}", render::to_json(&points)?);
    } else if points.is_empty() {
        println!("No GPS points found.");
    } else {
        println!("{}", "All GPS Points:".bold());
        for (i, point) in points.iter().enumerate() {
            println!("{}", render::indexed_line(i + 1, point));
        }
    }
    Ok(())
}

/// No reference: name search. Reference and radius: radius search. Reference only: closest by name.
fn search(
    store: &GpsStore,
    key: &ChannelKey,
    name: Option<String>,
    reference: Option<String>,
    distance_km: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let needle = name.unwrap_or_default();
    let Some(reference) = reference else {
        let hits = store.search_by_name(key, &needle)?;
        if format == OutputFormat::Json {
            println!("{}", render::to_json(&hits)?);
        } else if hits.is_empty() {
            println!("No GPS points found containing '{}'.", needle);
        } else {
            println!("{}", format!("Results for '{}':", needle).bold());
            for hit in &hits {
                println!("{}", render::search_line(hit));
            }
        }
        return Ok(());
    };

    let reference = parse_reference(&reference)?;
    if let Some(distance_km) = distance_km {
        let hits = store.search_within_radius(key, &reference, distance_km)?;
        if format == OutputFormat::Json {
            println!("{}", render::to_json(&hits)?);
        } else if hits.is_empty() {
            println!("No GPS points found within {} Km of {}.", distance_km, reference.name());
        } else {
            println!(
                "{}",
                format!("GPS Points within {} Km of {}:", distance_km, reference.name()).bold()
            );
            for hit in &hits {
                println!("{}", render::nearby_line(hit));
            }
        }
        return Ok(());
    }

    let hits = store.search_closest_by_name(key, &needle, &reference)?;
    if format == OutputFormat::Json {
        println!("{}", render::to_json(&hits)?);
    } else if hits.is_empty() {
        println!("No GPS points found containing '{}' near {}.", needle, reference.name());
    } else {
        println!(
            "{}",
            format!("Closest Points to {} containing '{}':", reference.name(), needle).bold()
        );
        for hit in &hits {
            println!("{}", render::ranked_line(hit));
        }
    }
    Ok(())
}

//! CLI smoke-check entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `globedash_core` linkage.
//! - Expose read-only catalog queries and a state export for local sanity
//!   checks. Output is deterministic apart from the export of live state.

use globedash_core::{
    core_version, init_logging, GeoCatalog, GeoJsonFileFetcher, GlobeConfig, GlobeSurface,
    InMemorySurface, LayerKind, LayerRegistry, StateStore,
};
use log::{info, warn};
use std::env;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

const CONFIG_ENV: &str = "GLOBEDASH_CONFIG";
const BOUNDARY_WAIT: Duration = Duration::from_secs(10);
const BOUNDARY_POLL_INTERVAL: Duration = Duration::from_millis(25);
const USAGE: &str = "usage: globedash_cli [version | lookup <lat> <lng> | search <query> | export | layers]";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = load_config()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }
    info!(
        "event=cli_command module=cli status=start command={}",
        args.first().map_or("version", String::as_str)
    );

    let catalog = GeoCatalog::builtin();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["version"] => {
            println!("globedash_core version={}", core_version());
        }
        ["lookup", lat, lng] => {
            let lat = parse_coord("lat", lat)?;
            let lng = parse_coord("lng", lng)?;
            match catalog.location_by_coords(lat, lng) {
                Some(entity) => println!("{}", to_json(&entity)?),
                None => println!("null"),
            }
        }
        ["search", query @ ..] if !query.is_empty() => {
            let results: Vec<_> = catalog
                .search(&query.join(" "))
                .iter()
                .map(|entity| entity.to_result_entry())
                .collect();
            println!("{}", to_json(&results)?);
        }
        ["export"] => {
            let store = StateStore::open(&config).map_err(|err| err.to_string())?;
            println!("{}", store.export_state().map_err(|err| err.to_string())?);
        }
        ["layers"] => {
            let store = StateStore::open(&config).map_err(|err| err.to_string())?;
            // Show every layer without touching persisted visibility. Borders
            // need a GeoJSON file and stay hidden without one.
            let boundaries = config.boundaries_path.clone();
            let mut tree = store.tree().clone();
            for kind in LayerKind::ALL {
                let visible = kind != LayerKind::Borders || boundaries.is_some();
                tree.layers.insert(kind.as_str().to_string(), visible);
            }
            let fetcher = GeoJsonFileFetcher::new(boundaries.unwrap_or_default());
            let mut registry = LayerRegistry::with_builtin_layers(catalog, fetcher);
            let mut surface = InMemorySurface::new();
            registry.sync(&tree, &mut surface);

            let deadline = Instant::now() + BOUNDARY_WAIT;
            while registry.has_pending() && Instant::now() < deadline {
                thread::sleep(BOUNDARY_POLL_INTERVAL);
                registry.poll(&mut surface);
            }
            if registry.has_pending() {
                warn!(
                    "event=cli_layers module=cli status=timeout waited_ms={}",
                    BOUNDARY_WAIT.as_millis()
                );
            }
            println!(
                "arcs={} paths={} labels={} polygons={}",
                surface.arcs().len(),
                surface.paths().len(),
                surface.labels().len(),
                surface.polygons().len()
            );
        }
        _ => return Err(USAGE.to_string()),
    }
    Ok(())
}

fn load_config() -> Result<GlobeConfig, String> {
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            GlobeConfig::load(path.trim()).map_err(|err| err.to_string())
        }
        _ => Ok(GlobeConfig::default()),
    }
}

fn parse_coord(name: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|err| format!("invalid {name} `{raw}`: {err}"))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| err.to_string())
}

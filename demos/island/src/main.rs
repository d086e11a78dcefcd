//! island: lure-campaign ensemble on a synthetic elliptical island.
//!
//! Usage:
//!
//! ```text
//! island [params.json] [traps.csv]
//! ```
//!
//! Without a parameter file the reference parameterisation is used; without
//! a trap file traps are laid every `TRAP_SPACING_M` metres over the land.
//! Results go to `./output/realisations.csv`; the first realisation is
//! re-run with a full hour trace into `./output/trace/`.
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=stoat_sim=debug`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stoat_core::Point;
use stoat_output::{CsvWriter, TraceOutputObserver, write_ensemble};
use stoat_sim::{EnsembleConfig, ModelParams, RealisationBuilder, run_ensemble};
use stoat_spatial::{LandMask, SpatialDomain, TrapGrid, load_traps_csv};

// ── Constants ─────────────────────────────────────────────────────────────────

const REALISATIONS:   u32 = 20;
const SEED:           u64 = 42;
const PIXEL_SIZE_M:   f64 = 50.0;
const ISLAND_ROWS:    usize = 80;
const ISLAND_COLS:    usize = 120;
const TRAP_SPACING_M: f64 = 400.0;

// ── Island ────────────────────────────────────────────────────────────────────

/// An ellipse filling most of the raster, with its top-left corner at
/// (0, rows × pixel).
fn build_island() -> Result<SpatialDomain> {
    let (cy, cx) = (ISLAND_ROWS as f64 / 2.0, ISLAND_COLS as f64 / 2.0);
    let (ry, rx) = (cy * 0.9, cx * 0.9);
    let mask = LandMask::from_fn(ISLAND_ROWS, ISLAND_COLS, |r, c| {
        let dy = (r as f64 + 0.5 - cy) / ry;
        let dx = (c as f64 + 0.5 - cx) / rx;
        dx * dx + dy * dy <= 1.0
    });
    let top_left = Point::new(0.0, ISLAND_ROWS as f64 * PIXEL_SIZE_M);
    Ok(SpatialDomain::new(mask, top_left, PIXEL_SIZE_M)?)
}

/// A regular trap grid clipped to the land.
fn grid_traps(domain: &SpatialDomain) -> TrapGrid {
    let ext = domain.extent();
    let mut traps = Vec::new();
    let mut y = ext.bry + TRAP_SPACING_M / 2.0;
    while y < ext.tly {
        let mut x = ext.tlx + TRAP_SPACING_M / 2.0;
        while x < ext.brx {
            let p = Point::new(x, y);
            if domain.is_on_land(p) {
                traps.push(p);
            }
            x += TRAP_SPACING_M;
        }
        y += TRAP_SPACING_M;
    }
    TrapGrid::new(traps)
}

fn load_params(path: Option<&Path>) -> Result<ModelParams> {
    let Some(path) = path else {
        return Ok(ModelParams::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let params: ModelParams =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    params.validate()?;
    Ok(params)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let params = load_params(args.first().map(PathBuf::as_path))?;

    // 1. Island and traps.
    let domain = build_island()?;
    let traps = match args.get(1) {
        Some(path) => load_traps_csv(path).with_context(|| format!("loading traps from {}", path.display()))?,
        None => grid_traps(&domain),
    };
    info!(
        land_fraction = domain.mask().land_fraction(),
        traps = traps.len(),
        "island ready"
    );

    // 2. Ensemble.
    let config = EnsembleConfig { realisations: REALISATIONS, seed: SEED };
    let started = Instant::now();
    let records = run_ensemble(&params, &domain, &traps, &config)?;
    let elapsed = started.elapsed();

    let out = Path::new("output");
    fs::create_dir_all(out)?;
    let written = write_ensemble(&mut CsvWriter::new(out)?, &records)?;

    let eradicated = records
        .iter()
        .filter_map(|r| r.status.outcome())
        .filter(|o| o.eradicated)
        .count();
    println!();
    println!("Realisations: {REALISATIONS}  |  completed: {written}  |  eradicated: {eradicated}");
    println!(
        "P(eradication) = {:.3}   ({:.2} s, {:.1} ms/realisation)",
        eradicated as f64 / written.max(1) as f64,
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1e3 / REALISATIONS as f64,
    );

    // 3. Full trace of the first realisation.
    if let Some(first) = records.first() {
        let trace_dir = out.join("trace");
        fs::create_dir_all(&trace_dir)?;
        let mut obs = TraceOutputObserver::new(CsvWriter::new(&trace_dir)?, first.index, first.seed);
        let outcome = RealisationBuilder::new(&params, &domain, &traps)
            .seed(first.seed)
            .build()?
            .run(&mut obs)?;
        if let Some(e) = obs.take_error() {
            return Err(e.into());
        }
        println!(
            "Trace of realisation {}: eradicated = {}, {} days, written to {}",
            first.index,
            outcome.eradicated,
            outcome.days_simulated,
            trace_dir.display()
        );
    }
    Ok(())
}

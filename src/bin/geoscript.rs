use std::process::ExitCode;

use geoscript::config::MeshConfig;
use geoscript::error::ConfigError;
use geoscript::mesher::MeshRunner;
use geoscript::{Domain, GeoWriter, Result};

const USAGE: &str = r"geoscript

USAGE:
  geoscript <domain.json> [options]

OPTIONS:
  -g, --geo <path>     Write the script here (default <domain>_idBoundary.geo)
  -c, --coord <F|L|S>  Flat, lon/lat or stereographic coordinates (default F)
  -l, --line <type>    LN lines, LY compound lines, BN splines, BY compound splines (default BN)
  --defid <id>         Boundary id for edges without one (default 0)
  --mval <expr>        Uniform background mesh size expression
  --mesh               Run `gmsh -2` on the written script
  -h, --help           Show this help
";

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("geoscript=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("geoscript error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = MeshConfig::from_args(std::env::args().skip(1))?;
    if config.show_help() {
        println!("{USAGE}");
        return Ok(());
    }

    let domain_path = config.domain_path().ok_or(ConfigError::MissingDomain)?;
    let geo_path = config.geo_path().ok_or(ConfigError::MissingDomain)?;

    let domain = Domain::load(domain_path)?;
    tracing::info!(
        shapes = domain.shape_count(),
        loops = domain.loop_count(),
        lines = domain.line_count(),
        "domain loaded"
    );

    let report = GeoWriter::new(&config).write_to_path(&domain, &geo_path)?;
    tracing::info!(
        points = report.point_count,
        curves = report.segment_curves.len(),
        surfaces = report.surfaces.len(),
        "script compiled"
    );

    if config.run_mesher() {
        let output = MeshRunner::new().execute(&geo_path)?;
        println!("{}", output.mesh_path.display());
    }
    Ok(())
}

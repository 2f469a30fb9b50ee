use std::fs;
use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info, warn};
use nalgebra::{Matrix3, Vector3};
use pbc_wrap::lattice::{LatticeGeometry, WrapRequest};
use pbc_wrap::Result;

#[derive(Parser)]
#[command(name = "pbc-wrap")]
#[command(about = "Wrap coordinates onto their minimum image in a triclinic periodic cell")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Number of threads to use (default: all available cores)
    #[arg(short, long)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap a JSON request of the form {"cell": [[..],[..],[..]], "origin": [..], "coordinates": [[..], ..]}
    Wrap {
        /// Input file path (stdin when omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Drop lattice vector components above the diagonal instead of rejecting them
        #[arg(long)]
        lenient: bool,
    },
    /// Wrap a single point and print it before and after
    Point {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,

        /// Cell as a b c alpha beta gamma (angles in degrees); unit close-packed cell when omitted
        #[arg(long, num_args = 6, value_names = ["A", "B", "C", "ALPHA", "BETA", "GAMMA"])]
        cell: Option<Vec<f64>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Set thread pool size if specified
    if let Some(threads) = cli.threads {
        #[cfg(feature = "parallel")]
        {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .map_err(|e| format!("Failed to set thread pool size: {}", e))?;
            info!("Using {} threads", threads);
        }
        #[cfg(not(feature = "parallel"))]
        {
            warn!("Thread count {} specified but parallel feature not enabled. Ignoring.", threads);
        }
    }

    debug!("Starting pbc-wrap v{}", pbc_wrap::VERSION);

    match cli.command {
        Commands::Wrap {
            input,
            output,
            lenient,
        } => wrap_file(input, output, lenient),
        Commands::Point { x, y, z, cell } => wrap_single_point(Vector3::new(x, y, z), cell),
    }
}

fn wrap_file(input: Option<String>, output: Option<String>, lenient: bool) -> Result<()> {
    let text = match &input {
        Some(path) => {
            info!("Reading wrap request from {}", path);
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut request: WrapRequest = serde_json::from_str(&text)?;
    if lenient && !request.lenient {
        warn!("Lenient mode: lattice vector components above the diagonal will be ignored");
        request.lenient = true;
    }

    let response = request.execute()?;
    let encoded = serde_json::to_string_pretty(&response)?;

    match &output {
        Some(path) => {
            fs::write(path, encoded).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            info!("Wrote {} coordinates to {}", response.coordinates.len(), path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", encoded)?;
        }
    }
    Ok(())
}

fn wrap_single_point(point: Vector3<f64>, cell: Option<Vec<f64>>) -> Result<()> {
    let geometry = match cell.as_deref() {
        Some([a, b, c, alpha, beta, gamma]) => LatticeGeometry::from_cell_parameters(
            *a,
            *b,
            *c,
            alpha.to_radians(),
            beta.to_radians(),
            gamma.to_radians(),
        )?,
        Some(values) => {
            return Err(format!("Expected 6 cell parameters, got {}", values.len()).into());
        }
        None => LatticeGeometry::from_matrix(Matrix3::new(
            1.0, 0.0, 0.0,
            0.5, 0.8660254, 0.0,
            0.5, 0.28867513, 0.81649658,
        ))?,
    };

    let mut wrapped = point;
    let image = geometry.wrap_in_place(&mut wrapped);
    debug!("Subtracted lattice image {:?}", image);

    println!("{:.6} {:.6} {:.6}", point[0], point[1], point[2]);
    println!("{:.6} {:.6} {:.6}", wrapped[0], wrapped[1], wrapped[2]);
    Ok(())
}

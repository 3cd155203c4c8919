use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use cube_solver::{
    pruning::{CornerGranularity, CornerPatternDatabase, LoadError, PatternDatabaseGenerateMeta},
    puzzle::{
        CubeState, bitboard::BitboardCube, format_moves, parse_moves, random_moves, render_net,
    },
    solver::IdaStarSolver,
};
use env_logger::TimestampPrecision;
use log::{LevelFilter, warn};

/// The diameter of the corner configuration space in face turns.
const CORNER_DIAMETER: u8 = 11;

/// Solves the 3x3x3 with IDA* guided by a corner pattern database
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Which corner information the pattern database distinguishes.
#[derive(Debug, Copy, Clone, ValueEnum)]
enum Granularity {
    Permutation,
    PermutationAndOrientation,
}

impl From<Granularity> for CornerGranularity {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Permutation => CornerGranularity::Permutation,
            Granularity::PermutationAndOrientation => CornerGranularity::PermutationAndOrientation,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a corner pattern database and save it.
    Build {
        /// Where to write the database.
        #[arg(short, long, default_value = "corners.pdb")]
        output: PathBuf,
        /// How many moves deep the breadth first search goes.
        #[arg(long, default_value_t = CORNER_DIAMETER)]
        max_depth: u8,
        #[arg(long, value_enum, default_value_t = Granularity::PermutationAndOrientation)]
        granularity: Granularity,
        /// The value of entries the search never reaches. Defaults to one more
        /// than the max depth.
        #[arg(long)]
        initial_value: Option<u8>,
    },
    /// Find a shortest solution to a scramble.
    Solve {
        /// The scramble to solve, e.g. "R U' F2". A random scramble is used
        /// when absent.
        scramble: Option<String>,
        /// The pattern database to load. It is generated and saved here if it
        /// does not exist.
        #[arg(short, long, default_value = "corners.pdb")]
        database: PathBuf,
        #[arg(long, value_enum, default_value_t = Granularity::PermutationAndOrientation)]
        granularity: Granularity,
        /// The length of the random scramble.
        #[arg(long, default_value_t = 10)]
        random_length: usize,
        /// Seed for the random scramble.
        #[arg(long)]
        seed: Option<u64>,
        /// Give up on solutions longer than this.
        #[arg(long)]
        max_length: Option<usize>,
        /// Give up after this many seconds.
        #[arg(long)]
        time_limit: Option<f64>,
    },
    /// Print a random scramble and the cube it produces.
    Scramble {
        #[arg(long, default_value_t = 20)]
        length: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Build {
            output,
            max_depth,
            granularity,
            initial_value,
        } => {
            let granularity = granularity.into();
            let meta = match initial_value {
                Some(initial_value) => PatternDatabaseGenerateMeta::new_with_initial_value(
                    granularity,
                    max_depth,
                    initial_value,
                )?,
                None => PatternDatabaseGenerateMeta::new(granularity, max_depth)?,
            };
            let db = CornerPatternDatabase::generate::<BitboardCube>(&meta);
            db.save(&output)
                .wrap_err_with(|| format!("Could not save to {}", output.display()))?;
            println!(
                "Wrote {} of {} entries to {}",
                db.filled(),
                db.size(),
                output.display()
            );
        }
        Commands::Solve {
            scramble,
            database,
            granularity,
            random_length,
            seed,
            max_length,
            time_limit,
        } => {
            let scramble = match scramble {
                Some(scramble) => parse_moves(&scramble)?,
                None => random_moves(&mut rng(seed), random_length),
            };
            let mut state = BitboardCube::solved();
            state.apply_moves(&scramble);
            println!("Scramble: {}", format_moves(&scramble));
            println!("{}", render_net(&state));

            let db = load_or_generate(&database, granularity.into())?;
            let mut solver = IdaStarSolver::new(db);
            if let Some(max_length) = max_length {
                solver = solver.with_max_solution_length(max_length);
            }
            if let Some(time_limit) = time_limit {
                let time_limit = Duration::try_from_secs_f64(time_limit)
                    .map_err(|_| eyre!("Invalid time limit {time_limit}"))?;
                solver = solver.with_time_limit(time_limit);
            }

            let solution = solver.solve(&state)?;
            if solution.is_empty() {
                println!("Already solved");
            } else {
                println!(
                    "Solution ({} moves): {}",
                    solution.len(),
                    format_moves(&solution)
                );
            }
        }
        Commands::Scramble { length, seed } => {
            let scramble = random_moves(&mut rng(seed), length);
            let mut state = BitboardCube::solved();
            state.apply_moves(&scramble);
            println!("{}", format_moves(&scramble));
            println!("{}", render_net(&state));
        }
    }

    Ok(())
}

fn rng(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}

/// Load the database at `path`, generating and saving a complete one when the
/// file is missing. A corrupt file is an error rather than a reason to
/// regenerate.
fn load_or_generate(
    path: &Path,
    granularity: CornerGranularity,
) -> color_eyre::Result<CornerPatternDatabase> {
    match CornerPatternDatabase::load(path, granularity) {
        Ok(db) => Ok(db),
        Err(LoadError::NotFound) => {
            warn!(
                "No pattern database at {}, generating one. This takes a while",
                path.display()
            );
            let meta = PatternDatabaseGenerateMeta::new(granularity, CORNER_DIAMETER)?;
            let db = CornerPatternDatabase::generate::<BitboardCube>(&meta);
            db.save(path)
                .wrap_err_with(|| format!("Could not save to {}", path.display()))?;
            Ok(db)
        }
        Err(e) => Err(e).wrap_err_with(|| format!("Could not load {}", path.display())),
    }
}

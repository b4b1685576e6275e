use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use clap::error::ErrorKind;
use tracing::*;
use tracing_subscriber::filter::LevelFilter;

use fpmine::*;
use fpmine::miner::DEFAULT_WORKERS;

#[derive( Parser, Debug )]
#[command( name = "fpgrowth", about = "Mines frequent itemsets with FP-Growth" )]
struct Cli {
    /// Minimum support as a fraction of all transactions
    #[arg( allow_negative_numbers = true )]
    min_support: f64,
    /// Transactions, one per line
    input: PathBuf,
    /// Destination of the frequent patterns
    output: PathBuf,
    /// Number of mining threads
    #[arg( long, default_value_t = DEFAULT_WORKERS )]
    workers: usize,
    /// Also write the patterns as json
    #[arg( long )]
    json: Option<PathBuf>,
    /// Log more, repeat for even more
    #[arg( short, long, action = ArgAction::Count )]
    verbose: u8,
}

fn main() -> Result<(), String> {
    let cli = match Cli::try_parse() {
	Ok( cli ) => cli,
	Err( err ) => {
	    let _ = err.print();
	    process::exit( usage_status( &err ));
	}
    };
    prepare_logging( cli.verbose );

    let start = Instant::now();
    run( &cli ).map_err( |err| err.to_string() )?;

    let elapsed = start.elapsed();
    debug!( "finished in {}ms", elapsed.as_millis() );
    println!( "elapsed time: {:.6}s", elapsed.as_secs_f64() );
    Ok( () )
}

/// Help and version requests end successfully, every other usage error does not
fn usage_status( err: &clap::Error ) -> i32 {
    match err.kind() {
	ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
	_ => 1,
    }
}

/// Reads the input, mines it and writes the results
fn run( cli: &Cli ) -> Result<MiningOutcome, MiningError> {
    let database = io::read_transactions( &cli.input )?;
    let config = MiningConfig::new( cli.min_support ).with_workers( cli.workers );
    let outcome = mine_frequent_patterns( &database, &config )?;

    io::write_patterns( &outcome.patterns, outcome.total_transactions, &cli.output )?;
    if let Some( path ) = &cli.json {
	io::write_report( &outcome.patterns, outcome.total_transactions, path )?;
    }
    Ok( outcome )
}

fn prepare_logging( verbosity: u8 ) {
    let level = match verbosity {
	0 => LevelFilter::INFO,
	1 => LevelFilter::DEBUG,
	_ => LevelFilter::TRACE,
    };
    let tracer = tracing_subscriber::fmt::fmt()
	.with_max_level( level )
	.with_writer( std::io::stderr )
	.finish();
    if tracing::subscriber::set_global_default( tracer ).is_err() {
	eprintln!( "logging was already set up" );
    }
}

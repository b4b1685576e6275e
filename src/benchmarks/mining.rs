use tracing::{info, debug};

use rand::prelude::*;
use rand::rngs::StdRng;
use statrs::distribution::{Binomial, DiscreteUniform};

use std::time::*;

use fpmine::*;

/// Items in the synthetic data
const UNIVERSE: i64 = 40;

fn main() -> Result<(), String> {
    prepare_logging();

    let database = generate_database( 20000, 0.12, 42 )?;
    info!( "generated {} transactions over {UNIVERSE} items", database.len() );

    for ratio in [ 0.05, 0.02 ] {
	let mut reference: Option<FrequentPatternSet> = None;
	for workers in [ 1, 2, 4, 8 ] {
	    let (outcome, time) = benchmark_mining( &database, ratio, workers )?;
	    info!( "Result: ratio {ratio} on {workers} workers took {}ms for {} patterns", time.as_millis(), outcome.patterns.len() );

	    match &reference {
		Some( patterns ) if *patterns != outcome.patterns => {
		    return Err( format!( "{workers} workers disagree with a single worker" ));
		},
		Some( _ ) => {},
		None => {
		    spot_check( &database, &outcome )?;
		    reference = Some( outcome.patterns );
		},
	    }
	}
    }

    Result::Ok( () )
}

fn benchmark_mining( database: &TransactionDatabase, ratio: f64, workers: usize ) -> Result<(MiningOutcome, Duration), String> {
    let config = MiningConfig::new( ratio ).with_workers( workers );
    let start = Instant::now();
    let outcome = mine_frequent_patterns( database, &config ).map_err( |err| err.to_string() )?;
    Ok( (outcome, Instant::now().duration_since( start )) )
}

/// Compares the mined supports of a few patterns against a scan of the database
fn spot_check( database: &TransactionDatabase, outcome: &MiningOutcome ) -> Result<(), String> {
    let mut gen = StdRng::seed_from_u64( 7 );
    let patterns: Vec<(&Pattern, Count)> = outcome.patterns.iter().collect();
    for (pattern, support) in patterns.choose_multiple( &mut gen, 25 ) {
	let scanned = database.query_support( pattern.items() );
	debug!( "{:?}: mined {support}, scanned {scanned}", pattern.items() );
	if scanned != *support {
	    return Err( format!( "support of {:?} is {scanned}, mined {support}", pattern.items() ));
	}
    }
    Ok( () )
}

/// Draws transactions whose items are biased towards small identifiers
fn generate_database( transactions: usize, density: f64, seed: u64 ) -> Result<TransactionDatabase, String> {
    let mut gen = StdRng::seed_from_u64( seed );
    let length_distribution = Binomial::new( density, UNIVERSE as u64 ).map_err( |err| err.to_string() )?;

    let mut database = TransactionDatabase::new();
    for _ in 0 .. transactions {
	let length = length_distribution.sample( &mut gen ) as usize;
	let mut transaction = Transaction::with_capacity( length );
	for _ in 0 .. length {
	    // the minimum of two uniform draws prefers small items
	    let item_dist = DiscreteUniform::new( 0, UNIVERSE - 1 ).map_err( |err| err.to_string() )?;
	    let first = item_dist.sample( &mut gen ) as usize;
	    let second = item_dist.sample( &mut gen ) as usize;
	    transaction.push( first.min( second ));
	}
	transaction.sort();
	transaction.dedup();
	database.push( transaction );
    }
    Ok( database )
}

fn prepare_logging() {
    let tracer = tracing_subscriber::fmt::fmt()
        .with_max_level( tracing_subscriber::filter::LevelFilter::INFO )
        .finish();
    if tracing::subscriber::set_global_default( tracer ).is_err() {
	eprintln!( "logging was already set up" );
    }
}

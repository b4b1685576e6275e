use tracing::*;

use crate::*;
use crate::data::PrefixTree;

mod expansion;
mod projection;
mod scheduler;

pub use expansion::PatternExpander;
pub use projection::{ConditionalProjector, PatternBase};
pub use scheduler::MiningScheduler;

/// Number of worker threads if nothing else is configured
pub const DEFAULT_WORKERS: usize = 8;

pub trait Miner {
    /// Mines every frequent pattern whose last item in the tree's order is `seed`.
    /// Mining may take the snapshot apart, so it is consumed.
    fn mine( &self, snapshot: PrefixTree, seed: Item ) -> Result<FrequentPatternSet, MiningError>;
}

/// FP-Growth by path reconstruction: project the seed's paths into a conditional tree,
/// then expand the conditional paths into all patterns containing the seed.
#[derive( Debug, Clone, Copy, Default )]
pub struct FpGrowthMiner;

/// Parameters of a mining run.
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct MiningConfig {
    /// minimum support as a fraction of all transactions
    pub min_support_ratio: f64,
    pub workers: usize,
}

/// Result of a mining run.
#[derive( Debug, Clone, Default, PartialEq )]
pub struct MiningOutcome {
    pub patterns: FrequentPatternSet,
    /// number of transactions the support fractions refer to
    pub total_transactions: Count,
    pub min_support_count: f64,
}

impl Miner for FpGrowthMiner {

    fn mine( &self, snapshot: PrefixTree, seed: Item ) -> Result<FrequentPatternSet, MiningError> {
	let min_support_count = snapshot.min_support_count();
	let conditional = ConditionalProjector::new( &snapshot ).project( seed )?;
	// the projection holds everything the seed needs
	drop( snapshot );

	let base = ConditionalProjector::new( &conditional ).pattern_base( seed )?;
	let patterns = PatternExpander::new( seed ).expand_frequent( &base, min_support_count );
	trace!( "item {seed} yields {} patterns", patterns.len() );
	Ok( patterns )
    }
}

impl MiningConfig {

    pub fn new( min_support_ratio: f64 ) -> MiningConfig {
	MiningConfig{ min_support_ratio, workers: DEFAULT_WORKERS }
    }

    pub fn with_workers( mut self, workers: usize ) -> MiningConfig {
	self.workers = workers;
	self
    }

    /// Rejects settings that cannot drive a run. Ratios outside [0, 1] are fine.
    pub fn validate( &self ) -> Result<(), MiningError> {
	if self.workers == 0 {
	    return Err( MiningError::InvalidConfig( "at least one worker is needed".to_string() ));
	}
	if self.min_support_ratio.is_nan() {
	    return Err( MiningError::InvalidConfig( "minimum support is not a number".to_string() ));
	}
	Ok( () )
    }

    /// Absolute threshold for the given number of transactions, unrounded
    pub fn min_support_count( &self, total_transactions: Count ) -> f64 {
	self.min_support_ratio * total_transactions as f64
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
	MiningConfig::new( 0.0 )
    }
}

/// Mines all frequent patterns of the database.
///
/// The threshold is fixed once from the ratio and the number of transactions and is then used
/// unchanged on every tree level.
pub fn mine_frequent_patterns( database: &TransactionDatabase, config: &MiningConfig ) -> Result<MiningOutcome, MiningError> {
    config.validate()?;

    let total_transactions = database.total_weight();
    let min_support_count = config.min_support_count( total_transactions );
    info!( "mining {total_transactions} transactions with minimum support count {min_support_count:.3}" );

    let tree = PrefixTree::from_database( database, min_support_count );
    tree.log( "fp-tree", Level::DEBUG );

    let scheduler = MiningScheduler::new( FpGrowthMiner, config.workers );
    let patterns = scheduler.mine_all( &tree )?;
    patterns.log( "mined", Level::INFO );

    Ok( MiningOutcome{ patterns, total_transactions, min_support_count } )
}

pub mod data;
pub mod error;
pub mod io;
pub mod miner;
pub mod pattern;

use tracing::*;

pub use data::{Item, Itemvec, Transaction, Count, DataPair, Database, TransactionDatabase};
pub use error::MiningError;
pub use pattern::{Pattern, FrequentPatternSet};
pub use miner::{Miner, FpGrowthMiner, MiningConfig, MiningOutcome, MiningScheduler, mine_frequent_patterns};

/// Objects that can be recorded in the log
pub trait Loggable {
    fn log(&self, message: &str, level: tracing::Level );
}

/// Emits the text as an event of the given level
pub(crate) fn log_at( level: Level, text: &str ) {
    if level == Level::ERROR {
	error!( "{text}" );
    } else if level == Level::WARN {
	warn!( "{text}" );
    } else if level == Level::INFO {
	info!( "{text}" );
    } else if level == Level::DEBUG {
	debug!( "{text}" );
    } else {
	trace!( "{text}" );
    }
}

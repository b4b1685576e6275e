use std::path::PathBuf;

use thiserror::Error;

use crate::{Item, Itemvec};

/// Errors raised while reading transactions, mining or writing results.
#[derive( Error, Debug )]
pub enum MiningError {
    /// Configuration that cannot drive a mining run
    #[error( "invalid mining configuration: {0}" )]
    InvalidConfig( String ),

    #[error( "could not build worker pool: {0}" )]
    ThreadPool( String ),

    #[error( "i/o error on {}: {source}", .path.display() )]
    Io {
	path: PathBuf,
	#[source]
	source: std::io::Error,
    },

    /// A digit run in the input that is not a valid item
    #[error( "line {line}: cannot read item '{token}'" )]
    Parse {
	line: usize,
	token: String,
    },

    #[error( "json report failed: {0}" )]
    Json( #[from] serde_json::Error ),

    /// A cross-link chain leads to a node that does not carry its item.
    #[error( "cross-link chain of item {item} is broken at node {node}" )]
    BrokenCrossLink {
	item: Item,
	node: usize,
    },

    /// Two mining calls reported the same pattern. Every pattern has exactly one seed, so this is a bug.
    #[error( "pattern {pattern:?} was mined twice" )]
    PatternCollision {
	pattern: Itemvec,
    },
}

impl MiningError {
    pub fn io( path: impl Into<PathBuf>, source: std::io::Error ) -> MiningError {
	MiningError::Io{ path: path.into(), source }
    }
}

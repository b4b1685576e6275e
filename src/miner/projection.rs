use rustc_hash::FxHashMap;
use tracing::*;

use crate::*;
use crate::data::PrefixTree;

/// Weighted prefix paths of one seed item. Every path contains the seed.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct PatternBase {
    seed: Item,
    paths: FxHashMap<Pattern, Count>,
}

/// Derives pattern bases and conditional trees from a tree.
pub struct ConditionalProjector<'t> {
    tree: &'t PrefixTree,
}

impl PatternBase {

    pub fn seed( &self ) -> Item { self.seed }

    /// Number of distinct paths
    pub fn len( &self ) -> usize { self.paths.len() }

    pub fn is_empty( &self ) -> bool { self.paths.is_empty() }

    pub fn weight( &self, path: &Pattern ) -> Option<Count> {
	self.paths.get( path ).copied()
    }

    pub fn iter( &self ) -> impl Iterator<Item = (&Pattern, Count)> + '_ {
	self.paths.iter().map( |(path, weight)| (path, *weight) )
    }

    /// Turns every path into a transaction that occurs as often as the path's weight.
    /// Paths are sorted so the database does not depend on hashing order.
    pub fn to_database( &self ) -> TransactionDatabase {
	let mut paths: Vec<(&Pattern, Count)> = self.iter().collect();
	paths.sort_unstable();
	let mut database = TransactionDatabase::new();
	for (path, weight) in paths {
	    database.add( path.items().to_vec(), weight );
	}
	database
    }
}

impl <'t> ConditionalProjector<'t> {

    pub fn new( tree: &'t PrefixTree ) -> ConditionalProjector<'t> {
	ConditionalProjector{ tree }
    }

    /// Collects the root paths of all nodes of the seed item, weighted by the node counts.
    /// Equal paths from different nodes accumulate.
    pub fn pattern_base( &self, seed: Item ) -> Result<PatternBase, MiningError> {
	let mut paths: FxHashMap<Pattern, Count> = FxHashMap::default();
	for node in self.tree.cross_links( seed ) {
	    let node = node?;
	    let leaf = self.tree.node( node ).ok_or( MiningError::BrokenCrossLink{ item: seed, node } )?;
	    let path: Pattern = self.tree.ancestry( node )
		.filter_map( |ancestor| ancestor.item() )
		.collect();
	    *paths.entry( path ).or_insert( 0 ) += leaf.count();
	}
	trace!( "item {seed} has {} distinct paths", paths.len() );
	Ok( PatternBase{ seed, paths } )
    }

    /// Builds the conditional tree of the seed item.
    /// The threshold is the same absolute count as in the projected tree.
    pub fn project( &self, seed: Item ) -> Result<PrefixTree, MiningError> {
	let base = self.pattern_base( seed )?;
	let conditional = PrefixTree::conditional( &base.to_database(), self.tree.order(), self.tree.min_support_count() );
	trace!( "conditional tree of {seed} has {} nodes", conditional.node_count() );
	Ok( conditional )
    }
}

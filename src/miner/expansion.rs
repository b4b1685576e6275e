use crate::*;

use super::PatternBase;

/// Enumerates every pattern containing the seed that a pattern base supports.
pub struct PatternExpander {
    seed: Item,
}

impl PatternExpander {

    pub fn new( seed: Item ) -> PatternExpander {
	PatternExpander{ seed }
    }

    /// Adds the weight of every path to each subset of the path that contains the seed.
    /// Exponential in the length of the longest path.
    pub fn expand( &self, base: &PatternBase ) -> FrequentPatternSet {
	let mut patterns = FrequentPatternSet::new();
	let mut current = Itemvec::new();
	for (path, weight) in base.iter() {
	    let companions: Itemvec = path.items().iter().copied()
		.filter( |item| *item != self.seed )
		.collect();
	    self.enumerate( &companions, 0, &mut current, weight, &mut patterns );
	}
	patterns
    }

    /// Expands and drops everything below the threshold.
    pub fn expand_frequent( &self, base: &PatternBase, min_support_count: f64 ) -> FrequentPatternSet {
	let mut patterns = self.expand( base );
	patterns.retain_frequent( min_support_count );
	patterns
    }

    // visits every subset of companions[start ..] added to current exactly once
    fn enumerate( &self, companions: &[Item], start: usize, current: &mut Itemvec, weight: Count, patterns: &mut FrequentPatternSet ) {
	let pattern = Pattern::new( current.iter().copied().chain( std::iter::once( self.seed )));
	patterns.add_support( pattern, weight );

	for position in start .. companions.len() {
	    current.push( companions[ position ] );
	    self.enumerate( companions, position + 1, current, weight, patterns );
	    current.pop();
	}
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::PrefixTree;
    use crate::miner::ConditionalProjector;

    fn pattern( items: &[Item] ) -> Pattern {
	Pattern::new( items.iter().copied() )
    }

    fn base_of( transactions: Vec<Transaction>, seed: Item ) -> PatternBase {
	let database: TransactionDatabase = transactions.into_iter().collect();
	let tree = PrefixTree::from_database( &database, 0.0 );
	ConditionalProjector::new( &tree ).pattern_base( seed ).unwrap()
    }

    #[test]
    fn test_all_subsets() {
	// 4 is the least frequent item and ends every path
	let base = base_of( vec!( vec!( 1, 2, 3, 4 ), vec!( 1, 2, 3 ), vec!( 1, 2 ), vec!( 1 )), 4 );
	let patterns = PatternExpander::new( 4 ).expand( &base );

	// every subset of {1, 2, 3} joined with 4
	assert_eq!( patterns.len(), 8 );
	for (pattern, support) in patterns.iter() {
	    assert!( pattern.contains( 4 ));
	    assert_eq!( support, 1 );
	}
	assert!( patterns.contains( &pattern( &[ 4 ] )));
	assert!( patterns.contains( &pattern( &[ 1, 2, 3, 4 ] )));
    }

    #[test]
    fn test_supports_aggregate() {
	let base = base_of( vec!( vec!( 1, 2, 5 ), vec!( 1, 2, 3, 5 ), vec!( 2, 3 ), vec!( 2, 3 ), vec!( 1, 3 )), 5 );
	let patterns = PatternExpander::new( 5 ).expand( &base );

	assert_eq!( patterns.support( &pattern( &[ 5 ] )), Some( 2 ));
	assert_eq!( patterns.support( &pattern( &[ 1, 5 ] )), Some( 2 ));
	assert_eq!( patterns.support( &pattern( &[ 1, 2, 5 ] )), Some( 2 ));
	assert_eq!( patterns.support( &pattern( &[ 3, 5 ] )), Some( 1 ));
	assert_eq!( patterns.support( &pattern( &[ 1, 2, 3, 5 ] )), Some( 1 ));

	let frequent = PatternExpander::new( 5 ).expand_frequent( &base, 2.0 );
	assert_eq!( frequent.len(), 4 );
	assert!( !frequent.contains( &pattern( &[ 3, 5 ] )));
    }

    #[test]
    fn test_empty_base() {
	let base = base_of( vec!( vec!( 1 )), 2 );
	assert!( PatternExpander::new( 2 ).expand( &base ).is_empty() );
    }
}

mod serialize; // output lines and json report

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use tracing::*;

use crate::*;

pub use serialize::{PatternRecord, SupportFormatter};

/// Set of items, stored sorted and without duplicates.
///
/// Patterns order by size first, then lexicographically, which is the order of the output.
#[derive( Debug, Clone, PartialEq, Eq, Hash, Default )]
pub struct Pattern {
    items: Itemvec,
}

/// Maps patterns to their aggregated support count.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct FrequentPatternSet {
    supports: FxHashMap<Pattern, Count>,
}

impl Pattern {

    pub fn new <I> ( items: I ) -> Pattern where I: IntoIterator<Item = Item> {
	let mut items: Itemvec = items.into_iter().collect();
	items.sort_unstable();
	items.dedup();
	Pattern{ items }
    }

    pub fn items( &self ) -> &[Item] { &self.items }

    pub fn len( &self ) -> usize { self.items.len() }

    pub fn is_empty( &self ) -> bool { self.items.is_empty() }

    pub fn contains( &self, item: Item ) -> bool {
	self.items.binary_search( &item ).is_ok()
    }
}

impl Ord for Pattern {
    fn cmp( &self, other: &Self ) -> Ordering {
	self.items.len().cmp( &other.items.len() )
	    .then_with( || self.items.cmp( &other.items ))
    }
}

impl PartialOrd for Pattern {
    fn partial_cmp( &self, other: &Self ) -> Option<Ordering> {
	Some( self.cmp( other ))
    }
}

impl FromIterator<Item> for Pattern {
    fn from_iter<I: IntoIterator<Item = Item>>( items: I ) -> Self {
	Pattern::new( items )
    }
}

impl FrequentPatternSet {

    pub fn new() -> FrequentPatternSet {
	FrequentPatternSet{ supports: FxHashMap::default() }
    }

    pub fn len( &self ) -> usize { self.supports.len() }

    pub fn is_empty( &self ) -> bool { self.supports.is_empty() }

    pub fn support( &self, pattern: &Pattern ) -> Option<Count> {
	self.supports.get( pattern ).copied()
    }

    pub fn contains( &self, pattern: &Pattern ) -> bool {
	self.supports.contains_key( pattern )
    }

    /// Adds `weight` to the support of the pattern
    pub fn add_support( &mut self, pattern: Pattern, weight: Count ) {
	*self.supports.entry( pattern ).or_insert( 0 ) += weight;
    }

    /// Drops every pattern with support below the threshold. Ties are kept.
    pub fn retain_frequent( &mut self, min_support_count: f64 ) {
	self.supports.retain( |_, support| *support as f64 >= min_support_count );
    }

    /// Moves all patterns of `other` into this set.
    /// A pattern present in both sets was mined twice and fails the merge.
    pub fn merge( &mut self, other: FrequentPatternSet ) -> Result<(), MiningError> {
	if let Some( duplicate ) = other.supports.keys().find( |pattern| self.supports.contains_key( *pattern )) {
	    return Err( MiningError::PatternCollision{ pattern: duplicate.items.clone() } );
	}
	self.supports.extend( other.supports );
	Ok( () )
    }

    pub fn iter( &self ) -> impl Iterator<Item = (&Pattern, Count)> + '_ {
	self.supports.iter().map( |(pattern, support)| (pattern, *support) )
    }

    /// All patterns in output order
    pub fn sorted( &self ) -> Vec<(&Pattern, Count)> {
	let mut patterns: Vec<(&Pattern, Count)> = self.iter().collect();
	patterns.sort_unstable_by( |left, right| left.0.cmp( right.0 ));
	patterns
    }
}

impl IntoIterator for FrequentPatternSet {
    type Item = (Pattern, Count);
    type IntoIter = std::collections::hash_map::IntoIter<Pattern, Count>;

    fn into_iter( self ) -> Self::IntoIter {
	self.supports.into_iter()
    }
}

impl FromIterator<(Pattern, Count)> for FrequentPatternSet {
    fn from_iter<I: IntoIterator<Item = (Pattern, Count)>>( patterns: I ) -> Self {
	let mut set = FrequentPatternSet::new();
	for (pattern, support) in patterns {
	    set.add_support( pattern, support );
	}
	set
    }
}

impl Loggable for FrequentPatternSet {
    fn log( &self, message: &str, level: Level ) {
	let longest = self.supports.keys().map( |pattern| pattern.len() ).max().unwrap_or( 0 );
	log_at( level, &format!( "{message}: {} patterns, longest has {longest} items", self.len() ));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pattern( items: &[Item] ) -> Pattern {
	Pattern::new( items.iter().copied() )
    }

    #[test]
    fn test_pattern_is_a_set() {
	let p = pattern( &[ 5, 1, 3, 1 ] );
	assert_eq!( p.items(), &[ 1, 3, 5 ] );
	assert!( p.contains( 3 ));
	assert!( !p.contains( 2 ));
    }

    #[test]
    fn test_output_order() {
	let mut patterns = vec!( pattern( &[ 1, 2 ] ), pattern( &[ 3 ] ), pattern( &[ 1, 10 ] ), pattern( &[ 2 ] ), pattern( &[ 1, 2, 3 ] ));
	patterns.sort();
	let expected = vec!( pattern( &[ 2 ] ), pattern( &[ 3 ] ), pattern( &[ 1, 2 ] ), pattern( &[ 1, 10 ] ), pattern( &[ 1, 2, 3 ] ));
	assert_eq!( patterns, expected );
    }

    #[test]
    fn test_retain_keeps_ties() {
	let mut set: FrequentPatternSet = vec!(
	    (pattern( &[ 1 ] ), 2),
	    (pattern( &[ 2 ] ), 1),
	    (pattern( &[ 1, 2 ] ), 3),
	).into_iter().collect();

	set.retain_frequent( 2.0 );
	assert_eq!( set.len(), 2 );
	assert_eq!( set.support( &pattern( &[ 1 ] )), Some( 2 ));
	assert!( !set.contains( &pattern( &[ 2 ] )));
    }

    #[test]
    fn test_merge_detects_collisions() {
	let mut left: FrequentPatternSet = vec!( (pattern( &[ 1 ] ), 2) ).into_iter().collect();
	let right: FrequentPatternSet = vec!( (pattern( &[ 2 ] ), 4) ).into_iter().collect();
	left.merge( right ).unwrap();
	assert_eq!( left.len(), 2 );

	let duplicate: FrequentPatternSet = vec!( (pattern( &[ 2 ] ), 4), (pattern( &[ 3 ] ), 1) ).into_iter().collect();
	match left.merge( duplicate ) {
	    Err( MiningError::PatternCollision{ pattern } ) => assert_eq!( pattern, vec!( 2 )),
	    other => panic!( "expected a collision, got {other:?}" ),
	}
	// nothing of the failed merge was published
	assert_eq!( left.len(), 2 );
    }
}

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Count, DataPair, Item};

/// An item together with its count on the current tree level.
///
/// Keys sort in canonical order: more frequent items first, ties broken by the smaller item.
#[derive( Debug, Clone, Copy, PartialEq, Eq, Hash )]
pub struct HeaderKey {
    pub item: Item,
    pub count: Count,
}

/// Occurrence counts of all items in a (possibly weighted) database.
#[derive( Debug, Clone, Default )]
pub struct FrequencyIndex {
    counts: FxHashMap<Item, Count>,
}

/// Items whose count meets the minimum support count.
#[derive( Debug, Clone, Default )]
pub struct FrequentItems {
    members: FxHashSet<Item>,
}

/// Total order over the items of one tree level.
#[derive( Debug, Clone, Default )]
pub struct CanonicalOrder {
    /// items in canonical order
    items: Vec<Item>,
    /// position of each item in `items`
    rank: FxHashMap<Item, usize>,
}

impl Ord for HeaderKey {
    fn cmp( &self, other: &Self ) -> Ordering {
	other.count.cmp( &self.count )
	    .then_with( || self.item.cmp( &other.item ))
    }
}

impl PartialOrd for HeaderKey {
    fn partial_cmp( &self, other: &Self ) -> Option<Ordering> {
	Some( self.cmp( other ))
    }
}

impl FrequencyIndex {

    /// Counts every item occurrence, each transaction contributing its weight.
    pub fn count <'a, D> ( database: D ) -> FrequencyIndex where
	D: IntoIterator<Item = &'a DataPair>,
    {
	let mut counts: FxHashMap<Item, Count> = FxHashMap::default();
	for (transaction, weight) in database {
	    for item in transaction {
		*counts.entry( *item ).or_insert( 0 ) += *weight;
	    }
	}
	FrequencyIndex{ counts }
    }

    /// Returns the count of the item, zero if it never occurred
    pub fn support( &self, item: Item ) -> Count {
	self.counts.get( &item ).copied().unwrap_or( 0 )
    }

    pub fn key( &self, item: Item ) -> HeaderKey {
	HeaderKey{ item, count: self.support( item ) }
    }

    /// Number of distinct items
    pub fn len( &self ) -> usize { self.counts.len() }

    pub fn is_empty( &self ) -> bool { self.counts.is_empty() }

    /// Selects the items with count >= `min_support_count`.
    /// The threshold is compared unrounded.
    pub fn frequent_items( &self, min_support_count: f64 ) -> FrequentItems {
	let members = self.counts.iter()
	    .filter( |(_, count)| **count as f64 >= min_support_count )
	    .map( |(item, _)| *item )
	    .collect();
	FrequentItems{ members }
    }

    /// Orders all counted items by descending count, then ascending item.
    pub fn canonical_order( &self ) -> CanonicalOrder {
	let mut keys: Vec<HeaderKey> = self.counts.iter()
	    .map( |(item, count)| HeaderKey{ item: *item, count: *count } )
	    .collect();
	keys.sort_unstable();
	CanonicalOrder::from_sorted( keys.into_iter().map( |key| key.item ))
    }
}

impl FrequentItems {

    pub fn contains( &self, item: Item ) -> bool {
	self.members.contains( &item )
    }

    pub fn len( &self ) -> usize { self.members.len() }

    pub fn is_empty( &self ) -> bool { self.members.is_empty() }

    /// Iterates in ascending item order
    pub fn iter( &self ) -> impl Iterator<Item = Item> {
	let mut items: Vec<Item> = self.members.iter().copied().collect();
	items.sort_unstable();
	items.into_iter()
    }
}

impl CanonicalOrder {

    fn from_sorted <I> ( items: I ) -> CanonicalOrder where I: Iterator<Item = Item> {
	let items: Vec<Item> = items.collect();
	// the index in the sorted sequence becomes the rank of the item
	let rank = items.iter().enumerate()
	    .map( |(index, item)| (*item, index) )
	    .collect();
	CanonicalOrder{ items, rank }
    }

    pub fn rank( &self, item: Item ) -> Option<usize> {
	self.rank.get( &item ).copied()
    }

    /// Compares two items. Items unknown to this order go last, ascending among themselves.
    pub fn compare( &self, left: Item, right: Item ) -> Ordering {
	match (self.rank( left ), self.rank( right )) {
	    (Some( l ), Some( r )) => l.cmp( &r ),
	    (Some( _ ), None) => Ordering::Less,
	    (None, Some( _ )) => Ordering::Greater,
	    (None, None) => left.cmp( &right ),
	}
    }

    /// Sorts the items in place, most frequent first
    pub fn sort( &self, items: &mut [Item] ) {
	items.sort_unstable_by( |left, right| self.compare( *left, *right ));
    }

    pub fn items( &self ) -> &[Item] { &self.items }

    pub fn len( &self ) -> usize { self.items.len() }

    pub fn is_empty( &self ) -> bool { self.items.is_empty() }
}

#[cfg(test)]
mod test {

    use super::*;

    fn textbook() -> Vec<DataPair> {
	vec!(
	    vec!( 1, 2, 5 ), vec!( 2, 4 ), vec!( 2, 3 ),
	    vec!( 1, 2, 4 ), vec!( 1, 3 ), vec!( 2, 3 ),
	    vec!( 1, 3 ), vec!( 1, 2, 3, 5 ), vec!( 1, 2, 3 ),
	).into_iter().map( |t| (t, 1) ).collect()
    }

    #[test]
    fn test_counts() {
	let index = FrequencyIndex::count( &textbook() );
	let expected = vec!( (1, 6), (2, 7), (3, 6), (4, 2), (5, 2), (6, 0) );
	for (item, count) in expected {
	    assert_eq!( index.support( item ), count, "item {item}" );
	}
	assert_eq!( index.len(), 5 );
    }

    #[test]
    fn test_weighted_counts() {
	let data = vec!( (vec!( 1, 2 ), 3), (vec!( 2 ), 2) );
	let index = FrequencyIndex::count( &data );
	assert_eq!( index.support( 1 ), 3 );
	assert_eq!( index.support( 2 ), 5 );
    }

    #[test]
    fn test_threshold_is_inclusive_and_unrounded() {
	let index = FrequencyIndex::count( &textbook() );

	// 0.22 * 9 = 1.98, so a count of 2 qualifies
	let frequent = index.frequent_items( 0.22 * 9.0 );
	assert_eq!( frequent.iter().collect::<Vec<Item>>(), vec!( 1, 2, 3, 4, 5 ));

	// exactly at the threshold is kept
	let frequent = index.frequent_items( 6.0 );
	assert_eq!( frequent.iter().collect::<Vec<Item>>(), vec!( 1, 2, 3 ));

	// 6.0001 is not rounded down
	let frequent = index.frequent_items( 6.0001 );
	assert_eq!( frequent.iter().collect::<Vec<Item>>(), vec!( 2 ));

	assert_eq!( index.frequent_items( 0.0 ).len(), 5 );
	assert!( index.frequent_items( 10.0 ).is_empty() );
    }

    #[test]
    fn test_large_item_identifiers() {
	let data = vec!( (vec!( 1, 3_000_000_000, usize::MAX ), 2), (vec!( usize::MAX ), 1) );
	let index = FrequencyIndex::count( &data );
	let frequent = index.frequent_items( 2.0 );

	assert!( frequent.contains( usize::MAX ));
	assert!( frequent.contains( 3_000_000_000 ));
	assert!( !frequent.contains( 2 ));
	assert_eq!( frequent.iter().collect::<Vec<Item>>(), vec!( 1, 3_000_000_000, usize::MAX ));
	assert_eq!( index.canonical_order().items()[ 0 ], usize::MAX );
    }

    #[test]
    fn test_canonical_order() {
	let index = FrequencyIndex::count( &textbook() );
	let order = index.canonical_order();

	// 2 is most frequent, 1 and 3 tie and 4 and 5 tie
	assert_eq!( order.items(), &[ 2, 1, 3, 4, 5 ] );
	assert_eq!( order.rank( 3 ), Some( 2 ));
	assert_eq!( order.rank( 9 ), None );

	let mut items = vec!( 9, 5, 3, 7, 2 );
	order.sort( &mut items );
	assert_eq!( items, vec!( 2, 3, 5, 7, 9 ));
    }

    #[test]
    fn test_header_key_order() {
	let mut keys = vec!(
	    HeaderKey{ item: 4, count: 2 },
	    HeaderKey{ item: 1, count: 6 },
	    HeaderKey{ item: 2, count: 7 },
	    HeaderKey{ item: 0, count: 2 },
	);
	keys.sort();
	let items: Vec<Item> = keys.iter().map( |key| key.item ).collect();
	assert_eq!( items, vec!( 2, 1, 0, 4 ));
    }
}

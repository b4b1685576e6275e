mod frequency;
mod prefix_tree;

pub use frequency::{CanonicalOrder, FrequencyIndex, FrequentItems, HeaderKey};
pub use prefix_tree::{Ancestry, Chain, Children, CrossLinks, HeaderTable, Node, NodeId, PrefixTree, ROOT};

pub type Item = usize;
pub type Count = u64;
/// Items in the order they were read or sorted into.
pub type Itemvec = Vec<Item>;
pub type Transaction = Itemvec;

/// Elements of a transactional database: a transaction and how often it occurs.
pub type DataPair = (Transaction, Count);

pub trait Database {

    /// Adds a transaction that occurs `weight` times
    fn add( &mut self, transaction: Transaction, weight: Count );

    /// Returns the support of all transactions containing all items in the query
    fn query_support( &self, query: &[Item] ) -> Count;
}

/// Stores transactions in the order they were read, each with a multiplicity.
///
/// Read data has multiplicity one. Conditional pattern bases collapse identical
/// paths into a single weighted entry, which counts as that many copies of it.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct TransactionDatabase {
    transactions: Vec<DataPair>,
}

impl Database for TransactionDatabase {

    fn add( &mut self, transaction: Transaction, weight: Count ) {
	// zero copies are no transaction at all
	if weight > 0 {
	    self.transactions.push( (transaction, weight) );
	}
    }

    fn query_support( &self, query: &[Item] ) -> Count {
	self.transactions.iter()
	    .filter( |(transaction, _)| query.iter().all( |item| transaction.contains( item )))
	    .map( |(_, weight)| *weight )
	    .sum()
    }
}

impl TransactionDatabase {

    pub fn new() -> TransactionDatabase {
	TransactionDatabase{ transactions: Vec::new() }
    }

    /// Adds a single occurrence of the transaction.
    pub fn push( &mut self, transaction: Transaction ) {
	self.add( transaction, 1 );
    }

    /// Number of stored entries, regardless of their weights
    pub fn len( &self ) -> usize { self.transactions.len() }

    pub fn is_empty( &self ) -> bool { self.transactions.is_empty() }

    /// Number of transactions the database stands for, i.e. the sum of all weights.
    pub fn total_weight( &self ) -> Count {
	self.transactions.iter().map( |(_, weight)| *weight ).sum()
    }

    pub fn iter( &self ) -> std::slice::Iter<'_, DataPair> {
	self.transactions.iter()
    }
}

impl FromIterator<Transaction> for TransactionDatabase {
    fn from_iter<I: IntoIterator<Item = Transaction>>( transactions: I ) -> Self {
	let mut database = TransactionDatabase::new();
	for transaction in transactions {
	    database.push( transaction );
	}
	database
    }
}

impl <'a> IntoIterator for &'a TransactionDatabase {
    type Item = &'a DataPair;
    type IntoIter = std::slice::Iter<'a, DataPair>;

    fn into_iter( self ) -> Self::IntoIter {
	self.transactions.iter()
    }
}

impl IntoIterator for TransactionDatabase {
    type Item = DataPair;
    type IntoIter = std::vec::IntoIter<DataPair>;

    fn into_iter( self ) -> Self::IntoIter {
	self.transactions.into_iter()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_weights() {
	let mut database = TransactionDatabase::new();
	database.push( vec!( 1, 2 ));
	database.add( vec!( 2, 3 ), 3 );
	database.add( vec!( 4 ), 0 ); // not stored

	assert_eq!( database.len(), 2 );
	assert_eq!( database.total_weight(), 4 );
    }

    #[test]
    fn test_query_support() {
	let database: TransactionDatabase = vec!(
	    vec!( 1, 2, 5 ),
	    vec!( 2, 4 ),
	    vec!( 1, 2, 4 ),
	).into_iter().collect();

	assert_eq!( database.query_support( &[] ), 3 );
	assert_eq!( database.query_support( &[ 2 ] ), 3 );
	assert_eq!( database.query_support( &[ 1, 2 ] ), 2 );
	assert_eq!( database.query_support( &[ 4, 2 ] ), 2 );
	// does not invent data points
	assert_eq!( database.query_support( &[ 1, 3 ] ), 0 );
    }
}

use tracing::*;

use crate::{Loggable, MiningError};

use super::{CanonicalOrder, Count, FrequencyIndex, FrequentItems, Item, Itemvec, TransactionDatabase};

mod header_table;

pub use header_table::{Chain, HeaderTable};

/// Index of a node in the tree's arena.
pub type NodeId = usize;

/// The root is always the first node of the arena.
pub const ROOT: NodeId = 0;

#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Node {
    /// None for the root only
    item: Option<Item>,
    count: Count,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    /// next node with the same item, in creation order
    cross_link: Option<NodeId>,
}

/// FP-tree stored as an arena of nodes.
///
/// Nodes are only ever appended, so a parent always has a smaller index than its children
/// and a clone of the arena keeps every index valid, including the ones in the header table.
#[derive( Debug, Clone )]
pub struct PrefixTree {
    nodes: Vec<Node>,
    header: HeaderTable,
    /// order used to sort transactions before insertion
    order: CanonicalOrder,
    min_support_count: f64,
}

/// Walks a cross-link chain and checks every link on the way.
pub struct CrossLinks<'a> {
    tree: &'a PrefixTree,
    item: Item,
    next: Option<NodeId>,
    visited: usize,
}

/// Walks from a node up to, but excluding, the root.
pub struct Ancestry<'a> {
    tree: &'a PrefixTree,
    next: Option<NodeId>,
}

/// Iterates over the children of a node, oldest first.
pub struct Children<'a> {
    tree: &'a PrefixTree,
    next: Option<NodeId>,
}

impl Node {
    fn root() -> Node {
	Node{
	    item: None,
	    count: 0,
	    parent: None,
	    first_child: None,
	    last_child: None,
	    next_sibling: None,
	    cross_link: None,
	}
    }

    fn new( item: Item, count: Count, parent: NodeId ) -> Node {
	Node{ item: Some( item ), count, parent: Some( parent ), ..Node::root() }
    }

    pub fn item( &self ) -> Option<Item> { self.item }
    pub fn count( &self ) -> Count { self.count }
}

impl PrefixTree {

    /// Builds the tree of a whole database. Item counts and order are taken from the database itself.
    pub fn from_database( database: &TransactionDatabase, min_support_count: f64 ) -> PrefixTree {
	let index = FrequencyIndex::count( database );
	let frequent = index.frequent_items( min_support_count );
	let order = index.canonical_order();
	PrefixTree::build( database, &frequent, &index, order, min_support_count )
    }

    /// Builds a conditional tree from a pattern base.
    /// Transactions are sorted by the parent's order, so the seed item stays at the bottom of every path.
    pub fn conditional( base: &TransactionDatabase, parent_order: &CanonicalOrder, min_support_count: f64 ) -> PrefixTree {
	let index = FrequencyIndex::count( base );
	let frequent = index.frequent_items( min_support_count );
	PrefixTree::build( base, &frequent, &index, parent_order.clone(), min_support_count )
    }

    /// Inserts every transaction after dropping infrequent items and sorting the rest by `order`.
    pub fn build( database: &TransactionDatabase, frequent: &FrequentItems, index: &FrequencyIndex,
		  order: CanonicalOrder, min_support_count: f64 ) -> PrefixTree
    {
	let header = HeaderTable::new( frequent.iter().map( |item| index.key( item )));
	let mut tree = PrefixTree{
	    nodes: vec!( Node::root() ),
	    header,
	    order,
	    min_support_count,
	};

	let mut buffer = Itemvec::new();
	for (transaction, weight) in database {
	    buffer.clear();
	    buffer.extend( transaction.iter().copied().filter( |item| frequent.contains( *item )));
	    tree.order.sort( &mut buffer );
	    tree.insert( &buffer, *weight );
	}
	trace!( "built tree with {} nodes over {} frequent items", tree.nodes.len() - 1, tree.header.len() );
	tree
    }

    /// Merges a sorted transaction into the tree.
    fn insert( &mut self, transaction: &[Item], weight: Count ) {
	let mut current = ROOT;
	for item in transaction {
	    current = match self.find_child( current, *item ) {
		Some( child ) => {
		    self.nodes[ child ].count += weight;
		    child
		},
		None => self.append_child( current, *item, weight ),
	    };
	}
    }

    fn find_child( &self, parent: NodeId, item: Item ) -> Option<NodeId> {
	self.children( parent ).find( |child| self.nodes[ *child ].item == Some( item ))
    }

    /// Adds a new rightmost child and splices it onto the tail of its item's chain.
    fn append_child( &mut self, parent: NodeId, item: Item, count: Count ) -> NodeId {
	let id = self.nodes.len();
	self.nodes.push( Node::new( item, count, parent ));

	match self.nodes[ parent ].last_child {
	    Some( sibling ) => self.nodes[ sibling ].next_sibling = Some( id ),
	    None => self.nodes[ parent ].first_child = Some( id ),
	}
	self.nodes[ parent ].last_child = Some( id );

	if let Some( previous ) = self.header.append( item, id ) {
	    self.nodes[ previous ].cross_link = Some( id );
	}
	id
    }

    /// Deep copy for a single mining call. Indices stay valid in the copy.
    pub fn snapshot( &self ) -> PrefixTree {
	self.clone()
    }

    pub fn node( &self, id: NodeId ) -> Option<&Node> {
	self.nodes.get( id )
    }

    /// Number of nodes without the root
    pub fn node_count( &self ) -> usize {
	self.nodes.len() - 1
    }

    pub fn is_empty( &self ) -> bool {
	self.nodes[ ROOT ].first_child.is_none()
    }

    pub fn children( &self, id: NodeId ) -> Children<'_> {
	let next = self.nodes.get( id ).and_then( |node| node.first_child );
	Children{ tree: self, next }
    }

    pub fn ancestry( &self, id: NodeId ) -> Ancestry<'_> {
	Ancestry{ tree: self, next: Some( id ) }
    }

    pub fn cross_links( &self, item: Item ) -> CrossLinks<'_> {
	let next = self.header.chain( item ).and_then( |chain| chain.head );
	CrossLinks{ tree: self, item, next, visited: 0 }
    }

    pub fn header( &self ) -> &HeaderTable { &self.header }

    pub fn order( &self ) -> &CanonicalOrder { &self.order }

    pub fn min_support_count( &self ) -> f64 { self.min_support_count }

    /// Frequent items in canonical order
    pub fn frequent_items( &self ) -> Itemvec {
	self.header.items().collect()
    }

    /// Number of transactions the tree was built from, not counting the ones without frequent items.
    pub fn total_count( &self ) -> Count {
	self.children( ROOT ).map( |child| self.nodes[ child ].count ).sum()
    }

    /// Sums the counts on the item's chain.
    pub fn support( &self, item: Item ) -> Result<Count, MiningError> {
	let mut support = 0;
	for node in self.cross_links( item ) {
	    support += self.nodes[ node? ].count;
	}
	Ok( support )
    }

    /// Returns the support of the itemset as stored in the tree.
    /// Items that are not frequent in this tree have support zero.
    pub fn query_support( &self, query: &[Item] ) -> Result<Count, MiningError> {
	if query.is_empty() {
	    return Ok( self.total_count() );
	}
	if query.iter().any( |item| !self.header.contains( *item )) {
	    return Ok( 0 );
	}

	// the last item in order is the deepest one, so everything else has to be above it
	let mut sorted = query.to_vec();
	self.order.sort( &mut sorted );
	sorted.dedup();
	let Some( (deepest, rest) ) = sorted.split_last() else {
	    return Ok( self.total_count() );
	};

	let mut support = 0;
	for node in self.cross_links( *deepest ) {
	    let node = node?;
	    let path: Itemvec = self.ancestry( node ).filter_map( |ancestor| ancestor.item ).collect();
	    if rest.iter().all( |item| path.contains( item )) {
		support += self.nodes[ node ].count;
	    }
	}
	Ok( support )
    }
}

impl Loggable for PrefixTree {
    fn log( &self, message: &str, level: Level ) {
	let rows: Vec<String> = self.header.iter()
	    .map( |(key, _)| {
		let length = self.cross_links( key.item ).count();
		format!( "{}:{} ({} nodes)", key.item, key.count, length )
	    }).collect();
	crate::log_at( level, &format!( "{message}: {} nodes, header [{}]", self.node_count(), rows.join( ", " )));
    }
}

impl <'a> Iterator for CrossLinks<'a> {
    type Item = Result<NodeId, MiningError>;

    fn next( &mut self ) -> Option<Self::Item> {
	let id = self.next?;
	self.visited += 1;

	let node = self.tree.nodes.get( id );
	// a chain cannot be longer than the arena, a longer one has a cycle
	let valid = self.visited < self.tree.nodes.len()
	    && node.map_or( false, |node| node.item == Some( self.item ));
	if !valid {
	    self.next = None;
	    return Some( Err( MiningError::BrokenCrossLink{ item: self.item, node: id } ));
	}

	self.next = node.and_then( |node| node.cross_link );
	Some( Ok( id ))
    }
}

impl <'a> Iterator for Ancestry<'a> {
    type Item = &'a Node;

    fn next( &mut self ) -> Option<Self::Item> {
	let node = self.tree.nodes.get( self.next? )?;
	// stop at the root
	node.item?;
	self.next = node.parent;
	Some( node )
    }
}

impl <'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next( &mut self ) -> Option<Self::Item> {
	let id = self.next?;
	self.next = self.tree.nodes.get( id ).and_then( |node| node.next_sibling );
	Some( id )
    }
}

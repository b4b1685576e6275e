use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::data::HeaderKey;

use super::{Item, NodeId};

/// Head and tail of one item's cross-link chain.
#[derive( Debug, Clone, Copy, Default, PartialEq, Eq )]
pub struct Chain {
    pub head: Option<NodeId>,
    pub tail: Option<NodeId>,
}

/// Maps every frequent item of a tree to the ends of its cross-link chain.
/// Iterates in canonical order.
#[derive( Debug, Clone, Default )]
pub struct HeaderTable {
    rows: BTreeMap<HeaderKey, Chain>,
    /// finds the row of an item without knowing its count
    keys: FxHashMap<Item, HeaderKey>,
}

impl HeaderTable {

    /// Creates a row with an empty chain for every key.
    pub fn new <I> ( keys: I ) -> HeaderTable where I: IntoIterator<Item = HeaderKey> {
	let mut table = HeaderTable::default();
	for key in keys {
	    table.keys.insert( key.item, key );
	    table.rows.insert( key, Chain::default() );
	}
	table
    }

    pub fn contains( &self, item: Item ) -> bool {
	self.keys.contains_key( &item )
    }

    pub fn key( &self, item: Item ) -> Option<HeaderKey> {
	self.keys.get( &item ).copied()
    }

    pub fn chain( &self, item: Item ) -> Option<Chain> {
	let key = self.keys.get( &item )?;
	self.rows.get( key ).copied()
    }

    /// Makes `node` the new tail of the item's chain.
    /// Returns the previous tail, which has to link to `node`.
    /// Pre: the item has a row
    pub fn append( &mut self, item: Item, node: NodeId ) -> Option<NodeId> {
	let key = self.keys.get( &item ).expect( "only frequent items enter the tree" );
	let chain = self.rows.get_mut( key ).expect( "every key has a row" );
	let previous = chain.tail;
	if chain.head.is_none() {
	    chain.head = Some( node );
	}
	chain.tail = Some( node );
	previous
    }

    /// Iterates over the rows in canonical order
    pub fn iter( &self ) -> impl Iterator<Item = (&HeaderKey, &Chain)> + '_ {
	self.rows.iter()
    }

    /// Iterates over the items in canonical order
    pub fn items( &self ) -> impl Iterator<Item = Item> + '_ {
	self.rows.keys().map( |key| key.item )
    }

    pub fn len( &self ) -> usize { self.rows.len() }

    pub fn is_empty( &self ) -> bool { self.rows.is_empty() }
}

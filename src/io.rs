use std::path::Path;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use tracing::*;

use crate::*;
use crate::pattern::SupportFormatter;

/// Converts a structure into a string
pub trait PrettyFormatter<T> {
    fn format_pretty( &self, object: &T ) -> String;
}

/// Reads a transaction file: one transaction per line, items separated by non-digit characters.
pub fn read_transactions<P: AsRef<Path>>( path: P ) -> Result<TransactionDatabase, MiningError> {
    let path = path.as_ref();
    let text = fs::read_to_string( path ).map_err( |err| MiningError::io( path, err ))?;
    let database = parse_transactions( &text )?;
    info!( "read {} transactions from {}", database.len(), path.display() );
    Ok( database )
}

/// Parses every line into a transaction.
/// The empty line behind the final line break is not a transaction, other empty lines are.
pub fn parse_transactions( text: &str ) -> Result<TransactionDatabase, MiningError> {
    let mut lines: Vec<&str> = text.split( '\n' ).collect();
    if lines.last().map_or( false, |line| line.is_empty() ) {
	lines.pop();
    }

    let mut database = TransactionDatabase::new();
    for (index, line) in lines.into_iter().enumerate() {
	database.push( parse_fimi_line( line, index + 1 )? );
    }
    Ok( database )
}

/// Parses the digit runs of a line into items.
///
/// Every non-digit character separates items, with one exception: a `-` that starts an item,
/// i.e. stands at the line start or behind another separator and is followed by a digit,
/// makes the item negative and is rejected. `1-2` are two items, `1 -2` is an error.
pub fn parse_fimi_line( line: &str, line_number: usize ) -> Result<Transaction, MiningError> {
    let bytes = line.as_bytes();
    let digits_from = |mut position: usize| {
	while position < bytes.len() && bytes[ position ].is_ascii_digit() {
	    position += 1;
	}
	position
    };
    let parse_error = |token: &str| MiningError::Parse{ line: line_number, token: token.to_string() };

    let mut items = Transaction::new();
    let mut position = 0;
    while position < bytes.len() {
	if bytes[ position ].is_ascii_digit() {
	    let end = digits_from( position );
	    let token = &line[ position..end ];
	    items.push( token.parse::<Item>().map_err( |_| parse_error( token ))? );
	    position = end;
	    continue;
	}
	let starts_item = position == 0 || !bytes[ position - 1 ].is_ascii_digit();
	let signed = bytes[ position ] == b'-' && starts_item
	    && bytes.get( position + 1 ).map_or( false, u8::is_ascii_digit );
	if signed {
	    return Err( parse_error( &line[ position..digits_from( position + 1 ) ] ));
	}
	position += 1;
    }
    Ok( items )
}

/// Joins the items with the separator
pub fn join_items<I: Iterator<Item = Item>>( items: I, separator: &str ) -> String {
    let mut fimi = String::new();
    for (position, item) in items.enumerate() {
	if position > 0 {
	    fimi.push_str( separator );
	}
	fimi.push_str( item.to_string().as_str() );
    }
    fimi
}

/// Writes one line per pattern with its support fraction
pub fn write_patterns<P: AsRef<Path>>( patterns: &FrequentPatternSet, total_transactions: Count, path: P ) -> Result<(), MiningError> {
    let path = path.as_ref();
    let output = SupportFormatter::new( total_transactions ).format_pretty( patterns );
    let file = File::create( path ).map_err( |err| MiningError::io( path, err ))?;
    let mut writer = BufWriter::new( file );
    writer.write_all( output.as_bytes() )
	.and_then( |_| writer.flush() )
	.map_err( |err| MiningError::io( path, err ))?;
    info!( "wrote {} patterns to {}", patterns.len(), path.display() );
    Ok( () )
}

/// Writes the patterns as a json array
pub fn write_report<P: AsRef<Path>>( patterns: &FrequentPatternSet, total_transactions: Count, path: P ) -> Result<(), MiningError> {
    let path = path.as_ref();
    let records = SupportFormatter::new( total_transactions ).records( patterns );
    let file = File::create( path ).map_err( |err| MiningError::io( path, err ))?;
    let mut writer = BufWriter::new( file );
    serde_json::to_writer_pretty( &mut writer, &records )?;
    writer.flush().map_err( |err| MiningError::io( path, err ))?;
    Ok( () )
}

use serde::Serialize;

use crate::*;
use crate::io::{PrettyFormatter, join_items};

use super::{FrequentPatternSet, Pattern};

/// Formats patterns as `1,2,3:0.4444` lines, support given as a fraction of all transactions.
pub struct SupportFormatter {
    total_transactions: Count,
}

/// One pattern of the json report.
#[derive( Debug, Clone, PartialEq, Serialize )]
pub struct PatternRecord {
    pub items: Itemvec,
    pub support: Count,
    pub fraction: f64,
}

impl PrettyFormatter<FrequentPatternSet> for SupportFormatter {

    fn format_pretty( &self, patterns: &FrequentPatternSet ) -> String {
	patterns.sorted().into_iter()
	    .map( |(pattern, support)| self.format_line( pattern, support ))
	    .fold( String::new(), join_lines )
    }
}

impl SupportFormatter {
    pub fn new( total_transactions: Count ) -> SupportFormatter {
	SupportFormatter{ total_transactions }
    }

    pub fn fraction( &self, support: Count ) -> f64 {
	if self.total_transactions == 0 {
	    return 0.0;
	}
	support as f64 / self.total_transactions as f64
    }

    pub fn format_line( &self, pattern: &Pattern, support: Count ) -> String {
	format!( "{}:{:.4}", join_items( pattern.items().iter().copied(), "," ), self.fraction( support ))
    }

    /// Lists the patterns in output order for serialization.
    pub fn records( &self, patterns: &FrequentPatternSet ) -> Vec<PatternRecord> {
	patterns.sorted().into_iter()
	    .map( |(pattern, support)| PatternRecord{
		items: pattern.items().to_vec(),
		support,
		fraction: self.fraction( support ),
	    }).collect()
    }
}

fn join_lines( mut accumulator: String, addition: String ) -> String {
    accumulator.push_str( addition.as_str() );
    accumulator.push( '\n' );
    accumulator
}

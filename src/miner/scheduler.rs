use rayon::prelude::*;
use tracing::*;

use crate::*;
use crate::data::PrefixTree;

/// Mines all frequent items of a tree on a fixed number of workers.
///
/// Worker `i` of `n` takes the items at positions `i, i + n, i + 2n, ...` in canonical order.
/// Every item is mined on its own snapshot of the tree. Workers return their patterns,
/// which are merged after all of them finished.
pub struct MiningScheduler<M> {
    miner: M,
    workers: usize,
}

impl <M: Miner + Sync> MiningScheduler<M> {

    pub fn new( miner: M, workers: usize ) -> MiningScheduler<M> {
	MiningScheduler{ miner, workers }
    }

    pub fn mine_all( &self, tree: &PrefixTree ) -> Result<FrequentPatternSet, MiningError> {
	if self.workers == 0 {
	    return Err( MiningError::InvalidConfig( "at least one worker is needed".to_string() ));
	}
	let items = tree.frequent_items();
	info!( "mining {} frequent items on {} workers", items.len(), self.workers );

	let pool = rayon::ThreadPoolBuilder::new()
	    .num_threads( self.workers )
	    .thread_name( |index| format!( "miner-{index}" ))
	    .build()
	    .map_err( |err| MiningError::ThreadPool( err.to_string() ))?;

	let partials: Vec<FrequentPatternSet> = pool.install( || {
	    (0 .. self.workers).into_par_iter()
		.map( |worker| self.mine_stride( tree, &items, worker ))
		.collect::<Result<Vec<FrequentPatternSet>, MiningError>>()
	})?;

	let mut patterns = FrequentPatternSet::new();
	for partial in partials {
	    patterns.merge( partial )?;
	}
	Ok( patterns )
    }

    /// Mines the items of one worker one after the other.
    fn mine_stride( &self, tree: &PrefixTree, items: &[Item], worker: usize ) -> Result<FrequentPatternSet, MiningError> {
	let span = debug_span!( "worker", index = worker );
	let _entered = span.enter();

	let mut patterns = FrequentPatternSet::new();
	for seed in items.iter().skip( worker ).step_by( self.workers ) {
	    let found = self.miner.mine( tree.snapshot(), *seed )?;
	    debug!( "item {seed}: {} patterns", found.len() );
	    patterns.merge( found )?;
	}
	Ok( patterns )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    /// Reports the same pattern for every seed.
    struct ConstantMiner;

    impl Miner for ConstantMiner {
	fn mine( &self, _snapshot: PrefixTree, _seed: Item ) -> Result<FrequentPatternSet, MiningError> {
	    Ok( vec!( (Pattern::new( vec!( 0 )), 1) ).into_iter().collect() )
	}
    }

    /// Fails on one item.
    struct FailingMiner {
	poisoned: Item,
    }

    impl Miner for FailingMiner {
	fn mine( &self, snapshot: PrefixTree, seed: Item ) -> Result<FrequentPatternSet, MiningError> {
	    if seed == self.poisoned {
		return Err( MiningError::BrokenCrossLink{ item: seed, node: 0 } );
	    }
	    FpGrowthMiner.mine( snapshot, seed )
	}
    }

    fn random_tree( seed: u64, min_support_count: f64 ) -> PrefixTree {
	let mut rng = StdRng::seed_from_u64( seed );
	let database: TransactionDatabase = (0 .. 200).map( |_| {
	    (0 .. 15).filter( |_| rng.gen_bool( 0.35 )).collect::<Transaction>()
	}).collect();
	PrefixTree::from_database( &database, min_support_count )
    }

    #[test]
    fn test_worker_count_does_not_matter() {
	let tree = random_tree( 3, 12.0 );
	let sequential = MiningScheduler::new( FpGrowthMiner, 1 ).mine_all( &tree ).unwrap();
	assert!( sequential.len() > 15 );
	for workers in vec!( 2, 3, 8, 32 ) {
	    let parallel = MiningScheduler::new( FpGrowthMiner, workers ).mine_all( &tree ).unwrap();
	    assert_eq!( parallel, sequential, "{workers} workers" );
	}
    }

    #[test]
    fn test_mining_leaves_tree_untouched() {
	let tree = random_tree( 5, 20.0 );
	let supports: Vec<Count> = tree.frequent_items().iter().map( |item| tree.support( *item ).unwrap() ).collect();
	let node_count = tree.node_count();

	let first = MiningScheduler::new( FpGrowthMiner, 4 ).mine_all( &tree ).unwrap();
	let again: Vec<Count> = tree.frequent_items().iter().map( |item| tree.support( *item ).unwrap() ).collect();
	assert_eq!( supports, again );
	assert_eq!( node_count, tree.node_count() );

	// mining one item alone gives the same as within the whole run
	for seed in tree.frequent_items() {
	    let alone = FpGrowthMiner.mine( tree.snapshot(), seed ).unwrap();
	    for (pattern, support) in alone.iter() {
		assert_eq!( first.support( pattern ), Some( support ));
	    }
	}
    }

    #[test]
    fn test_collision_fails_the_run() {
	let tree = random_tree( 1, 30.0 );
	assert!( tree.frequent_items().len() > 1 );
	// within one worker
	let result = MiningScheduler::new( ConstantMiner, 1 ).mine_all( &tree );
	assert!( matches!( result, Err( MiningError::PatternCollision{ .. } )));
	// across workers
	let workers = tree.frequent_items().len();
	let result = MiningScheduler::new( ConstantMiner, workers ).mine_all( &tree );
	assert!( matches!( result, Err( MiningError::PatternCollision{ .. } )));
    }

    #[test]
    fn test_worker_error_reaches_caller() {
	let tree = random_tree( 2, 30.0 );
	let poisoned = *tree.frequent_items().last().unwrap();
	let result = MiningScheduler::new( FailingMiner{ poisoned }, 4 ).mine_all( &tree );
	match result {
	    Err( MiningError::BrokenCrossLink{ item, .. } ) => assert_eq!( item, poisoned ),
	    other => panic!( "expected the worker error, got {other:?}" ),
	}
    }

    #[test]
    fn test_empty_tree() {
	let tree = PrefixTree::from_database( &TransactionDatabase::new(), 0.0 );
	let patterns = MiningScheduler::new( FpGrowthMiner, 8 ).mine_all( &tree ).unwrap();
	assert!( patterns.is_empty() );
	assert!( MiningScheduler::new( FpGrowthMiner, 0 ).mine_all( &tree ).is_err() );
    }
}

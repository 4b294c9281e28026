//! Driving several independent simulations at once
//!
//! Forks share no mutable state, so each branch can be ticked on its own
//! thread. With the `parallel` feature the branches run on the rayon pool;
//! without it they run one after another.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

use crate::error::Result;
use crate::simulation::Simulation;

/// Run every branch until `predicate` holds for it, returning the tick count
/// of each branch in input order. The first failing branch's error wins.
pub fn run_branches<B, P>(branches: &mut [B], predicate: P) -> Result<Vec<u64>>
where
    B: AsMut<Simulation> + Send,
    P: Fn(&Simulation, u64) -> bool + Sync,
{
    #[cfg(feature = "parallel")]
    let iter = branches.par_iter_mut();
    #[cfg(not(feature = "parallel"))]
    let iter = branches.iter_mut();

    iter.map(|branch| branch.as_mut().run_until(|sim, i| predicate(sim, i)))
        .collect()
}

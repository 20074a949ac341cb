use crate::grid::Grid;
use crate::types::{AdjacencyModel, Symbol};
use log::debug;
use rayon::prelude::*;

/// Trains an adjacency model from a corpus of example grids.
///
/// Each grid is observed independently and the partial models are summed.
/// Summation is order-independent, so the same corpus always yields the same
/// model regardless of how the work is split across threads.
pub fn train_model<S: Symbol>(corpus: &[Grid<S>]) -> AdjacencyModel<S> {
    let model = corpus
        .par_iter()
        .map(|grid| {
            let mut partial = AdjacencyModel::empty();
            partial.observe(grid);
            partial
        })
        .reduce(AdjacencyModel::empty, |mut acc, partial| {
            acc.merge(&partial);
            acc
        });
    debug!(
        "Trained adjacency model over {} symbols from {} example grids ({} observations).",
        model.num_symbols(),
        corpus.len(),
        model.total_count()
    );
    model
}

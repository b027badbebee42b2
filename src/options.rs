/// A simple struct for specifying options for a steenroder computation.
///
/// * `degree` - the cohomology degree `d` that Sq^k acts on.
/// * `k` - the Steenrod index `k`.
/// * `keep_representatives` - if true, cohomology and Steenrod representatives
///   are retained on [`Bars`](crate::bars::Bars) after death computation instead
///   of being cleared once a bar is paired "born dead".
/// * `num_threads` - number of threads to use in the thread pool; ignored by
///   the serial reducer. See [`num_threads`](rayon::ThreadPoolBuilder::num_threads).
///   Only relevant for the parallel reducer.
/// * `min_chunk_len` - when splitting work within a dimension block, don't
///   split chunks smaller than this size. Only relevant for the parallel reducer.
/// * `clearing` - whether to employ the clearing optimisation during twist
///   reduction (clear the column at a just-matched pivot row).
/// * `parallel` - use the lock-free parallel reducer
///   ([`crate::parallel::reduce_parallel`]) instead of the serial
///   [`crate::reduce::reduce_twist`]/[`crate::reduce::reduce_standard`].
#[derive(Clone, Copy, Debug)]
pub struct SteenroderOptions {
    pub degree: usize,
    pub k: usize,
    pub keep_representatives: bool,
    pub num_threads: usize,
    pub min_chunk_len: usize,
    pub clearing: bool,
    pub parallel: bool,
}

impl Default for SteenroderOptions {
    fn default() -> Self {
        Self {
            degree: 1,
            k: 1,
            keep_representatives: false,
            num_threads: 0,
            min_chunk_len: 1,
            clearing: true,
            parallel: false,
        }
    }
}

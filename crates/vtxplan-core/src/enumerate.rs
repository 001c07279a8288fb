//! Exhaustive search for non-overlapping channel sets.
//!
//! Depth-first backtracking over the sorted candidate list. At each level
//! every remaining candidate that clears the overlap rule against the
//! partial set is tried in turn, and the search continues only over the
//! candidates after it. Each subset is therefore produced once, with its
//! members in ascending candidate order.
//!
//! Cost is exponential in the candidate count; only the overlap rule prunes.
//! That is acceptable for the 5.8 GHz tables (a few dozen candidates) but
//! not for arbitrary catalogs.

use crate::candidates::OverlapFilter;
use crate::{Combination, Mhz};

/// Every `needed`-sized subset of `candidates` with no two members
/// overlapping, in depth-first, lowest-index-first order.
///
/// Returns an empty list when no such subset exists.
pub fn enumerate_combinations(
    candidates: &[Mhz],
    needed: usize,
    filter: &OverlapFilter,
) -> Vec<Combination> {
    let mut out = Vec::new();
    extend(candidates, needed, Vec::with_capacity(needed), filter, &mut out);
    out
}

fn extend(
    remaining: &[Mhz],
    needed: usize,
    current: Combination,
    filter: &OverlapFilter,
    out: &mut Vec<Combination>,
) {
    if needed == 0 {
        out.push(current);
        return;
    }
    if remaining.len() < needed {
        return;
    }

    for (i, &freq) in remaining.iter().enumerate() {
        if current.iter().any(|&chosen| filter.overlaps(freq, chosen)) {
            continue;
        }
        let mut next = current.clone();
        next.push(freq);
        extend(&remaining[i + 1..], needed - 1, next, filter, out);
    }
}

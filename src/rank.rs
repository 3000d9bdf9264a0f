//! Report ordering.

use crate::schema::AggregateStat;
use crate::OrderPolicy;

/// Return `stats` in report order without touching the input.
///
/// `FastestToSlowest` is a stable sort on mean time, so equal means keep the
/// order they were declared in regardless of how `stats` is arranged.
pub fn rank(stats: &[AggregateStat], policy: OrderPolicy) -> Vec<AggregateStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by_key(|s| s.declared_index);
    if policy == OrderPolicy::FastestToSlowest {
        ranked.sort_by(|a, b| a.mean_ns.total_cmp(&b.mean_ns));
    }
    ranked
}

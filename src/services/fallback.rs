//! Relaxing an unsatisfiable selection
//!
//! When no title matches every selected criterion, each pair of the selected
//! criteria is tried on its own. Pairs are visited in key order
//! (decade, country, genre), so the three possible pairs come out as
//! decade+country, decade+genre, country+genre.

use crate::models::{Criteria, Criterion, FallbackResult, SearchOutcome};

use super::{aggregate::top_platform_and_examples, dataset::Catalog, filter::filter_titles};

/// Every 2-element subset of the set criteria, in key order
pub fn criterion_pairs(criteria: &Criteria) -> Vec<[Criterion; 2]> {
    let selected = criteria.selected();
    let mut pairs = Vec::new();
    for (i, first) in selected.iter().enumerate() {
        for second in &selected[i + 1..] {
            pairs.push([*first, *second]);
        }
    }
    pairs
}

/// Human-readable name of a pair, e.g. `decade + genre (2010, drama)`
pub fn pair_label(criteria: &Criteria, pair: [Criterion; 2]) -> String {
    let criteria = criteria.clone().normalized();
    let names: Vec<&str> = pair.iter().map(Criterion::name).collect();
    let values: Vec<String> = pair
        .iter()
        .map(|criterion| criteria.value_of(*criterion).unwrap_or_default())
        .collect();
    format!("{} ({})", names.join(" + "), values.join(", "))
}

/// Reruns filter and aggregation for each pair, keeping pairs that found a platform
///
/// Fewer than two set criteria means there is nothing to relax and the plan is empty.
pub fn plan_fallback(catalog: &Catalog, criteria: &Criteria, limit: usize) -> Vec<FallbackResult> {
    criterion_pairs(criteria)
        .into_iter()
        .filter_map(|pair| {
            let relaxed = criteria.restricted_to(&pair);
            let rows = filter_titles(catalog.records(), &relaxed);
            let summary = top_platform_and_examples(&rows, limit)?;

            tracing::debug!(
                first = %pair[0],
                second = %pair[1],
                platform = %summary.platform,
                count = summary.count,
                "Fallback pair matched"
            );

            Some(FallbackResult {
                label: pair_label(criteria, pair),
                criteria: pair,
                platform: summary.platform,
                examples: summary.examples,
                count: summary.count,
            })
        })
        .collect()
}

/// Resolves a selection: exact match first, then pairwise fallback
pub fn evaluate(catalog: &Catalog, criteria: &Criteria, limit: usize) -> SearchOutcome {
    let rows = filter_titles(catalog.records(), criteria);

    if let Some(summary) = top_platform_and_examples(&rows, limit) {
        tracing::debug!(platform = %summary.platform, count = summary.count, "Exact match");
        return SearchOutcome::Exact(summary);
    }

    let results = plan_fallback(catalog, criteria, limit);
    if results.is_empty() {
        tracing::debug!(selected = criteria.selected().len(), "No match, even pairwise");
        SearchOutcome::NoMatch
    } else {
        SearchOutcome::Fallback { results }
    }
}

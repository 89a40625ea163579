use serde::{Deserialize, Serialize};

use super::Criterion;

/// Most frequent platform within a filtered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSummary {
    pub platform: String,
    /// Display-safe titles carried by `platform`
    pub examples: Vec<String>,
    /// Rows in the whole filtered view, across every platform
    pub count: usize,
}

/// Result for one relaxed pair of criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackResult {
    /// e.g. `decade + genre (2010, drama)`
    pub label: String,
    pub criteria: [Criterion; 2],
    pub platform: String,
    pub examples: Vec<String>,
    pub count: usize,
}

/// What a selection resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Every selected criterion matched at least one title
    Exact(PlatformSummary),
    /// Nothing matched every criterion; these pairs did
    Fallback { results: Vec<FallbackResult> },
    /// Neither the full selection nor any pair matched
    NoMatch,
}

/// Distinct values available for each criterion, sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOptions {
    pub decades: Vec<i32>,
    pub countries: Vec<String>,
    pub genres: Vec<String>,
}

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{PlatformSummary, TitleRecord};

pub const DEFAULT_EXAMPLE_LIMIT: usize = 5;

/// Titles shown as examples: ASCII letters, digits and spaces only
static DISPLAYABLE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 ]+$").expect("valid title pattern"));

/// Most frequent platform in `rows` along with up to `limit` example titles
///
/// Count ties go to the platform met first in `rows`. Examples are distinct
/// titles of that platform in row order; titles with punctuation or non-ASCII
/// characters are skipped for display but still counted. Returns `None` for
/// an empty view.
pub fn top_platform_and_examples(rows: &[&TitleRecord], limit: usize) -> Option<PlatformSummary> {
    let platform = top_platform(rows)?;

    let mut examples: Vec<String> = Vec::new();
    for row in rows.iter().filter(|row| row.plateforme == platform) {
        if examples.len() == limit {
            break;
        }
        if DISPLAYABLE_TITLE.is_match(&row.title) && !examples.contains(&row.title) {
            examples.push(row.title.clone());
        }
    }

    Some(PlatformSummary {
        platform: platform.to_string(),
        examples,
        count: rows.len(),
    })
}

fn top_platform<'a>(rows: &[&'a TitleRecord]) -> Option<&'a str> {
    // platform -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, row) in rows.iter().copied().enumerate() {
        counts
            .entry(row.plateforme.as_str())
            .or_insert((0, position))
            .0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(platform, _)| platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, platform: &str) -> TitleRecord {
        TitleRecord::new(title, 2010, "fr", "drama", platform)
    }

    #[test]
    fn test_empty_view_has_no_platform() {
        assert_eq!(top_platform_and_examples(&[], DEFAULT_EXAMPLE_LIMIT), None);
    }

    #[test]
    fn test_picks_most_frequent_platform() {
        let records = vec![
            record("Alpha", "X"),
            record("Bravo", "Y"),
            record("Charlie", "Y"),
        ];
        let rows: Vec<&TitleRecord> = records.iter().collect();

        let summary = top_platform_and_examples(&rows, DEFAULT_EXAMPLE_LIMIT).unwrap();
        assert_eq!(summary.platform, "Y");
        assert_eq!(summary.examples, vec!["Bravo", "Charlie"]);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_ties_go_to_first_encountered() {
        let records = vec![
            record("Alpha", "Y"),
            record("Bravo", "X"),
            record("Charlie", "X"),
            record("Delta", "Y"),
        ];
        let rows: Vec<&TitleRecord> = records.iter().collect();
        let summary = top_platform_and_examples(&rows, DEFAULT_EXAMPLE_LIMIT).unwrap();
        assert_eq!(summary.platform, "Y");
    }

    #[test]
    fn test_examples_skip_undisplayable_and_duplicate_titles() {
        let records = vec![
            record("Amélie", "X"),
            record("Alpha", "X"),
            record("Star Wars: Episode IV", "X"),
            record("Alpha", "X"),
            record("Gamma 2", "X"),
            record("Other", "Y"),
        ];
        let rows: Vec<&TitleRecord> = records.iter().collect();

        let summary = top_platform_and_examples(&rows, DEFAULT_EXAMPLE_LIMIT).unwrap();
        assert_eq!(summary.platform, "X");
        assert_eq!(summary.examples, vec!["Alpha", "Gamma 2"]);
        assert_eq!(summary.count, 6);
    }

    #[test]
    fn test_examples_respect_limit() {
        let records: Vec<TitleRecord> = (0..10)
            .map(|i| record(&format!("Title {}", i), "X"))
            .collect();
        let rows: Vec<&TitleRecord> = records.iter().collect();

        let summary = top_platform_and_examples(&rows, 3).unwrap();
        assert_eq!(summary.examples, vec!["Title 0", "Title 1", "Title 2"]);

        let summary = top_platform_and_examples(&rows, DEFAULT_EXAMPLE_LIMIT).unwrap();
        assert_eq!(summary.examples.len(), DEFAULT_EXAMPLE_LIMIT);
    }

    #[test]
    fn test_examples_belong_to_top_platform() {
        let records = vec![
            record("Alpha", "X"),
            record("Bravo", "Y"),
            record("Charlie", "X"),
        ];
        let rows: Vec<&TitleRecord> = records.iter().collect();
        let summary = top_platform_and_examples(&rows, DEFAULT_EXAMPLE_LIMIT).unwrap();
        for example in &summary.examples {
            assert!(records
                .iter()
                .any(|r| &r.title == example && r.plateforme == summary.platform));
        }
    }
}

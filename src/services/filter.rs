use crate::models::{normalize_text, Criteria, TitleRecord};

/// Rows matching every set criterion
///
/// Country and genre are compared after trimming and lowercasing the query
/// value. Unset criteria impose no restriction, so empty criteria return the
/// whole table.
pub fn filter_titles<'a>(records: &'a [TitleRecord], criteria: &Criteria) -> Vec<&'a TitleRecord> {
    let country = criteria.country.as_deref().map(normalize_text);
    let genre = criteria.genre.as_deref().map(normalize_text);

    records
        .iter()
        .filter(|record| criteria.decade.map_or(true, |decade| record.decade == decade))
        .filter(|record| {
            country
                .as_deref()
                .map_or(true, |country| record.main_country == country)
        })
        .filter(|record| {
            genre
                .as_deref()
                .map_or(true, |genre| record.genre_hierarchie == genre)
        })
        .collect()
}

use serde::{Deserialize, Serialize};

/// One cleaned row of the titles dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleRecord {
    /// Name of the film or show, not unique across the dataset
    pub title: String,
    /// Release year after correction of out-of-range values
    pub year: i32,
    /// Ten-year bucket derived from `year`
    pub decade: i32,
    /// Lowercase, trimmed country
    pub main_country: String,
    /// Lowercase, trimmed genre category
    pub genre_hierarchie: String,
    /// Trimmed streaming platform name
    pub plateforme: String,
}

impl TitleRecord {
    pub fn new(
        title: impl Into<String>,
        year: i32,
        main_country: impl Into<String>,
        genre_hierarchie: impl Into<String>,
        plateforme: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year,
            decade: decade_of(year),
            main_country: main_country.into(),
            genre_hierarchie: genre_hierarchie.into(),
            plateforme: plateforme.into(),
        }
    }
}

/// Floor a year to the start of its decade
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Years above this are read as an extra digit slipped into the value
pub const MAX_PLAUSIBLE_YEAR: i32 = 3000;

/// Drop the stray trailing digit from implausible years
pub fn correct_year(year: i32) -> i32 {
    if year > MAX_PLAUSIBLE_YEAR {
        year / 10
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decade_of() {
        assert_eq!(decade_of(1999), 1990);
        assert_eq!(decade_of(2005), 2000);
        assert_eq!(decade_of(2010), 2010);
    }

    #[test]
    fn test_correct_year() {
        assert_eq!(correct_year(20203), 2020);
        assert_eq!(decade_of(correct_year(20203)), 2020);
        assert_eq!(correct_year(3000), 3000);
        assert_eq!(correct_year(1987), 1987);
    }

    #[test]
    fn test_new_derives_decade() {
        let record = TitleRecord::new("Alpha", 2013, "fr", "drama", "X");
        assert_eq!(record.decade, 2010);
    }
}

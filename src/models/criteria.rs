use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the three selection dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Decade,
    Country,
    Genre,
}

impl Criterion {
    /// Fixed key order used for display and pair enumeration
    pub const ALL: [Criterion; 3] = [Criterion::Decade, Criterion::Country, Criterion::Genre];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Decade => "decade",
            Criterion::Country => "country",
            Criterion::Genre => "genre",
        }
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single button press: a criterion together with the value picked for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "criterion", content = "value", rename_all = "lowercase")]
pub enum Choice {
    Decade(i32),
    Country(String),
    Genre(String),
}

impl Choice {
    pub fn criterion(&self) -> Criterion {
        match self {
            Choice::Decade(_) => Criterion::Decade,
            Choice::Country(_) => Criterion::Country,
            Choice::Genre(_) => Criterion::Genre,
        }
    }

    /// Brings text values to the form stored in the dataset
    pub fn normalized(self) -> Self {
        match self {
            Choice::Decade(decade) => Choice::Decade(decade),
            Choice::Country(country) => Choice::Country(normalize_text(&country)),
            Choice::Genre(genre) => Choice::Genre(normalize_text(&genre)),
        }
    }

    pub fn value_string(&self) -> String {
        match self {
            Choice::Decade(decade) => decade.to_string(),
            Choice::Country(value) | Choice::Genre(value) => value.clone(),
        }
    }
}

/// How many criteria are currently set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    NoCriteria,
    Partial,
    Full,
}

/// The selection triple; every field unset means no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub decade: Option<i32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl Criteria {
    pub fn new(decade: Option<i32>, country: Option<&str>, genre: Option<&str>) -> Self {
        Self {
            decade,
            country: country.map(str::to_string),
            genre: genre.map(str::to_string),
        }
    }

    /// Applies a button press. Picking the value already selected unsets it.
    pub fn toggle(self, choice: Choice) -> Self {
        match choice {
            Choice::Decade(decade) => Self {
                decade: flip(self.decade, decade),
                ..self
            },
            Choice::Country(country) => Self {
                country: flip(self.country, country),
                ..self
            },
            Choice::Genre(genre) => Self {
                genre: flip(self.genre, genre),
                ..self
            },
        }
    }

    /// Trims and lowercases text criteria; values left blank become unset
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|value| normalize_text(&value))
                .filter(|value| !value.is_empty())
        };
        Self {
            decade: self.decade,
            country: clean(self.country),
            genre: clean(self.genre),
        }
    }

    pub fn is_set(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Decade => self.decade.is_some(),
            Criterion::Country => self.country.is_some(),
            Criterion::Genre => self.genre.is_some(),
        }
    }

    /// Selected criteria in key order
    pub fn selected(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|criterion| self.is_set(*criterion))
            .collect()
    }

    /// Copy keeping only the listed criteria
    pub fn restricted_to(&self, keep: &[Criterion]) -> Self {
        Self {
            decade: self.decade.filter(|_| keep.contains(&Criterion::Decade)),
            country: self.country.clone().filter(|_| keep.contains(&Criterion::Country)),
            genre: self.genre.clone().filter(|_| keep.contains(&Criterion::Genre)),
        }
    }

    pub fn value_of(&self, criterion: Criterion) -> Option<String> {
        match criterion {
            Criterion::Decade => self.decade.map(|decade| decade.to_string()),
            Criterion::Country => self.country.clone(),
            Criterion::Genre => self.genre.clone(),
        }
    }

    pub fn stage(&self) -> SelectionStage {
        match self.selected().len() {
            0 => SelectionStage::NoCriteria,
            3 => SelectionStage::Full,
            _ => SelectionStage::Partial,
        }
    }
}

fn flip<T: PartialEq>(current: Option<T>, picked: T) -> Option<T> {
    match current {
        Some(value) if value == picked => None,
        _ => Some(picked),
    }
}

pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sets_then_unsets() {
        let criteria = Criteria::default().toggle(Choice::Decade(2010));
        assert_eq!(criteria.decade, Some(2010));

        let criteria = criteria.toggle(Choice::Decade(2010));
        assert_eq!(criteria.decade, None);
    }

    #[test]
    fn test_toggle_replaces_other_value() {
        let criteria = Criteria::default()
            .toggle(Choice::Country("fr".to_string()))
            .toggle(Choice::Country("de".to_string()));
        assert_eq!(criteria.country.as_deref(), Some("de"));
    }

    #[test]
    fn test_toggle_leaves_other_criteria() {
        let criteria = Criteria::new(Some(1990), Some("fr"), None).toggle(Choice::Genre("drama".into()));
        assert_eq!(criteria, Criteria::new(Some(1990), Some("fr"), Some("drama")));
    }

    #[test]
    fn test_stage() {
        assert_eq!(Criteria::default().stage(), SelectionStage::NoCriteria);
        assert_eq!(Criteria::new(Some(2000), None, None).stage(), SelectionStage::Partial);
        assert_eq!(Criteria::new(None, Some("fr"), Some("drama")).stage(), SelectionStage::Partial);
        assert_eq!(Criteria::new(Some(2000), Some("fr"), Some("drama")).stage(), SelectionStage::Full);
    }

    #[test]
    fn test_selected_keeps_key_order() {
        let criteria = Criteria::new(Some(2000), None, Some("drama"));
        assert_eq!(criteria.selected(), vec![Criterion::Decade, Criterion::Genre]);
    }

    #[test]
    fn test_restricted_to() {
        let criteria = Criteria::new(Some(2000), Some("fr"), Some("drama"));
        let pair = criteria.restricted_to(&[Criterion::Country, Criterion::Genre]);
        assert_eq!(pair, Criteria::new(None, Some("fr"), Some("drama")));
    }

    #[test]
    fn test_criteria_normalized() {
        let criteria = Criteria::new(Some(2010), Some("  FR "), Some("   ")).normalized();
        assert_eq!(criteria, Criteria::new(Some(2010), Some("fr"), None));
    }

    #[test]
    fn test_choice_normalized() {
        let choice = Choice::Country("  FR ".to_string()).normalized();
        assert_eq!(choice, Choice::Country("fr".to_string()));
    }

    #[test]
    fn test_choice_serialization() {
        let choice: Choice = serde_json::from_str(r#"{"criterion":"decade","value":2010}"#).unwrap();
        assert_eq!(choice, Choice::Decade(2010));

        let json = serde_json::to_string(&Choice::Genre("drama".to_string())).unwrap();
        assert_eq!(json, r#"{"criterion":"genre","value":"drama"}"#);
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Choice, Criteria};

/// One interactive user: a stable identifier plus the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub criteria: Criteria,
}

impl Session {
    /// Creates a session with a fresh identifier and nothing selected
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            criteria: Criteria::default(),
        }
    }

    pub fn select(self, choice: Choice) -> Self {
        Self {
            criteria: self.criteria.toggle(choice),
            ..self
        }
    }

    pub fn reset(self) -> Self {
        Self {
            criteria: Criteria::default(),
            ..self
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        assert_ne!(Session::new().id, Session::new().id);
    }

    #[test]
    fn test_select_and_reset_keep_id() {
        let session = Session::new();
        let id = session.id;

        let session = session
            .select(Choice::Decade(2010))
            .select(Choice::Genre("drama".to_string()));
        assert_eq!(session.id, id);
        assert_eq!(session.criteria.decade, Some(2010));
        assert_eq!(session.criteria.genre.as_deref(), Some("drama"));

        let session = session.reset();
        assert_eq!(session.id, id);
        assert_eq!(session.criteria, Criteria::default());
    }
}

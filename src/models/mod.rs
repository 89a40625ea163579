mod criteria;
mod outcome;
mod session;
mod title;

pub use criteria::{normalize_text, Choice, Criteria, Criterion, SelectionStage};
pub use outcome::{CatalogOptions, FallbackResult, PlatformSummary, SearchOutcome};
pub use session::Session;
pub use title::{correct_year, decade_of, TitleRecord, MAX_PLAUSIBLE_YEAR};

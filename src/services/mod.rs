pub mod action_log;
pub mod aggregate;
pub mod dataset;
pub mod fallback;
pub mod filter;

pub use action_log::ActionLog;
pub use aggregate::{top_platform_and_examples, DEFAULT_EXAMPLE_LIMIT};
pub use dataset::{parse_catalog, source_for, Catalog, DatasetCache, DatasetSource};
pub use fallback::{evaluate, plan_fallback};
pub use filter::filter_titles;

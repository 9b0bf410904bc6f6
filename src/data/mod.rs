//! Data module - CSV loading, catalog records and derived columns

pub mod deriver;
mod loader;
mod record;

pub use deriver::{CalendarParts, UNKNOWN_COUNTRY};
pub use loader::{load_dataset, DataLoader, Dataset, LoaderError, DEFAULT_CANDIDATE_PATHS};
pub use record::{Record, TitleType};

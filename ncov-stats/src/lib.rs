mod error;
mod parser;
mod structs;

#[cfg(feature = "serde")]
mod history;
#[cfg(feature = "ics")]
mod ics;
#[cfg(feature = "ics")]
mod timezone;

pub use error::RecordError;
pub use parser::{normalize, parse_latest};
pub use structs::{CanonicalRecord, Fields};

#[cfg(feature = "serde")]
pub use history::{load_history, save_history, HistoryError};
#[cfg(feature = "ics")]
pub use self::ics::{new_calendar, CALENDAR_NAME, DEFAULT_TIMEZONE, PRODUCT_ID, SERIES_START};
#[cfg(feature = "ics")]
pub use timezone::{vtimezone, TimezoneError};

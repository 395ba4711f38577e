pub mod clock;
pub mod error_response;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error_response::{error_response, error_response_with};
pub use extractor::{SafeClassIdI64, SafeIDI64, SafeOccurrenceIdI64, SafeSlotIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};

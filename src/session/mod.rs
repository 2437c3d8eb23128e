mod error;
mod model;
mod pairs;

pub use error::SessionError;
pub use model::{
    OutputFiles, SessionConfig, DEFAULT_LOG_FILE, DEFAULT_METHOD, DEFAULT_REPORT_FILE,
    DEFAULT_RESULTS_FILE, DEFAULT_TIMEOUT_SECS, SUPPORTED_METHODS,
};
pub use pairs::{parse_cookies, parse_headers, ParsedPairs};

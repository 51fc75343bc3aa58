use std::path::PathBuf;
use std::time::Duration;

use ncov_stats::{Fields, DEFAULT_TIMEZONE};

pub const DEFAULT_ENDPOINT: &str = "https://lab.isaaclin.cn/nCoV/api/overall";
pub const DEFAULT_OUTPUT: &str = "public/2019-n-Cov-ical.ics";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a run needs to know, resolved before the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub output: PathBuf,
    pub timezone: String,
    // None waits indefinitely
    pub timeout: Option<Duration>,
    pub fields: Fields,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            output: DEFAULT_OUTPUT.into(),
            timezone: DEFAULT_TIMEZONE.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            fields: Fields::default(),
        }
    }
}

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use log::warn;
use url::Url;

use super::{
    error::SessionError,
    pairs::{parse_cookies, parse_headers, ParsedPairs},
};

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RESULTS_FILE: &str = "ffuf_results.json";
pub const DEFAULT_LOG_FILE: &str = "ffuf_output.log";
pub const DEFAULT_REPORT_FILE: &str = "ffuf_summary_report.txt";
pub const SUPPORTED_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "HEAD", "PATCH", "OPTIONS",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub results: PathBuf,
    pub log: PathBuf,
    pub report: PathBuf,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            results: PathBuf::from(DEFAULT_RESULTS_FILE),
            log: PathBuf::from(DEFAULT_LOG_FILE),
            report: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

/// Everything the user has chosen for the next run.
///
/// Fields are only reachable through validating setters, so a value that
/// made it in has already been checked. A failed setter leaves the previous
/// value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    target_url: Option<String>,
    wordlist: Option<PathBuf>,
    method: String,
    extra_options: String,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    timeout_secs: u64,
    outputs: OutputFiles,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_url: None,
            wordlist: None,
            method: DEFAULT_METHOD.to_string(),
            extra_options: String::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            outputs: OutputFiles::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub fn wordlist(&self) -> Option<&Path> {
        self.wordlist.as_deref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn extra_options(&self) -> &str {
        &self.extra_options
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn outputs(&self) -> &OutputFiles {
        &self.outputs
    }

    pub fn set_target_url(&mut self, input: &str) -> Result<(), SessionError> {
        let value = input.trim();
        let invalid = |reason: &str| SessionError::InvalidUrl {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(invalid("must start with http:// or https://"));
        }
        let parsed = Url::parse(value).map_err(|err| invalid(&err.to_string()))?;
        if parsed.host_str().map(str::is_empty).unwrap_or(true) {
            return Err(invalid("missing host"));
        }

        self.target_url = Some(value.to_string());
        Ok(())
    }

    pub fn set_wordlist(&mut self, input: &str) -> Result<(), SessionError> {
        let value = input.trim();
        let path = PathBuf::from(value);
        let readable = !value.is_empty() && path.is_file() && File::open(&path).is_ok();
        if !readable {
            return Err(SessionError::UnreadableWordlist { path });
        }

        self.wordlist = Some(path);
        Ok(())
    }

    pub fn set_method(&mut self, input: &str) -> Result<(), SessionError> {
        let value = input.trim().to_ascii_uppercase();
        if value.is_empty() {
            self.method = DEFAULT_METHOD.to_string();
            return Ok(());
        }
        if !SUPPORTED_METHODS.contains(&value.as_str()) {
            return Err(SessionError::InvalidMethod(input.trim().to_string()));
        }

        self.method = value;
        Ok(())
    }

    pub fn set_extra_options(&mut self, input: &str) -> Result<(), SessionError> {
        let value = input.trim();
        shell_words::split(value).map_err(|err| SessionError::InvalidOptions(err.to_string()))?;

        self.extra_options = value.to_string();
        Ok(())
    }

    /// Replaces the header list. Returns the warnings for entries that were
    /// dropped along the way.
    pub fn set_headers(&mut self, input: &str) -> Result<Vec<String>, SessionError> {
        let parsed = accept_pairs("header", input, parse_headers(input))?;
        self.headers = parsed.pairs;
        Ok(parsed.warnings)
    }

    pub fn set_cookies(&mut self, input: &str) -> Result<Vec<String>, SessionError> {
        let parsed = accept_pairs("cookie", input, parse_cookies(input))?;
        self.cookies = parsed.pairs;
        Ok(parsed.warnings)
    }

    pub fn set_timeout(&mut self, input: &str) -> Result<(), SessionError> {
        let value = input.trim();
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => {
                self.timeout_secs = secs;
                Ok(())
            }
            _ => Err(SessionError::InvalidTimeout(value.to_string())),
        }
    }

    /// Sets all three artifact paths at once. Empty values fall back to the
    /// defaults; nothing is stored unless every path is acceptable.
    pub fn set_outputs(
        &mut self,
        results: &str,
        log: &str,
        report: &str,
    ) -> Result<(), SessionError> {
        let outputs = OutputFiles {
            results: output_path(results, DEFAULT_RESULTS_FILE)?,
            log: output_path(log, DEFAULT_LOG_FILE)?,
            report: output_path(report, DEFAULT_REPORT_FILE)?,
        };

        self.outputs = outputs;
        Ok(())
    }
}

fn accept_pairs(
    kind: &'static str,
    input: &str,
    parsed: ParsedPairs,
) -> Result<ParsedPairs, SessionError> {
    if parsed.pairs.is_empty() && !input.trim().is_empty() && !parsed.warnings.is_empty() {
        return Err(SessionError::MalformedPairs {
            kind,
            warnings: parsed.warnings,
        });
    }
    for warning in &parsed.warnings {
        warn!("{warning}");
    }
    Ok(parsed)
}

fn output_path(input: &str, default: &str) -> Result<PathBuf, SessionError> {
    let value = input.trim();
    let path = PathBuf::from(if value.is_empty() { default } else { value });
    if path.is_dir() {
        return Err(SessionError::InvalidOutputPath { path });
    }
    Ok(path)
}

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{CapturedLine, LineDetails, LineStatus};

static FFUF_STATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[Status:\s*(\d{3})").unwrap());
static HTTP_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"HTTP/[\d.]+\s+(\d{3})(?:\s+([^\r\n]*))?").unwrap());
static FFUF_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Size:\s*(\d+)").unwrap());
static FFUF_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Words:\s*(\d+)").unwrap());
static FFUF_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"Lines:\s*(\d+)").unwrap());
static FFUF_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Duration:\s*([0-9.]+[a-zµ]*)").unwrap());
static SUCCESS_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(found|success)\b").unwrap());
static ERROR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(error|failure|failed)\b").unwrap());

/// Classifies one line of fuzzer output.
///
/// A status code wins over keywords: 1xx-3xx is a success, 4xx-5xx an
/// error. Without a code the line falls back to `found`/`success` and
/// `error`/`failure`/`failed` keywords, in that order.
pub fn classify_line(line: &str) -> CapturedLine {
    let mut details = LineDetails::default();

    let status = if let Some(code) = status_code(line) {
        details.status_code = Some(code);
        details.status_message = HTTP_STATUS
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| reason_phrase(code).map(str::to_string));
        details.size = capture_number(&FFUF_SIZE, line);
        details.words = capture_number(&FFUF_WORDS, line);
        details.lines = capture_number(&FFUF_LINES, line);
        details.duration = FFUF_DURATION
            .captures(line)
            .map(|caps| caps[1].to_string());

        if code < 400 {
            LineStatus::Success
        } else {
            LineStatus::Error
        }
    } else if SUCCESS_WORD.is_match(line) {
        LineStatus::Success
    } else if ERROR_WORD.is_match(line) {
        LineStatus::Error
    } else {
        LineStatus::Unknown
    };

    CapturedLine {
        output: line.to_string(),
        status,
        details,
    }
}

fn status_code(line: &str) -> Option<u16> {
    FFUF_STATUS
        .captures(line)
        .or_else(|| HTTP_STATUS.captures(line))
        .and_then(|caps| caps[1].parse::<u16>().ok())
        .filter(|code| (100..600).contains(code))
}

fn capture_number(pattern: &Regex, line: &str) -> Option<u64> {
    pattern
        .captures(line)
        .and_then(|caps| caps[1].parse::<u64>().ok())
}

fn reason_phrase(code: u16) -> Option<&'static str> {
    let phrase = match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => return None,
    };
    Some(phrase)
}

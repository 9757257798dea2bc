// The Gutenberg module downloads the plain-text book and strips the
// Project Gutenberg boilerplate around it.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::TranslatorError;

pub const BOOK_URL: &str = "https://www.gutenberg.org/cache/epub/16317/pg16317.txt";
pub const BOOK_TITLE: &str = "The Art of Public Speaking";

const START_MARKER: &str = "START OF THE PROJECT GUTENBERG";
const END_MARKER: &str = "END OF THE PROJECT GUTENBERG";

pub async fn download_book(client: &Client, url: &str) -> Result<String, TranslatorError> {
    info!("Downloading book from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TranslatorError::network("downloading the book", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TranslatorError::BookUnavailable(status));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| TranslatorError::network("reading the book", e))?;

    let content = decode_book(&bytes);
    if content.trim().is_empty() {
        return Err(TranslatorError::EmptyBook);
    }

    info!("Downloaded book ({} characters)", content.chars().count());
    Ok(content)
}

// Gutenberg serves UTF-8 with a byte-order mark. Invalid sequences are replaced
// rather than rejected.
pub fn decode_book(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let text: &str = &decoded;
    text.strip_prefix('\u{feff}').unwrap_or(text).to_string()
}

/// Returns the book body without header, footer, blank lines and `***` separators.
/// Text without a start marker is taken from the first line.
pub fn clean_text(text: &str) -> Result<String, TranslatorError> {
    let has_start = text
        .lines()
        .any(|line| line.to_uppercase().contains(START_MARKER));
    if !has_start {
        warn!("No Project Gutenberg start marker found, keeping the whole text");
    }

    let mut started = !has_start;
    let mut cleaned = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        let upper = line.to_uppercase();

        if !started {
            if upper.contains(START_MARKER) {
                started = true;
            }
            continue;
        }

        if upper.contains(END_MARKER) {
            break;
        }

        if !line.is_empty() && !line.starts_with("***") {
            cleaned.push(line);
        }
    }

    let cleaned = cleaned.join("\n");
    if cleaned.is_empty() {
        return Err(TranslatorError::NoBookContent);
    }

    debug!("Cleaned text ({} characters)", cleaned.chars().count());
    Ok(cleaned)
}

fn title_regex() -> Option<&'static Regex> {
    static TITLE: OnceLock<Option<Regex>> = OnceLock::new();
    TITLE
        .get_or_init(|| Regex::new(r"(?m)^\s*Title:\s*(.+?)\s*$").ok())
        .as_ref()
}

/// Title from the Gutenberg header, if the download has one.
pub fn book_title(text: &str) -> String {
    title_regex()
        .and_then(|title| title.captures(text))
        .and_then(|captures| captures.get(1))
        .map(|title| title.as_str().to_string())
        .unwrap_or_else(|| BOOK_TITLE.to_string())
}

//! Keyword cleaning and output filename selection.
//!
//! Keywords arrive as a single comma-separated string. Each entry is cleaned
//! to characters that are safe both in a search query and in a filename:
//! alphanumerics, underscore, whitespace, and hyphen. Everything else is
//! stripped, internal whitespace is preserved, and the result is trimmed.
//! Entries that clean down to nothing are dropped entirely — they are never
//! searched and never counted in the final report.

/// How saved files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NamingScheme {
    /// `{keyword}_{n}` where `n` is the 1-based candidate rank that succeeded.
    Keyword,
    /// `{n}` where `n` is the 1-based position in the overall download order.
    Sequential,
}

/// Strip characters that are problematic in queries or filenames.
///
/// Keeps alphanumerics, `_`, whitespace, and `-`; trims the ends.
/// `"wild cat!! #2"` → `"wild cat 2"`.
pub fn clean_keyword(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '-')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split a comma-separated keyword list, clean each entry, drop empties.
pub fn parse_keyword_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(clean_keyword)
        .filter(|k| !k.is_empty())
        .collect()
}

/// Base filename (no extension) for one download attempt.
///
/// `candidate_index` is 0-based; `total_downloaded` counts images already
/// saved across the whole run.
pub fn base_filename(
    scheme: NamingScheme,
    keyword: &str,
    candidate_index: usize,
    total_downloaded: usize,
) -> String {
    match scheme {
        NamingScheme::Keyword => format!("{}_{}", keyword, candidate_index + 1),
        NamingScheme::Sequential => format!("{}", total_downloaded + 1),
    }
}

//! Field normalization for deduplication comparison
//!
//! Pure, total functions that turn noisy bibliographic field values into
//! canonical comparison forms. Malformed or absent input never fails; it
//! degrades to a placeholder/absent result.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref DOI_PREFIX_RE: Regex =
        Regex::new(r"(?i)^(https?://(dx\.)?doi\.org/|doi:)\s*").unwrap();
    static ref LATEX_CMD_RE: Regex =
        Regex::new(r"\\[a-zA-Z]+\*?(\[[^\]]*\])?(\{[^}]*\})?").unwrap();
}

/// Collapse runs of whitespace into a single space and trim the ends
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a DOI for comparison
///
/// Strips a leading resolver/scheme prefix (`https://doi.org/`,
/// `https://dx.doi.org/`, `doi:`, case-insensitive), trims whitespace and
/// trailing periods, and lowercases. DOIs differing only by scheme, case, or
/// trailing punctuation normalize identically.
pub fn normalize_doi(raw: &str) -> String {
    let value = normalize_whitespace(raw);
    let value = DOI_PREFIX_RE.replace(&value, "");
    value.trim().trim_end_matches('.').to_lowercase()
}

/// Heuristic removal of LaTeX markup; not a full parser.
///
/// Braces are dropped first, then a single regex pass removes one level of
/// `\command[opt]{arg}` sequences. Malformed or nested markup may survive
/// partially.
fn strip_latex(value: &str) -> String {
    let value = value.replace(['{', '}'], "");
    LATEX_CMD_RE.replace_all(&value, " ").into_owned()
}

/// Remove combining diacritical marks via NFKD decomposition
fn strip_diacritics(value: &str) -> String {
    value.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a title for comparison
///
/// Titles differing only by capitalization, accents, or LaTeX decoration
/// compare equal: whitespace collapsed, braces/markup stripped, diacritics
/// decomposed away, lowercased, and every run of non-alphanumeric characters
/// replaced by a single space.
pub fn normalize_title(raw: &str) -> String {
    let value = normalize_whitespace(raw);
    let value = strip_latex(&value);
    let value = strip_diacritics(&value).to_lowercase();
    let value: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    normalize_whitespace(&value)
}

/// Extract a four-digit publication year
///
/// Returns the `year` value if it is exactly four digits, else a leading
/// four-digit run from the `date` value, else `None`.
pub fn parse_year(year: Option<&str>, date: Option<&str>) -> Option<String> {
    let year = year.unwrap_or("").trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        return Some(year.to_string());
    }

    let date = date.unwrap_or("").trim();
    let leading: String = date.chars().take(4).collect();
    if leading.len() == 4 && leading.chars().all(|c| c.is_ascii_digit()) {
        return Some(leading);
    }
    None
}

/// Extract the first author's surname from a BibTeX author list
///
/// Takes the part before the first `" and "` separator; `"Last, First"`
/// yields the text before the comma, `"First Last"` the last whitespace
/// token. Diacritics and non-alphanumeric characters are removed and the
/// result lowercased. Returns `None` for an empty field or empty surname.
pub fn first_author_lastname(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let first = raw.split(" and ").next().unwrap_or("").trim();
    if first.is_empty() {
        return None;
    }

    let last = match first.find(',') {
        Some(pos) => first[..pos].trim(),
        None => first.split_whitespace().last().unwrap_or(""),
    };

    let last: String = strip_diacritics(last)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let last = last.to_lowercase();
    if last.is_empty() {
        None
    } else {
        Some(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n c  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_normalize_doi_strips_schemes() {
        assert_eq!(normalize_doi("10.1000/XYZ"), "10.1000/xyz");
        assert_eq!(normalize_doi("https://doi.org/10.1000/xyz"), "10.1000/xyz");
        assert_eq!(
            normalize_doi("HTTPS://DX.DOI.ORG/10.1000/xyz"),
            "10.1000/xyz"
        );
        assert_eq!(normalize_doi("doi:10.1000/xyz."), "10.1000/xyz");
        assert_eq!(normalize_doi("  doi: 10.1000/xyz  "), "10.1000/xyz");
    }

    #[test]
    fn test_normalize_title_case_and_braces() {
        assert_eq!(
            normalize_title("Deep {L}earning for Cats"),
            "deep learning for cats"
        );
        assert_eq!(
            normalize_title("Deep Learning for Cats"),
            "deep learning for cats"
        );
    }

    #[test]
    fn test_normalize_title_diacritics_and_punctuation() {
        assert_eq!(normalize_title("Études: Françaises!"), "etudes francaises");
        assert_eq!(normalize_title("Naïve   Bayes"), "naive bayes");
    }

    #[test]
    fn test_normalize_title_strips_latex_commands() {
        assert_eq!(normalize_title(r"The \emph Model"), "the model");
        assert_eq!(normalize_title(r"A \cite[p. 3] B"), "a b");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("2019"), None), Some("2019".to_string()));
        assert_eq!(parse_year(Some(" 2019 "), None), Some("2019".to_string()));
        assert_eq!(parse_year(Some("19"), None), None);
        assert_eq!(
            parse_year(Some("circa 2019"), Some("2020-01-01")),
            Some("2020".to_string())
        );
        assert_eq!(parse_year(None, Some("2021-05")), Some("2021".to_string()));
        assert_eq!(parse_year(None, Some("May 2021")), None);
        assert_eq!(parse_year(None, None), None);
    }

    #[test]
    fn test_first_author_lastname_formats() {
        assert_eq!(
            first_author_lastname(Some("Smith, John and Doe, Jane")),
            Some("smith".to_string())
        );
        assert_eq!(
            first_author_lastname(Some("John Smith and Jane Doe")),
            Some("smith".to_string())
        );
        assert_eq!(
            first_author_lastname(Some("Müller, F.")),
            Some("muller".to_string())
        );
        assert_eq!(first_author_lastname(Some("")), None);
        assert_eq!(first_author_lastname(None), None);
        assert_eq!(first_author_lastname(Some("  ,  ")), None);
    }
}

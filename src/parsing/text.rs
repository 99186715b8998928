//! Label normalization shared by the parsers and the classifier.
//!
//! Extracted labels arrive with stray whitespace, mixed case, Greek accents
//! and Latin letters standing in for Greek capitals.

/// Upper-cases a label, strips Greek accents and collapses whitespace.
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::normalize_label;
///
/// assert_eq!(normalize_label("  Ι.Κ.Α. -  ετάμ "), "Ι.Κ.Α. - ΕΤΑΜ");
/// assert_eq!(normalize_label("Ταμείο Μηχανικών"), "ΤΑΜΕΙΟ ΜΗΧΑΝΙΚΩΝ");
/// ```
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
        .chars()
        .map(strip_accent)
        .collect()
}

/// Normalizes a coverage category code.
///
/// Latin letters that look like Greek capitals are mapped to the Greek letter,
/// since extracted codes mix the two alphabets freely.
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::normalize_code;
///
/// // Latin "K" and Greek "Κ" are the same code.
/// assert_eq!(normalize_code("k"), normalize_code("Κ"));
/// assert_eq!(normalize_code(" ΚΣ "), "ΚΣ");
/// ```
pub fn normalize_code(code: &str) -> String {
    normalize_label(code)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(latin_to_greek)
        .collect()
}

fn strip_accent(c: char) -> char {
    match c {
        'Ά' => 'Α',
        'Έ' => 'Ε',
        'Ή' => 'Η',
        'Ί' | 'Ϊ' => 'Ι',
        'Ό' => 'Ο',
        'Ύ' | 'Ϋ' => 'Υ',
        'Ώ' => 'Ω',
        other => other,
    }
}

fn latin_to_greek(c: char) -> char {
    match c {
        'A' => 'Α',
        'B' => 'Β',
        'E' => 'Ε',
        'H' => 'Η',
        'I' => 'Ι',
        'K' => 'Κ',
        'M' => 'Μ',
        'N' => 'Ν',
        'O' => 'Ο',
        'P' => 'Ρ',
        'T' => 'Τ',
        'X' => 'Χ',
        'Y' => 'Υ',
        'Z' => 'Ζ',
        other => other,
    }
}

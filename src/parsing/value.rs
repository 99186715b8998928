//! Free-form numeric and currency value parsing.
//!
//! Extracted cells carry amounts such as `"1.234,56 €"`, `"(250,00)"`,
//! `"12.500 ΔΡΧ"` or `"-"`. This module turns them into signed decimals and
//! never fails: anything it cannot read is zero.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::text::normalize_label;

/// Markers of the superseded currency (drachma).
///
/// Longer markers come first so that a whole word is removed before its
/// abbreviation.
pub const LEGACY_CURRENCY_MARKERS: &[&str] =
    &["ΔΡΑΧΜΕΣ", "ΔΡΑΧΜΗ", "ΔΡΑΧ", "ΔΡΧ", "DRX", "DRS", "GRD"];

/// Markers of the current currency.
pub const CURRENT_CURRENCY_MARKERS: &[&str] = &["ΕΥΡΩ", "EURO", "EUR", "€"];

/// Largest magnitude accepted as an amount or quantity (10^15).
///
/// Longer digit runs are extraction noise and resolve to zero like any other
/// unparsable cell.
pub const MAX_AMOUNT_MAGNITUDE: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Minus-like characters that extraction may produce instead of `-`.
const MINUS_VARIANTS: &[char] = &['\u{2212}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{FE63}', '\u{FF0D}'];

/// Returns true if the value carries a legacy-currency marker.
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::has_legacy_currency;
///
/// assert!(has_legacy_currency("125.000 δρχ."));
/// assert!(!has_legacy_currency("1.250,00 €"));
/// ```
pub fn has_legacy_currency(input: &str) -> bool {
    let folded = normalize_label(input);
    LEGACY_CURRENCY_MARKERS.iter().any(|m| folded.contains(m))
}

/// Parses a free-form amount into a signed decimal.
///
/// Currency markers are stripped; a unicode minus, a trailing minus or
/// surrounding parentheses make the value negative. When both `,` and `.`
/// appear the right-most one is the decimal separator. When only one kind
/// appears, repeated occurrences are thousands separators, and a single
/// occurrence is a thousands separator when followed by exactly three digits
/// and a decimal separator otherwise.
///
/// Empty, placeholder and unparsable input all give zero, as do magnitudes
/// above [`MAX_AMOUNT_MAGNITUDE`].
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("1.234,56 €"), Decimal::new(123456, 2));
/// assert_eq!(parse_amount("1,234.56"), Decimal::new(123456, 2));
/// assert_eq!(parse_amount("1.500"), Decimal::from(1500));
/// assert_eq!(parse_amount("12,5"), Decimal::new(125, 1));
/// assert_eq!(parse_amount("(250,00)"), Decimal::from(-250));
/// assert_eq!(parse_amount("75-"), Decimal::from(-75));
/// assert_eq!(parse_amount("-"), Decimal::ZERO);
/// assert_eq!(parse_amount("n/a"), Decimal::ZERO);
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    parse_amount_with(input, false)
}

/// Parses an amount, optionally forcing zero for legacy-currency values.
///
/// With `exclude_legacy_currency` set, any value carrying a legacy-currency
/// marker resolves to zero so that it drops out of current-currency sums.
///
/// # Example
///
/// ```
/// use coverage_audit::parsing::parse_amount_with;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount_with("125.000 ΔΡΧ", false), Decimal::from(125000));
/// assert_eq!(parse_amount_with("125.000 ΔΡΧ", true), Decimal::ZERO);
/// assert_eq!(parse_amount_with("366,84 €", true), Decimal::new(36684, 2));
/// ```
pub fn parse_amount_with(input: &str, exclude_legacy_currency: bool) -> Decimal {
    let trimmed = input.trim();
    if is_placeholder(trimmed) {
        return Decimal::ZERO;
    }
    if exclude_legacy_currency && has_legacy_currency(trimmed) {
        return Decimal::ZERO;
    }

    let mut text = strip_currency_markers(trimmed);
    text.retain(|c| !c.is_whitespace());
    let text: String = text
        .chars()
        .map(|c| if MINUS_VARIANTS.contains(&c) { '-' } else { c })
        .collect();

    let (negative, digits) = split_sign(&text);
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = normalize_separators(digits);
    match Decimal::from_str(&normalized) {
        Ok(value) if value.abs() > MAX_AMOUNT_MAGNITUDE => Decimal::ZERO,
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Parses an optional quantity: `None` when the cell is empty or a placeholder.
///
/// Declared days/months/years distinguish "absent" from "zero".
pub fn parse_optional_amount(input: Option<&str>) -> Option<Decimal> {
    let input = input?.trim();
    if is_placeholder(input) {
        return None;
    }
    Some(parse_amount(input))
}

fn is_placeholder(input: &str) -> bool {
    input.is_empty() || matches!(input, "-" | "--" | "—" | "–" | "\u{2212}")
}

fn strip_currency_markers(input: &str) -> String {
    let mut text = normalize_label(input);
    for marker in LEGACY_CURRENCY_MARKERS
        .iter()
        .chain(CURRENT_CURRENCY_MARKERS.iter())
    {
        text = text.replace(marker, "");
    }
    // Abbreviation dots left behind by markers such as "δρχ."
    text.trim_end_matches('.').to_string()
}

/// Splits off the sign: leading or trailing minus, or surrounding parentheses.
fn split_sign(text: &str) -> (bool, &str) {
    let mut negative = false;
    let mut body = text;

    if body.starts_with('(') && body.ends_with(')') && body.len() >= 2 {
        negative = true;
        body = &body[1..body.len() - 1];
    }
    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest;
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix('-') {
        negative = true;
        body = rest;
    }

    (negative, body)
}

/// Rewrites thousands and decimal separators into plain `1234.56` form.
fn normalize_separators(digits: &str) -> String {
    let last_comma = digits.rfind(',');
    let last_dot = digits.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => {
            let (decimal, thousands) = if comma > dot { (',', '.') } else { ('.', ',') };
            digits
                .chars()
                .filter(|c| *c != thousands)
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
        (Some(_), None) => normalize_single_separator(digits, ','),
        (None, Some(_)) => normalize_single_separator(digits, '.'),
        (None, None) => digits.to_string(),
    }
}

fn normalize_single_separator(digits: &str, separator: char) -> String {
    let groups: Vec<&str> = digits.split(separator).collect();
    let is_thousands = match groups.as_slice() {
        [_, tail] => tail.len() == 3,
        _ => true,
    };

    if is_thousands {
        digits.chars().filter(|c| *c != separator).collect()
    } else {
        digits.replace(separator, ".")
    }
}

//! Plan-number classification.
//!
//! Plan numbers carry their issuing authority in a short Hebrew marker
//! (`תמא/` for national outline plans, `תמל/` for preferred-housing detailed
//! plans, and so on). Numbers issued through the online planning system start
//! with a digit; legacy local numbers start with a Hebrew letter.

use super::types::PlanCategory;

/// Marker rules, checked in order before the leading-character rules.
const MARKER_RULES: [(&str, PlanCategory); 4] = [
    ("תמא/", PlanCategory::National),
    ("תמל/", PlanCategory::DetailedLocal),
    ("תתל/", PlanCategory::Infrastructure),
    ("תממ/", PlanCategory::District),
];

/// Classify a plan identifier. Total: every input maps to exactly one
/// category, with [`PlanCategory::Unclassified`] as the fallback.
pub fn classify(identifier: &str) -> PlanCategory {
    if let Some((_, category)) = MARKER_RULES
        .iter()
        .find(|(marker, _)| identifier.contains(marker))
    {
        return *category;
    }

    match identifier.chars().next() {
        Some(c) if c.is_ascii_digit() => PlanCategory::Online,
        Some(c) if is_hebrew_letter(c) => PlanCategory::Offline,
        _ => PlanCategory::Unclassified,
    }
}

/// Hebrew alphabet block, alef through tav (final forms included).
fn is_hebrew_letter(c: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_marker() {
        assert_eq!(classify("תמא/35/א/8"), PlanCategory::National);
    }

    #[test]
    fn detailed_local_marker() {
        assert_eq!(classify("תמל/1024"), PlanCategory::DetailedLocal);
    }

    #[test]
    fn infrastructure_marker() {
        assert_eq!(classify("תתל/101"), PlanCategory::Infrastructure);
    }

    #[test]
    fn district_marker() {
        assert_eq!(classify("תממ/3/21"), PlanCategory::District);
    }

    #[test]
    fn leading_digit_is_online() {
        assert_eq!(classify("12345"), PlanCategory::Online);
        assert_eq!(classify("507-0271700"), PlanCategory::Online);
    }

    #[test]
    fn leading_hebrew_letter_is_offline() {
        assert_eq!(classify("מק/5000"), PlanCategory::Offline);
        assert_eq!(classify("תא/1234"), PlanCategory::Offline);
    }

    #[test]
    fn marker_anywhere_beats_leading_digit() {
        // Starts with a digit, but the national marker appears later.
        assert_eq!(classify("1 תמא/35"), PlanCategory::National);
        assert_eq!(classify("9תתל/7"), PlanCategory::Infrastructure);
    }

    #[test]
    fn earlier_marker_beats_later_marker() {
        assert_eq!(classify("תתל/1 תמא/2"), PlanCategory::National);
        assert_eq!(classify("תממ/1 תמל/2"), PlanCategory::DetailedLocal);
        assert_eq!(classify("תממ/1 תתל/2"), PlanCategory::Infrastructure);
    }

    #[test]
    fn marker_requires_slash() {
        // Bare prefix without the slash falls through to the letter rule.
        assert_eq!(classify("תמא35"), PlanCategory::Offline);
    }

    #[test]
    fn empty_and_symbol_only_inputs_are_unclassified() {
        assert_eq!(classify(""), PlanCategory::Unclassified);
        assert_eq!(classify("   "), PlanCategory::Unclassified);
        assert_eq!(classify("/-/"), PlanCategory::Unclassified);
        assert_eq!(classify("!!!"), PlanCategory::Unclassified);
    }

    #[test]
    fn latin_and_non_ascii_digits_are_unclassified() {
        assert_eq!(classify("TA/1234"), PlanCategory::Unclassified);
        // Arabic-Indic digit is not an ASCII decimal digit.
        assert_eq!(classify("\u{0661}23"), PlanCategory::Unclassified);
    }

    #[test]
    fn leading_whitespace_is_not_stripped() {
        assert_eq!(classify(" 12345"), PlanCategory::Unclassified);
    }
}

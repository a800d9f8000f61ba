//! Numerus form selection for `numerus="yes"` messages.
//!
//! Qt Linguist stores one `<numerusform>` per plural form of the target
//! language, in the order given by the language's plural rule.

use crate::types::LocaleCode;

/// Index of the numerus form to use for `count` in `locale`.
#[must_use]
pub fn numerus_form_index(locale: &LocaleCode, count: u64) -> usize {
    let n10 = count % 10;
    let n100 = count % 100;

    match locale.language().as_str() {
        // Single form
        "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "fa" | "ka" => 0,

        // 0 and 1 are singular
        "fr" | "pt" if locale.normalized() != "pt_pt" => usize::from(count > 1),

        // form 0: n%10==1 && n%100!=11
        // form 1: n%10 in 2..=4 && n%100 not in 10..20
        // form 2: everything else
        "ru" | "uk" | "be" | "sr" | "hr" | "bs" => {
            if n10 == 1 && n100 != 11 {
                0
            } else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
                1
            } else {
                2
            }
        }

        // form 0: n==1
        // form 1: n%10 in 2..=4 && n%100 not in 10..20
        // form 2: everything else
        "pl" => {
            if count == 1 {
                0
            } else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
                1
            } else {
                2
            }
        }

        "cs" | "sk" => {
            if count == 1 {
                0
            } else if (2..=4).contains(&count) {
                1
            } else {
                2
            }
        }

        // Germanic default: 1 is singular
        _ => usize::from(count != 1),
    }
}

/// Replaces every `%n` placeholder with `count`.
#[must_use]
pub fn substitute_count(text: &str, count: u64) -> String {
    text.replace("%n", &count.to_string())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(5, 2)]
    #[case(11, 2)]
    #[case(21, 0)]
    #[case(22, 1)]
    #[case(25, 2)]
    #[case(111, 2)]
    #[case(112, 2)]
    #[case(121, 0)]
    fn test_numerus_form_russian(#[case] count: u64, #[case] expected: usize) {
        assert_eq!(
            numerus_form_index(&LocaleCode::new("ru_RU"), count),
            expected,
            "Russian numerus form for count={count}"
        );
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(5, 2)]
    #[case(12, 2)]
    #[case(21, 2)]
    #[case(22, 1)]
    #[case(0, 2)]
    fn test_numerus_form_polish(#[case] count: u64, #[case] expected: usize) {
        assert_eq!(
            numerus_form_index(&LocaleCode::new("pl_PL"), count),
            expected,
            "Polish numerus form for count={count}"
        );
    }

    #[rstest]
    #[case("en_US", 0, 1)]
    #[case("en_US", 1, 0)]
    #[case("en_US", 7, 1)]
    #[case("fr", 0, 0)]
    #[case("fr", 2, 1)]
    #[case("pt_BR", 1, 0)]
    #[case("pt_PT", 0, 1)]
    #[case("ja", 5, 0)]
    #[case("cs", 3, 1)]
    #[case("cs", 5, 2)]
    fn test_numerus_form_other_languages(
        #[case] locale: &str,
        #[case] count: u64,
        #[case] expected: usize,
    ) {
        assert_eq!(numerus_form_index(&LocaleCode::new(locale), count), expected);
    }

    #[rstest]
    #[case("%n files", 3, "3 files")]
    #[case("Loaded %n of %n", 2, "Loaded 2 of 2")]
    #[case("No placeholder", 4, "No placeholder")]
    fn test_substitute_count(#[case] text: &str, #[case] count: u64, #[case] expected: &str) {
        assert_eq!(substitute_count(text, count), expected);
    }
}

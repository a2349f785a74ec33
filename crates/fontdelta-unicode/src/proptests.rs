use super::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Property: every Unicode scalar value belongs to some script
proptest! {
    #[test]
    fn prop_every_char_has_a_script(c in any::<char>()) {
        let data = UnicodeData::new();
        prop_assert!(data.script_name(c as u32).is_some());
    }
}

// Property: script counts add up to the number of distinct codepoints counted
proptest! {
    #[test]
    fn prop_script_counts_sum_to_input(s in "\\PC*") {
        let data = UnicodeData::new();
        let codepoints: BTreeSet<u32> = s.chars().map(u32::from).collect();
        let total: usize = data.count_scripts(&codepoints).values().sum();
        prop_assert_eq!(total, codepoints.len());
    }
}

// Property: names, when present, are upper-case ASCII
proptest! {
    #[test]
    fn prop_names_are_uppercase_ascii(c in any::<char>()) {
        let data = UnicodeData::new();
        if let Some(name) = data.char_name(c) {
            let allowed =
                |ch: char| ch.is_ascii_uppercase() || ch.is_ascii_digit() || " -".contains(ch);
            prop_assert!(name.chars().all(allowed));
        }
    }
}

use super::*;
use proptest::prelude::*;

fn word_set() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[abc]{1,6}", 0..24)
}

// Property: a minimal set is already minimal
proptest! {
    #[test]
    fn prop_removal_is_idempotent(words in word_set()) {
        let once = remove_substring_words(&words).unwrap();
        let twice = remove_substring_words(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}

// Property: every input word is still covered by some kept word
proptest! {
    #[test]
    fn prop_every_word_is_covered(words in word_set()) {
        let kept = remove_substring_words(&words).unwrap();
        for word in &words {
            prop_assert!(kept.iter().any(|k| k.contains(word.as_str())));
        }
    }
}

// Property: no kept word occurs inside another kept word
proptest! {
    #[test]
    fn prop_kept_words_are_substring_free(words in word_set()) {
        let kept = remove_substring_words(&words).unwrap();
        for a in &kept {
            for b in &kept {
                prop_assert!(a == b || !b.contains(a.as_str()));
            }
        }
    }
}

// Property: kept words only use allowed characters
proptest! {
    #[test]
    fn prop_output_respects_allowed_chars(text in "[abcxyz' \n]{0,120}") {
        let allowed: HashSet<char> = "abc".chars().collect();
        let reporter = fontdelta_core::MemoryReporter::new();
        let kept = build_corpus([std::io::Cursor::new(text)], &allowed, &reporter).unwrap();
        for word in kept {
            prop_assert!(word.chars().all(|c| allowed.contains(&c)));
        }
    }
}

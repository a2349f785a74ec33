// this_file: crates/fontdelta-unicode/src/lib.rs

//! Unicode metadata the detector partitions fonts by.
//!
//! Scripts come from the ICU4X `Script` property with its long value names
//! (`Latin`, `Old_Italic`, `Common`), which are also the word-list file stems.
//! Character names come from `unicode_names2`.

use fontdelta_core::traits::CharacterData;
use icu_properties::{
    props::Script, CodePointMapData, CodePointMapDataBorrowed, PropertyNamesLong,
    PropertyNamesLongBorrowed,
};

/// ICU-backed character data with everything baked in at compile time.
pub struct UnicodeData {
    script_map: CodePointMapDataBorrowed<'static, Script>,
    script_names: PropertyNamesLongBorrowed<'static, Script>,
}

impl UnicodeData {
    pub fn new() -> Self {
        Self {
            script_map: CodePointMapData::<Script>::new(),
            script_names: PropertyNamesLong::<Script>::new(),
        }
    }

    /// Long script name for a codepoint, `None` for surrogates and other
    /// values outside the scalar range.
    pub fn script_name(&self, codepoint: u32) -> Option<String> {
        char::from_u32(codepoint)?;
        let script = self.script_map.get32(codepoint);
        self.script_names.get(script).map(str::to_string)
    }

    /// Formal Unicode name, `None` for unassigned codepoints and controls.
    pub fn char_name(&self, ch: char) -> Option<String> {
        unicode_names2::name(ch).map(|name| name.to_string())
    }
}

impl Default for UnicodeData {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterData for UnicodeData {
    fn script_name(&self, codepoint: u32) -> Option<String> {
        self.script_name(codepoint)
    }

    fn char_name(&self, ch: char) -> Option<String> {
        self.char_name(ch)
    }
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn script_names_use_long_form() {
        let data = UnicodeData::new();
        assert_eq!(data.script_name('A' as u32).as_deref(), Some("Latin"));
        assert_eq!(data.script_name('م' as u32).as_deref(), Some("Arabic"));
        assert_eq!(data.script_name('क' as u32).as_deref(), Some("Devanagari"));
        assert_eq!(data.script_name('漢' as u32).as_deref(), Some("Han"));
        assert_eq!(data.script_name('1' as u32).as_deref(), Some("Common"));
    }

    #[test]
    fn surrogates_have_no_script() {
        let data = UnicodeData::new();
        assert_eq!(data.script_name(0xD800), None);
        assert_eq!(data.script_name(0x11_0000), None);
    }

    #[test]
    fn char_names_resolve_and_fail_quietly() {
        let data = UnicodeData::new();
        assert_eq!(
            data.char_name('A').as_deref(),
            Some("LATIN CAPITAL LETTER A")
        );
        assert_eq!(data.char_name('é').as_deref(), Some("LATIN SMALL LETTER E WITH ACUTE"));
        // Unassigned
        assert_eq!(data.char_name('\u{0378}'), None);
    }

    #[test]
    fn count_scripts_groups_by_name() {
        let data = UnicodeData::new();
        let codepoints: BTreeSet<u32> = "abcαβ1".chars().map(u32::from).collect();
        let counts = data.count_scripts(&codepoints);
        assert_eq!(counts.get("Latin"), Some(&3));
        assert_eq!(counts.get("Greek"), Some(&2));
        assert_eq!(counts.get("Common"), Some(&1));
    }

    #[test]
    fn works_through_the_trait() {
        let data: Box<dyn CharacterData> = Box::new(UnicodeData::default());
        assert_eq!(data.script_name('Ж' as u32).as_deref(), Some("Cyrillic"));
    }
}

//! OpenType tag lookups used to label word findings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Writing direction a finding should be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        })
    }
}

/// BCP 47 tag for an OpenType `(script, language)` pair
///
/// Only pairs with a known display language resolve; everything else,
/// including a script without a language, yields `None`.
pub fn html_lang(script: Option<&str>, lang: Option<&str>) -> Option<&'static str> {
    match (script, lang) {
        (None, None) => Some("en"),
        (Some("latn"), Some("dflt")) => Some("en"),
        (Some("arab"), Some("ARA")) => Some("ar"),
        (Some("dev2"), Some("HIN")) => Some("hi"),
        (Some("dev2"), Some("MAR")) => Some("mr"),
        (Some("dev2"), Some("NEP")) => Some("ne"),
        (Some("latn"), Some("MOL")) => Some("mo"),
        (Some("cyrl"), Some("SRB")) => Some("sr"),
        _ => None,
    }
}

/// Direction for an OpenType script tag, left-to-right unless known otherwise
pub fn text_direction(script: Option<&str>) -> TextDirection {
    match script {
        Some("arab" | "hebr" | "syrc" | "thaa" | "nkoo") => TextDirection::Rtl,
        _ => TextDirection::Ltr,
    }
}

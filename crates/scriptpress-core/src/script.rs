// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script detection — picks a font/direction profile by counting characters
// that fall into each script's Unicode ranges.
//
// The profile table is an explicit priority list. When two scripts match the
// same number of characters, the one declared first wins.

use std::ops::RangeInclusive;

use tracing::debug;

/// A named script family with its font, writing direction and detection
/// ranges.
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptProfile {
    /// Stable identifier, e.g. `"arabic"`.
    pub key: &'static str,
    /// Font family name, e.g. `"Noto Sans Arabic"`.
    pub name: &'static str,
    /// Where the TTF file is downloaded from.
    pub source_uri: &'static str,
    pub right_to_left: bool,
    /// Code point ranges counted towards this script. Empty for the fallback,
    /// which matches everything.
    ranges: &'static [RangeInclusive<u32>],
}

impl ScriptProfile {
    /// Whether `ch` belongs to this script.
    pub fn matches(&self, ch: char) -> bool {
        if self.is_fallback() {
            return true;
        }
        let cp = ch as u32;
        self.ranges.iter().any(|range| range.contains(&cp))
    }

    /// Number of characters in `text` belonging to this script.
    pub fn count_matches(&self, text: &str) -> usize {
        text.chars().filter(|ch| self.matches(*ch)).count()
    }

    pub fn is_fallback(&self) -> bool {
        self.key == DEFAULT.key
    }

    /// Local file name for the downloaded font: the family name without
    /// whitespace, plus `.ttf`.
    pub fn font_file_name(&self) -> String {
        let mut stem: String = self.name.split_whitespace().collect();
        stem.push_str(".ttf");
        stem
    }
}

impl std::fmt::Display for ScriptProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.name)
    }
}

macro_rules! noto_url {
    ($dir:literal) => {
        concat!(
            "https://raw.githubusercontent.com/googlefonts/noto-fonts/main/hinted/ttf/",
            $dir,
            "/",
            $dir,
            "-Regular.ttf"
        )
    };
}

// Ethiopic is flagged right-to-left to match the renderer's long-standing
// output, even though the script itself is written left-to-right.
pub static AMHARIC: ScriptProfile = ScriptProfile {
    key: "amharic",
    name: "Noto Sans Ethiopic",
    source_uri: noto_url!("NotoSansEthiopic"),
    right_to_left: true,
    ranges: &[0x1200..=0x137F],
};

pub static ARABIC: ScriptProfile = ScriptProfile {
    key: "arabic",
    name: "Noto Sans Arabic",
    source_uri: noto_url!("NotoSansArabic"),
    right_to_left: true,
    ranges: &[0x0600..=0x06FF],
};

pub static HEBREW: ScriptProfile = ScriptProfile {
    key: "hebrew",
    name: "Noto Sans Hebrew",
    source_uri: noto_url!("NotoSansHebrew"),
    right_to_left: true,
    ranges: &[0x0590..=0x05FF],
};

pub static CHINESE: ScriptProfile = ScriptProfile {
    key: "chinese",
    name: "Noto Sans SC",
    source_uri: noto_url!("NotoSansSC"),
    right_to_left: false,
    ranges: &[0x4E00..=0x9FFF],
};

pub static JAPANESE: ScriptProfile = ScriptProfile {
    key: "japanese",
    name: "Noto Sans JP",
    source_uri: noto_url!("NotoSansJP"),
    right_to_left: false,
    ranges: &[0x3040..=0x309F, 0x30A0..=0x30FF],
};

pub static KOREAN: ScriptProfile = ScriptProfile {
    key: "korean",
    name: "Noto Sans KR",
    source_uri: noto_url!("NotoSansKR"),
    right_to_left: false,
    ranges: &[0x3130..=0x318F, 0xAC00..=0xD7AF],
};

pub static CYRILLIC: ScriptProfile = ScriptProfile {
    key: "cyrillic",
    name: "Noto Sans",
    source_uri: noto_url!("NotoSans"),
    right_to_left: false,
    ranges: &[0x0400..=0x04FF],
};

pub static DEFAULT: ScriptProfile = ScriptProfile {
    key: "default",
    name: "Noto Sans",
    source_uri: noto_url!("NotoSans"),
    right_to_left: false,
    ranges: &[],
};

/// Script-specific profiles in priority order. Ties go to the earlier entry.
pub static PRIORITY: [&ScriptProfile; 7] = [
    &AMHARIC, &ARABIC, &HEBREW, &CHINESE, &JAPANESE, &KOREAN, &CYRILLIC,
];

/// Every profile, fallback last.
pub fn all_profiles() -> impl Iterator<Item = &'static ScriptProfile> {
    PRIORITY.iter().copied().chain(std::iter::once(&DEFAULT))
}

/// Look a profile up by its key (`"arabic"`, `"default"`, ...).
pub fn profile_by_key(key: &str) -> Option<&'static ScriptProfile> {
    let key = key.trim().to_ascii_lowercase();
    all_profiles().find(|profile| profile.key == key)
}

/// Matching-character count for every script-specific profile, in priority
/// order.
pub fn script_counts(text: &str) -> Vec<(&'static ScriptProfile, usize)> {
    PRIORITY
        .iter()
        .map(|profile| (*profile, profile.count_matches(text)))
        .collect()
}

/// Pick the profile whose script has the most characters in `text`.
///
/// Falls back to [`DEFAULT`] when no script-specific character is present.
pub fn classify(text: &str) -> &'static ScriptProfile {
    let mut best: Option<(&'static ScriptProfile, usize)> = None;

    for (profile, count) in script_counts(text) {
        if count == 0 {
            continue;
        }
        // Strictly greater: an equal count never displaces an earlier profile.
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((profile, count));
        }
    }

    match best {
        Some((profile, count)) => {
            debug!(script = profile.key, count, "detected script");
            profile
        }
        None => {
            debug!("no script-specific characters, using default profile");
            &DEFAULT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        assert_eq!(classify(""), &DEFAULT);
    }

    #[test]
    fn latin_text_is_default() {
        assert_eq!(classify("Hello world, this is a test."), &DEFAULT);
    }

    #[test]
    fn pure_script_samples_classify_as_their_script() {
        let samples: [(&str, &ScriptProfile); 7] = [
            ("ቃል ሥጋ ሆነ", &AMHARIC),
            ("فِي الْبَدْءِ كَانَ الْكَلِمَةُ", &ARABIC),
            ("בְּרֵאשִׁית בָּרָא", &HEBREW),
            ("太初有道", &CHINESE),
            ("はじめにことばがあった", &JAPANESE),
            ("태초에 말씀이 계시니라", &KOREAN),
            ("В начале было Слово", &CYRILLIC),
        ];
        for (text, expected) in samples {
            assert_eq!(classify(text), expected, "sample {text:?}");
        }
    }

    #[test]
    fn cyrillic_is_left_to_right() {
        let profile = classify("В начале было Слово, и Слово было у Бога");
        assert_eq!(profile.key, "cyrillic");
        assert!(!profile.right_to_left);
    }

    #[test]
    fn arabic_is_right_to_left() {
        let profile = classify("هَذَا كَانَ فِي الْبَدْءِ عِنْدَ اللهِ");
        assert_eq!(profile.key, "arabic");
        assert!(profile.right_to_left);
    }

    #[test]
    fn higher_count_wins_in_mixed_text() {
        // Three Cyrillic letters against two Hebrew letters.
        assert_eq!(classify("абв אב"), &CYRILLIC);
        assert_eq!(classify("аб אבג"), &HEBREW);
    }

    #[test]
    fn ties_resolve_by_priority_order() {
        // Two Arabic vs two Cyrillic: Arabic is declared first.
        assert_eq!(classify("аб بت"), &ARABIC);
        assert_eq!(classify("بت аб"), &ARABIC);
        // Two Chinese vs two Korean: Chinese is declared first.
        assert_eq!(classify("한국 中文"), &CHINESE);
    }

    #[test]
    fn katakana_and_hiragana_both_count_as_japanese() {
        assert_eq!(JAPANESE.count_matches("カタカナひらがな"), 8);
    }

    #[test]
    fn font_file_name_strips_whitespace() {
        assert_eq!(AMHARIC.font_file_name(), "NotoSansEthiopic.ttf");
        assert_eq!(DEFAULT.font_file_name(), "NotoSans.ttf");
    }

    #[test]
    fn fallback_matches_anything() {
        assert!(DEFAULT.matches('x'));
        assert!(DEFAULT.matches('中'));
        assert!(!ARABIC.matches('x'));
    }

    #[test]
    fn lookup_by_key_is_case_insensitive() {
        assert_eq!(profile_by_key("Arabic"), Some(&ARABIC));
        assert_eq!(profile_by_key("default"), Some(&DEFAULT));
        assert_eq!(profile_by_key("klingon"), None);
    }

    #[test]
    fn source_uris_point_at_noto_hinted_ttf() {
        assert_eq!(
            ARABIC.source_uri,
            "https://raw.githubusercontent.com/googlefonts/noto-fonts/main/hinted/ttf/NotoSansArabic/NotoSansArabic-Regular.ttf"
        );
    }
}

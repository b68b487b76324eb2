//! Supported display locales and their number conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A locale the calculator can render numbers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportedLocale {
    /// English (US), USD.
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// English (UK), GBP.
    #[serde(rename = "en-GB")]
    EnGb,
    /// German, EUR.
    #[serde(rename = "de-DE")]
    DeDe,
    /// Spanish, EUR.
    #[serde(rename = "es-ES")]
    EsEs,
    /// French, EUR.
    #[serde(rename = "fr-FR")]
    FrFr,
    /// Japanese, JPY.
    #[serde(rename = "ja-JP")]
    JaJp,
    /// Simplified Chinese, CNY.
    #[serde(rename = "zh-CN")]
    ZhCn,
    /// English (India), INR.
    #[serde(rename = "en-IN")]
    EnIn,
    /// Arabic (UAE), AED.
    #[serde(rename = "ar-AE")]
    ArAe,
}

/// How integer digits are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Grouping {
    /// Groups of three, only once the integer part has at least
    /// `3 + min_digits` digits.
    Thousands { min_digits: usize },
    /// Last three digits, then groups of two (lakh/crore).
    Indian,
}

/// Where the currency symbol goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Locale requested but not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

impl SupportedLocale {
    /// Every supported locale, in menu order.
    pub const ALL: [Self; 9] = [
        Self::EnUs,
        Self::EnGb,
        Self::DeDe,
        Self::EsEs,
        Self::FrFr,
        Self::JaJp,
        Self::ZhCn,
        Self::EnIn,
        Self::ArAe,
    ];

    /// BCP 47 tag.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::EsEs => "es-ES",
            Self::FrFr => "fr-FR",
            Self::JaJp => "ja-JP",
            Self::ZhCn => "zh-CN",
            Self::EnIn => "en-IN",
            Self::ArAe => "ar-AE",
        }
    }

    /// Name shown in the locale picker.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::EnUs => "English (US)",
            Self::EnGb => "English (UK)",
            Self::DeDe => "Deutsch",
            Self::EsEs => "Español",
            Self::FrFr => "Français",
            Self::JaJp => "日本語",
            Self::ZhCn => "中文",
            Self::EnIn => "English (India)",
            Self::ArAe => "العربية (UAE)",
        }
    }

    /// ISO 4217 currency code.
    #[must_use]
    pub const fn currency(&self) -> &'static str {
        match self {
            Self::EnUs => "USD",
            Self::EnGb => "GBP",
            Self::DeDe | Self::EsEs | Self::FrFr => "EUR",
            Self::JaJp => "JPY",
            Self::ZhCn => "CNY",
            Self::EnIn => "INR",
            Self::ArAe => "AED",
        }
    }

    pub(crate) const fn currency_symbol(&self) -> &'static str {
        match self {
            Self::EnUs => "$",
            Self::EnGb => "£",
            Self::DeDe | Self::EsEs | Self::FrFr => "€",
            Self::JaJp => "￥",
            Self::ZhCn => "¥",
            Self::EnIn => "₹",
            Self::ArAe => "AED",
        }
    }

    pub(crate) const fn symbol_position(&self) -> SymbolPosition {
        match self {
            Self::DeDe | Self::EsEs | Self::FrFr => SymbolPosition::Suffix,
            _ => SymbolPosition::Prefix,
        }
    }

    /// Separator between the number and a symbol/percent sign, if any.
    pub(crate) const fn symbol_spacing(&self) -> &'static str {
        match self {
            Self::DeDe | Self::EsEs | Self::FrFr | Self::ArAe => NBSP,
            _ => "",
        }
    }

    pub(crate) const fn percent_spacing(&self) -> &'static str {
        match self {
            Self::DeDe | Self::EsEs => NBSP,
            Self::FrFr => NARROW_NBSP,
            _ => "",
        }
    }

    pub(crate) const fn group_separator(&self) -> &'static str {
        match self {
            Self::DeDe | Self::EsEs => ".",
            Self::FrFr => NARROW_NBSP,
            _ => ",",
        }
    }

    pub(crate) const fn decimal_separator(&self) -> &'static str {
        match self {
            Self::DeDe | Self::EsEs | Self::FrFr => ",",
            _ => ".",
        }
    }

    pub(crate) const fn grouping(&self) -> Grouping {
        match self {
            Self::EnIn => Grouping::Indian,
            Self::EsEs => Grouping::Thousands { min_digits: 2 },
            _ => Grouping::Thousands { min_digits: 1 },
        }
    }
}

impl fmt::Display for SupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SupportedLocale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnsupportedLocale(wanted.to_string()))
    }
}

/// Pick a locale from an `Accept-Language` style list.
///
/// Tags are tried in order: exact match first, then the first locale sharing
/// the language (`en-AU` picks `en-US`). Falls back to `en-US`.
#[must_use]
pub fn detect_locale(accept_language: &str) -> SupportedLocale {
    accept_language
        .split(',')
        .filter_map(|part| part.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .find_map(|tag| {
            tag.parse::<SupportedLocale>().ok().or_else(|| {
                let language = tag.split(['-', '_']).next().unwrap_or(tag);
                SupportedLocale::ALL.into_iter().find(|l| {
                    l.code()
                        .split('-')
                        .next()
                        .is_some_and(|own| own.eq_ignore_ascii_case(language))
                })
            })
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("de-DE".parse::<SupportedLocale>(), Ok(SupportedLocale::DeDe));
        assert_eq!("en-in".parse::<SupportedLocale>(), Ok(SupportedLocale::EnIn));
        assert_eq!(
            "pt-BR".parse::<SupportedLocale>(),
            Err(UnsupportedLocale("pt-BR".to_string()))
        );
    }

    #[test]
    fn test_currency_mapping() {
        assert_eq!(SupportedLocale::EnGb.currency(), "GBP");
        assert_eq!(SupportedLocale::FrFr.currency(), "EUR");
        assert_eq!(SupportedLocale::ArAe.currency(), "AED");
    }

    #[test]
    fn test_display_names_are_native() {
        assert_eq!(SupportedLocale::DeDe.display_name(), "Deutsch");
        assert_eq!(SupportedLocale::JaJp.display_name(), "日本語");
        assert_eq!(SupportedLocale::EnIn.display_name(), "English (India)");
    }

    #[test]
    fn test_detect_locale() {
        assert_eq!(detect_locale("fr-FR"), SupportedLocale::FrFr);
        assert_eq!(detect_locale("en-AU,en;q=0.9"), SupportedLocale::EnUs);
        assert_eq!(detect_locale("de-AT"), SupportedLocale::DeDe);
        assert_eq!(detect_locale("pt-BR, ja;q=0.8"), SupportedLocale::JaJp);
        assert_eq!(detect_locale("pt-BR"), SupportedLocale::EnUs);
        assert_eq!(detect_locale(""), SupportedLocale::EnUs);
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&SupportedLocale::ZhCn).expect("serializes");
        assert_eq!(json, "\"zh-CN\"");
        let back: SupportedLocale = serde_json::from_str("\"en-IN\"").expect("deserializes");
        assert_eq!(back, SupportedLocale::EnIn);
    }
}

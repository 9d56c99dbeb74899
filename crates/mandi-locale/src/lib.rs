#![deny(warnings)]

//! Static UI label tables for English, Hindi and Punjabi.
//!
//! Lookup falls back to English for an unknown language and to the key
//! itself for an unknown key. No translation happens here; these are fixed
//! strings supplied at construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Keys every built-in table defines.
pub const KEYS: [&str; 9] = [
    "title",
    "welcome",
    "ask_crop",
    "market_rate",
    "negotiate",
    "offer_accepted",
    "offer_rejected",
    "analyzing",
    "your_offer",
];

const FALLBACK: &str = "en";

#[derive(Debug, Error, PartialEq)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

/// Languages with a built-in table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "pb")]
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Punjabi];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Punjabi => "pb",
        }
    }

    /// Picker label, e.g. "Hindi (hi)".
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English (en)",
            Language::Hindi => "Hindi (hi)",
            Language::Punjabi => "Punjabi (pb)",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts a bare code ("hi") or a picker label ("Hindi (hi)").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = match (trimmed.rfind('('), trimmed.strip_suffix(')')) {
            (Some(open), Some(inner)) => &inner[open + 1..],
            _ => trimmed,
        };
        let code = code.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Immutable label tables keyed by language code, then label key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrasebook {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl Phrasebook {
    pub fn from_tables(tables: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { tables }
    }

    pub fn builtin() -> Self {
        let mut tables = BTreeMap::new();
        for (lang, rows) in [
            (Language::Hindi, HINDI),
            (Language::Punjabi, PUNJABI),
            (Language::English, ENGLISH),
        ] {
            let table: BTreeMap<String, String> = KEYS
                .iter()
                .zip(rows.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            tables.insert(lang.code().to_string(), table);
        }
        Self { tables }
    }

    /// Codes with a table, sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Label for `key` in language `code`.
    pub fn lookup<'a>(&'a self, code: &str, key: &'a str) -> &'a str {
        let table = match self.tables.get(code) {
            Some(t) => Some(t),
            None => {
                debug!(code, "no table for language, using English");
                self.tables.get(FALLBACK)
            }
        };
        table
            .and_then(|t| t.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn text<'a>(&'a self, lang: Language, key: &'a str) -> &'a str {
        self.lookup(lang.code(), key)
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::builtin()
    }
}

const HINDI: [&str; 9] = [
    "बहुभाषी मंडी (Multilingual Mandi)",
    "नमस्ते! आप आज क्या बेचना चाहते हैं?",
    "फसल का नाम बताएं (जैसे: टमाटर, प्याज)",
    "बाजार भाव",
    "भाव-ताव करें",
    "बधाई हो! सौदा पक्का हुआ।",
    "माफ कीजिये, भाव बहुत कम है।",
    "बाजार भाव की गणना हो रही है...",
    "आपकी कीमत (₹/kg):",
];

const PUNJABI: [&str; 9] = [
    "ਬਹੁ-ਭਾਸ਼ਾਈ ਮੰਡੀ (Multilingual Mandi)",
    "ਸਤਿ ਸ਼੍ਰੀ ਅਕਾਲ! ਤੁਸੀਂ ਅੱਜ ਕੀ ਵੇਚਣਾ ਚਾਹੁੰਦੇ ਹੋ?",
    "ਫਸਲ ਦਾ ਨਾਮ ਦੱਸੋ (ਜਿਵੇਂ: ਟਮਾਟਰ, ਪਿਆਜ਼)",
    "ਮੰਡੀ ਦਾ ਭਾਅ",
    "ਗੱਲਬਾਤ ਕਰੋ",
    "ਵਧਾਈਆਂ! ਸੌਦਾ ਪੱਕਾ ਹੋ ਗਿਆ।",
    "ਮਾਫ ਕਰਨਾ, ਭਾਅ ਬਹੁਤ ਘੱਟ ਹੈ।",
    "ਮੰਡੀ ਦੇ ਭਾਅ ਦੀ ਗਣਨਾ ਹੋ ਰਹੀ ਹੈ...",
    "ਤੁਹਾਡੀ ਕੀਮਤ (₹/kg):",
];

const ENGLISH: [&str; 9] = [
    "The Multilingual Mandi",
    "Hello! What do you want to sell today?",
    "Name the crop (e.g., Tomato, Onion)",
    "Market Rate",
    "Negotiate Deal",
    "Congratulations! Deal confirmed.",
    "Sorry, that price is too low.",
    "Calculating today's market rate...",
    "Your Offer (₹/kg):",
];

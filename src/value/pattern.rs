//! Pattern values
//!
//! A regular-expression literal: source text plus a set of flags. The body
//! is kept verbatim and never compiled. Flags are a set, so `"gi"` and
//! `"ig"` are the same pattern; they render in alphabetical order.

use std::fmt;

use thiserror::Error;

/// Known flags and their bit in [`PatternFlags`], in canonical order
const FLAGS: [(char, u8); 8] = [
    ('d', 1 << 0),
    ('g', 1 << 1),
    ('i', 1 << 2),
    ('m', 1 << 3),
    ('s', 1 << 4),
    ('u', 1 << 5),
    ('v', 1 << 6),
    ('y', 1 << 7),
];

const UNICODE: u8 = 1 << 5;
const UNICODE_SETS: u8 = 1 << 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern flags '{0}'")]
pub struct InvalidPatternFlags(pub String);

/// Set of pattern flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PatternFlags(u8);

impl PatternFlags {
    /// Parse flag text; rejects unknown, repeated, or conflicting (`u` + `v`) flags
    pub fn parse(text: &str) -> Result<Self, InvalidPatternFlags> {
        let mut bits = 0u8;
        for c in text.chars() {
            let bit = FLAGS
                .iter()
                .find(|(flag, _)| *flag == c)
                .map(|(_, bit)| *bit)
                .ok_or_else(|| InvalidPatternFlags(text.to_string()))?;
            if bits & bit != 0 {
                return Err(InvalidPatternFlags(text.to_string()));
            }
            bits |= bit;
        }
        Self::from_bits(bits).ok_or_else(|| InvalidPatternFlags(text.to_string()))
    }

    /// Returns `None` for combinations that cannot occur (`u` + `v`)
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & UNICODE != 0 && bits & UNICODE_SETS != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: char) -> bool {
        FLAGS
            .iter()
            .any(|(f, bit)| *f == flag && self.0 & bit != 0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PatternFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, bit) in FLAGS {
            if self.0 & bit != 0 {
                write!(f, "{}", flag)?;
            }
        }
        Ok(())
    }
}

/// Regular-expression literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    flags: PatternFlags,
}

impl Pattern {
    pub fn new(source: impl Into<String>, flags: &str) -> Result<Self, InvalidPatternFlags> {
        Ok(Self::with_flags(source, PatternFlags::parse(flags)?))
    }

    pub fn with_flags(source: impl Into<String>, flags: PatternFlags) -> Self {
        Self {
            source: source.into(),
            flags,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

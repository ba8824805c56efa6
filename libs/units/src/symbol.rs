//! Display text for declared entities.
//!
//! Every dimension, unit and quantity spec carries a [`SymbolText`]: the
//! preferred (possibly Unicode) spelling plus an ASCII fallback. Formatting
//! with the alternate flag (`{:#}`) selects the ASCII spelling throughout the
//! crate.

use crate::expr::Exponent;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_DECLARATION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity for a declared entity. Two declarations sharing a
/// symbol still get distinct ids.
pub(crate) fn next_declaration_id() -> u64 {
    NEXT_DECLARATION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Which spelling of a symbol to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    #[default]
    Unicode,
    Ascii,
}

impl TextEncoding {
    pub(crate) fn from_formatter(f: &fmt::Formatter<'_>) -> Self {
        if f.alternate() {
            TextEncoding::Ascii
        } else {
            TextEncoding::Unicode
        }
    }
}

/// Symbol text with an ASCII fallback (e.g. `Ω` / `ohm`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolText {
    unicode: Arc<str>,
    ascii: Arc<str>,
}

impl SymbolText {
    /// Symbol whose Unicode and ASCII spellings are the same.
    pub fn new(text: &str) -> Self {
        let text: Arc<str> = Arc::from(text);
        Self {
            unicode: text.clone(),
            ascii: text,
        }
    }

    pub fn with_ascii(unicode: &str, ascii: &str) -> Self {
        Self {
            unicode: Arc::from(unicode),
            ascii: Arc::from(ascii),
        }
    }

    pub fn unicode(&self) -> &str {
        &self.unicode
    }

    pub fn ascii(&self) -> &str {
        &self.ascii
    }

    pub fn get(&self, encoding: TextEncoding) -> &str {
        match encoding {
            TextEncoding::Unicode => &self.unicode,
            TextEncoding::Ascii => &self.ascii,
        }
    }
}

impl From<&str> for SymbolText {
    fn from(text: &str) -> Self {
        SymbolText::new(text)
    }
}

impl From<(&str, &str)> for SymbolText {
    fn from((unicode, ascii): (&str, &str)) -> Self {
        SymbolText::with_ascii(unicode, ascii)
    }
}

impl From<String> for SymbolText {
    fn from(text: String) -> Self {
        SymbolText::new(&text)
    }
}

impl fmt::Debug for SymbolText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.unicode)
    }
}

impl fmt::Display for SymbolText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get(TextEncoding::from_formatter(f)))
    }
}

/// Suffix for an atom raised to `exp`: empty for 1, superscripts in Unicode,
/// `^n` / `^(n/d)` in ASCII.
pub(crate) fn exponent_suffix(exp: Exponent, encoding: TextEncoding) -> String {
    if exp == Exponent::from_integer(1) {
        return String::new();
    }
    match encoding {
        TextEncoding::Unicode => {
            let mut out = superscript(*exp.numer());
            if !exp.is_integer() {
                out.push('ᐟ');
                out.push_str(&superscript(*exp.denom()));
            }
            out
        }
        TextEncoding::Ascii => {
            if exp.is_integer() {
                format!("^{}", exp.numer())
            } else {
                format!("^({}/{})", exp.numer(), exp.denom())
            }
        }
    }
}

fn superscript(n: i64) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

//! Exact scale factors.
//!
//! A [`Magnitude`] is a product of prime powers and irrational constants with
//! rational exponents, so that `1/1000 * 1000` is exactly one and `π/180`
//! never touches floating point until a value is actually scaled.

use crate::expr::{Atom, Exponent, Expr};
use crate::symbol::{exponent_suffix, next_declaration_id, SymbolText, TextEncoding};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Signed};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::Arc;

struct ConstantInner {
    id: u64,
    symbol: SymbolText,
    value: f64,
}

/// An irrational factor such as π.
#[derive(Clone)]
pub struct MagConstant(Arc<ConstantInner>);

impl MagConstant {
    pub fn value(&self) -> f64 {
        self.0.value
    }
}

/// One factor of a magnitude.
#[derive(Clone)]
pub enum MagBase {
    Prime { value: u64, text: SymbolText },
    Constant(MagConstant),
}

impl MagBase {
    fn prime(value: u64) -> Self {
        MagBase::Prime {
            value,
            text: SymbolText::new(&value.to_string()),
        }
    }

    fn value_f64(&self) -> f64 {
        match self {
            MagBase::Prime { value, .. } => *value as f64,
            MagBase::Constant(c) => c.value(),
        }
    }

    fn sort_key(&self) -> (u8, u64) {
        match self {
            MagBase::Prime { value, .. } => (0, *value),
            MagBase::Constant(c) => (1, c.0.id),
        }
    }
}

impl PartialEq for MagBase {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for MagBase {}

impl Hash for MagBase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for MagBase {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MagBase {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Debug for MagBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol().unicode())
    }
}

impl Atom for MagBase {
    fn symbol(&self) -> &SymbolText {
        match self {
            MagBase::Prime { text, .. } => text,
            MagBase::Constant(c) => &c.0.symbol,
        }
    }
}

static PI: Lazy<MagConstant> = Lazy::new(|| {
    MagConstant(Arc::new(ConstantInner {
        id: next_declaration_id(),
        symbol: SymbolText::with_ascii("π", "pi"),
        value: std::f64::consts::PI,
    }))
});

/// Exact positive scale factor.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Magnitude {
    factors: Expr<MagBase>,
}

/// Magnitude of a positive integer.
///
/// # Panics
/// If `n` is zero.
pub fn mag(n: u64) -> Magnitude {
    assert!(n != 0, "magnitudes must be positive");
    Magnitude {
        factors: Expr::from_terms(
            factorize(n)
                .into_iter()
                .map(|(p, e)| (MagBase::prime(p), Exponent::from_integer(e))),
        ),
    }
}

/// Magnitude of `num / den`.
///
/// # Panics
/// If either argument is zero.
pub fn mag_ratio(num: u64, den: u64) -> Magnitude {
    mag(num).divide(&mag(den))
}

/// Magnitude of `base^(num/den)`, e.g. `mag_power(10, 3, 1)` for kilo.
///
/// # Panics
/// If `base` or `den` is zero.
pub fn mag_power(base: u64, num: i64, den: i64) -> Magnitude {
    mag(base).pow(Exponent::new(num, den))
}

impl Magnitude {
    pub fn one() -> Self {
        Self::default()
    }

    pub fn pi() -> Self {
        Self {
            factors: Expr::atom(MagBase::Constant(PI.clone())),
        }
    }

    /// Declares a new irrational constant factor.
    pub fn constant(symbol: impl Into<SymbolText>, value: f64) -> Self {
        Self {
            factors: Expr::atom(MagBase::Constant(MagConstant(Arc::new(ConstantInner {
                id: next_declaration_id(),
                symbol: symbol.into(),
                value,
            })))),
        }
    }

    pub fn is_one(&self) -> bool {
        self.factors.is_one()
    }

    /// No constants and only integer exponents.
    pub fn is_rational(&self) -> bool {
        self.factors
            .terms()
            .all(|(base, exp)| matches!(base, MagBase::Prime { .. }) && exp.is_integer())
    }

    /// A rational magnitude with an empty denominator.
    pub fn is_integral(&self) -> bool {
        self.is_rational() && self.factors.terms().all(|(_, exp)| exp.is_positive())
    }

    pub fn multiply(&self, other: &Magnitude) -> Magnitude {
        Self {
            factors: self.factors.multiply(&other.factors),
        }
    }

    pub fn divide(&self, other: &Magnitude) -> Magnitude {
        Self {
            factors: self.factors.divide(&other.factors),
        }
    }

    pub fn invert(&self) -> Magnitude {
        Self {
            factors: self.factors.invert(),
        }
    }

    pub fn pow(&self, exp: Exponent) -> Magnitude {
        Self {
            factors: self.factors.pow(exp),
        }
    }

    /// Product of the integer parts of the positive prime exponents.
    pub fn numerator(&self) -> BigUint {
        self.integer_part(|exp| exp.is_positive())
    }

    /// Product of the integer parts of the negated negative prime exponents.
    pub fn denominator(&self) -> BigUint {
        self.integer_part(|exp| exp.is_negative())
    }

    fn integer_part(&self, side: impl Fn(&Exponent) -> bool) -> BigUint {
        self.factors
            .terms()
            .filter(|(_, exp)| side(exp))
            .filter_map(|(base, exp)| match base {
                MagBase::Prime { value, .. } => {
                    let whole = exp.abs().to_integer();
                    u32::try_from(whole).ok().map(|whole| BigUint::from(*value).pow(whole))
                }
                MagBase::Constant(_) => None,
            })
            .fold(BigUint::one(), |acc, factor| acc * factor)
    }

    /// The exact value, if the magnitude is rational.
    pub fn to_ratio(&self) -> Option<BigRational> {
        if !self.is_rational() {
            return None;
        }
        Some(BigRational::new(
            BigInt::from(self.numerator()),
            BigInt::from(self.denominator()),
        ))
    }

    pub fn value_f64(&self) -> f64 {
        self.factors.terms().fold(1.0, |acc, (base, exp)| {
            let exp = *exp.numer() as f64 / *exp.denom() as f64;
            acc * base.value_f64().powf(exp)
        })
    }

    /// Largest magnitude that divides both: the per-factor minimum exponent.
    pub fn common(&self, other: &Magnitude) -> Magnitude {
        let bases: BTreeSet<MagBase> = self
            .factors
            .terms()
            .chain(other.factors.terms())
            .map(|(base, _)| base.clone())
            .collect();
        let factors = Expr::from_terms(bases.into_iter().map(|base| {
            let exp = self
                .factors
                .exponent_of(&base)
                .min(other.factors.exponent_of(&base));
            (base, exp)
        }));
        Magnitude { factors }
    }

    pub fn render(&self, encoding: TextEncoding) -> String {
        let separator = match encoding {
            TextEncoding::Unicode => "·",
            TextEncoding::Ascii => "*",
        };
        let mut numerator = whole_token(self.numerator());
        numerator.extend(self.irrational_tokens(true, encoding));
        let mut denominator = whole_token(self.denominator());
        denominator.extend(self.irrational_tokens(false, encoding));

        let head = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(separator)
        };
        match denominator.len() {
            0 => head,
            1 => format!("{head}/{}", denominator[0]),
            _ => format!("{head}/({})", denominator.join(separator)),
        }
    }

    /// Constants and fractional prime powers on one side of the fraction bar.
    fn irrational_tokens(&self, positive: bool, encoding: TextEncoding) -> Vec<String> {
        self.factors
            .terms()
            .filter(|(base, exp)| {
                let irrational = matches!(base, MagBase::Constant(_)) || !exp.is_integer();
                irrational && exp.is_positive() == positive
            })
            .map(|(base, exp)| {
                let exp = if positive { exp } else { -exp };
                format!("{}{}", base.symbol().get(encoding), exponent_suffix(exp, encoding))
            })
            .collect()
    }
}

fn whole_token(value: BigUint) -> Vec<String> {
    if value.is_one() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::from_formatter(f)))
    }
}

impl fmt::Debug for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mag({})", self.render(TextEncoding::Unicode))
    }
}

impl Mul for &Magnitude {
    type Output = Magnitude;

    fn mul(self, rhs: &Magnitude) -> Magnitude {
        self.multiply(rhs)
    }
}

impl Mul for Magnitude {
    type Output = Magnitude;

    fn mul(self, rhs: Magnitude) -> Magnitude {
        self.multiply(&rhs)
    }
}

impl Div for &Magnitude {
    type Output = Magnitude;

    fn div(self, rhs: &Magnitude) -> Magnitude {
        self.divide(rhs)
    }
}

impl Div for Magnitude {
    type Output = Magnitude;

    fn div(self, rhs: Magnitude) -> Magnitude {
        self.divide(&rhs)
    }
}

fn factorize(mut n: u64) -> Vec<(u64, i64)> {
    let mut factors = Vec::new();
    let mut p = 2u64;
    while p.saturating_mul(p) <= n {
        let mut e = 0;
        while n % p == 0 {
            n /= p;
            e += 1;
        }
        if e > 0 {
            factors.push((p, e));
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push((n, 1));
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorisation_is_canonical() {
        assert_eq!(mag(1000), mag_ratio(1_000_000, 1000));
        assert_eq!(mag(12) * mag(5), mag(60));
        assert_eq!(mag_power(10, 3, 1), mag(1000));
        assert_eq!(mag(1), Magnitude::one());
        assert_eq!(factorize(360), vec![(2, 3), (3, 2), (5, 1)]);
        assert_eq!(factorize(999_983), vec![(999_983, 1)]);
    }

    #[test]
    fn numerator_and_denominator() {
        let m = mag_ratio(3, 1000);
        assert_eq!(m.numerator(), BigUint::from(3u32));
        assert_eq!(m.denominator(), BigUint::from(1000u32));
        assert!(m.is_rational());
        assert!(!m.is_integral());
        assert!(mag(128).is_integral());
        assert_eq!(
            m.to_ratio(),
            Some(BigRational::new(BigInt::from(3), BigInt::from(1000)))
        );
    }

    #[test]
    fn irrational_factors_stay_symbolic() {
        let degree = Magnitude::pi() / mag(180);
        assert!(!degree.is_rational());
        assert_eq!(degree.to_ratio(), None);
        assert!((degree.value_f64() - std::f64::consts::PI / 180.0).abs() < 1e-15);
        assert!((Magnitude::pi() / Magnitude::pi()).is_one());
        assert_eq!(degree.to_string(), "π/180");
        assert_eq!(format!("{degree:#}"), "pi/180");
    }

    #[test]
    fn rational_roots() {
        let root2 = mag_power(2, 1, 2);
        assert!(!root2.is_rational());
        assert_eq!((&root2 * &root2), mag(2));
        assert!((root2.value_f64() - 2f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn common_magnitude_is_the_gcd() {
        assert_eq!(mag(1000).common(&Magnitude::one()), Magnitude::one());
        assert_eq!(mag_ratio(1, 1000).common(&Magnitude::one()), mag_ratio(1, 1000));
        assert_eq!(mag(12).common(&mag(18)), mag(6));
        assert_eq!(mag_ratio(1, 4).common(&mag_ratio(1, 6)), mag_ratio(1, 12));
    }

    #[test]
    fn renders_ratios() {
        assert_eq!(mag(1000).to_string(), "1000");
        assert_eq!(mag_ratio(1, 1000).to_string(), "1/1000");
        assert_eq!(mag_ratio(3, 2).to_string(), "3/2");
        assert_eq!(Magnitude::one().to_string(), "1");
    }
}

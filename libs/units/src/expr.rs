//! Canonical exponent maps over symbolic atoms.
//!
//! Dimensions, units and quantity specs are all products of atoms raised to
//! rational exponents. [`Expr`] keeps such a product in normal form:
//! - terms sorted by the atom's `Ord`
//! - at most one term per atom
//! - no zero exponents
//!
//! Two expressions therefore denote the same product iff they compare equal,
//! regardless of the order in which they were built.

use crate::symbol::{exponent_suffix, SymbolText, TextEncoding};
use num_rational::Ratio;
use num_traits::Zero;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Rational exponent of an atom inside an [`Expr`].
pub type Exponent = Ratio<i64>;

/// An irreducible symbolic leaf.
///
/// `Ord` must be total and stable for the lifetime of the process; it is the
/// canonical ordering of terms.
pub trait Atom: Clone + Eq + Ord + Hash + fmt::Debug {
    fn symbol(&self) -> &SymbolText;
}

type Terms<A> = SmallVec<[(A, Exponent); 4]>;

/// Product of atoms raised to rational exponents, in canonical form.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Expr<A: Atom> {
    terms: Terms<A>,
}

impl<A: Atom> Expr<A> {
    /// The empty product.
    pub fn one() -> Self {
        Self {
            terms: SmallVec::new(),
        }
    }

    pub fn atom(atom: A) -> Self {
        Self::power(atom, Exponent::from_integer(1))
    }

    pub fn power(atom: A, exp: Exponent) -> Self {
        let mut terms = Terms::new();
        if !exp.is_zero() {
            terms.push((atom, exp));
        }
        Self { terms }
    }

    /// Builds a canonical expression from terms in any order, merging repeated atoms.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (A, Exponent)>,
    {
        terms
            .into_iter()
            .fold(Self::one(), |acc, (atom, exp)| acc.multiply(&Self::power(atom, exp)))
    }

    pub fn is_one(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&A, Exponent)> + '_ {
        self.terms.iter().map(|(atom, exp)| (atom, *exp))
    }

    pub fn exponent_of(&self, atom: &A) -> Exponent {
        self.terms
            .binary_search_by(|(probe, _)| probe.cmp(atom))
            .map(|idx| self.terms[idx].1)
            .unwrap_or_else(|_| Exponent::zero())
    }

    /// The atom itself when the expression is a single atom with exponent 1.
    pub fn as_atom(&self) -> Option<&A> {
        match self.terms.as_slice() {
            [(atom, exp)] if *exp == Exponent::from_integer(1) => Some(atom),
            _ => None,
        }
    }

    pub fn multiply(&self, other: &Self) -> Self {
        self.merge(other, |exp| exp)
    }

    pub fn divide(&self, other: &Self) -> Self {
        self.merge(other, |exp| -exp)
    }

    pub fn invert(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(atom, exp)| (atom.clone(), -*exp))
                .collect(),
        }
    }

    pub fn pow(&self, exp: Exponent) -> Self {
        if exp.is_zero() {
            return Self::one();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(atom, e)| (atom.clone(), *e * exp))
                .collect(),
        }
    }

    /// Replaces every atom by an expression over other atoms and multiplies the results.
    pub fn substitute<B, F>(&self, mut f: F) -> Expr<B>
    where
        B: Atom,
        F: FnMut(&A) -> Expr<B>,
    {
        self.terms.iter().fold(Expr::one(), |acc, (atom, exp)| {
            acc.multiply(&f(atom).pow(*exp))
        })
    }

    /// Renders the product as `a·b²/(c·d)`; the empty product renders as `1`.
    pub fn render(&self, encoding: TextEncoding) -> String {
        let separator = match encoding {
            TextEncoding::Unicode => "·",
            TextEncoding::Ascii => "*",
        };
        let join = |terms: &[(&A, Exponent)]| {
            terms
                .iter()
                .map(|(atom, exp)| {
                    format!(
                        "{}{}",
                        atom.symbol().get(encoding),
                        exponent_suffix(*exp, encoding)
                    )
                })
                .collect::<Vec<_>>()
                .join(separator)
        };

        let numerator: Vec<_> = self.terms().filter(|(_, exp)| *exp > Exponent::zero()).collect();
        let denominator: Vec<_> = self
            .terms()
            .filter(|(_, exp)| *exp < Exponent::zero())
            .map(|(atom, exp)| (atom, -exp))
            .collect();

        let head = if numerator.is_empty() {
            "1".to_string()
        } else {
            join(&numerator)
        };
        match denominator.len() {
            0 => head,
            1 => format!("{head}/{}", join(&denominator)),
            _ => format!("{head}/({})", join(&denominator)),
        }
    }

    fn merge(&self, other: &Self, sign: impl Fn(Exponent) -> Exponent) -> Self {
        let mut terms = Terms::with_capacity(self.terms.len() + other.terms.len());
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() || j < other.terms.len() {
            let ordering = match (self.terms.get(i), other.terms.get(j)) {
                (Some((lhs, _)), Some((rhs, _))) => lhs.cmp(rhs),
                (Some(_), None) => Ordering::Less,
                _ => Ordering::Greater,
            };
            match ordering {
                Ordering::Less => {
                    terms.push(self.terms[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    let (atom, exp) = &other.terms[j];
                    terms.push((atom.clone(), sign(*exp)));
                    j += 1;
                }
                Ordering::Equal => {
                    let exp = self.terms[i].1 + sign(other.terms[j].1);
                    if !exp.is_zero() {
                        terms.push((self.terms[i].0.clone(), exp));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        Self { terms }
    }
}

impl<A: Atom> Default for Expr<A> {
    fn default() -> Self {
        Self::one()
    }
}

impl<A: Atom> fmt::Debug for Expr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::Unicode))
    }
}

impl<A: Atom> fmt::Display for Expr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::from_formatter(f)))
    }
}

//! Dimensions: base atoms, named derived dimensions and their products.
//!
//! Every dimension expands to an [`Expr`] over [`BaseDimension`]s. Equality is
//! nominal for named dimensions (a named `frequency` is not `1/T`), while
//! [`Dimension::interconvertible`] only compares expansions, plus lineage when
//! both sides are named.

use crate::error::{Error, Result};
use crate::expr::{Atom, Exponent, Expr};
use crate::symbol::{next_declaration_id, SymbolText, TextEncoding};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::Arc;

struct BaseDimensionInner {
    id: u64,
    symbol: SymbolText,
}

/// An independent dimension such as length (`L`) or time (`T`).
#[derive(Clone)]
pub struct BaseDimension(Arc<BaseDimensionInner>);

impl BaseDimension {
    pub fn new(symbol: impl Into<SymbolText>) -> Self {
        Self(Arc::new(BaseDimensionInner {
            id: next_declaration_id(),
            symbol: symbol.into(),
        }))
    }
}

impl Atom for BaseDimension {
    fn symbol(&self) -> &SymbolText {
        &self.0.symbol
    }
}

impl PartialEq for BaseDimension {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BaseDimension {}

impl Hash for BaseDimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for BaseDimension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseDimension {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .symbol
            .cmp(&other.0.symbol)
            .then(self.0.id.cmp(&other.0.id))
    }
}

impl fmt::Debug for BaseDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.symbol.unicode())
    }
}

struct NamedDimensionInner {
    id: u64,
    symbol: SymbolText,
    parent: Option<NamedDimension>,
    expansion: Expr<BaseDimension>,
}

/// A derived dimension declared with its own identity (e.g. `frequency`).
#[derive(Clone)]
pub struct NamedDimension(Arc<NamedDimensionInner>);

impl NamedDimension {
    pub fn symbol(&self) -> &SymbolText {
        &self.0.symbol
    }

    pub fn parent(&self) -> Option<&NamedDimension> {
        self.0.parent.as_ref()
    }

    pub fn expansion(&self) -> &Expr<BaseDimension> {
        &self.0.expansion
    }

    /// True if `ancestor` is `self` or reachable through the parent chain.
    pub fn descends_from(&self, ancestor: &NamedDimension) -> bool {
        let mut current = Some(self);
        while let Some(dim) = current {
            if dim == ancestor {
                return true;
            }
            current = dim.parent();
        }
        false
    }
}

impl PartialEq for NamedDimension {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for NamedDimension {}

impl Hash for NamedDimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// A dimension in canonical form.
///
/// `Derived` never holds a single base dimension with exponent 1; such a
/// product is normalised to `Base`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Base(BaseDimension),
    Named(NamedDimension),
    Derived(Expr<BaseDimension>),
}

impl Dimension {
    /// The dimension of dimensionless quantities.
    pub fn one() -> Self {
        Dimension::Derived(Expr::one())
    }

    pub fn base(symbol: impl Into<SymbolText>) -> Self {
        Dimension::Base(BaseDimension::new(symbol))
    }

    /// Declares a named dimension defined as `definition`. A named definition
    /// becomes the parent, so the new dimension stays interconvertible with it.
    pub fn named(symbol: impl Into<SymbolText>, definition: &Dimension) -> Self {
        let parent = match definition {
            Dimension::Named(named) => Some(named.clone()),
            _ => None,
        };
        Dimension::Named(NamedDimension(Arc::new(NamedDimensionInner {
            id: next_declaration_id(),
            symbol: symbol.into(),
            parent,
            expansion: definition.expansion(),
        })))
    }

    /// Unnamed dimension with the given expansion.
    pub fn from_expansion(expansion: Expr<BaseDimension>) -> Self {
        match expansion.as_atom() {
            Some(base) => Dimension::Base(base.clone()),
            None => Dimension::Derived(expansion),
        }
    }

    pub fn expansion(&self) -> Expr<BaseDimension> {
        match self {
            Dimension::Base(base) => Expr::atom(base.clone()),
            Dimension::Named(named) => named.expansion().clone(),
            Dimension::Derived(expr) => expr.clone(),
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Dimension::Derived(expr) if expr.is_one())
    }

    pub fn multiply(&self, other: &Dimension) -> Dimension {
        Self::from_expansion(self.expansion().multiply(&other.expansion()))
    }

    pub fn divide(&self, other: &Dimension) -> Dimension {
        Self::from_expansion(self.expansion().divide(&other.expansion()))
    }

    pub fn invert(&self) -> Dimension {
        Self::from_expansion(self.expansion().invert())
    }

    /// Raises the dimension to `num/den`.
    ///
    /// # Panics
    /// If `den` is zero.
    pub fn pow(&self, num: i64, den: i64) -> Dimension {
        self.pow_exponent(Exponent::new(num, den))
    }

    pub fn pow_exponent(&self, exp: Exponent) -> Dimension {
        Self::from_expansion(self.expansion().pow(exp))
    }

    /// Same base expansion, and when both sides are named, one descends from the other.
    pub fn interconvertible(&self, other: &Dimension) -> bool {
        if self.expansion() != other.expansion() {
            return false;
        }
        match (self, other) {
            (Dimension::Named(a), Dimension::Named(b)) => a.descends_from(b) || b.descends_from(a),
            _ => true,
        }
    }

    /// The more specific of two interconvertible dimensions.
    pub fn common_dimension(&self, other: &Dimension) -> Result<Dimension> {
        if self == other {
            return Ok(self.clone());
        }
        if !self.interconvertible(other) {
            tracing::debug!(lhs = %self, rhs = %other, "no common dimension");
            return Err(Error::NoCommonDimension {
                lhs: self.to_string(),
                rhs: other.to_string(),
            });
        }
        let common = match (self, other) {
            (Dimension::Named(a), Dimension::Named(b)) => {
                if a.descends_from(b) {
                    self
                } else {
                    other
                }
            }
            (Dimension::Named(_), _) => self,
            (_, Dimension::Named(_)) => other,
            _ => self,
        };
        Ok(common.clone())
    }

    pub fn render(&self, encoding: TextEncoding) -> String {
        match self {
            Dimension::Base(base) => base.symbol().get(encoding).to_string(),
            Dimension::Named(named) => named.symbol().get(encoding).to_string(),
            Dimension::Derived(expr) => expr.render(encoding),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::from_formatter(f)))
    }
}

impl fmt::Debug for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Named(named) => write!(f, "{}[{:?}]", named.symbol().unicode(), named.expansion()),
            other => f.write_str(&other.render(TextEncoding::Unicode)),
        }
    }
}

impl Mul for &Dimension {
    type Output = Dimension;

    fn mul(self, rhs: &Dimension) -> Dimension {
        self.multiply(rhs)
    }
}

impl Mul for Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Dimension) -> Dimension {
        self.multiply(&rhs)
    }
}

impl Div for &Dimension {
    type Output = Dimension;

    fn div(self, rhs: &Dimension) -> Dimension {
        self.divide(rhs)
    }
}

impl Div for Dimension {
    type Output = Dimension;

    fn div(self, rhs: Dimension) -> Dimension {
        self.divide(&rhs)
    }
}

//! Units: named scale anchors and expressions over them.
//!
//! A base unit measures a named base quantity; every other named unit is
//! defined in terms of existing units, optionally scaled by a [`Magnitude`].
//! Each unit reduces to a [`CanonicalUnit`], a magnitude over base units,
//! which decides convertibility and conversion factors.

use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::expr::{Atom, Exponent, Expr};
use crate::magnitude::Magnitude;
use crate::point::PointOrigin;
use crate::quantity_spec::QuantitySpec;
use crate::symbol::{next_declaration_id, SymbolText, TextEncoding};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::Arc;

struct BaseUnitInner {
    id: u64,
    symbol: SymbolText,
}

/// Atom of a canonical unit: the identity of a declared base unit.
#[derive(Clone)]
pub struct BaseUnit(Arc<BaseUnitInner>);

impl Atom for BaseUnit {
    fn symbol(&self) -> &SymbolText {
        &self.0.symbol
    }
}

impl PartialEq for BaseUnit {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BaseUnit {}

impl Hash for BaseUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for BaseUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.symbol.cmp(&other.0.symbol).then(self.0.id.cmp(&other.0.id))
    }
}

impl fmt::Debug for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.symbol.unicode())
    }
}

/// A unit reduced to a magnitude over base units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUnit {
    pub magnitude: Magnitude,
    pub reference: Expr<BaseUnit>,
}

impl CanonicalUnit {
    fn multiply(&self, other: &CanonicalUnit) -> CanonicalUnit {
        CanonicalUnit {
            magnitude: self.magnitude.multiply(&other.magnitude),
            reference: self.reference.multiply(&other.reference),
        }
    }

    fn pow(&self, exp: Exponent) -> CanonicalUnit {
        CanonicalUnit {
            magnitude: self.magnitude.pow(exp),
            reference: self.reference.pow(exp),
        }
    }
}

enum UnitDefinition {
    Base { spec: QuantitySpec },
    Scaled(Unit),
}

struct NamedUnitInner {
    id: u64,
    symbol: SymbolText,
    definition: UnitDefinition,
    kind: Option<QuantitySpec>,
    origin: Option<PointOrigin>,
    canonical: CanonicalUnit,
}

/// A unit declared with its own symbol (`m`, `km`, `Hz`).
#[derive(Clone)]
pub struct NamedUnit(Arc<NamedUnitInner>);

impl NamedUnit {
    pub fn symbol(&self) -> &SymbolText {
        &self.0.symbol
    }

    pub fn is_base(&self) -> bool {
        matches!(self.0.definition, UnitDefinition::Base { .. })
    }

    pub fn definition(&self) -> Option<&Unit> {
        match &self.0.definition {
            UnitDefinition::Scaled(unit) => Some(unit),
            UnitDefinition::Base { .. } => None,
        }
    }

    pub fn canonical(&self) -> &CanonicalUnit {
        &self.0.canonical
    }

    pub fn quantity_spec(&self) -> QuantitySpec {
        if let Some(kind) = &self.0.kind {
            return kind.clone();
        }
        match &self.0.definition {
            UnitDefinition::Base { spec } => spec.clone(),
            UnitDefinition::Scaled(unit) => unit.quantity_spec(),
        }
    }

    /// The unit's own origin, or the one inherited from its definition.
    pub fn point_origin(&self) -> Option<PointOrigin> {
        self.0
            .origin
            .clone()
            .or_else(|| self.definition().and_then(Unit::point_origin))
    }
}

impl Atom for NamedUnit {
    fn symbol(&self) -> &SymbolText {
        &self.0.symbol
    }
}

impl PartialEq for NamedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for NamedUnit {}

impl Hash for NamedUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for NamedUnit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NamedUnit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.symbol.cmp(&other.0.symbol).then(self.0.id.cmp(&other.0.id))
    }
}

impl fmt::Debug for NamedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.symbol.unicode())
    }
}

/// A unit in normal form.
///
/// `Derived` never holds a single named unit with exponent 1 and `Scaled`
/// never wraps another `Scaled` or a magnitude of one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    Named(NamedUnit),
    Derived(Expr<NamedUnit>),
    Scaled(Magnitude, Box<Unit>),
}

impl Unit {
    pub fn builder(symbol: impl Into<SymbolText>) -> UnitBuilder {
        UnitBuilder {
            symbol: symbol.into(),
            definition: None,
            kind: None,
            origin: None,
        }
    }

    /// The unit of dimensionless values.
    pub fn one() -> Unit {
        Unit::Derived(Expr::one())
    }

    /// `unit` scaled by `magnitude`, rendered as `[magnitude unit]`.
    pub fn scaled(magnitude: Magnitude, unit: &Unit) -> Unit {
        let (inner, expr) = unit.decompose();
        Self::compose(magnitude.multiply(&inner), expr)
    }

    fn decompose(&self) -> (Magnitude, Expr<NamedUnit>) {
        match self {
            Unit::Named(named) => (Magnitude::one(), Expr::atom(named.clone())),
            Unit::Derived(expr) => (Magnitude::one(), expr.clone()),
            Unit::Scaled(magnitude, unit) => {
                let (inner, expr) = unit.decompose();
                (magnitude.multiply(&inner), expr)
            }
        }
    }

    fn compose(magnitude: Magnitude, expr: Expr<NamedUnit>) -> Unit {
        let unit = match expr.as_atom() {
            Some(named) => Unit::Named(named.clone()),
            None => Unit::Derived(expr),
        };
        if magnitude.is_one() {
            unit
        } else {
            Unit::Scaled(magnitude, Box::new(unit))
        }
    }

    pub fn as_named(&self) -> Option<&NamedUnit> {
        match self {
            Unit::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Unit::Derived(expr) if expr.is_one())
    }

    pub fn multiply(&self, other: &Unit) -> Unit {
        let (lhs_mag, lhs) = self.decompose();
        let (rhs_mag, rhs) = other.decompose();
        Self::compose(lhs_mag.multiply(&rhs_mag), lhs.multiply(&rhs))
    }

    pub fn divide(&self, other: &Unit) -> Unit {
        self.multiply(&other.invert())
    }

    pub fn invert(&self) -> Unit {
        self.pow_exponent(Exponent::from_integer(-1))
    }

    /// # Panics
    /// If `den` is zero.
    pub fn pow(&self, num: i64, den: i64) -> Unit {
        self.pow_exponent(Exponent::new(num, den))
    }

    pub fn pow_exponent(&self, exp: Exponent) -> Unit {
        let (magnitude, expr) = self.decompose();
        Self::compose(magnitude.pow(exp), expr.pow(exp))
    }

    pub fn canonical(&self) -> CanonicalUnit {
        match self {
            Unit::Named(named) => named.canonical().clone(),
            Unit::Derived(expr) => expr.terms().fold(
                CanonicalUnit {
                    magnitude: Magnitude::one(),
                    reference: Expr::one(),
                },
                |acc, (named, exp)| acc.multiply(&named.canonical().pow(exp)),
            ),
            Unit::Scaled(magnitude, unit) => {
                let inner = unit.canonical();
                CanonicalUnit {
                    magnitude: magnitude.multiply(&inner.magnitude),
                    reference: inner.reference,
                }
            }
        }
    }

    /// The quantity the unit was declared for; products follow the unit algebra.
    pub fn quantity_spec(&self) -> QuantitySpec {
        match self {
            Unit::Named(named) => named.quantity_spec(),
            Unit::Derived(expr) => expr
                .terms()
                .fold(QuantitySpec::dimensionless(), |acc, (named, exp)| {
                    acc.multiply(&named.quantity_spec().pow_exponent(exp))
                }),
            Unit::Scaled(_, unit) => unit.quantity_spec(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.quantity_spec().dimension()
    }

    pub fn point_origin(&self) -> Option<PointOrigin> {
        match self {
            Unit::Named(named) => named.point_origin(),
            Unit::Scaled(_, unit) => unit.point_origin(),
            Unit::Derived(_) => None,
        }
    }

    /// Same base-unit signature; only the magnitude may differ.
    pub fn convertible(&self, other: &Unit) -> bool {
        self.canonical().reference == other.canonical().reference
    }

    /// Same signature and magnitude (e.g. `N·m` and `J`).
    pub fn equivalent(&self, other: &Unit) -> bool {
        self.canonical() == other.canonical()
    }

    /// The factor a value in `self` is multiplied by to express it in `to`.
    pub fn conversion_factor(&self, to: &Unit) -> Result<Magnitude> {
        let (from, target) = (self.canonical(), to.canonical());
        if from.reference != target.reference {
            return Err(Error::UnitNotConvertible {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        Ok(from.magnitude.divide(&target.magnitude))
    }

    /// The largest unit both units are integral multiples of.
    pub fn common_unit(&self, other: &Unit) -> Result<Unit> {
        if self == other {
            return Ok(self.clone());
        }
        let (lhs, rhs) = (self.canonical(), other.canonical());
        if lhs.reference != rhs.reference {
            tracing::debug!(lhs = %self, rhs = %other, "units have no common unit");
            return Err(Error::UnitNotConvertible {
                from: self.to_string(),
                to: other.to_string(),
            });
        }
        let common = lhs.magnitude.common(&rhs.magnitude);
        if common == lhs.magnitude {
            Ok(self.clone())
        } else if common == rhs.magnitude {
            Ok(other.clone())
        } else {
            Ok(Unit::scaled(common.divide(&lhs.magnitude), self))
        }
    }

    pub fn render(&self, encoding: TextEncoding) -> String {
        match self {
            Unit::Named(named) => named.symbol().get(encoding).to_string(),
            Unit::Derived(expr) => expr.render(encoding),
            Unit::Scaled(magnitude, unit) if unit.is_one() => {
                format!("[{}]", magnitude.render(encoding))
            }
            Unit::Scaled(magnitude, unit) => {
                format!("[{} {}]", magnitude.render(encoding), unit.render(encoding))
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::from_formatter(f)))
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::Unicode))
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.multiply(rhs)
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        self.multiply(&rhs)
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.divide(rhs)
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        self.divide(&rhs)
    }
}

impl Mul<&Unit> for Magnitude {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        Unit::scaled(self, rhs)
    }
}

enum PendingUnit {
    Base(QuantitySpec),
    Scaled(Unit),
}

/// Declares a [`NamedUnit`].
pub struct UnitBuilder {
    symbol: SymbolText,
    definition: Option<PendingUnit>,
    kind: Option<QuantitySpec>,
    origin: Option<PointOrigin>,
}

impl UnitBuilder {
    /// Base unit of a named base quantity.
    pub fn base(mut self, spec: &QuantitySpec) -> Self {
        self.definition = Some(PendingUnit::Base(spec.strip_kind().clone()));
        self
    }

    pub fn defined_as(mut self, unit: &Unit) -> Self {
        self.definition = Some(PendingUnit::Scaled(unit.clone()));
        self
    }

    /// Restricts the unit to quantities of this kind (e.g. hertz for frequency).
    pub fn kind(mut self, spec: &QuantitySpec) -> Self {
        self.kind = Some(spec.strip_kind().clone());
        self
    }

    /// Default origin for quantity points expressed in this unit.
    pub fn point_origin(mut self, origin: &PointOrigin) -> Self {
        self.origin = Some(origin.clone());
        self
    }

    pub fn build(self) -> Result<Unit> {
        let name = self.symbol.unicode().to_string();
        let invalid = |message: &'static str| Error::InvalidDeclaration {
            name: name.clone(),
            message,
        };

        let (definition, canonical, dimension) = match self.definition {
            None => return Err(invalid("a unit needs a base quantity or a definition")),
            Some(PendingUnit::Base(spec)) => {
                if spec.as_named().is_none() {
                    return Err(invalid("base units are declared for a named quantity"));
                }
                let atom = BaseUnit(Arc::new(BaseUnitInner {
                    id: next_declaration_id(),
                    symbol: self.symbol.clone(),
                }));
                let canonical = CanonicalUnit {
                    magnitude: Magnitude::one(),
                    reference: Expr::atom(atom),
                };
                let dimension = spec.dimension();
                (UnitDefinition::Base { spec }, canonical, dimension)
            }
            Some(PendingUnit::Scaled(unit)) => {
                let canonical = unit.canonical();
                let dimension = unit.dimension();
                (UnitDefinition::Scaled(unit), canonical, dimension)
            }
        };

        if let Some(kind) = &self.kind {
            if kind.dimension().expansion() != dimension.expansion() {
                return Err(invalid("the kind does not match the unit's dimension"));
            }
        }
        if let Some(origin) = &self.origin {
            if origin.quantity_spec().dimension().expansion() != dimension.expansion() {
                return Err(invalid("the point origin is not of the unit's quantity"));
            }
        }

        tracing::trace!(unit = %name, magnitude = %canonical.magnitude, "declared unit");
        Ok(Unit::Named(NamedUnit(Arc::new(NamedUnitInner {
            id: next_declaration_id(),
            symbol: self.symbol,
            definition,
            kind: self.kind,
            origin: self.origin,
            canonical,
        }))))
    }
}

/// A named scale such as kilo (`k`, 10³).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    symbol: SymbolText,
    magnitude: Magnitude,
}

impl Prefix {
    pub fn new(symbol: impl Into<SymbolText>, magnitude: Magnitude) -> Self {
        Self {
            symbol: symbol.into(),
            magnitude,
        }
    }

    pub fn symbol(&self) -> &SymbolText {
        &self.symbol
    }

    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    /// Named unit `prefix·unit`, e.g. `km` from `m`.
    pub fn apply(&self, unit: &Unit) -> Unit {
        let spell = |encoding: TextEncoding| match unit {
            Unit::Named(_) => format!("{}{}", self.symbol.get(encoding), unit.render(encoding)),
            _ => format!("{}({})", self.symbol.get(encoding), unit.render(encoding)),
        };
        let symbol = SymbolText::with_ascii(&spell(TextEncoding::Unicode), &spell(TextEncoding::Ascii));
        let definition = Unit::scaled(self.magnitude.clone(), unit);
        let canonical = definition.canonical();
        Unit::Named(NamedUnit(Arc::new(NamedUnitInner {
            id: next_declaration_id(),
            symbol,
            definition: UnitDefinition::Scaled(definition),
            kind: None,
            origin: None,
            canonical,
        })))
    }
}

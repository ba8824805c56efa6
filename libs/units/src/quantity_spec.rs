//! Quantity specifications: named physical quantities layered over dimensions.
//!
//! A named spec is declared as a base quantity (tied to a dimension), as a
//! child of another named spec (`width` is a `length`), or by an equation over
//! other specs (`speed = length / time`). Products of specs are unnamed
//! [`QuantitySpec::Derived`] expressions, and [`QuantitySpec::Kind`] wraps a
//! kind root to accept every quantity of that kind.

use crate::dimension::Dimension;
use crate::error::{Error, Result};
use crate::expr::{Atom, Exponent, Expr};
use crate::symbol::{next_declaration_id, SymbolText, TextEncoding};
use crate::unit::Unit;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::Arc;

/// Tensor order a quantity is declared with. Ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuantityCharacter {
    #[default]
    Scalar,
    Vector,
    Tensor,
}

impl QuantityCharacter {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityCharacter::Scalar => "scalar",
            QuantityCharacter::Vector => "vector",
            QuantityCharacter::Tensor => "tensor",
        }
    }
}

/// How far a quantity of one spec may be converted into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecConvertibility {
    No,
    /// Only through `quantity_cast`.
    Cast,
    /// Through an explicit conversion.
    Explicit,
    Implicit,
}

enum Definition {
    Base,
    Child {
        parent: NamedQuantitySpec,
        equation: Option<QuantitySpec>,
    },
    Equation(QuantitySpec),
}

struct NamedQuantitySpecInner {
    id: u64,
    name: SymbolText,
    character: QuantityCharacter,
    definition: Definition,
    is_kind: bool,
    dimension: Dimension,
}

/// A declared quantity such as `length` or `velocity`.
#[derive(Clone)]
pub struct NamedQuantitySpec(Arc<NamedQuantitySpecInner>);

impl NamedQuantitySpec {
    pub fn name(&self) -> &SymbolText {
        &self.0.name
    }

    pub fn character(&self) -> QuantityCharacter {
        self.0.character
    }

    pub fn dimension(&self) -> &Dimension {
        &self.0.dimension
    }

    pub fn is_kind(&self) -> bool {
        self.0.is_kind
    }

    pub fn parent(&self) -> Option<&NamedQuantitySpec> {
        match &self.0.definition {
            Definition::Child { parent, .. } => Some(parent),
            _ => None,
        }
    }

    pub fn equation(&self) -> Option<&QuantitySpec> {
        match &self.0.definition {
            Definition::Child { equation, .. } => equation.as_ref(),
            Definition::Equation(equation) => Some(equation),
            Definition::Base => None,
        }
    }

    pub fn descends_from(&self, ancestor: &NamedQuantitySpec) -> bool {
        self.ancestors().any(|spec| spec == ancestor)
    }

    /// `self`, then each parent up to the top of the hierarchy.
    pub fn ancestors(&self) -> impl Iterator<Item = &NamedQuantitySpec> {
        std::iter::successors(Some(self), |spec| spec.parent())
    }

    /// Nearest ancestor marked as a kind, or the top of the hierarchy.
    pub fn kind_root(&self) -> &NamedQuantitySpec {
        let mut current = self;
        while !current.is_kind() {
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Base quantities this spec is made of; kinds stay opaque.
    fn ingredients(&self) -> Expr<NamedQuantitySpec> {
        if self.is_kind() {
            return Expr::atom(self.clone());
        }
        match &self.0.definition {
            Definition::Base => Expr::atom(self.clone()),
            Definition::Child {
                equation: Some(equation),
                ..
            } => equation.ingredients(),
            Definition::Child { parent, .. } => parent.ingredients(),
            Definition::Equation(equation) => equation.ingredients(),
        }
    }

    fn closest_common_ancestor(&self, other: &NamedQuantitySpec) -> Option<NamedQuantitySpec> {
        self.ancestors()
            .find(|candidate| other.descends_from(candidate))
            .cloned()
    }
}

impl Atom for NamedQuantitySpec {
    fn symbol(&self) -> &SymbolText {
        &self.0.name
    }
}

impl PartialEq for NamedQuantitySpec {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for NamedQuantitySpec {}

impl Hash for NamedQuantitySpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for NamedQuantitySpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NamedQuantitySpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.name.cmp(&other.0.name).then(self.0.id.cmp(&other.0.id))
    }
}

impl fmt::Debug for NamedQuantitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name.unicode())
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum QuantitySpec {
    Named(NamedQuantitySpec),
    Derived(Expr<NamedQuantitySpec>),
    /// Any quantity of the wrapped kind root.
    Kind(Box<QuantitySpec>),
}

impl QuantitySpec {
    /// Quantity spec of dimensionless ratios; the empty product.
    pub fn dimensionless() -> Self {
        QuantitySpec::Derived(Expr::one())
    }

    pub fn base(name: impl Into<SymbolText>, dimension: &Dimension) -> QuantitySpecBuilder {
        QuantitySpecBuilder::new(name.into(), PendingDefinition::Base(dimension.clone()))
    }

    pub fn child(name: impl Into<SymbolText>, parent: &QuantitySpec) -> QuantitySpecBuilder {
        QuantitySpecBuilder::new(name.into(), PendingDefinition::Child(parent.clone()))
    }

    pub fn derived(name: impl Into<SymbolText>, equation: &QuantitySpec) -> QuantitySpecBuilder {
        QuantitySpecBuilder::new(name.into(), PendingDefinition::Equation(equation.clone()))
    }

    fn from_expr(expr: Expr<NamedQuantitySpec>) -> Self {
        match expr.as_atom() {
            Some(named) => QuantitySpec::Named(named.clone()),
            None => QuantitySpec::Derived(expr),
        }
    }

    fn as_expr(&self) -> Expr<NamedQuantitySpec> {
        match self {
            QuantitySpec::Named(named) => Expr::atom(named.clone()),
            QuantitySpec::Derived(expr) => expr.clone(),
            QuantitySpec::Kind(inner) => inner.as_expr(),
        }
    }

    pub fn as_named(&self) -> Option<&NamedQuantitySpec> {
        match self {
            QuantitySpec::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn is_kind_of(&self) -> bool {
        matches!(self, QuantitySpec::Kind(_))
    }

    /// The spec without a `Kind` wrapper.
    pub fn strip_kind(&self) -> &QuantitySpec {
        match self {
            QuantitySpec::Kind(inner) => inner,
            other => other,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            QuantitySpec::Named(named) => named.dimension().clone(),
            QuantitySpec::Derived(expr) => expr.terms().fold(Dimension::one(), |acc, (spec, exp)| {
                acc.multiply(&spec.dimension().pow_exponent(exp))
            }),
            QuantitySpec::Kind(inner) => inner.dimension(),
        }
    }

    /// Highest character among the factors.
    pub fn character(&self) -> QuantityCharacter {
        match self {
            QuantitySpec::Named(named) => named.character(),
            QuantitySpec::Derived(expr) => expr
                .terms()
                .map(|(spec, _)| spec.character())
                .max()
                .unwrap_or_default(),
            QuantitySpec::Kind(inner) => inner.character(),
        }
    }

    pub fn kind_root(&self) -> QuantitySpec {
        match self {
            QuantitySpec::Named(named) => QuantitySpec::Named(named.kind_root().clone()),
            QuantitySpec::Derived(expr) => {
                Self::from_expr(expr.substitute(|spec| Expr::atom(spec.kind_root().clone())))
            }
            QuantitySpec::Kind(inner) => inner.kind_root(),
        }
    }

    /// `kind_of<root of self>`.
    pub fn kind_of(&self) -> QuantitySpec {
        match self {
            QuantitySpec::Kind(_) => self.clone(),
            other => QuantitySpec::Kind(Box::new(other.kind_root())),
        }
    }

    fn ingredients(&self) -> Expr<NamedQuantitySpec> {
        match self {
            QuantitySpec::Named(named) => named.ingredients(),
            QuantitySpec::Derived(expr) => expr.substitute(NamedQuantitySpec::ingredients),
            QuantitySpec::Kind(inner) => inner.ingredients(),
        }
    }

    pub fn multiply(&self, other: &QuantitySpec) -> QuantitySpec {
        let product = Self::from_expr(self.as_expr().multiply(&other.as_expr()));
        if self.is_kind_of() && other.is_kind_of() {
            product.kind_of()
        } else {
            product
        }
    }

    pub fn divide(&self, other: &QuantitySpec) -> QuantitySpec {
        self.multiply(&other.invert())
    }

    pub fn invert(&self) -> QuantitySpec {
        self.pow_exponent(Exponent::from_integer(-1))
    }

    /// # Panics
    /// If `den` is zero.
    pub fn pow(&self, num: i64, den: i64) -> QuantitySpec {
        self.pow_exponent(Exponent::new(num, den))
    }

    pub fn pow_exponent(&self, exp: Exponent) -> QuantitySpec {
        let power = Self::from_expr(self.as_expr().pow(exp));
        if self.is_kind_of() {
            power.kind_of()
        } else {
            power
        }
    }

    /// Decides how a quantity of `self` may become a quantity of `to`.
    pub fn convertible(&self, to: &QuantitySpec) -> SpecConvertibility {
        use QuantitySpec::{Kind, Named};

        if self == to {
            return SpecConvertibility::Implicit;
        }
        if !self.dimension().interconvertible(&to.dimension()) {
            return SpecConvertibility::No;
        }

        if matches!(self, Kind(_)) || matches!(to, Kind(_)) {
            let (from_root, to_root) = (self.kind_root(), to.kind_root());
            if from_root == to_root {
                return SpecConvertibility::Implicit;
            }
            if matches!((&from_root, &to_root), (Named(_), Named(_))) {
                return SpecConvertibility::No;
            }
            return if self.ingredients() == to.ingredients() {
                SpecConvertibility::Implicit
            } else {
                SpecConvertibility::No
            };
        }

        if let (Named(from), Named(to)) = (self, to) {
            if from.descends_from(to) {
                return SpecConvertibility::Implicit;
            }
            if to.descends_from(from) {
                return SpecConvertibility::Explicit;
            }
            if from.kind_root() == to.kind_root() {
                return SpecConvertibility::Cast;
            }
        }

        if self.ingredients() == to.ingredients() {
            return match (self, to) {
                (Named(_), Named(_)) => SpecConvertibility::Cast,
                _ => SpecConvertibility::Implicit,
            };
        }
        SpecConvertibility::No
    }

    pub fn implicitly_convertible(&self, to: &QuantitySpec) -> bool {
        self.convertible(to) == SpecConvertibility::Implicit
    }

    pub fn explicitly_convertible(&self, to: &QuantitySpec) -> bool {
        self.convertible(to) >= SpecConvertibility::Explicit
    }

    pub fn castable(&self, to: &QuantitySpec) -> bool {
        self.convertible(to) >= SpecConvertibility::Cast
    }

    /// The spec both operands of an addition or comparison convert to.
    pub fn common_quantity_spec(&self, other: &QuantitySpec) -> Result<QuantitySpec> {
        use QuantitySpec::{Kind, Named};

        if self == other {
            return Ok(self.clone());
        }
        let incompatible = || {
            tracing::debug!(lhs = %self, rhs = %other, "no common quantity spec");
            Error::IncompatibleQuantities {
                lhs: self.to_string(),
                rhs: other.to_string(),
            }
        };

        match (self, other) {
            (Kind(_), Kind(_)) => {
                if !self.implicitly_convertible(other) {
                    return Err(incompatible());
                }
                Ok(if matches!(self.kind_root(), Named(_)) {
                    self.clone()
                } else {
                    other.clone()
                })
            }
            (Kind(_), _) if self.implicitly_convertible(other) => Ok(other.clone()),
            (_, Kind(_)) if other.implicitly_convertible(self) => Ok(self.clone()),
            (Named(a), Named(b)) => a
                .closest_common_ancestor(b)
                .map(Named)
                .ok_or_else(incompatible),
            (Kind(_), _) | (_, Kind(_)) => Err(incompatible()),
            _ if self.ingredients() == other.ingredients() => Ok(match (self, other) {
                (Named(_), _) => self.clone(),
                (_, Named(_)) => other.clone(),
                _ => Self::from_expr(self.ingredients()),
            }),
            _ => Err(incompatible()),
        }
    }

    /// Whether `unit` may measure quantities of this spec.
    pub fn accepts_unit(&self, unit: &Unit) -> bool {
        self.unit_compatibility(unit) == SpecConvertibility::Implicit
    }

    /// Weak form used by explicit conversions: any relation between the kinds.
    pub fn accepts_unit_explicitly(&self, unit: &Unit) -> bool {
        self.unit_compatibility(unit) != SpecConvertibility::No
    }

    fn unit_compatibility(&self, unit: &Unit) -> SpecConvertibility {
        let unit_spec = unit.quantity_spec();
        if unit_spec.dimension().expansion() != self.dimension().expansion() {
            return SpecConvertibility::No;
        }
        unit_spec.kind_of().convertible(self)
    }

    pub fn render(&self, encoding: TextEncoding) -> String {
        match self {
            QuantitySpec::Named(named) => named.name().get(encoding).to_string(),
            QuantitySpec::Derived(expr) => expr.render(encoding),
            QuantitySpec::Kind(inner) => format!("kind_of<{}>", inner.render(encoding)),
        }
    }
}

impl fmt::Display for QuantitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::from_formatter(f)))
    }
}

impl fmt::Debug for QuantitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(TextEncoding::Unicode))
    }
}

impl Mul for &QuantitySpec {
    type Output = QuantitySpec;

    fn mul(self, rhs: &QuantitySpec) -> QuantitySpec {
        self.multiply(rhs)
    }
}

impl Mul for QuantitySpec {
    type Output = QuantitySpec;

    fn mul(self, rhs: QuantitySpec) -> QuantitySpec {
        self.multiply(&rhs)
    }
}

impl Div for &QuantitySpec {
    type Output = QuantitySpec;

    fn div(self, rhs: &QuantitySpec) -> QuantitySpec {
        self.divide(rhs)
    }
}

impl Div for QuantitySpec {
    type Output = QuantitySpec;

    fn div(self, rhs: QuantitySpec) -> QuantitySpec {
        self.divide(&rhs)
    }
}

enum PendingDefinition {
    Base(Dimension),
    Child(QuantitySpec),
    Equation(QuantitySpec),
}

/// Declares a [`NamedQuantitySpec`]; see [`QuantitySpec::base`],
/// [`QuantitySpec::child`] and [`QuantitySpec::derived`].
pub struct QuantitySpecBuilder {
    name: SymbolText,
    definition: PendingDefinition,
    equation: Option<QuantitySpec>,
    dimension: Option<Dimension>,
    character: Option<QuantityCharacter>,
    is_kind: bool,
}

impl QuantitySpecBuilder {
    fn new(name: SymbolText, definition: PendingDefinition) -> Self {
        Self {
            name,
            definition,
            equation: None,
            dimension: None,
            character: None,
            is_kind: false,
        }
    }

    /// Equation for a child spec; must have the parent's dimension.
    pub fn equation(mut self, equation: &QuantitySpec) -> Self {
        self.equation = Some(equation.clone());
        self
    }

    /// Declared dimension, cross-checked against the definition.
    pub fn dimension(mut self, dimension: &Dimension) -> Self {
        self.dimension = Some(dimension.clone());
        self
    }

    pub fn character(mut self, character: QuantityCharacter) -> Self {
        self.character = Some(character);
        self
    }

    pub fn scalar(self) -> Self {
        self.character(QuantityCharacter::Scalar)
    }

    pub fn vector(self) -> Self {
        self.character(QuantityCharacter::Vector)
    }

    pub fn tensor(self) -> Self {
        self.character(QuantityCharacter::Tensor)
    }

    /// Starts a new kind: the spec no longer converts implicitly to its parent's kind.
    pub fn is_kind(mut self) -> Self {
        self.is_kind = true;
        self
    }

    pub fn build(self) -> Result<QuantitySpec> {
        let name = self.name.unicode().to_string();
        let mismatch = |declared: &Dimension, derived: &Dimension| Error::SpecDimensionMismatch {
            name: name.clone(),
            declared: declared.to_string(),
            derived: derived.to_string(),
        };

        let (definition, derived_dimension, default_character) = match self.definition {
            PendingDefinition::Base(dimension) => {
                if self.equation.is_some() {
                    return Err(Error::InvalidDeclaration {
                        name: name.clone(),
                        message: "base quantities cannot have an equation",
                    });
                }
                (Definition::Base, dimension, QuantityCharacter::Scalar)
            }
            PendingDefinition::Child(parent) => {
                let Some(parent) = parent.as_named().cloned() else {
                    return Err(Error::InvalidDeclaration {
                        name: name.clone(),
                        message: "the parent of a quantity must be a named quantity",
                    });
                };
                let dimension = parent.dimension().clone();
                if let Some(equation) = &self.equation {
                    if !equation.dimension().interconvertible(&dimension) {
                        return Err(mismatch(&dimension, &equation.dimension()));
                    }
                }
                let character = parent.character();
                (
                    Definition::Child {
                        parent,
                        equation: self.equation,
                    },
                    dimension,
                    character,
                )
            }
            PendingDefinition::Equation(equation) => {
                if self.equation.is_some() {
                    return Err(Error::InvalidDeclaration {
                        name: name.clone(),
                        message: "derived quantities take a single equation",
                    });
                }
                let dimension = equation.dimension();
                let character = equation.character();
                (Definition::Equation(equation), dimension, character)
            }
        };

        let dimension = match self.dimension {
            Some(declared) if !declared.interconvertible(&derived_dimension) => {
                return Err(mismatch(&declared, &derived_dimension));
            }
            Some(declared) => declared,
            None => derived_dimension,
        };

        Ok(QuantitySpec::Named(NamedQuantitySpec(Arc::new(
            NamedQuantitySpecInner {
                id: next_declaration_id(),
                name: self.name,
                character: self.character.unwrap_or(default_character),
                definition,
                is_kind: self.is_kind,
                dimension,
            },
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SpecConvertibility::*;

    struct Isq {
        length: QuantitySpec,
        width: QuantitySpec,
        height: QuantitySpec,
        time: QuantitySpec,
        speed: QuantitySpec,
        velocity: QuantitySpec,
        displacement: QuantitySpec,
    }

    fn isq() -> Isq {
        let dim_l = Dimension::base("L");
        let dim_t = Dimension::base("T");
        let length = QuantitySpec::base("length", &dim_l).build().unwrap();
        let time = QuantitySpec::base("time", &dim_t).build().unwrap();
        let width = QuantitySpec::child("width", &length).build().unwrap();
        let height = QuantitySpec::child("height", &length).build().unwrap();
        let displacement = QuantitySpec::child("displacement", &length)
            .vector()
            .build()
            .unwrap();
        let speed = QuantitySpec::derived("speed", &(&length / &time)).build().unwrap();
        let velocity = QuantitySpec::child("velocity", &speed)
            .equation(&(&displacement / &time))
            .vector()
            .build()
            .unwrap();
        Isq {
            length,
            width,
            height,
            time,
            speed,
            velocity,
            displacement,
        }
    }

    #[test]
    fn hierarchy_decides_convertibility() {
        let q = isq();
        assert_eq!(q.width.convertible(&q.length), Implicit);
        assert_eq!(q.length.convertible(&q.width), Explicit);
        assert_eq!(q.width.convertible(&q.height), Cast);
        assert_eq!(q.length.convertible(&q.time), No);
        assert_eq!(q.velocity.convertible(&q.speed), Implicit);
    }

    #[test]
    fn kinds_convert_implicitly_within_the_kind() {
        let q = isq();
        let kind_length = q.length.kind_of();
        assert_eq!(kind_length.convertible(&q.width), Implicit);
        assert_eq!(q.height.convertible(&kind_length), Implicit);
        assert_eq!(q.width.kind_of(), kind_length);
        assert_eq!(kind_length.convertible(&q.time.kind_of()), No);

        let kind_speed = (&q.length / &q.time).kind_of();
        assert_eq!(kind_speed.convertible(&q.speed), Implicit);
    }

    #[test]
    fn equations_are_checked_against_the_parent() {
        let q = isq();
        let bad = QuantitySpec::child("bad_velocity", &q.speed)
            .equation(&(&q.length * &q.time))
            .build();
        assert!(matches!(bad, Err(Error::SpecDimensionMismatch { .. })));

        let orphan = QuantitySpec::child("orphan", &(&q.length / &q.time)).build();
        assert!(matches!(orphan, Err(Error::InvalidDeclaration { .. })));
    }

    #[test]
    fn derived_products_match_named_equations() {
        let q = isq();
        let product = &q.length / &q.time;
        assert_eq!(product.convertible(&q.speed), Implicit);
        assert_eq!(q.speed.convertible(&product), Implicit);
        assert!(matches!(&q.speed * &q.time, QuantitySpec::Derived(_)));
        assert_eq!((&q.speed * &q.time).convertible(&q.length), Implicit);
        assert_eq!(product.dimension(), q.speed.dimension());
    }

    #[test]
    fn characters() {
        let q = isq();
        assert_eq!(q.displacement.character(), QuantityCharacter::Vector);
        assert_eq!(q.width.character(), QuantityCharacter::Scalar);
        assert_eq!((&q.displacement / &q.time).character(), QuantityCharacter::Vector);
    }

    #[test]
    fn common_spec_is_the_closest_ancestor() {
        let q = isq();
        assert_eq!(q.width.common_quantity_spec(&q.height).unwrap(), q.length);
        assert_eq!(q.height.common_quantity_spec(&q.width).unwrap(), q.length);
        assert_eq!(q.width.common_quantity_spec(&q.length).unwrap(), q.length);
        assert_eq!(q.length.kind_of().common_quantity_spec(&q.width).unwrap(), q.width);
        assert_eq!((&q.length / &q.time).common_quantity_spec(&q.speed).unwrap(), q.speed);
        assert!(q.length.common_quantity_spec(&q.time).is_err());
    }

    #[test]
    fn renders_names() {
        let q = isq();
        assert_eq!(q.speed.to_string(), "speed");
        assert_eq!((&q.length / &q.time).to_string(), "length/time");
        assert_eq!(q.length.kind_of().to_string(), "kind_of<length>");
    }
}

//! A quantity spec paired with the unit its values are measured in.

use crate::error::{Error, Result};
use crate::expr::Exponent;
use crate::quantity_spec::QuantitySpec;
use crate::symbol::TextEncoding;
use crate::unit::Unit;
use std::fmt;
use std::ops::{Div, Mul};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    spec: QuantitySpec,
    unit: Unit,
}

impl Reference {
    /// Fails with [`Error::UnitNotOf`] when `unit` cannot measure `spec`.
    pub fn new(spec: &QuantitySpec, unit: &Unit) -> Result<Self> {
        if !spec.accepts_unit(unit) {
            tracing::debug!(unit = %unit, spec = %spec, "unit rejected for quantity");
            return Err(Error::UnitNotOf {
                unit: unit.to_string(),
                spec: spec.to_string(),
            });
        }
        Ok(Self::new_unchecked(spec.clone(), unit.clone()))
    }

    pub(crate) fn new_unchecked(spec: QuantitySpec, unit: Unit) -> Self {
        Self { spec, unit }
    }

    pub fn quantity_spec(&self) -> &QuantitySpec {
        &self.spec
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Same spec, different unit; checked like [`Reference::new`].
    pub fn with_unit(&self, unit: &Unit) -> Result<Self> {
        Self::new(&self.spec, unit)
    }

    pub fn multiply(&self, other: &Reference) -> Reference {
        Self::new_unchecked(self.spec.multiply(&other.spec), self.unit.multiply(&other.unit))
    }

    pub fn divide(&self, other: &Reference) -> Reference {
        Self::new_unchecked(self.spec.divide(&other.spec), self.unit.divide(&other.unit))
    }

    pub fn invert(&self) -> Reference {
        Self::new_unchecked(self.spec.invert(), self.unit.invert())
    }

    pub fn pow_exponent(&self, exp: Exponent) -> Reference {
        Self::new_unchecked(self.spec.pow_exponent(exp), self.unit.pow_exponent(exp))
    }
}

impl QuantitySpec {
    /// `spec[unit]`.
    pub fn with_unit(&self, unit: &Unit) -> Result<Reference> {
        Reference::new(self, unit)
    }
}

/// A bare unit measures any quantity of its kind.
impl From<&Unit> for Reference {
    fn from(unit: &Unit) -> Self {
        Self::new_unchecked(unit.quantity_spec().kind_of(), unit.clone())
    }
}

impl From<Unit> for Reference {
    fn from(unit: Unit) -> Self {
        Reference::from(&unit)
    }
}

impl From<&Reference> for Reference {
    fn from(reference: &Reference) -> Self {
        reference.clone()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unit.render(TextEncoding::from_formatter(f)))
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{:?}]", self.spec, self.unit)
    }
}

impl Mul for &Reference {
    type Output = Reference;

    fn mul(self, rhs: &Reference) -> Reference {
        self.multiply(rhs)
    }
}

impl Div for &Reference {
    type Output = Reference;

    fn div(self, rhs: &Reference) -> Reference {
        self.divide(rhs)
    }
}

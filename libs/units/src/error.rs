use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("dimensions '{lhs}' and '{rhs}' have no common dimension")]
    NoCommonDimension { lhs: String, rhs: String },

    #[error("unit '{from}' is not convertible to '{to}'")]
    UnitNotConvertible { from: String, to: String },

    #[error("The result of scaling '{from}' to '{to}' overflows the '{rep}' representation type")]
    ScalingOverflow {
        from: String,
        to: String,
        rep: &'static str,
    },

    #[error("unit '{unit}' cannot be used to measure '{spec}'")]
    UnitNotOf { unit: String, spec: String },

    #[error("'{from}' is not implicitly convertible to '{to}'")]
    NotImplicitlyConvertible { from: String, to: String },

    #[error("converting '{from}' to '{to}' may truncate the '{rep}' representation; use an explicit cast")]
    TruncatingConversion {
        from: String,
        to: String,
        rep: &'static str,
    },

    #[error("value {value} is out of range of the '{rep}' representation type")]
    ValueOutOfRange { value: String, rep: &'static str },

    #[error("'{rep}' cannot represent {character} quantity '{spec}'")]
    CharacterMismatch {
        rep: &'static str,
        character: &'static str,
        spec: String,
    },

    #[error("quantity '{name}' declares dimension '{declared}' but its definition has dimension '{derived}'")]
    SpecDimensionMismatch {
        name: String,
        declared: String,
        derived: String,
    },

    #[error("incompatible quantities: '{lhs}' and '{rhs}'")]
    IncompatibleQuantities { lhs: String, rhs: String },

    #[error("point origins '{lhs}' and '{rhs}' do not share an absolute origin")]
    UnrelatedOrigins { lhs: String, rhs: String },

    #[error("invalid declaration of '{name}': {message}")]
    InvalidDeclaration { name: String, message: &'static str },
}

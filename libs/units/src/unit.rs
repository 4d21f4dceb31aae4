//! Unit records: atomic units, binary compounds, and the sum type that
//! unifies them.

use std::fmt;
use std::sync::Arc;

use crate::decimal::Decimal;
use crate::error::{Error, Result};

/// Physical dimension of an atomic unit.
///
/// Compound units report [`Dimension::Invalid`] at the top level; their
/// numerator and denominator carry the real dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Invalid,
    Energy,
    Mass,
    Volume,
    Time,
    Length,
}

impl Dimension {
    /// The five real dimensions, excluding `Invalid`.
    pub const ALL: [Dimension; 5] = [
        Dimension::Energy,
        Dimension::Mass,
        Dimension::Volume,
        Dimension::Time,
        Dimension::Length,
    ];

    /// Map a table cell to a dimension. Unknown or empty strings map to
    /// `Invalid` rather than erroring.
    pub fn parse(s: &str) -> Self {
        match s {
            "Energy" => Dimension::Energy,
            "Mass" => Dimension::Mass,
            "Volume" => Dimension::Volume,
            "Time" => Dimension::Time,
            "Length" => Dimension::Length,
            _ => Dimension::Invalid,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Invalid => "Invalid",
            Dimension::Energy => "Energy",
            Dimension::Mass => "Mass",
            Dimension::Volume => "Volume",
            Dimension::Time => "Time",
            Dimension::Length => "Length",
        };
        f.write_str(name)
    }
}

/// An atomic named unit with a linear conversion to the SI reference
/// unit of its dimension: `si_value = value * si_factor + si_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaUnit {
    name: String,
    label: String,
    dimension: Dimension,
    si: String,
    si_factor: Decimal,
    si_offset: Decimal,
}

impl MetaUnit {
    pub(crate) fn new(
        name: String,
        label: String,
        dimension: Dimension,
        si: String,
        si_factor: Decimal,
        si_offset: Decimal,
    ) -> Self {
        Self {
            name,
            label,
            dimension,
            si,
            si_factor,
            si_offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn si_name(&self) -> &str {
        &self.si
    }

    pub fn si_factors(&self) -> (Decimal, Decimal) {
        (self.si_factor, self.si_offset)
    }
}

/// A strictly binary `numerator/denominator` unit built from two metas
/// of differing dimensions, e.g. `Gg/10^3m3`. The combined SI factor is
/// precomputed at catalog construction; compounds never carry an
/// offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundUnit {
    numerator: Arc<MetaUnit>,
    denominator: Arc<MetaUnit>,
    si_factor: Decimal,
}

impl CompoundUnit {
    /// e.g. energy unit Tj to J (SI) is 1e12, mass unit Gg to kg (SI)
    /// is 1e6, so the SI factor of Tj/Gg is 1e12/1e6 = 1e6.
    pub(crate) fn new(numerator: Arc<MetaUnit>, denominator: Arc<MetaUnit>) -> Result<Self> {
        let (num_factor, _) = numerator.si_factors();
        let (den_factor, _) = denominator.si_factors();
        let si_factor = num_factor.checked_div(den_factor).ok_or_else(|| {
            Error::Table(format!("unit '{}' has zero SI factor", denominator.name()))
        })?;
        Ok(Self {
            numerator,
            denominator,
            si_factor,
        })
    }

    pub fn numerator(&self) -> &MetaUnit {
        &self.numerator
    }

    pub fn denominator(&self) -> &MetaUnit {
        &self.denominator
    }

    pub fn name(&self) -> String {
        format!("{}/{}", self.numerator.name(), self.denominator.name())
    }

    pub fn si_name(&self) -> String {
        format!("{}/{}", self.numerator.si_name(), self.denominator.si_name())
    }

    pub fn si_factors(&self) -> (Decimal, Decimal) {
        (self.si_factor, Decimal::ZERO)
    }
}

/// Any resolvable unit: an atomic meta unit or a binary compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Meta(Arc<MetaUnit>),
    Compound(Arc<CompoundUnit>),
}

impl Unit {
    pub fn name(&self) -> String {
        match self {
            Unit::Meta(u) => u.name().to_string(),
            Unit::Compound(u) => u.name(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Unit::Meta(u) => u.label().to_string(),
            Unit::Compound(u) => u.name(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Meta(u) => u.dimension(),
            Unit::Compound(_) => Dimension::Invalid,
        }
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Unit::Meta(_))
    }

    pub fn si_name(&self) -> String {
        match self {
            Unit::Meta(u) => u.si_name().to_string(),
            Unit::Compound(u) => u.si_name(),
        }
    }

    pub fn si_factors(&self) -> (Decimal, Decimal) {
        match self {
            Unit::Meta(u) => u.si_factors(),
            Unit::Compound(u) => u.si_factors(),
        }
    }
}

/// A unit name starting with a digit is ambiguous next to a numeric
/// literal (`110^3m3` could split two ways), so such names also exist
/// in a bracketed form: `(10^3m3)`.
pub fn ambiguous_name(name: &str) -> Option<String> {
    if name.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        Some(format!("({name})"))
    } else {
        None
    }
}

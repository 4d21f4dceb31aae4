//! Dimension-checked arithmetic over exact decimals.
//!
//! Every binary operation first negotiates a common footing for the two
//! operands (which side converts to SI, which unit the result carries,
//! whether the result is unitless) and only then performs the decimal
//! arithmetic. Units are never factored: `m * m` stays `m`, not `m²`.

use std::fmt;

use crate::catalog;
use crate::decimal::Decimal;
use crate::error::{Error, Result};
use crate::unit::{ambiguous_name, Unit};

/// An exact decimal paired with a unit name, or a unitless scalar.
///
/// Values are immutable; every operation returns a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureValue {
    value: Decimal,
    unit: String,
    unitless: bool,
}

/// Outcome of operand negotiation: both sides on a common footing plus
/// the unit the result will carry.
struct OpStat {
    unitless: bool,
    lhs: MeasureValue,
    rhs: MeasureValue,
    target_unit: String,
}

impl OpStat {
    fn unitless(lhs: MeasureValue, rhs: MeasureValue) -> Self {
        Self {
            unitless: true,
            lhs,
            rhs,
            target_unit: String::new(),
        }
    }

    fn apply(self, value: Decimal) -> MeasureValue {
        MeasureValue {
            value,
            unit: self.target_unit,
            unitless: self.unitless,
        }
    }
}

impl MeasureValue {
    pub fn unitless(value: Decimal) -> Self {
        Self {
            value,
            unit: String::new(),
            unitless: true,
        }
    }

    pub fn with_unit(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            unitless: false,
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn is_unitless(&self) -> bool {
        self.unitless
    }

    /// Convert through the given unit to its SI reference:
    /// `si_value = value * factor + offset`.
    pub fn to_si(&self, unit: &Unit) -> MeasureValue {
        let (factor, offset) = unit.si_factors();
        MeasureValue {
            value: self.value * factor + offset,
            unit: unit.si_name(),
            unitless: false,
        }
    }

    /// Convert to the named target unit. Identity when the names match;
    /// otherwise route through SI.
    pub fn to(&self, target: &str) -> Result<MeasureValue> {
        if self.unit == target {
            return Ok(self.clone());
        }
        let cat = catalog();
        let target_unit = cat
            .get(target)
            .ok_or_else(|| Error::UnknownUnit(target.to_string()))?;
        let own = cat
            .get(&self.unit)
            .ok_or_else(|| Error::UnknownUnit(self.unit.clone()))?;
        let si = self.to_si(own);
        if si.unit == target_unit.name() {
            return Ok(si);
        }
        let (factor, offset) = target_unit.si_factors();
        let value = si.value.checked_div(factor).ok_or(Error::DivisionByZero)? - offset;
        Ok(MeasureValue {
            value,
            unit: target_unit.name(),
            unitless: false,
        })
    }

    pub fn add(&self, other: &MeasureValue) -> Result<MeasureValue> {
        let stat = self.negotiate_additive(other)?;
        let value = stat.lhs.value + stat.rhs.value;
        Ok(stat.apply(value))
    }

    pub fn sub(&self, other: &MeasureValue) -> Result<MeasureValue> {
        let stat = self.negotiate_additive(other)?;
        let value = stat.lhs.value - stat.rhs.value;
        Ok(stat.apply(value))
    }

    pub fn mul(&self, other: &MeasureValue) -> Result<MeasureValue> {
        let stat = self.negotiate_multiplicative(other)?;
        let value = stat.lhs.value * stat.rhs.value;
        Ok(stat.apply(value))
    }

    pub fn div(&self, other: &MeasureValue) -> Result<MeasureValue> {
        let stat = self.negotiate_divisive(other)?;
        let value = stat
            .lhs
            .value
            .checked_div(stat.rhs.value)
            .ok_or(Error::DivisionByZero)?;
        Ok(stat.apply(value))
    }

    /// Numeric negation, keeping the unit and unitless flag intact.
    pub fn neg(&self) -> MeasureValue {
        MeasureValue {
            value: -self.value,
            unit: self.unit.clone(),
            unitless: self.unitless,
        }
    }

    fn incompatible(&self, other: &MeasureValue) -> Error {
        Error::Incompatible {
            lhs: self.unit.clone(),
            rhs: other.unit.clone(),
        }
    }

    fn resolve(&self) -> Result<&'static Unit> {
        catalog()
            .get(&self.unit)
            .ok_or_else(|| Error::UnknownUnit(self.unit.clone()))
    }

    /// Addition and subtraction share one rule: both sides unitless, or
    /// both unit-bearing with equal dimensions, converted to SI.
    fn negotiate_additive(&self, other: &MeasureValue) -> Result<OpStat> {
        match (self.unitless, other.unitless) {
            (true, true) => Ok(OpStat::unitless(self.clone(), other.clone())),
            (true, false) | (false, true) => Err(self.incompatible(other)),
            (false, false) => {
                let u = self.resolve()?;
                let ou = other.resolve()?;
                if !same_dimensions(u, ou) {
                    return Err(self.incompatible(other));
                }
                let lhs = self.to_si(u);
                let rhs = other.to_si(ou);
                let target_unit = lhs.unit.clone();
                Ok(OpStat {
                    unitless: false,
                    lhs,
                    rhs,
                    target_unit,
                })
            }
        }
    }

    fn negotiate_multiplicative(&self, other: &MeasureValue) -> Result<OpStat> {
        match (self.unitless, other.unitless) {
            (true, true) => Ok(OpStat::unitless(self.clone(), other.clone())),
            // A unitless side acts as a plain coefficient: the result
            // keeps the measured side's unit verbatim, no SI conversion.
            (true, false) => other.resolve().map(|_| OpStat {
                unitless: false,
                lhs: self.clone(),
                rhs: other.clone(),
                target_unit: other.unit.clone(),
            }),
            (false, true) => self.resolve().map(|_| OpStat {
                unitless: false,
                lhs: self.clone(),
                rhs: other.clone(),
                target_unit: self.unit.clone(),
            }),
            (false, false) => {
                let u = self.resolve()?;
                let ou = other.resolve()?;
                match (u, ou) {
                    (Unit::Meta(_), Unit::Meta(_)) | (Unit::Compound(_), Unit::Compound(_)) => {
                        if !same_dimensions(u, ou) {
                            return Err(self.incompatible(other));
                        }
                        let lhs = self.to_si(u);
                        let rhs = other.to_si(ou);
                        let target_unit = lhs.unit.clone();
                        Ok(OpStat {
                            unitless: false,
                            lhs,
                            rhs,
                            target_unit,
                        })
                    }
                    // Meta times compound cancels the compound's
                    // denominator: m3 * kg/m3 = kg. The denominator
                    // dimension must match the meta's.
                    (Unit::Meta(mu), Unit::Compound(cu)) => {
                        if cu.denominator().dimension() != mu.dimension() {
                            return Err(self.incompatible(other));
                        }
                        Ok(OpStat {
                            unitless: false,
                            lhs: self.to_si(u),
                            rhs: other.to_si(ou),
                            target_unit: cu.numerator().si_name().to_string(),
                        })
                    }
                    (Unit::Compound(cu), Unit::Meta(mu)) => {
                        if cu.denominator().dimension() != mu.dimension() {
                            return Err(self.incompatible(other));
                        }
                        Ok(OpStat {
                            unitless: false,
                            lhs: self.to_si(u),
                            rhs: other.to_si(ou),
                            target_unit: cu.numerator().si_name().to_string(),
                        })
                    }
                }
            }
        }
    }

    fn negotiate_divisive(&self, other: &MeasureValue) -> Result<OpStat> {
        match (self.unitless, other.unitless) {
            (true, true) => Ok(OpStat::unitless(self.clone(), other.clone())),
            // The measured side donates the unit; the quotient is still
            // dividend / divisor.
            (true, false) => other.resolve().map(|_| OpStat {
                unitless: false,
                lhs: self.clone(),
                rhs: other.clone(),
                target_unit: other.unit.clone(),
            }),
            (false, true) => self.resolve().map(|_| OpStat {
                unitless: false,
                lhs: self.clone(),
                rhs: other.clone(),
                target_unit: self.unit.clone(),
            }),
            (false, false) => {
                let u = self.resolve()?;
                let ou = other.resolve()?;
                match (u, ou) {
                    (Unit::Meta(_), Unit::Meta(_)) | (Unit::Compound(_), Unit::Compound(_)) => {
                        if !same_dimensions(u, ou) {
                            return Err(self.incompatible(other));
                        }
                        let lhs = self.to_si(u);
                        let rhs = other.to_si(ou);
                        let target_unit = lhs.unit.clone();
                        Ok(OpStat {
                            unitless: false,
                            lhs,
                            rhs,
                            target_unit,
                        })
                    }
                    // Meta against compound has no sensible quotient
                    // unit in a non-factoring algebra.
                    _ => Err(self.incompatible(other)),
                }
            }
        }
    }
}

/// Dimension equality for same-kind units. Compounds compare the
/// numerator and denominator dimensions componentwise; mixed kinds are
/// never equal.
fn same_dimensions(a: &Unit, b: &Unit) -> bool {
    match (a, b) {
        (Unit::Meta(x), Unit::Meta(y)) => x.dimension() == y.dimension(),
        (Unit::Compound(x), Unit::Compound(y)) => {
            x.numerator().dimension() == y.numerator().dimension()
                && x.denominator().dimension() == y.denominator().dimension()
        }
        _ => false,
    }
}

impl fmt::Display for MeasureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.normalize();
        if self.unit.is_empty() {
            return write!(f, "{value}");
        }
        match ambiguous_name(&self.unit) {
            Some(bracketed) => write!(f, "{value}{bracketed}"),
            None => write!(f, "{value}{}", self.unit),
        }
    }
}

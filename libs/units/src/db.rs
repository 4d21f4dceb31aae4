//! The unit catalog: parses the embedded table, synthesizes every
//! binary compound unit, and answers name lookups plus the
//! longest-match peek used by the lexer.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::decimal;
use crate::error::{Error, Result};
use crate::unit::{ambiguous_name, CompoundUnit, Dimension, MetaUnit, Unit};

pub struct UnitCatalog {
    units: HashMap<String, Unit>,
    by_dimension: HashMap<Dimension, Vec<Arc<MetaUnit>>>,
    /// Every peekable name (bracketed alternates included), longest
    /// first so a prefix scan finds the maximal match.
    names: Vec<String>,
}

impl UnitCatalog {
    /// Build a catalog from CSV rows of
    /// `name,label,dimension,si_name,si_factor,si_offset`.
    pub fn from_csv(data: &str) -> Result<Self> {
        let mut units: HashMap<String, Unit> = HashMap::new();
        let mut by_dimension: HashMap<Dimension, Vec<Arc<MetaUnit>>> = HashMap::new();
        let mut names: Vec<String> = Vec::new();

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        for row in reader.records() {
            let row = row.map_err(|e| Error::Table(e.to_string()))?;
            if row.len() != 6 {
                return Err(Error::Table(format!(
                    "expected 6 columns, found {}",
                    row.len()
                )));
            }
            let unit = Arc::new(MetaUnit::new(
                row[0].to_string(),
                row[1].to_string(),
                Dimension::parse(&row[2]),
                row[3].to_string(),
                decimal::parse(&row[4])?,
                decimal::parse(&row[5])?,
            ));
            names.push(unit.name().to_string());
            if let Some(bracketed) = ambiguous_name(unit.name()) {
                units.insert(bracketed.clone(), Unit::Meta(unit.clone()));
                names.push(bracketed);
            }
            units.insert(unit.name().to_string(), Unit::Meta(unit.clone()));
            by_dimension.entry(unit.dimension()).or_default().push(unit);
        }

        // One compound per (numerator, denominator) meta pair across
        // every ordered pair of distinct dimensions.
        for num_dim in Dimension::ALL {
            for den_dim in Dimension::ALL {
                if num_dim == den_dim {
                    continue;
                }
                let (Some(nums), Some(dens)) =
                    (by_dimension.get(&num_dim), by_dimension.get(&den_dim))
                else {
                    continue;
                };
                for num in nums {
                    for den in dens {
                        let compound = Arc::new(CompoundUnit::new(num.clone(), den.clone())?);
                        let name = compound.name();
                        names.push(name.clone());
                        if let Some(bracketed) = ambiguous_name(&name) {
                            units.insert(bracketed.clone(), Unit::Compound(compound.clone()));
                            names.push(bracketed);
                        }
                        units.insert(name, Unit::Compound(compound));
                    }
                }
            }
        }

        names.sort_by(|a, b| b.len().cmp(&a.len()));
        debug!(units = units.len(), names = names.len(), "unit catalog built");

        Ok(Self {
            units,
            by_dimension,
            names,
        })
    }

    /// If `s` starts with a unit name followed by a separator, return
    /// the matched length (brackets included for bracketed forms).
    ///
    /// The separator check keeps a unit token from being carved out of
    /// a longer identifier: `m` must not match inside `measured`.
    pub fn peek(&self, s: &str) -> Option<usize> {
        let bytes = s.as_bytes();
        for name in &self.names {
            let n = name.len();
            if bytes.len() < n {
                continue;
            }
            if &bytes[..n] == name.as_bytes()
                && bytes.get(n).map_or(true, |&c| is_separator(c))
            {
                return Some(n);
            }
        }
        None
    }

    /// Exact-key lookup, bracketed alternates included.
    pub fn is_unit(&self, s: &str) -> bool {
        self.units.contains_key(s)
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Meta units of the listed dimensions, in input dimension order,
    /// stably sorted by label.
    pub fn meta_units_by_dims(&self, dims: &[Dimension]) -> Vec<Arc<MetaUnit>> {
        let mut out = Vec::new();
        for dim in dims {
            if let Some(units) = self.by_dimension.get(dim) {
                out.extend(units.iter().cloned());
            }
        }
        out.sort_by(|a, b| a.label().cmp(b.label()));
        out
    }
}

/// A unit token only counts when followed by end-of-input, whitespace,
/// or an operator/punctuation byte.
fn is_separator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\n' | b'\r' | b'+' | b'-' | b'*' | b'/' | b'(' | b')' | b',' | b';' | b'='
    )
}

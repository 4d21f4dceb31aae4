//! Property-based suites over the measure algebra and the catalog's
//! longest-match peek.

use std::collections::HashMap;

use emcalc_lang::Interpreter;
use emcalc_units::{ambiguous_name, catalog, decimal, Dimension, MeasureValue, Unit};
use quickcheck::QuickCheck;
use rust_decimal::Decimal;

/// Every peekable name: metas, compounds, bracketed alternates.
fn all_names() -> Vec<String> {
    let metas = catalog().meta_units_by_dims(&Dimension::ALL);
    let mut names: Vec<String> = metas.iter().map(|m| m.name().to_string()).collect();
    for num in &metas {
        for den in &metas {
            if num.dimension() != den.dimension() {
                names.push(format!("{}/{}", num.name(), den.name()));
            }
        }
    }
    let bracketed: Vec<String> = names.iter().filter_map(|n| ambiguous_name(n)).collect();
    names.extend(bracketed);
    names
}

/// Property: conversion to SI and back is the identity for every
/// offset-free unit.
#[test]
fn prop_si_round_trip() {
    let values = ["-1000000", "-1.5", "0", "0.25", "1", "3", "7.2", "1000000"];
    for unit in catalog().meta_units_by_dims(&Dimension::ALL) {
        let (_, offset) = unit.si_factors();
        if !offset.is_zero() {
            continue;
        }
        for value in values {
            let original = MeasureValue::with_unit(decimal::parse(value).unwrap(), unit.name());
            let si = original.to_si(&Unit::Meta(unit.clone()));
            let back = si.to(unit.name()).unwrap();
            assert_eq!(
                back.value(),
                original.value(),
                "{value}{} -> si -> back",
                unit.name()
            );
            assert_eq!(back.unit(), unit.name());
        }
    }
}

/// Property: peek finds every catalog name exactly, with or without a
/// trailing separator.
#[test]
fn prop_peek_maximality() {
    let cat = catalog();
    for name in all_names() {
        assert_eq!(cat.peek(&name), Some(name.len()), "{name}");
        for tail in ["; rest", "+1", " x", ",y", "/"] {
            assert_eq!(cat.peek(&format!("{name}{tail}")), Some(name.len()), "{name}{tail}");
        }
    }
}

/// Property: a name immediately followed by an identifier character is
/// never taken as the whole match.
#[test]
fn prop_peek_locality() {
    let cat = catalog();
    for name in all_names() {
        for tail in ["x", "9", "_"] {
            let input = format!("{name}{tail}");
            assert_ne!(cat.peek(&input), Some(name.len()), "{input}");
        }
    }
}

/// Property: addition commutes modulo unit choice; both orders land on
/// the same SI value.
#[test]
fn prop_addition_commutative_modulo_unit() {
    fn prop(a: i64, b: i64) -> bool {
        let x = MeasureValue::with_unit(Decimal::from(a), "kg");
        let y = MeasureValue::with_unit(Decimal::from(b), "Mg");
        let xy = x.add(&y).unwrap().to("kg").unwrap();
        let yx = y.add(&x).unwrap().to("kg").unwrap();
        xy == yx
    }
    QuickCheck::new().quickcheck(prop as fn(i64, i64) -> bool);
}

/// Property: a unitless coefficient scales the value and keeps the
/// measured side's unit verbatim.
#[test]
fn prop_unitless_coefficient() {
    fn prop(k: i64, x: i64) -> bool {
        let k = MeasureValue::unitless(Decimal::from(k));
        let x = MeasureValue::with_unit(Decimal::from(x), "Mg");
        let product = x.mul(&k).unwrap();
        product.unit() == "Mg" && product.value() == k.value() * x.value()
    }
    QuickCheck::new().quickcheck(prop as fn(i64, i64) -> bool);
}

/// The same commutativity observed end to end through the interpreter,
/// over a manual grid.
#[test]
fn prop_script_addition_commutative() {
    let grid: &[(i64, i64)] = &[
        (0, 0),
        (1, 2),
        (-1, 2),
        (1, -2),
        (-1, -2),
        (100, 200),
        (-100, 200),
        (1000, -2000),
        (123456, 654321),
    ];
    for (a, b) in grid {
        let script = format!("x = {a}kg + {b}Mg;\ny = {b}Mg + {a}kg;\nprint(x, y);");
        let mut interpreter = Interpreter::new(&HashMap::new(), []).unwrap();
        let out = interpreter.interpret(script.as_bytes()).unwrap();
        assert_eq!(
            out["x"].to_string(),
            out["y"].to_string(),
            "{a}kg + {b}Mg"
        );
    }
}

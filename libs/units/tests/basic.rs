use emcalc_units::{catalog, decimal, Dimension, Error, MeasureValue};

fn mv(value: &str, unit: &str) -> MeasureValue {
    MeasureValue::with_unit(decimal::parse(value).unwrap(), unit)
}

#[test]
fn catalog_resolves_bracketed_alternates() {
    let cat = catalog();
    assert!(cat.is_unit("10^3m3"));
    assert!(cat.is_unit("(10^3m3)"));
    assert!(cat.is_unit("Gg/10^3m3"));
    assert!(cat.is_unit("(10^3m3/kg)"));
}

#[test]
fn catalog_never_compounds_within_a_dimension() {
    let cat = catalog();
    assert!(!cat.is_unit("kg/Gg"));
    assert!(!cat.is_unit("m3/L"));
    assert!(!cat.is_unit("J/kWh"));
}

#[test]
fn peek_prefers_compound_over_meta_prefix() {
    let cat = catalog();
    let input = "Gg/10^3m3;";
    let n = cat.peek(input).unwrap();
    assert_eq!(&input[..n], "Gg/10^3m3");
}

#[test]
fn peek_rejects_identifier_tails() {
    let cat = catalog();
    assert_eq!(cat.peek("kgs"), None);
    assert_eq!(cat.peek("min_count"), None);
    assert_eq!(cat.peek("kg,"), Some(2));
}

#[test]
fn converts_tonnes_to_kilograms() {
    let v = mv("2", "t").to("kg").unwrap();
    assert_eq!(v.to_string(), "2000kg");
}

#[test]
fn converts_energy_through_si() {
    let v = mv("1", "Tj").to("MJ").unwrap();
    assert_eq!(v.to_string(), "1000000MJ");
    let w = mv("1", "kWh").to("kJ").unwrap();
    assert_eq!(w.to_string(), "3600kJ");
}

#[test]
fn compound_conversion_combines_factors() {
    let v = mv("1.1E-04", "Gg/10^3m3").to("kg/m3").unwrap();
    assert_eq!(v.to_string(), "0.11kg/m3");
}

#[test]
fn cross_dimension_addition_is_rejected() {
    let err = mv("1", "kg").add(&mv("1", "m")).unwrap_err();
    match err {
        Error::Incompatible { lhs, rhs } => {
            assert_eq!(lhs, "kg");
            assert_eq!(rhs, "m");
        }
        other => panic!("expected Incompatible, got {other:?}"),
    }
}

#[test]
fn listing_is_label_sorted() {
    let cat = catalog();
    let units = cat.meta_units_by_dims(&[Dimension::Energy, Dimension::Time]);
    assert_eq!(
        units.len(),
        cat.meta_units_by_dims(&[Dimension::Energy]).len()
            + cat.meta_units_by_dims(&[Dimension::Time]).len()
    );
    for pair in units.windows(2) {
        assert!(pair[0].label() <= pair[1].label());
    }
}

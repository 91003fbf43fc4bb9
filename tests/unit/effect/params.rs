use super::*;

#[test]
fn declaration_order_is_preserved() {
    let p = ParamSet::new()
        .with("b", ParamValue::Int(1))
        .with("a", ParamValue::Bool(true));
    let names: Vec<_> = p.iter().map(|x| x.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn set_rejects_unknown_and_mistyped() {
    let mut p = ParamSet::new().with("radius", ParamValue::Double(1.0));
    assert!(p.set("radius", ParamValue::Double(2.0)).is_ok());
    assert_eq!(p.double("radius").unwrap(), 2.0);
    assert!(p.set("radius", ParamValue::Bool(true)).is_err());
    assert!(p.set("nope", ParamValue::Double(1.0)).is_err());
}

#[test]
fn typed_getters_report_mismatch() {
    let p = ParamSet::new()
        .with("n", ParamValue::Int(4))
        .with("c", ParamValue::Color([1.0, 0.0, 0.0, 1.0]));
    assert_eq!(p.double("n").unwrap(), 4.0);
    assert_eq!(p.color("c").unwrap()[0], 1.0);
    assert!(p.bool("n").is_err());
    assert!(p.text("missing").is_err());
}

#[test]
fn param_value_json_shape_is_tagged() {
    let v: ParamValue = serde_json::from_str(r#"{"type":"double","value":2.5}"#).unwrap();
    assert_eq!(v, ParamValue::Double(2.5));
}

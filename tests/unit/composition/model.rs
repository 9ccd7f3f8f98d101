use super::*;
use serde_json::json;

#[test]
fn setup_must_be_an_object() {
    assert!(GraphicSetup::from_value(json!([1, 2])).is_err());
    assert!(matches!(
        GraphicSetup::from_json_str("{nope").unwrap_err(),
        ForgeError::Serde(_)
    ));
    let s = GraphicSetup::from_json_str(r#"{"XY": "10,10"}"#).unwrap();
    assert_eq!(s.props().string_or("XY", ""), "10,10");
}

#[test]
fn instruction_tags_are_exact() {
    assert_eq!(InstructionKind::parse("TEXT"), Some(InstructionKind::Text));
    assert_eq!(InstructionKind::parse(" WORKAREA "), Some(InstructionKind::WorkArea));
    assert_eq!(InstructionKind::parse("text"), None);
    assert_eq!(InstructionKind::parse("GIFBUILDER"), None);
}

#[test]
fn effect_list_maps_names_and_clamps_arguments() {
    let chain = parse_effects("gamma=1.3 | rotate=400 |Solarize=150| invert | bogus=4 | wave=120,5");
    assert_eq!(
        chain.ops(),
        &[
            FilterOp::Gamma(1.3),
            FilterOp::Rotate(360),
            FilterOp::Solarize(99),
            FilterOp::Negate,
            FilterOp::Wave {
                amplitude: 99,
                length: 5
            },
        ]
    );
}

#[test]
fn blur_strength_zero_adds_nothing() {
    assert!(parse_effects("blur=0").is_empty());
    assert_eq!(
        parse_effects("blur=15").ops(),
        &[FilterOp::Blur {
            radius: 2.0,
            sigma: 4.0
        }]
    );
    assert_eq!(
        parse_effects("colors=1|shear=-120").ops(),
        &[FilterOp::Colors(2), FilterOp::Shear(-90)]
    );
}

#[test]
fn adjust_list_is_case_insensitive() {
    assert_eq!(
        parse_adjust("inputLevels=10,200 | OUTPUTLEVELS = 5,250 | autolevels"),
        vec![
            LevelsOp::Input { low: 10, high: 200 },
            LevelsOp::Output { low: 5, high: 250 },
            LevelsOp::Auto,
        ]
    );
    assert!(parse_adjust("").is_empty());
}

#[test]
fn scale_keeps_aspect_for_one_side() {
    let one = ScaleSpec {
        width: Some(ScaleDim { px: 50, fit: false }),
        height: None,
    };
    assert_eq!(one.target(100, 40), Some((50, 20)));

    let both = ScaleSpec {
        width: Some(ScaleDim { px: 30, fit: false }),
        height: Some(ScaleDim { px: 90, fit: false }),
    };
    assert_eq!(both.target(100, 40), Some((30, 90)));
    assert_eq!(ScaleSpec::default().target(10, 10), None);
}

#[test]
fn scale_fit_uses_the_tighter_bound() {
    let boxes = BoundingBoxes::new();
    let spec = ScaleSpec {
        width: ScaleDim::parse("80m", &boxes),
        height: ScaleDim::parse("80m", &boxes),
    };
    assert_eq!(spec.width, Some(ScaleDim { px: 80, fit: true }));
    assert_eq!(spec.target(200, 100), Some((80, 40)));
    assert_eq!(spec.target(20, 40), Some((40, 80)));
    assert_eq!(ScaleDim::parse("0", &boxes), None);
}

#[test]
fn shadow_and_emboss_props() {
    let v = json!({"offset": "3,-2", "blur": 20, "intensity": "60", "color": "red"});
    let s = parse_shadow(&Props::new(&v));
    assert_eq!(s.offset, (3, -2));
    assert_eq!((s.blur, s.intensity, s.opacity), (20, 60, 0));
    assert_eq!(s.color.rgb, [255, 0, 0]);

    let v = json!({"offset": "1,1", "highColor": "white"});
    let e = parse_emboss(&Props::new(&v));
    assert_eq!(e.high_color, ColorSpec::WHITE);
    assert_eq!(e.low_color, ColorSpec::BLACK);

    let o = parse_outline(&Props::new(&json!({"thickness": 2})));
    assert_eq!(o.thickness, 2);
}

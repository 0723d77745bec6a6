use super::*;

#[test]
fn label_zero_is_rejected() {
    assert!(Label::new(0).is_err());
    assert_eq!(Label::new(3).unwrap().get(), 3);
}

#[test]
fn label_serde_uses_plain_integer() {
    let label = Label::new(12).unwrap();
    assert_eq!(serde_json::to_string(&label).unwrap(), "12");
    let back: Label = serde_json::from_str("12").unwrap();
    assert_eq!(back, label);
    assert!(serde_json::from_str::<Label>("0").is_err());
}

#[test]
fn rgb_u24_packing_is_reversible() {
    let c = Rgb8::new(0x12, 0xab, 0xff);
    assert_eq!(c.to_u24(), 0x12abff);
    assert_eq!(Rgb8::from_u24(0x12abff), c);
    assert_eq!(c.to_string(), "#12abff");
    assert!(Rgb8::from_u24(0).is_zero());
}

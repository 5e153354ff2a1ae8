use metabox::boxes::FourCC;
use metabox::known_boxes::KnownBox;

#[test]
fn known_box_from_ftyp() {
    let cc = FourCC(*b"ftyp");
    let kb = KnownBox::from(cc);
    assert!(matches!(kb, KnownBox::Ftyp));
    assert_eq!(kb.full_name(), "File Type Box");
}

#[test]
fn known_box_classifies_container() {
    let moov = KnownBox::from(FourCC(*b"moov"));
    assert!(moov.is_container());

    let ftyp = KnownBox::from(FourCC(*b"ftyp"));
    assert!(!ftyp.is_container());
}

#[test]
fn meta_is_a_full_container() {
    let meta = KnownBox::from(FourCC(*b"meta"));
    assert!(meta.is_container());
    assert!(meta.is_full_box());

    let mdat = KnownBox::from(FourCC(*b"mdat"));
    assert!(!mdat.is_full_box());
}

#[test]
fn unknown_keeps_its_code() {
    let cc = FourCC(*b"zzzz");
    assert_eq!(KnownBox::from(cc), KnownBox::Unknown(cc));
    assert_eq!(KnownBox::from(cc).full_name(), "Unknown Box");
}

#[test]
fn fourcc_renders_every_byte() {
    let cc = FourCC::from_u32(0x6D69_6631);
    assert_eq!(cc.to_string(), "mif1");
    assert_eq!(cc.as_u32(), 0x6D69_6631);
    assert_eq!(FourCC::from_str("qt  ").unwrap().to_string(), "qt  ");
    assert_eq!(FourCC([0, b'a', 0xE9, b'z']).to_string().chars().count(), 4);
    assert!(FourCC::from_str("toolong").is_none());
}

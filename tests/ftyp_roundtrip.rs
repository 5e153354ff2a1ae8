use metabox::boxes::FourCC;
use metabox::parser::parse_bytes;
use proptest::prelude::*;

fn ftyp_bytes(major: [u8; 4], minor: u32, brands: &[[u8; 4]]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(16 + 4 * brands.len() as u32).to_be_bytes());
    v.extend_from_slice(b"ftyp");
    v.extend_from_slice(&major);
    v.extend_from_slice(&minor.to_be_bytes());
    for b in brands {
        v.extend_from_slice(b);
    }
    v
}

#[test]
fn ftyp_without_compatible_brands() {
    let data = ftyp_bytes(*b"mif1", 0, &[]);
    let boxes = parse_bytes(&data).expect("parse failed");
    let ftyp = boxes[0].as_file_type().expect("not an ftyp");
    assert_eq!(ftyp.major_brand_str(), "mif1");
    assert_eq!(ftyp.minor_version, 0);
    assert!(ftyp.compatible_brands.is_empty());
}

#[test]
fn ftyp_brand_strings() {
    let data = ftyp_bytes(*b"heic", 0x6D69_6631, &[*b"mif1", *b"heic"]);
    let boxes = parse_bytes(&data).expect("parse failed");
    let ftyp = boxes[0].as_file_type().unwrap();
    assert_eq!(ftyp.minor_version_str(), "mif1");
    assert_eq!(ftyp.compatible_brand_strs(), vec!["mif1", "heic"]);
}

proptest! {
    #[test]
    fn ftyp_round_trips(
        major in any::<[u8; 4]>(),
        minor in any::<u32>(),
        brands in prop::collection::vec(any::<[u8; 4]>(), 0..12),
    ) {
        let data = ftyp_bytes(major, minor, &brands);
        let boxes = parse_bytes(&data).unwrap();
        prop_assert_eq!(boxes.len(), 1);
        prop_assert_eq!(boxes[0].consumed(), data.len() as u64);

        let ftyp = boxes[0].as_file_type().unwrap();
        prop_assert_eq!(ftyp.major_brand, FourCC(major));
        prop_assert_eq!(ftyp.minor_version, minor);
        let expected: Vec<FourCC> = brands.iter().copied().map(FourCC).collect();
        prop_assert_eq!(&ftyp.compatible_brands, &expected);
    }
}

use metabox::parser::parse_bytes;
use serde_json::Value;

/// [ftyp] [free] [mdat]
fn make_minimal_file() -> Vec<u8> {
    let mut data = Vec::new();

    data.extend_from_slice(&24u32.to_be_bytes());
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(b"isom");
    data.extend_from_slice(&512u32.to_be_bytes());
    data.extend_from_slice(b"iso2");

    data.extend_from_slice(&8u32.to_be_bytes());
    data.extend_from_slice(b"free");

    data.extend_from_slice(&16u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[0u8; 8]);
    data
}

#[test]
fn box_tree_serializes_to_json() {
    let boxes = parse_bytes(&make_minimal_file()).expect("parse failed");
    assert_eq!(boxes.len(), 3);

    let json_str = serde_json::to_string(&boxes).expect("serialize to JSON failed");
    let v: Value = serde_json::from_str(&json_str).expect("parse JSON failed");
    let arr = v.as_array().expect("not an array");

    let first = &arr[0];
    assert_eq!(first["hdr"]["typ"], "ftyp");
    assert_eq!(first["hdr"]["size"], 24);
    assert_eq!(first["hdr"]["header_size"], 8);
    assert_eq!(first["kind"], "file_type");
    assert_eq!(first["major_brand"], "isom");
    assert_eq!(first["minor_version"], 512);
    assert_eq!(first["compatible_brands"][0], "iso2");

    assert_eq!(arr[2]["kind"], "leaf");
    assert_eq!(arr[2]["data_offset"], 40);
    assert_eq!(arr[2]["data_len"], 8);
}

use ssz::{Decode, Encode};
use ssz_derive::{Decode, Encode};

#[derive(Debug, PartialEq, Clone, Encode, Decode)]
struct FixedOnly {
    a: u64,
    b: u32,
    c: [u8; 32],
}

#[derive(Debug, PartialEq, Clone, Encode, Decode)]
struct WithVariable {
    a: u64,
    b: Vec<u64>,
    c: u32,
    d: Vec<u8>,
}

#[test]
fn fixed_only_round_trips() {
    let value = FixedOnly {
        a: 7,
        b: 11,
        c: [9u8; 32],
    };
    let bytes = value.as_ssz_bytes();
    assert_eq!(bytes.len(), 8 + 4 + 32);
    assert_eq!(FixedOnly::from_ssz_bytes(&bytes).unwrap(), value);
}

#[test]
fn container_with_variable_fields_round_trips() {
    let value = WithVariable {
        a: 1,
        b: vec![2, 3, 4],
        c: 5,
        d: vec![6, 7, 8, 9],
    };
    let bytes = value.as_ssz_bytes();
    assert_eq!(WithVariable::from_ssz_bytes(&bytes).unwrap(), value);
}

#[test]
fn container_rejects_trailing_bytes_via_offset_check() {
    let value = WithVariable {
        a: 1,
        b: vec![],
        c: 5,
        d: vec![],
    };
    let mut bytes = value.as_ssz_bytes();
    bytes.push(0xff);
    // The trailing byte extends the final variable field; round-tripping
    // the (now wrong) value should not reproduce the original.
    let decoded = WithVariable::from_ssz_bytes(&bytes).unwrap();
    assert_ne!(decoded, value);
}

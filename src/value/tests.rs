use super::*;
use crate::schema::{LogicalAnnotation, TimeUnit};
use parquet::basic::Type as PhysicalType;
use parquet::data_type::{ByteArray, FixedLenByteArray};
use proptest::prelude::*;

fn target(physical_type: PhysicalType, annotation: LogicalAnnotation, fixed_length: Option<i32>) -> ColumnTarget<'static> {
    ColumnTarget {
        column: "col",
        physical_type,
        annotation,
        fixed_length,
    }
}

fn bytes_of(cell: &ColumnCell) -> Vec<u8> {
    match cell {
        ColumnCell::ByteArray(v) => v.data().to_vec(),
        ColumnCell::FixedLenByteArray(v) => v.data().to_vec(),
        other => panic!("not a byte cell: {other:?}"),
    }
}

#[test]
fn test_integers_follow_column_width() {
    let t = target(PhysicalType::INT64, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(7), &t).unwrap(), ColumnCell::Int64(7));

    let t = target(PhysicalType::INT32, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(-3), &t).unwrap(), ColumnCell::Int32(-3));
    assert!(matches!(
        coerce(&RawValue::from(i64::MAX), &t),
        Err(ValueError::OutOfRange { .. })
    ));

    let t = target(PhysicalType::DOUBLE, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(2), &t).unwrap(), ColumnCell::Double(2.0));

    let t = target(PhysicalType::FLOAT, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(1.5), &t).unwrap(), ColumnCell::Float(1.5));
}

#[test]
fn test_integral_float_into_int_column() {
    let t = target(PhysicalType::INT32, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(3.0), &t).unwrap(), ColumnCell::Int32(3));
    assert!(matches!(
        coerce(&RawValue::from(3.5), &t),
        Err(ValueError::UnsupportedType { .. })
    ));
}

#[test]
fn test_integer_annotation_ranges() {
    let int8 = target(
        PhysicalType::INT32,
        LogicalAnnotation::Int { bit_width: 8, signed: true },
        None,
    );
    assert_eq!(coerce(&RawValue::from(-128), &int8).unwrap(), ColumnCell::Int32(-128));
    assert!(coerce(&RawValue::from(128), &int8).is_err());

    let uint32 = target(
        PhysicalType::INT32,
        LogicalAnnotation::Int { bit_width: 32, signed: false },
        None,
    );
    assert_eq!(
        coerce(&RawValue::Integer(u32::MAX as i128), &uint32).unwrap(),
        ColumnCell::Int32(-1)
    );
    assert!(coerce(&RawValue::from(-1), &uint32).is_err());

    let uint64 = target(
        PhysicalType::INT64,
        LogicalAnnotation::Int { bit_width: 64, signed: false },
        None,
    );
    assert_eq!(
        coerce(&RawValue::Integer(u64::MAX as i128), &uint64).unwrap(),
        ColumnCell::Int64(-1)
    );
}

#[test]
fn test_boolean_and_mismatch() {
    let t = target(PhysicalType::BOOLEAN, LogicalAnnotation::None, None);
    assert_eq!(coerce(&RawValue::from(true), &t).unwrap(), ColumnCell::Boolean(true));

    let err = coerce(&RawValue::from("yes"), &t).unwrap_err();
    match err {
        ValueError::UnsupportedType { column, value_type, .. } => {
            assert_eq!(column, "col");
            assert_eq!(value_type, "text");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_null_is_never_coerced() {
    let t = target(PhysicalType::INT32, LogicalAnnotation::None, None);
    assert!(matches!(
        coerce(&RawValue::Null, &t),
        Err(ValueError::UnsupportedType { value_type: "null", .. })
    ));
}

#[test]
fn test_text_and_bytes_into_binary() {
    let t = target(PhysicalType::BYTE_ARRAY, LogicalAnnotation::String, None);
    assert_eq!(
        coerce(&RawValue::from("héllo"), &t).unwrap(),
        ColumnCell::ByteArray(ByteArray::from("héllo".as_bytes().to_vec()))
    );

    let t = target(PhysicalType::BYTE_ARRAY, LogicalAnnotation::None, None);
    let raw = RawValue::Bytes(vec![0, 1, 255]);
    assert_eq!(bytes_of(&coerce(&raw, &t).unwrap()), vec![0, 1, 255]);
}

#[test]
fn test_json_leaf_accepts_objects() {
    let t = target(PhysicalType::BYTE_ARRAY, LogicalAnnotation::Json, None);
    let raw = RawValue::from(serde_json::json!({"a": [1, 2]}));
    assert_eq!(bytes_of(&coerce(&raw, &t).unwrap()), br#"{"a":[1,2]}"#.to_vec());

    let plain = target(PhysicalType::BYTE_ARRAY, LogicalAnnotation::String, None);
    assert!(coerce(&raw, &plain).is_err());
}

#[test]
fn test_fixed_length_is_checked() {
    let t = target(PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::None, Some(4));
    assert_eq!(
        coerce(&RawValue::from("abcd"), &t).unwrap(),
        ColumnCell::FixedLenByteArray(FixedLenByteArray::from(b"abcd".to_vec()))
    );
    assert!(matches!(
        coerce(&RawValue::from("abc"), &t),
        Err(ValueError::LengthMismatch { expected: 4, actual: 3, .. })
    ));
}

#[test]
fn test_uuid_decoding() {
    let t = target(PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Uuid, Some(16));
    let cell = coerce(&RawValue::from("00112233445566778899AABBCCDDEEFF"), &t).unwrap();
    assert_eq!(
        bytes_of(&cell),
        vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]
    );

    for bad in ["0011", "00112233-4455-6677-8899-aabbccddeeff", "zz112233445566778899aabbccddeeff"] {
        assert!(
            matches!(coerce(&RawValue::from(bad), &t), Err(ValueError::InvalidUuid { .. })),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_decimal_text_and_integer_share_bytes() {
    let t = target(
        PhysicalType::BYTE_ARRAY,
        LogicalAnnotation::Decimal { precision: 10, scale: 2 },
        None,
    );
    let from_text = coerce(&RawValue::from("123.45"), &t).unwrap();
    let from_float = coerce(&RawValue::from(123.45), &t).unwrap();
    let unscaled = decimal::to_minimal_be_bytes(12345);

    assert_eq!(bytes_of(&from_text), vec![0x30, 0x39]);
    assert_eq!(bytes_of(&from_text), unscaled);
    assert_eq!(bytes_of(&from_float), unscaled);
}

#[test]
fn test_decimal_storage_widths() {
    let decimal = LogicalAnnotation::Decimal { precision: 9, scale: 2 };

    let t = target(PhysicalType::INT32, decimal, None);
    assert_eq!(coerce(&RawValue::from(5), &t).unwrap(), ColumnCell::Int32(500));

    let t = target(PhysicalType::INT64, decimal, None);
    assert_eq!(coerce(&RawValue::from("-1.005"), &t).unwrap(), ColumnCell::Int64(-101));

    let t = target(PhysicalType::FIXED_LEN_BYTE_ARRAY, decimal, Some(4));
    assert_eq!(
        bytes_of(&coerce(&RawValue::from("-1"), &t).unwrap()),
        vec![0xFF, 0xFF, 0xFF, 0x9C]
    );

    assert!(matches!(
        coerce(&RawValue::from("12345678.9"), &t),
        Err(ValueError::DecimalOverflow { precision: 9, .. })
    ));
    assert!(matches!(
        coerce(&RawValue::from("1.2.3"), &t),
        Err(ValueError::InvalidDecimal { .. })
    ));
}

#[test]
fn test_decimal_parsing() {
    assert_eq!(decimal::parse_unscaled("123.45", 2), Ok(12345));
    assert_eq!(decimal::parse_unscaled("1.2345e2", 2), Ok(12345));
    assert_eq!(decimal::parse_unscaled("0.125", 2), Ok(13));
    assert_eq!(decimal::parse_unscaled("-0.125", 2), Ok(-13));
    assert_eq!(decimal::parse_unscaled("+7", 0), Ok(7));
    assert_eq!(decimal::parse_unscaled(".5", 1), Ok(5));
    assert_eq!(decimal::parse_unscaled("", 2), Err(decimal::DecimalError::Malformed));
    assert_eq!(decimal::parse_unscaled("abc", 2), Err(decimal::DecimalError::Malformed));
}

#[test]
fn test_decimal_extreme_exponents_overflow() {
    assert_eq!(
        decimal::parse_unscaled("1e9223372036854775807", 2),
        Err(decimal::DecimalError::Overflow)
    );
    assert_eq!(
        decimal::parse_unscaled("1.5e-9223372036854775808", 2),
        Err(decimal::DecimalError::Overflow)
    );
    // Large but representable shifts still round normally
    assert_eq!(decimal::parse_unscaled("1.5e-400", 2), Ok(0));

    let t = target(
        PhysicalType::FIXED_LEN_BYTE_ARRAY,
        LogicalAnnotation::Decimal { precision: 10, scale: 2 },
        Some(8),
    );
    for text in ["1e9223372036854775807", "1.5e-9223372036854775808"] {
        assert!(matches!(
            coerce(&RawValue::from(text), &t),
            Err(ValueError::DecimalOverflow { precision: 10, .. })
        ));
    }
}

#[test]
fn test_minimal_be_bytes() {
    assert_eq!(decimal::to_minimal_be_bytes(0), vec![0x00]);
    assert_eq!(decimal::to_minimal_be_bytes(127), vec![0x7F]);
    assert_eq!(decimal::to_minimal_be_bytes(128), vec![0x00, 0x80]);
    assert_eq!(decimal::to_minimal_be_bytes(-1), vec![0xFF]);
    assert_eq!(decimal::to_minimal_be_bytes(-128), vec![0x80]);
    assert_eq!(decimal::to_minimal_be_bytes(-129), vec![0xFF, 0x7F]);
    assert_eq!(decimal::to_fixed_be_bytes(256, 1), None);
}

#[test]
fn test_float16_reference_values() {
    use float16::f32_to_f16_bits;

    assert_eq!(f32_to_f16_bits(0.0), 0x0000);
    assert_eq!(f32_to_f16_bits(-0.0), 0x8000);
    assert_eq!(f32_to_f16_bits(1.0), 0x3C00);
    assert_eq!(f32_to_f16_bits(-2.0), 0xC000);
    assert_eq!(f32_to_f16_bits(65504.0), 0x7BFF);
    assert_eq!(f32_to_f16_bits(1.0e6), 0x7C00);
    assert_eq!(f32_to_f16_bits(-1.0e6), 0xFC00);
    assert_eq!(f32_to_f16_bits(f32::INFINITY), 0x7C00);
    assert_eq!(f32_to_f16_bits(f32::NEG_INFINITY), 0xFC00);
    assert_eq!(f32_to_f16_bits(f32::NAN) & 0x7E00, 0x7E00);
    assert_eq!(f32_to_f16_bits(-f32::NAN) & 0x8000, 0x8000);
    // Smallest subnormal
    assert_eq!(f32_to_f16_bits(5.960_464_5e-8), 0x0001);
    // Halfway between 1.0 and the next half: ties to even
    assert_eq!(f32_to_f16_bits(1.0 + 2f32.powi(-11)), 0x3C00);
    assert_eq!(f32_to_f16_bits(1.0 + 3.0 * 2f32.powi(-11)), 0x3C02);
}

#[test]
fn test_float16_cell_is_little_endian() {
    let t = target(PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalAnnotation::Float16, Some(2));
    assert_eq!(bytes_of(&coerce(&RawValue::from(1.0), &t).unwrap()), vec![0x00, 0x3C]);
    assert_eq!(bytes_of(&coerce(&RawValue::from(-2), &t).unwrap()), vec![0x00, 0xC0]);
}

#[test]
fn test_temporal_text() {
    let date = target(PhysicalType::INT32, LogicalAnnotation::Date, None);
    assert_eq!(coerce(&RawValue::from("1970-01-11"), &date).unwrap(), ColumnCell::Int32(10));
    assert_eq!(coerce(&RawValue::from(10), &date).unwrap(), ColumnCell::Int32(10));
    assert!(matches!(
        coerce(&RawValue::from("11/01/1970"), &date),
        Err(ValueError::InvalidTemporal { .. })
    ));

    let time = target(PhysicalType::INT32, LogicalAnnotation::Time(TimeUnit::Millis), None);
    assert_eq!(
        coerce(&RawValue::from("01:00:00.250"), &time).unwrap(),
        ColumnCell::Int32(3_600_250)
    );

    let ts = target(PhysicalType::INT64, LogicalAnnotation::Timestamp(TimeUnit::Micros), None);
    assert_eq!(
        coerce(&RawValue::from("1970-01-01T00:00:01+00:00"), &ts).unwrap(),
        ColumnCell::Int64(1_000_000)
    );
    assert_eq!(
        coerce(&RawValue::from("1970-01-01T01:00:00+01:00"), &ts).unwrap(),
        ColumnCell::Int64(0)
    );
    assert_eq!(
        coerce(&RawValue::from("1970-01-01 00:00:02"), &ts).unwrap(),
        ColumnCell::Int64(2_000_000)
    );
}

#[test]
fn test_int96_from_nanos() {
    let t = target(PhysicalType::INT96, LogicalAnnotation::None, None);
    let cell = coerce(&RawValue::from(1_000_000_000i64), &t).unwrap();
    match cell {
        ColumnCell::Int96(value) => assert_eq!(value.data(), &[1_000_000_000, 0, 2_440_588]),
        other => panic!("unexpected cell {other:?}"),
    }

    let text = coerce(&RawValue::from("1970-01-02T00:00:00Z"), &t).unwrap();
    match text {
        ColumnCell::Int96(value) => assert_eq!(value.data(), &[0, 0, 2_440_589]),
        other => panic!("unexpected cell {other:?}"),
    }
}

#[test]
fn test_raw_value_from_json() {
    let raw = RawValue::from(serde_json::json!({
        "a": 1,
        "b": [true, null],
        "c": 18446744073709551615u64,
        "d": 0.5
    }));
    assert_eq!(raw.get("a"), Some(&RawValue::Integer(1)));
    assert_eq!(
        raw.get("b"),
        Some(&RawValue::Array(vec![RawValue::Boolean(true), RawValue::Null]))
    );
    assert_eq!(raw.get("c"), Some(&RawValue::Integer(u64::MAX as i128)));
    assert_eq!(raw.get("d"), Some(&RawValue::Float(0.5)));
    assert_eq!(raw.get("missing"), None);
}

proptest! {
    #[test]
    fn prop_uuid_hex_round_trips(bytes in proptest::array::uniform16(any::<u8>())) {
        let hex = encode_uuid_hex(&bytes);
        prop_assert_eq!(hex.len(), 32);
        let decoded = decode_uuid_hex(&hex, "col").unwrap();
        prop_assert_eq!(encode_uuid_hex(&decoded), hex.clone());

        let upper = decode_uuid_hex(&hex.to_uppercase(), "col").unwrap();
        prop_assert_eq!(encode_uuid_hex(&upper), hex);
    }

    #[test]
    fn prop_float16_is_nearest_even(value in -65504.0f32..65504.0f32) {
        prop_assert_eq!(float16::f32_to_f16_bits(value), nearest_half(value));
    }

    #[test]
    fn prop_decimal_text_matches_integer(unscaled in -999_999_999i64..999_999_999i64) {
        let text = format!("{}.{:02}", unscaled / 100, (unscaled % 100).abs());
        let text = if unscaled < 0 && unscaled / 100 == 0 { format!("-{text}") } else { text };
        prop_assert_eq!(decimal::parse_unscaled(&text, 2), Ok(unscaled as i128));
    }
}

/// Reference binary16 rounding: nearest finite half value, ties to even bits
fn nearest_half(value: f32) -> u16 {
    let magnitude = value.abs() as f64;
    let table: Vec<f64> = (0u16..=0x7BFF).map(|bits| float16::f16_bits_to_f32(bits) as f64).collect();
    let idx = table.partition_point(|&h| h < magnitude);
    let bits = if idx == 0 {
        0
    } else if idx == table.len() {
        0x7BFF
    } else {
        let (lo, hi) = ((idx - 1) as u16, idx as u16);
        let (d_lo, d_hi) = (magnitude - table[idx - 1], table[idx] - magnitude);
        if d_lo < d_hi || (d_lo == d_hi && lo % 2 == 0) {
            lo
        } else {
            hi
        }
    };
    if value.is_sign_negative() {
        bits | 0x8000
    } else {
        bits
    }
}

use super::*;
use rstest::rstest;

#[test]
fn writes_version_one_header_aligned_to_64_bytes() {
  let array = NdArray::from_vec(vec![1_i64, 2, 3]);
  let bytes = encode(&array).expect("encode");

  assert_eq!(&bytes[..6], MAGIC);
  assert_eq!(&bytes[6..8], &[1, 0]);
  let header_len = usize::from(u16::from_le_bytes([bytes[8], bytes[9]]));
  assert_eq!(header_len, 118);
  assert_eq!((10 + header_len) % ARRAY_ALIGN, 0);

  let header = std::str::from_utf8(&bytes[10..10 + header_len]).expect("ascii header");
  assert!(header.starts_with("{'descr': '<i8', 'fortran_order': False, 'shape': (3,), }"));
  assert!(header.ends_with(" \n"));

  assert_eq!(bytes.len(), 128 + 3 * 8);
  assert_eq!(&bytes[128..136], &1_i64.to_le_bytes());
}

#[rstest]
#[case(&[], "()")]
#[case(&[3], "(3,)")]
#[case(&[2, 3, 4], "(2, 3, 4)")]
fn renders_shape_as_tuple(#[case] shape: &[usize], #[case] expected: &str) {
  assert_eq!(shape_repr(shape), expected);
}

#[test]
fn marks_fortran_order_for_column_major_arrays() {
  let array = NdArray::with_order(vec![2, 2], MemoryOrder::Fortran, vec![1.0_f32, 3.0, 2.0, 4.0]).expect("array");
  let bytes = encode(&array).expect("encode");
  let header = std::str::from_utf8(&bytes[10..128]).expect("ascii header");
  assert!(header.contains("'fortran_order': True"));
  assert!(header.contains("'descr': '<f4'"));
}

#[rstest]
#[case(vec![1, 3])]
#[case(vec![3, 1])]
#[case(vec![2, 0])]
#[case(vec![1, 4, 1])]
fn treats_degenerate_fortran_arrays_as_row_major(#[case] shape: Vec<usize>) {
  let size = shape.iter().product::<usize>();
  let array = NdArray::with_order(shape, MemoryOrder::Fortran, vec![0_i64; size]).expect("array");
  let bytes = encode(&array).expect("encode");
  let header_len = usize::from(u16::from_le_bytes([bytes[8], bytes[9]]));
  let header = std::str::from_utf8(&bytes[10..10 + header_len]).expect("ascii header");
  assert!(header.contains("'fortran_order': False"), "{header}");

  let decoded = decode(&bytes).expect("decode");
  assert_eq!(decoded.flatten(), array.flatten());
}

#[rstest]
#[case(NdArray::from_vec(vec![true, false, true]))]
#[case(NdArray::from_vec(vec![-1_i8, 0, 1]))]
#[case(NdArray::from_vec(vec![u64::MAX, 0]))]
#[case(NdArray::new(vec![2, 3], vec![0.5_f64, 1.5, 2.5, 3.5, 4.5, 5.5]).expect("array"))]
#[case(NdArray::with_order(vec![2, 3], MemoryOrder::Fortran, vec![1_i32, 4, 2, 5, 3, 6]).expect("array"))]
#[case(NdArray::new(vec![], vec![42_u16]).expect("array"))]
#[case(NdArray::from_vec(vec!["a".to_string(), "héllo".to_string(), String::new()]))]
#[case(NdArray::new(vec![2, 0], Vec::<f64>::new()).expect("array"))]
fn decodes_what_it_encodes(#[case] array: NdArray) {
  let bytes = encode(&array).expect("encode");
  assert_eq!(decode(&bytes).expect("decode"), array);
}

#[test]
fn pads_strings_to_the_longest_element() {
  let array = NdArray::from_vec(vec!["ab".to_string(), "c".to_string()]);
  let bytes = encode(&array).expect("encode");
  let header = std::str::from_utf8(&bytes[10..128]).expect("ascii header");
  assert!(header.contains("'descr': '<U2'"));
  assert_eq!(bytes.len(), 128 + 2 * 2 * 4);
  assert_eq!(&bytes[140..144], &[0, 0, 0, 0]);
}

#[test]
fn switches_to_version_two_for_huge_headers() {
  let header = "x".repeat(70_000);
  let wrapped = wrap_header(&header).expect("wrap");
  assert_eq!(&wrapped[6..8], &[2, 0]);
  assert_eq!(wrapped.len() % ARRAY_ALIGN, 0);
}

#[test]
fn rejects_bad_magic() {
  assert_eq!(decode(b"NOTNUMPY\x01\x00").expect_err("magic"), NpyError::BadMagic);
}

#[test]
fn rejects_truncated_data() {
  let bytes = encode(&NdArray::from_vec(vec![1.0_f64, 2.0])).expect("encode");
  let err = decode(&bytes[..bytes.len() - 1]).expect_err("truncated");
  assert!(matches!(err, NpyError::Truncated { .. }));
}

#[test]
fn rejects_big_endian_multibyte_types() {
  assert_eq!(
    parse_descr(">f8").expect_err("big endian"),
    NpyError::UnsupportedDescr(">f8".to_string())
  );
  assert_eq!(parse_descr("|u1").expect("byte"), (DType::UInt8, 0));
}

#[test]
fn reads_headers_with_double_quotes() {
  let header = "{\"descr\": \"<i4\", \"fortran_order\": False, \"shape\": (1,)}";
  let descr = quoted(entry(header, "descr").expect("descr")).expect("quoted");
  assert_eq!(descr, "<i4");
  assert_eq!(tuple(entry(header, "shape").expect("shape")).expect("tuple"), vec![1]);
}

use super::*;
use crate::value::Mapping;
use rstest::rstest;

fn list(values: Vec<Value>) -> Value {
  Value::List(values)
}

#[test]
fn rejects_data_that_does_not_fill_the_shape() {
  let err = NdArray::new(vec![2, 2], vec![1_i64, 2, 3]).expect_err("mismatch");
  assert_eq!(
    err,
    ArrayError::ShapeMismatch {
      shape: vec![2, 2],
      len: 3
    }
  );
}

#[test]
fn one_dimensional_arrays_are_always_row_major() {
  let array = NdArray::with_order(vec![3], MemoryOrder::Fortran, vec![1_i64, 2, 3]).expect("array");
  assert_eq!(array.order(), MemoryOrder::C);
}

#[test]
fn flattens_fortran_arrays_in_row_major_order() {
  // [[1, 2, 3], [4, 5, 6]] stored column by column.
  let array = NdArray::with_order(vec![2, 3], MemoryOrder::Fortran, vec![1_i64, 4, 2, 5, 3, 6]).expect("array");
  let flat = array.flatten();
  assert_eq!(flat, (1..=6).map(Value::Int).collect::<Vec<_>>());
}

#[test]
fn converts_to_nested_lists() {
  let array = NdArray::new(vec![2, 2], vec![1.5_f64, 2.0, 3.0, 4.0]).expect("array");
  assert_eq!(
    array.to_value(),
    list(vec![
      list(vec![Value::Float(1.5), Value::Float(2.0)]),
      list(vec![Value::Float(3.0), Value::Float(4.0)]),
    ])
  );
}

#[test]
fn zero_dimensional_array_converts_to_its_element() {
  let array = NdArray::new(vec![], vec![7_i32]).expect("array");
  assert_eq!(array.to_value(), Value::Int(7));
}

#[rstest]
#[case(Value::from(vec![true, false]), DType::Bool)]
#[case(Value::from(vec![Value::Bool(true), Value::Int(2)]), DType::Int64)]
#[case(Value::from(vec![Value::Int(1), Value::Float(2.5)]), DType::Float64)]
#[case(Value::from(vec![Value::Int(1), Value::from("a")]), DType::Str)]
#[case(Value::from(vec![Value::UInt(u64::MAX), Value::Int(1)]), DType::UInt64)]
#[case(Value::from(vec![Value::UInt(u64::MAX), Value::Int(-1)]), DType::Float64)]
#[case(Value::List(vec![Value::List(vec![])]), DType::Float64)]
fn infers_element_type_by_promotion(#[case] value: Value, #[case] expected: DType) {
  let array = NdArray::from_value(&value, None).expect("array");
  assert_eq!(array.dtype(), expected);
}

fn typed(data: impl Into<ArrayData>) -> Value {
  Value::Array(NdArray::from_vec(data))
}

#[rstest]
#[case(vec![typed(vec![1_i32, 2]), typed(vec![3_i32, 4])], DType::Int32)]
#[case(vec![typed(vec![1.5_f32]), typed(vec![2.5_f32])], DType::Float32)]
#[case(vec![typed(vec![1_i8]), typed(vec![2_u8])], DType::Int16)]
#[case(vec![typed(vec![1_i32]), typed(vec![2_u32])], DType::Int64)]
#[case(vec![typed(vec![1_i64]), typed(vec![2_u64])], DType::Float64)]
#[case(vec![typed(vec![1_i16]), typed(vec![2.5_f32])], DType::Float32)]
#[case(vec![typed(vec![1_i32]), typed(vec![2.5_f32])], DType::Float64)]
#[case(vec![typed(vec![true]), typed(vec![7_u8])], DType::UInt8)]
#[case(vec![typed(vec![1_i32, 2]), Value::from(vec![3, 4])], DType::Int64)]
#[case(vec![typed(vec![1_i32]), typed(vec!["a".to_string()])], DType::Str)]
fn nested_arrays_keep_their_element_type(#[case] rows: Vec<Value>, #[case] expected: DType) {
  let array = NdArray::from_values(&rows, None).expect("array");
  assert_eq!(array.dtype(), expected);
}

#[test]
fn nested_arrays_keep_their_values_when_promoted() {
  let rows = vec![typed(vec![1_i32, -2]), typed(vec![3_u32, 4])];
  let array = NdArray::from_values(&rows, None).expect("array");
  assert_eq!(array.shape(), &[2, 2]);
  assert_eq!(array.data(), &ArrayData::Int64(vec![1, -2, 3, 4]));
}

#[test]
fn infers_shape_of_nested_lists() {
  let value = Value::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
  let array = NdArray::from_value(&value, None).expect("array");
  assert_eq!(array.shape(), &[2, 3]);
  assert_eq!(array.data(), &ArrayData::Int64(vec![1, 2, 3, 4, 5, 6]));
}

#[test]
fn stacks_arrays_nested_in_lists() {
  let row = NdArray::from_vec(vec![1.0_f64, 2.0]);
  let value = list(vec![Value::Array(row.clone()), Value::Array(row)]);
  let array = NdArray::from_value(&value, None).expect("array");
  assert_eq!(array.shape(), &[2, 2]);
}

#[rstest]
#[case(list(vec![Value::from(vec![1, 2]), Value::from(vec![3])]))]
#[case(list(vec![Value::from(vec![1, 2]), Value::Int(3)]))]
fn rejects_ragged_lists(#[case] value: Value) {
  let err = NdArray::from_value(&value, None).expect_err("ragged");
  assert!(matches!(err, ArrayError::Inhomogeneous { depth: 1 }));
}

#[test]
fn casts_to_declared_type() {
  let value = Value::from(vec![Value::Int(1), Value::Float(2.7), Value::from("3")]);
  let array = NdArray::from_value(&value, Some(DType::Int16)).expect("array");
  assert_eq!(array.data(), &ArrayData::Int16(vec![1, 2, 3]));

  let array = NdArray::from_value(&value, Some(DType::Float32)).expect("array");
  assert_eq!(array.data(), &ArrayData::Float32(vec![1.0, 2.7, 3.0]));
}

#[rstest]
#[case(Value::from(vec![300]), DType::UInt8)]
#[case(Value::from(vec![-1]), DType::UInt64)]
fn rejects_out_of_range_integers(#[case] value: Value, #[case] dtype: DType) {
  let err = NdArray::from_value(&value, Some(dtype)).expect_err("overflow");
  assert!(matches!(err, ArrayError::OutOfBounds { dtype: d, .. } if d == dtype));
}

#[test]
fn rejects_non_numeric_strings_for_numeric_types() {
  let err = NdArray::from_value(&Value::from(vec!["abc"]), Some(DType::Float64)).expect_err("cast");
  assert_eq!(
    err,
    ArrayError::InvalidCast {
      value: "abc".to_string(),
      dtype: DType::Float64
    }
  );
}

#[test]
fn rejects_values_without_array_representation() {
  let err = NdArray::from_value(&Value::Map(Mapping::new()), None).expect_err("mapping");
  assert_eq!(
    err,
    ArrayError::UnsupportedElement {
      type_name: "mapping".to_string()
    }
  );
  let err = NdArray::from_value(&Value::from(vec![Value::Null]), None).expect_err("null");
  assert!(matches!(err, ArrayError::UnsupportedElement { .. }));
}

#[test]
fn scalars_become_zero_dimensional_arrays() {
  let array = NdArray::from_value(&Value::Float(2.5), None).expect("array");
  assert_eq!(array.ndim(), 0);
  assert_eq!(array.size(), 1);
  assert_eq!(array.data(), &ArrayData::Float64(vec![2.5]));
}

#[rstest]
#[case(NdArray::from_vec(vec![1_i64, 10]), "[ 1 10]")]
#[case(NdArray::new(vec![2, 2], vec![1_i64, 2, 3, 4]).expect("array"), "[[1 2]\n [3 4]]")]
#[case(NdArray::new(vec![2, 1, 2], vec![1_i64, 2, 3, 4]).expect("array"), "[[[1 2]]\n\n [[3 4]]]")]
#[case(NdArray::with_order(vec![2, 2], MemoryOrder::Fortran, vec![1_i64, 3, 2, 4]).expect("array"), "[[1 2]\n [3 4]]")]
#[case(NdArray::from_vec(vec![1.5_f64, 2.0]), "[1.5 2. ]")]
#[case(NdArray::from_vec(vec![10.5_f64, 2.0, -1.25]), "[10.5   2.   -1.25]")]
#[case(NdArray::from_vec(vec![0.1_f32, 2.0]), "[0.1 2. ]")]
#[case(NdArray::from_vec(vec![1.0_f64, 2000.0]), "[1.e+00 2.e+03]")]
#[case(NdArray::from_vec(vec![1.5_f64, 1e-5]), "[1.5e+00 1.0e-05]")]
#[case(NdArray::from_vec(vec![1.0 / 3.0_f64]), "[0.33333333]")]
#[case(NdArray::from_vec(vec![f64::NAN, 1.5]), "[nan 1.5]")]
#[case(NdArray::from_vec(vec![true, false]), "[ True False]")]
#[case(NdArray::from_vec(vec!["a".to_string(), "it's".to_string()]), r#"['a' "it's"]"#)]
#[case(NdArray::new(vec![], vec![2.0_f64]).expect("array"), "2.0")]
#[case(NdArray::from_vec(Vec::<i64>::new()), "[]")]
fn renders_cell_text_like_numpy_str(#[case] array: NdArray, #[case] expected: &str) {
  assert_eq!(array.to_cell_text(), expected);
}

#[rstest]
#[case(NdArray::from_vec(vec![1_i64, 2]), "array([1, 2])")]
#[case(NdArray::from_vec(vec![1_i32, 2]), "array([1, 2], dtype=int32)")]
#[case(NdArray::new(vec![2, 2], vec![1_i64, 2, 3, 4]).expect("array"), "array([[1, 2],\n       [3, 4]])")]
#[case(NdArray::from_vec(vec![1.5_f32, 2.0]), "array([1.5, 2. ], dtype=float32)")]
#[case(NdArray::from_vec(vec!["a".to_string(), "bc".to_string()]), "array(['a', 'bc'], dtype='<U2')")]
#[case(NdArray::from_vec(Vec::<f64>::new()), "array([], dtype=float64)")]
#[case(NdArray::new(vec![2, 0], Vec::<i64>::new()).expect("array"), "array([], shape=(2, 0), dtype=int64)")]
#[case(NdArray::new(vec![], vec![7_i64]).expect("array"), "array(7)")]
fn renders_literals_like_numpy_repr(#[case] array: NdArray, #[case] expected: &str) {
  assert_eq!(array.to_literal(), expected);
}

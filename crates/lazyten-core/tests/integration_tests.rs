//! Integration tests for lazyten-core
//!
//! These tests exercise the public surface the way the engine crates use it.

use lazyten_core::{DenseND, NamedTensor, TensorError};

#[test]
fn test_named_tensor_from_dense_and_back() {
    let data = DenseND::from_vec((1..=24).map(|x| x as f64).collect(), &[2, 3, 4]).unwrap();
    let t = NamedTensor::new(
        vec!["batch".to_string(), "height".to_string(), "width".to_string()],
        data.clone(),
    )
    .unwrap();

    assert_eq!(t.rank(), 3);
    assert_eq!(t.shape().as_slice(), &[2, 3, 4]);

    let (dims, back) = t.into_parts();
    assert_eq!(dims, vec!["batch", "height", "width"]);
    assert_eq!(back, data);
}

#[test]
fn test_permute_roundtrip_by_name() {
    let t = NamedTensor::from_vec(
        &["a", "b", "c"],
        (0..24).map(|x| x as f64).collect(),
        &[2, 3, 4],
    )
    .unwrap();
    let p = t.permute_to(&["c", "a", "b"]).unwrap();
    assert_eq!(p.shape().as_slice(), &[4, 2, 3]);

    let back = p.permute_to(&["a", "b", "c"]).unwrap();
    assert_eq!(back, t);
}

#[test]
fn test_errors_carry_context() {
    let t = NamedTensor::from_vec(&["i"], vec![1.0, 2.0], &[2]).unwrap();
    let err = t.permute_to(&["j"]).unwrap_err();
    match err {
        TensorError::UnknownDim { dim, available } => {
            assert_eq!(dim, "j");
            assert_eq!(available, vec!["i".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err_message_mentions(&t.value_at(&[("i", 5)]).unwrap_err(), "out of bounds"));
}

fn err_message_mentions(err: &TensorError, needle: &str) -> bool {
    err.to_string().contains(needle)
}

//! Element-wise and reduction primitives over named tensors
//!
//! Alignment is by dimension name, never by position: a binary operation
//! broadcasts each side over the dims only the other side has.

use crate::executor::{BinaryOp, ElemOp, Element};
use anyhow::{anyhow, bail, Result};
use lazyten_core::{DenseND, Dim, NamedTensor};
use scirs2_core::ndarray_ext::{Axis, IxDyn, Zip};

/// Apply a unary operator to every element; dims are unchanged
pub fn elem_op<T: Element>(op: ElemOp, x: &NamedTensor<T>) -> Result<NamedTensor<T>> {
    let data = x.data().view().mapv(|v| op.apply(v));
    Ok(NamedTensor::new(x.dims().to_vec(), DenseND::from_array(data))?)
}

/// Dims of `binary_op(_, x, y)`: the dims of `x`, then the dims only `y` has
pub fn broadcast_dims(x: &[Dim], y: &[Dim]) -> Vec<Dim> {
    let mut dims = x.to_vec();
    dims.extend(y.iter().filter(|d| !x.contains(d)).cloned());
    dims
}

/// Combine two tensors element-wise after aligning them by dimension name
///
/// Result dims are the dims of `x` followed by the dims only `y` has. A dim
/// present on both sides must have the same size.
///
/// ```
/// use lazyten_core::NamedTensor;
/// use lazyten_exec::{binary_op, BinaryOp};
///
/// let x = NamedTensor::from_vec(&["i"], vec![1.0, 2.0], &[2]).unwrap();
/// let y = NamedTensor::from_vec(&["j"], vec![10.0, 20.0, 30.0], &[3]).unwrap();
/// let z = binary_op(BinaryOp::Add, &x, &y).unwrap();
/// assert_eq!(z.dims(), &["i".to_string(), "j".to_string()]);
/// assert_eq!(z.to_vec(), vec![11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
/// ```
pub fn binary_op<T: Element>(
    op: BinaryOp,
    x: &NamedTensor<T>,
    y: &NamedTensor<T>,
) -> Result<NamedTensor<T>> {
    for (dim, size) in y.dim_sizes() {
        if let Some(other) = x.size_of(dim) {
            if other != size {
                bail!(
                    "Dimension '{}' has size {} on the left and {} on the right",
                    dim,
                    other,
                    size
                );
            }
        }
    }

    let dims = broadcast_dims(x.dims(), y.dims());
    let shape: Vec<usize> = dims
        .iter()
        .map(|d| x.size_of(d).or_else(|| y.size_of(d)).unwrap_or(1))
        .collect();

    // x already leads with its own dims: append unit axes for y-only dims
    let mut xv = x.data().view();
    for k in x.rank()..dims.len() {
        xv = xv.insert_axis(Axis(k));
    }

    // y: order its axes as they appear in the result, then insert unit axes
    // where the result has an x-only dim
    let order: Vec<usize> = dims
        .iter()
        .filter_map(|d| y.position(d))
        .collect();
    let mut yv = y.data().view().permuted_axes(IxDyn(&order));
    for (k, d) in dims.iter().enumerate() {
        if !y.has_dim(d) {
            yv = yv.insert_axis(Axis(k));
        }
    }

    let xb = xv
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| anyhow!("Cannot broadcast left operand to {:?}", shape))?;
    let yb = yv
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| anyhow!("Cannot broadcast right operand to {:?}", shape))?;
    let data = Zip::from(&xb).and(&yb).map_collect(|&a, &b| op.apply(a, b));

    Ok(NamedTensor::new(dims, DenseND::from_array(data))?)
}

/// Fold `dims` out of `x` with `op`, seeded with the operator's identity
///
/// Dims `x` does not carry are ignored. The result keeps the remaining dims
/// in their original order.
///
/// ```
/// use lazyten_core::NamedTensor;
/// use lazyten_exec::{reduce, BinaryOp};
///
/// let x = NamedTensor::from_vec(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// let s = reduce(BinaryOp::Add, &x, ["b"]).unwrap();
/// assert_eq!(s.dims(), &["a".to_string()]);
/// assert_eq!(s.to_vec(), vec![6.0, 15.0]);
/// ```
pub fn reduce<T, I, S>(op: BinaryOp, x: &NamedTensor<T>, dims: I) -> Result<NamedTensor<T>>
where
    T: Element,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let identity = op
        .identity::<T>()
        .ok_or_else(|| anyhow!("Operator '{}' has no identity and cannot reduce", op))?;

    let mut axes: Vec<usize> = dims
        .into_iter()
        .filter_map(|d| x.position(d.as_ref()))
        .collect();
    axes.sort_unstable_by(|a, b| b.cmp(a));
    axes.dedup();

    let mut result = x.data().as_array().clone();
    for &axis in &axes {
        result = result.fold_axis(Axis(axis), identity, |&acc, &v| op.apply(acc, v));
    }

    let kept: Vec<Dim> = x
        .dims()
        .iter()
        .enumerate()
        .filter(|(k, _)| !axes.contains(k))
        .map(|(_, d)| d.clone())
        .collect();
    Ok(NamedTensor::new(kept, DenseND::from_array(result))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(dims: &[&str], values: Vec<f64>, shape: &[usize]) -> NamedTensor<f64> {
        NamedTensor::from_vec(dims, values, shape).unwrap()
    }

    #[test]
    fn test_elem_op_keeps_dims() {
        let x = named(&["a"], vec![-1.0, 2.0], &[2]);
        let y = elem_op(ElemOp::Abs, &x).unwrap();
        assert_eq!(y.dims(), x.dims());
        assert_eq!(y.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_binary_op_same_dims_different_order() {
        let x = named(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
        let y = x.permute_to(&["b", "a"]).unwrap();
        let z = binary_op(BinaryOp::Sub, &x, &y).unwrap();
        assert_eq!(z.dims(), x.dims());
        assert!(z.to_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_binary_op_partial_overlap() {
        // x(a, b) * y(c, a): result (a, b, c)
        let x = named(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let y = named(&["c", "a"], vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0], &[3, 2]);
        let z = binary_op(BinaryOp::Mul, &x, &y).unwrap();
        assert_eq!(z.dims(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(z.shape().as_slice(), &[2, 2, 3]);
        assert_eq!(z.value_at(&[("a", 1), ("b", 0), ("c", 2)]).unwrap(), 3.0 * 30.0);
        assert_eq!(z.value_at(&[("a", 0), ("b", 1), ("c", 1)]).unwrap(), 2.0 * 2.0);
    }

    #[test]
    fn test_binary_op_scalar() {
        let x = NamedTensor::scalar(2.0);
        let y = named(&["a"], vec![1.0, 2.0, 3.0], &[3]);
        let z = binary_op(BinaryOp::Pow, &x, &y).unwrap();
        assert_eq!(z.dims(), &["a".to_string()]);
        assert_eq!(z.to_vec(), vec![2.0, 4.0, 8.0]);
    }

    #[test]
    fn test_binary_op_size_mismatch() {
        let x = named(&["a"], vec![1.0, 2.0], &[2]);
        let y = named(&["a"], vec![1.0, 2.0, 3.0], &[3]);
        assert!(binary_op(BinaryOp::Add, &x, &y).is_err());
    }

    #[test]
    fn test_reduce_ignores_absent_dims() {
        let x = named(&["a", "b"], vec![1.0, 5.0, 3.0, 2.0], &[2, 2]);
        let r = reduce(BinaryOp::Maximum, &x, ["a", "zzz"]).unwrap();
        assert_eq!(r.dims(), &["b".to_string()]);
        assert_eq!(r.to_vec(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_reduce_everything() {
        let x = named(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
        let r = reduce(BinaryOp::Mul, &x, x.dims().to_vec()).unwrap();
        assert_eq!(r.rank(), 0);
        assert_eq!(r.to_vec(), vec![24.0]);
    }

    #[test]
    fn test_reduce_without_identity() {
        let x = named(&["a"], vec![1.0, 2.0], &[2]);
        assert!(reduce(BinaryOp::Div, &x, ["a"]).is_err());
    }
}

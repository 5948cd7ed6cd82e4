//! Dense contraction kernel

use crate::executor::Element;
use crate::semiring::Semiring;
use anyhow::{anyhow, bail, Result};
use lazyten_core::{DenseND, Dim};
use lazyten_planner::{dim_sizes, ContractionSpec};

/// Execute a dense contraction of any number of operands in one pass
///
/// Loops over the joint index space of the output dims followed by the
/// contracted dims. Each point multiplies the aligned operand elements with
/// the semiring product; points sharing an output index are folded with the
/// semiring sum.
///
/// # Arguments
///
/// * `spec` - Dims of every operand and of the result
/// * `operands` - Input tensors, aligned with `spec.inputs`
/// * `semiring` - Operator pair used for multiply and fold
///
/// # Example
///
/// ```
/// use lazyten_core::DenseND;
/// use lazyten_exec::{execute_dense_contraction, Semiring};
/// use lazyten_planner::ContractionSpec;
///
/// let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
/// let a = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let b = DenseND::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
///
/// let c = execute_dense_contraction(&spec, &[&a, &b], Semiring::SUM_PRODUCT).unwrap();
/// assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn execute_dense_contraction<T: Element>(
    spec: &ContractionSpec,
    operands: &[&DenseND<T>],
    semiring: Semiring,
) -> Result<DenseND<T>> {
    if operands.len() != spec.num_inputs() {
        bail!(
            "Spec expects {} operands, got {}",
            spec.num_inputs(),
            operands.len()
        );
    }
    let shapes: Vec<Vec<usize>> = operands.iter().map(|t| t.shape().to_vec()).collect();
    let dim_map = dim_sizes(spec, &shapes)?;

    let loop_dims: Vec<&Dim> = spec.output.iter().chain(spec.contracted.iter()).collect();
    let loop_sizes: Vec<usize> = loop_dims.iter().map(|d| dim_map[*d]).collect();
    let output_shape = &loop_sizes[..spec.output.len()];
    let out_len: usize = output_shape.iter().product();
    let red_len: usize = loop_sizes[spec.output.len()..].iter().product();

    if red_len == 0 {
        return Ok(DenseND::from_elem(output_shape, semiring.zero()));
    }

    let data: Vec<_> = operands
        .iter()
        .map(|t| t.view().as_standard_layout().into_owned())
        .collect();
    let slices = data
        .iter()
        .map(|a| a.as_slice().ok_or_else(|| anyhow!("Operand is not contiguous")))
        .collect::<Result<Vec<_>>>()?;

    // Stride of every loop dim inside every operand (0 where absent)
    let strides: Vec<Vec<usize>> = spec
        .inputs
        .iter()
        .zip(&shapes)
        .map(|(dims, shape)| {
            let own = row_major_strides(shape);
            loop_dims
                .iter()
                .map(|d| dims.iter().position(|x| x == *d).map_or(0, |p| own[p]))
                .collect()
        })
        .collect();

    let mut out = Vec::with_capacity(out_len);
    let mut index = vec![0usize; loop_dims.len()];
    let mut acc = semiring.zero();
    for flat in 0..out_len * red_len {
        let mut term = semiring.one();
        for (slice, stride) in slices.iter().zip(&strides) {
            let offset: usize = index.iter().zip(stride).map(|(i, s)| i * s).sum();
            term = semiring.mul(term, slice[offset]);
        }
        acc = semiring.add(acc, term);
        if (flat + 1) % red_len == 0 {
            out.push(acc);
            acc = semiring.zero();
        }
        advance(&mut index, &loop_sizes);
    }

    Ok(DenseND::from_vec(out, output_shape)?)
}

/// Row-major strides of a shape
pub(crate) fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for k in (0..shape.len().saturating_sub(1)).rev() {
        strides[k] = strides[k + 1] * shape[k + 1];
    }
    strides
}

/// Step a row-major odometer; wraps to all zeros after the last index
fn advance(index: &mut [usize], sizes: &[usize]) {
    for k in (0..index.len()).rev() {
        index[k] += 1;
        if index[k] < sizes[k] {
            return;
        }
        index[k] = 0;
    }
}

//! Cost models for tensor contractions
//!
//! Dense cost model only: a contraction touching dims `D` costs
//! `2 * prod(size(d) for d in D)` FLOPs (one multiply and one add per point of
//! the joint index space), and its result costs `prod(size(output))` elements.

use crate::parser::{dim_sizes, ContractionSpec};
use anyhow::{anyhow, Result};
use lazyten_core::Dim;
use std::collections::BTreeMap;

/// Bytes assumed per element when estimating memory
pub const BYTES_PER_ELEMENT: usize = 8;

/// Estimate FLOPs for a contraction
///
/// # Complexity
///
/// For dense tensors: O(product of all unique dims)
///
/// ```
/// use lazyten_planner::{estimate_flops, ContractionSpec};
///
/// let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
/// let flops = estimate_flops(&spec, &[vec![10, 20], vec![20, 30]]).unwrap();
/// assert_eq!(flops, 12_000.0);
/// ```
pub fn estimate_flops(spec: &ContractionSpec, shapes: &[Vec<usize>]) -> Result<f64> {
    let dim_map = dim_sizes(spec, shapes)?;

    let output_size = product_of(&spec.output, &dim_map)?;
    let contracted_size = product_of(spec.contracted.iter(), &dim_map)?;

    Ok(output_size.max(1.0) * contracted_size.max(1.0) * 2.0)
}

/// Estimate memory usage for a contraction
///
/// # Returns
///
/// Tuple of (input_memory, output_memory) in bytes
pub fn estimate_memory(
    spec: &ContractionSpec,
    shapes: &[Vec<usize>],
    bytes_per_element: usize,
) -> Result<(usize, usize)> {
    let dim_map = dim_sizes(spec, shapes)?;

    let input_memory: usize = shapes
        .iter()
        .map(|s| s.iter().product::<usize>() * bytes_per_element)
        .sum();

    let output_size: usize = spec
        .output
        .iter()
        .map(|d| dim_map.get(d).copied().unwrap_or(1))
        .product();

    Ok((input_memory, output_size * bytes_per_element))
}

/// FLOPs of one pairwise step given the sizes of every dim it touches
pub(crate) fn pairwise_flops<'a>(
    touched: impl IntoIterator<Item = &'a Dim>,
    dim_map: &BTreeMap<Dim, usize>,
) -> Result<f64> {
    Ok(product_of(touched, dim_map)? * 2.0)
}

/// Number of elements of a tensor carrying `dims`
pub(crate) fn element_count<'a>(
    dims: impl IntoIterator<Item = &'a Dim>,
    dim_map: &BTreeMap<Dim, usize>,
) -> Result<usize> {
    dims.into_iter().try_fold(1usize, |acc, d| {
        dim_map
            .get(d)
            .map(|&s| acc.saturating_mul(s))
            .ok_or_else(|| anyhow!("Dimension '{}' has no known size", d))
    })
}

fn product_of<'a>(
    dims: impl IntoIterator<Item = &'a Dim>,
    dim_map: &BTreeMap<Dim, usize>,
) -> Result<f64> {
    dims.into_iter().try_fold(1.0, |acc, d| {
        dim_map
            .get(d)
            .map(|&s| acc * s as f64)
            .ok_or_else(|| anyhow!("Dimension '{}' has no known size", d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_flops_matmul() {
        let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
        let flops = estimate_flops(&spec, &[vec![10, 20], vec![20, 30]]).unwrap();
        // 10 * 30 output elements, each requires 20 multiply-adds
        assert_eq!(flops, 12_000.0);
    }

    #[test]
    fn test_estimate_flops_outer_product() {
        let spec = ContractionSpec::parse("i,j->ij").unwrap();
        let flops = estimate_flops(&spec, &[vec![10], vec![20]]).unwrap();
        assert_eq!(flops, 400.0);
    }

    #[test]
    fn test_estimate_flops_full_reduction() {
        let spec = ContractionSpec::parse("ij->").unwrap();
        let flops = estimate_flops(&spec, &[vec![3, 4]]).unwrap();
        assert_eq!(flops, 24.0);
    }

    #[test]
    fn test_estimate_flops_shape_mismatch() {
        let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
        assert!(estimate_flops(&spec, &[vec![10, 20], vec![21, 30]]).is_err());
    }

    #[test]
    fn test_estimate_memory() {
        let spec = ContractionSpec::parse("ij,jk->ik").unwrap();
        let (input, output) =
            estimate_memory(&spec, &[vec![10, 20], vec![20, 30]], BYTES_PER_ELEMENT).unwrap();
        assert_eq!(input, (200 + 600) * 8);
        assert_eq!(output, 300 * 8);
    }

    #[test]
    fn test_element_count_unknown_dim() {
        let dim_map = BTreeMap::from([("a".to_string(), 3)]);
        let dims = vec!["a".to_string(), "b".to_string()];
        assert!(element_count(&dims, &dim_map).is_err());
        assert_eq!(element_count(&dims[..1], &dim_map).unwrap(), 3);
    }
}

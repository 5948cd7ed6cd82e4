//! Contraction specification
//!
//! A [`ContractionSpec`] lists the dimension names of every operand and the
//! dimension names of the result. It is built fresh for every contraction and
//! can also be parsed from einsum notation like `"ijk,jkl->il"`, where each
//! lowercase letter names a one-character dimension.

use anyhow::{anyhow, bail, Result};
use lazyten_core::Dim;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dimension names of every operand plus the requested output dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContractionSpec {
    /// Dimension names per input, in axis order
    pub inputs: Vec<Vec<Dim>>,
    /// Output dimension names, in result axis order
    pub output: Vec<Dim>,
    /// Dimensions that are reduced away (appear in inputs but not output)
    pub contracted: BTreeSet<Dim>,
}

impl ContractionSpec {
    /// Build a spec from operand dims and output dims.
    ///
    /// Every output dim must occur in some input; no operand and no output may
    /// name a dim twice.
    ///
    /// ```
    /// use lazyten_planner::ContractionSpec;
    ///
    /// let spec = ContractionSpec::new(
    ///     vec![vec!["batch".into(), "hidden".into()], vec!["hidden".into(), "out".into()]],
    ///     vec!["batch".into(), "out".into()],
    /// )
    /// .unwrap();
    /// assert!(spec.is_contracted("hidden"));
    /// ```
    pub fn new(inputs: Vec<Vec<Dim>>, output: Vec<Dim>) -> Result<Self> {
        for (i, dims) in inputs.iter().enumerate() {
            let mut seen = HashSet::new();
            for d in dims {
                if !seen.insert(d) {
                    bail!("Input {} names dimension '{}' twice", i, d);
                }
            }
        }

        let all: BTreeSet<&Dim> = inputs.iter().flatten().collect();
        let mut seen = HashSet::new();
        for d in &output {
            if !seen.insert(d) {
                bail!("Output names dimension '{}' twice", d);
            }
            if !all.contains(d) {
                bail!("Output dimension '{}' does not appear in any input", d);
            }
        }

        let contracted = all
            .into_iter()
            .filter(|d| !output.contains(d))
            .cloned()
            .collect();

        Ok(Self {
            inputs,
            output,
            contracted,
        })
    }

    /// Parse an einsum specification string
    ///
    /// Every lowercase letter becomes a dimension with that one-letter name.
    /// Without `->`, the output is every dim in order of first appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyten_planner::ContractionSpec;
    ///
    /// let spec = ContractionSpec::parse("ijk,jkl->il").unwrap();
    /// assert_eq!(spec.num_inputs(), 2);
    /// assert_eq!(spec.output, vec!["i".to_string(), "l".to_string()]);
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let parts: Vec<&str> = spec.split("->").collect();
        if parts.len() > 2 {
            bail!("Invalid einsum specification: multiple '->' found");
        }

        let input_str = parts[0].trim();
        if input_str.is_empty() {
            bail!("No input specifications provided");
        }

        let mut inputs = Vec::new();
        for (i, input) in input_str.split(',').map(str::trim).enumerate() {
            if !input.chars().all(|c| c.is_ascii_lowercase()) {
                bail!(
                    "Input {} contains invalid characters (only lowercase a-z allowed)",
                    i
                );
            }
            inputs.push(input.chars().map(String::from).collect::<Vec<Dim>>());
        }

        let output = if parts.len() == 2 {
            let out = parts[1].trim();
            if !out.chars().all(|c| c.is_ascii_lowercase()) {
                bail!("Output contains invalid characters (only lowercase a-z allowed)");
            }
            out.chars().map(String::from).collect()
        } else {
            Self::infer_output(&inputs)
        };

        Self::new(inputs, output)
    }

    /// All dims in order of first appearance
    fn infer_output(inputs: &[Vec<Dim>]) -> Vec<Dim> {
        let mut seen = HashSet::new();
        inputs
            .iter()
            .flatten()
            .filter(|d| seen.insert(d.as_str()))
            .cloned()
            .collect()
    }

    /// Get the number of inputs
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Check if a given dim is contracted
    pub fn is_contracted(&self, dim: &str) -> bool {
        self.contracted.contains(dim)
    }

    /// Dims of one input
    pub fn input_dims(&self, input_idx: usize) -> Option<&[Dim]> {
        self.inputs.get(input_idx).map(Vec::as_slice)
    }
}

impl std::fmt::Display for ContractionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .map(|dims| format!("({})", dims.join(",")))
            .collect();
        write!(f, "{} -> ({})", inputs.join(" "), self.output.join(","))
    }
}

/// Validate shapes against a spec and collect the size of every dim
pub fn dim_sizes(spec: &ContractionSpec, shapes: &[Vec<usize>]) -> Result<BTreeMap<Dim, usize>> {
    if spec.num_inputs() != shapes.len() {
        bail!(
            "Shape count mismatch: spec has {} inputs but {} shapes provided",
            spec.num_inputs(),
            shapes.len()
        );
    }

    let mut dim_map: BTreeMap<Dim, usize> = BTreeMap::new();
    for (input_idx, (dims, shape)) in spec.inputs.iter().zip(shapes.iter()).enumerate() {
        if dims.len() != shape.len() {
            bail!(
                "Input {}: spec has {} dimensions but shape has {}",
                input_idx,
                dims.len(),
                shape.len()
            );
        }

        for (d, &size) in dims.iter().zip(shape.iter()) {
            if let Some(&prev_size) = dim_map.get(d) {
                if prev_size != size {
                    bail!(
                        "Dimension mismatch for '{}': was {}, now {}",
                        d,
                        prev_size,
                        size
                    );
                }
            } else {
                dim_map.insert(d.clone(), size);
            }
        }
    }

    Ok(dim_map)
}

/// Validate shapes against a spec
pub fn validate_shapes(spec: &ContractionSpec, shapes: &[Vec<usize>]) -> Result<()> {
    dim_sizes(spec, shapes).map(|_| ())
}

/// Compute output shape from spec and input shapes
pub fn compute_output_shape(spec: &ContractionSpec, shapes: &[Vec<usize>]) -> Result<Vec<usize>> {
    let dim_map = dim_sizes(spec, shapes)?;
    spec.output
        .iter()
        .map(|d| {
            dim_map
                .get(d)
                .copied()
                .ok_or_else(|| anyhow!("Output dimension '{}' not found in dimension map", d))
        })
        .collect()
}

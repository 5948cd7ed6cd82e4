//! Core type definitions for named-dimension tensors.
//!
//! - Type aliases for dimensions ([`Dim`], [`Axis`], [`Rank`], [`Shape`])
//! - Axis metadata ([`AxisMeta`]) pairing a name with an extent
//! - Terminal tensors ([`NamedTensor`]): dense data whose axes are named
//!
//! # Examples
//!
//! ```
//! use lazyten_core::NamedTensor;
//!
//! let t = NamedTensor::from_vec(&["batch", "feature"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])
//!     .unwrap();
//! assert_eq!(t.rank(), 2);
//! assert_eq!(t.size_of("feature"), Some(3));
//! ```

use crate::error::TensorError;
use scirs2_core::numeric::Num;
use smallvec::SmallVec;
use std::collections::HashSet;

pub use crate::dense::DenseND;

/// Name of a tensor dimension.
///
/// Two tensors share a dimension iff they carry the same name; position
/// carries no meaning across tensors.
pub type Dim = String;

/// Positional axis index within one tensor.
pub type Axis = usize;

/// Tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape type using SmallVec to avoid heap allocation for common cases.
///
/// Optimized for tensors with up to 6 dimensions.
pub type Shape = SmallVec<[usize; 6]>;

/// Metadata for a single tensor axis.
///
/// ```
/// use lazyten_core::AxisMeta;
///
/// let axis = AxisMeta::new("time", 100);
/// assert_eq!(axis.name, "time");
/// assert_eq!(axis.size, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisMeta {
    /// Symbolic name for this axis
    pub name: Dim,
    /// Number of elements along this axis
    pub size: usize,
}

impl AxisMeta {
    /// Create new axis metadata.
    pub fn new(name: impl Into<Dim>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A concrete tensor whose axes are identified by name.
///
/// Axis `i` of `data` corresponds to `dims[i]`. Names are unique within one
/// tensor and `dims.len() == data.rank()`; both are checked on construction.
/// A `NamedTensor` is never mutated after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTensor<T> {
    dims: Vec<Dim>,
    data: DenseND<T>,
}

impl<T> NamedTensor<T>
where
    T: Clone + Num,
{
    /// Pair dense data with dimension names.
    ///
    /// # Errors
    ///
    /// [`TensorError::RankMismatch`] if the name count differs from the data
    /// rank, [`TensorError::DuplicateDim`] if a name repeats.
    pub fn new(dims: Vec<Dim>, data: DenseND<T>) -> Result<Self, TensorError> {
        if dims.len() != data.rank() {
            return Err(TensorError::RankMismatch {
                dims: dims.len(),
                rank: data.rank(),
            });
        }
        let mut seen = HashSet::with_capacity(dims.len());
        for dim in &dims {
            if !seen.insert(dim.as_str()) {
                return Err(TensorError::DuplicateDim(dim.clone()));
            }
        }
        Ok(Self { dims, data })
    }

    /// Build from row-major values, a list of names and a shape.
    pub fn from_vec<S: AsRef<str>>(
        dims: &[S],
        values: Vec<T>,
        shape: &[usize],
    ) -> Result<Self, TensorError> {
        let dims = dims.iter().map(|d| d.as_ref().to_string()).collect();
        Self::new(dims, DenseND::from_vec(values, shape)?)
    }

    /// A rank-0 tensor with no dimensions.
    pub fn scalar(value: T) -> Self {
        Self {
            dims: Vec::new(),
            data: DenseND::scalar(value),
        }
    }

    /// Dimension names in axis order.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// Underlying dense data.
    pub fn data(&self) -> &DenseND<T> {
        &self.data
    }

    /// Split into names and data.
    pub fn into_parts(self) -> (Vec<Dim>, DenseND<T>) {
        (self.dims, self.data)
    }

    pub fn shape(&self) -> Shape {
        self.data.shape().iter().copied().collect()
    }

    pub fn rank(&self) -> Rank {
        self.dims.len()
    }

    /// Axis position of a named dimension.
    pub fn position(&self, dim: &str) -> Option<Axis> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.position(dim).is_some()
    }

    /// Extent of a named dimension.
    pub fn size_of(&self, dim: &str) -> Option<usize> {
        self.position(dim).map(|axis| self.data.shape()[axis])
    }

    /// `(name, size)` for every axis, in axis order.
    pub fn dim_sizes(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.dims
            .iter()
            .map(String::as_str)
            .zip(self.data.shape().iter().copied())
    }

    /// Axis metadata for every axis, in axis order.
    pub fn axes(&self) -> Vec<AxisMeta> {
        self.dim_sizes()
            .map(|(name, size)| AxisMeta::new(name, size))
            .collect()
    }

    /// Row-major copy of the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Reorder axes so that they follow `order`.
    ///
    /// `order` must name exactly the tensor's dims.
    ///
    /// ```
    /// use lazyten_core::NamedTensor;
    ///
    /// let t = NamedTensor::from_vec(&["a", "b"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let p = t.permute_to(&["b", "a"]).unwrap();
    /// assert_eq!(p.dims(), &["b".to_string(), "a".to_string()]);
    /// assert_eq!(p.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn permute_to<S: AsRef<str>>(&self, order: &[S]) -> Result<Self, TensorError> {
        if order.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                dims: order.len(),
                rank: self.rank(),
            });
        }
        let axes = order
            .iter()
            .map(|d| self.require(d.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let dims = order.iter().map(|d| d.as_ref().to_string()).collect();
        Self::new(dims, self.data.permute(&axes)?)
    }

    /// Element lookup by `(dim, index)` pairs; every dim must be named once.
    pub fn value_at(&self, index: &[(&str, usize)]) -> Result<T, TensorError> {
        if index.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                dims: index.len(),
                rank: self.rank(),
            });
        }
        let mut position = vec![0; self.rank()];
        let mut assigned = vec![false; self.rank()];
        for &(dim, i) in index {
            let axis = self.require(dim)?;
            if assigned[axis] {
                return Err(TensorError::DuplicateDim(dim.to_string()));
            }
            let size = self.data.shape()[axis];
            if i >= size {
                return Err(TensorError::OutOfBounds {
                    dim: dim.to_string(),
                    index: i,
                    size,
                });
            }
            position[axis] = i;
            assigned[axis] = true;
        }
        Ok(self.data[position.as_slice()].clone())
    }

    fn require(&self, dim: &str) -> Result<Axis, TensorError> {
        self.position(dim).ok_or_else(|| TensorError::UnknownDim {
            dim: dim.to_string(),
            available: self.dims.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_tensor_new() {
        let t = NamedTensor::from_vec(&["i", "j"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])
            .unwrap();
        assert_eq!(t.rank(), 2);
        assert_eq!(t.shape().as_slice(), &[2, 3]);
        assert_eq!(t.size_of("i"), Some(2));
        assert_eq!(t.size_of("j"), Some(3));
        assert_eq!(t.size_of("k"), None);
        assert!(t.has_dim("j"));
    }

    #[test]
    fn test_named_tensor_rank_mismatch() {
        let data = DenseND::<f64>::zeros(&[2, 3]);
        let err = NamedTensor::new(vec!["i".to_string()], data).unwrap_err();
        assert_eq!(err, TensorError::RankMismatch { dims: 1, rank: 2 });
    }

    #[test]
    fn test_named_tensor_duplicate_dim() {
        let data = DenseND::<f64>::zeros(&[2, 2]);
        let err = NamedTensor::new(vec!["i".to_string(), "i".to_string()], data).unwrap_err();
        assert_eq!(err, TensorError::DuplicateDim("i".to_string()));
    }

    #[test]
    fn test_scalar() {
        let s = NamedTensor::scalar(2.5_f64);
        assert_eq!(s.rank(), 0);
        assert!(s.dims().is_empty());
        assert_eq!(s.to_vec(), vec![2.5]);
    }

    #[test]
    fn test_value_at_by_name() {
        let t = NamedTensor::from_vec(&["i", "j"], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])
            .unwrap();
        assert_eq!(t.value_at(&[("j", 2), ("i", 1)]).unwrap(), 6.0);
        assert_eq!(t.value_at(&[("i", 0), ("j", 1)]).unwrap(), 2.0);
        assert!(matches!(
            t.value_at(&[("i", 0), ("k", 1)]),
            Err(TensorError::UnknownDim { .. })
        ));
        assert!(matches!(
            t.value_at(&[("i", 2), ("j", 0)]),
            Err(TensorError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_permute_to_unknown_dim() {
        let t = NamedTensor::from_vec(&["i", "j"], vec![0.0; 4], &[2, 2]).unwrap();
        assert!(t.permute_to(&["i", "k"]).is_err());
        assert!(t.permute_to(&["i"]).is_err());
    }

    #[test]
    fn test_axes_metadata() {
        let t = NamedTensor::from_vec(&["x", "y"], vec![0.0; 6], &[3, 2]).unwrap();
        assert_eq!(t.axes(), vec![AxisMeta::new("x", 3), AxisMeta::new("y", 2)]);
    }
}

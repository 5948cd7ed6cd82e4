//! Dense tensor type definition and basic operations
//!
//! This module defines the core `DenseND<T>` type and provides basic creation
//! and accessor methods. Shape manipulation lives in `shape_ops`.

use crate::error::TensorError;
use scirs2_core::ndarray_ext::{Array, ArrayView, IxDyn};
use scirs2_core::numeric::Num;

/// Dense N-dimensional array backed by scirs2_core's ndarray
///
/// `DenseND` is position-addressed storage: it knows nothing about dimension
/// names. [`NamedTensor`](crate::NamedTensor) pairs it with names.
///
/// # Memory Layout
///
/// Tensors are created C-contiguous (row-major). Operations that reorder axes
/// return a fresh standard-layout array, so [`DenseND::to_vec`] is always the
/// row-major flattening of the logical array.
///
/// # Examples
///
/// ```
/// use lazyten_core::DenseND;
///
/// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.rank(), 3);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseND<T> {
    /// Underlying ndarray storage (via scirs2_core)
    pub(crate) data: Array<T, IxDyn>,
}

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Create a tensor from an existing ndarray
    ///
    /// # Examples
    ///
    /// ```
    /// use scirs2_core::ndarray_ext::{Array, IxDyn};
    /// use lazyten_core::DenseND;
    ///
    /// let arr = Array::<f64, _>::zeros(IxDyn(&[2, 3]));
    /// let tensor = DenseND::from_array(arr);
    /// assert_eq!(tensor.shape(), &[2, 3]);
    /// ```
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self { data: array }
    }

    /// Create a tensor from a vector with given shape
    ///
    /// # Arguments
    ///
    /// * `vec` - Flattened data in row-major order
    /// * `shape` - Target shape
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyten_core::DenseND;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let tensor = DenseND::from_vec(data, &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    ///
    /// assert!(DenseND::from_vec(vec![1.0, 2.0], &[3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> Result<Self, TensorError> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            return Err(TensorError::Shape(format!(
                "shape {:?} requires {} elements, but got {}",
                shape,
                total,
                vec.len()
            )));
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)
            .map_err(|e| TensorError::Shape(e.to_string()))?;
        Ok(Self { data: array })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), T::one()),
        }
    }

    /// Create a tensor where every element is `value`
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// Create a rank-0 tensor holding a single value
    ///
    /// ```
    /// use lazyten_core::DenseND;
    ///
    /// let s = DenseND::scalar(3.5_f64);
    /// assert_eq!(s.rank(), 0);
    /// assert_eq!(s.len(), 1);
    /// ```
    pub fn scalar(value: T) -> Self {
        Self::from_elem(&[], value)
    }

    /// Get the rank (number of dimensions) of this tensor
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// Get the shape of this tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor is empty (has zero elements)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutable view of the underlying array
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Borrow the underlying array
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Consume the tensor and return the underlying array
    pub fn into_array(self) -> Array<T, IxDyn> {
        self.data
    }

    /// Element at a multi-index, or `None` when out of bounds
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }
        self.data.get(index)
    }

    /// Row-major copy of the elements
    ///
    /// ```
    /// use lazyten_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

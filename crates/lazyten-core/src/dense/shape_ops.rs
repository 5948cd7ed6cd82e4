//! Axis reordering for dense tensors

use super::types::DenseND;
use crate::error::TensorError;
use scirs2_core::ndarray_ext::IxDyn;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Permute axes (generalized transpose)
    ///
    /// `axes[i]` is the source axis that becomes axis `i` of the result. The
    /// result is stored in standard (row-major) layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazyten_core::DenseND;
    ///
    /// let t = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let p = t.permute(&[1, 0]).unwrap();
    /// assert_eq!(p.shape(), &[3, 2]);
    /// assert_eq!(p.to_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    /// ```
    pub fn permute(&self, axes: &[usize]) -> Result<Self, TensorError> {
        if axes.len() != self.rank() {
            return Err(TensorError::Shape(format!(
                "permutation {:?} has {} axes, tensor has rank {}",
                axes,
                axes.len(),
                self.rank()
            )));
        }
        let mut seen = vec![false; axes.len()];
        for &axis in axes {
            if axis >= axes.len() || seen[axis] {
                return Err(TensorError::Shape(format!(
                    "{:?} is not a permutation of 0..{}",
                    axes,
                    axes.len()
                )));
            }
            seen[axis] = true;
        }
        if axes.iter().enumerate().all(|(i, &a)| i == a) {
            return Ok(self.clone());
        }

        let permuted = self.data.clone().permuted_axes(IxDyn(axes));
        Ok(Self {
            data: permuted.as_standard_layout().into_owned(),
        })
    }
}

//! Semirings for generalized contraction
//!
//! A contraction multiplies aligned operand elements with the semiring's
//! product and folds the contracted index space with its sum. Pairwise
//! execution along a plan is only valid when the product distributes over
//! the sum for every value of `T`, so only such pairs can be constructed.
//! `(Maximum, Mul)` is rejected: it distributes only over non-negative
//! factors.

use crate::executor::BinaryOp;
use scirs2_core::numeric::Float;
use std::fmt;

/// A `(sum, product)` operator pair with product distributing over sum
///
/// ```
/// use lazyten_exec::{BinaryOp, Semiring};
///
/// assert_eq!(Semiring::new(BinaryOp::Add, BinaryOp::Mul), Some(Semiring::SUM_PRODUCT));
/// assert_eq!(Semiring::new(BinaryOp::Mul, BinaryOp::Add), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Semiring {
    sum: BinaryOp,
    prod: BinaryOp,
}

impl Semiring {
    /// Ordinary sum-product: probabilities, counts
    pub const SUM_PRODUCT: Semiring = Semiring {
        sum: BinaryOp::Add,
        prod: BinaryOp::Mul,
    };

    /// Sum-product carried out on log values
    pub const LOG_SUM_PRODUCT: Semiring = Semiring {
        sum: BinaryOp::LogAddExp,
        prod: BinaryOp::Add,
    };

    /// Max-plus (tropical): most likely assignment on log values
    pub const MAX_PLUS: Semiring = Semiring {
        sum: BinaryOp::Maximum,
        prod: BinaryOp::Add,
    };

    /// Min-plus (tropical): shortest paths
    pub const MIN_PLUS: Semiring = Semiring {
        sum: BinaryOp::Minimum,
        prod: BinaryOp::Add,
    };

    /// Every supported semiring
    pub const ALL: [Semiring; 4] = [
        Semiring::SUM_PRODUCT,
        Semiring::LOG_SUM_PRODUCT,
        Semiring::MAX_PLUS,
        Semiring::MIN_PLUS,
    ];

    /// Look up the semiring for an operator pair
    pub fn new(sum: BinaryOp, prod: BinaryOp) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.sum == sum && s.prod == prod)
    }

    pub fn sum(&self) -> BinaryOp {
        self.sum
    }

    pub fn prod(&self) -> BinaryOp {
        self.prod
    }

    /// Additive identity (value of an empty sum)
    pub fn zero<T: Float>(&self) -> T {
        match self.sum {
            BinaryOp::Minimum => T::infinity(),
            BinaryOp::Maximum | BinaryOp::LogAddExp => T::neg_infinity(),
            _ => T::zero(),
        }
    }

    /// Multiplicative identity (value of an empty product)
    pub fn one<T: Float>(&self) -> T {
        match self.prod {
            BinaryOp::Add => T::zero(),
            _ => T::one(),
        }
    }

    #[inline]
    pub fn add<T: Float>(&self, a: T, b: T) -> T {
        self.sum.apply(a, b)
    }

    #[inline]
    pub fn mul<T: Float>(&self, a: T, b: T) -> T {
        self.prod.apply(a, b)
    }
}

impl Default for Semiring {
    fn default() -> Self {
        Semiring::SUM_PRODUCT
    }
}

impl fmt::Display for Semiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sum, self.prod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_distributive_pairs() {
        let mut accepted = 0;
        for sum in BinaryOp::ALL {
            for prod in BinaryOp::ALL {
                if let Some(s) = Semiring::new(sum, prod) {
                    accepted += 1;
                    assert_eq!((s.sum(), s.prod()), (sum, prod));
                }
            }
        }
        assert_eq!(accepted, Semiring::ALL.len());
    }

    #[test]
    fn test_identities_match_operator_table() {
        for s in Semiring::ALL {
            assert_eq!(Some(s.zero::<f64>()), s.sum().identity::<f64>());
            assert_eq!(Some(s.one::<f64>()), s.prod().identity::<f64>());
        }
    }

    #[test]
    fn test_distributivity_on_samples() {
        let samples = [-1.5_f64, 0.25, 2.0, 3.5];
        for s in Semiring::ALL {
            for &a in &samples {
                for &b in &samples {
                    for &c in &samples {
                        let lhs = s.mul(a, s.add(b, c));
                        let rhs = s.add(s.mul(a, b), s.mul(a, c));
                        assert!((lhs - rhs).abs() < 1e-9, "{} on {} {} {}", s, a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_max_product_is_rejected() {
        assert_eq!(Semiring::new(BinaryOp::Maximum, BinaryOp::Mul), None);
        // max(-1 * 1, -1 * 2) != -1 * max(1, 2)
        let (a, b, c) = (-1.0_f64, 1.0, 2.0);
        assert_ne!(
            BinaryOp::Mul.apply(a, BinaryOp::Maximum.apply(b, c)),
            BinaryOp::Maximum.apply(BinaryOp::Mul.apply(a, b), BinaryOp::Mul.apply(a, c))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Semiring::LOG_SUM_PRODUCT.to_string(), "(logaddexp, add)");
        assert_eq!(Semiring::default(), Semiring::SUM_PRODUCT);
    }
}

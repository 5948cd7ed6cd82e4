//! Operator table and backend types

use scirs2_core::numeric::Float;
use std::fmt;

/// Scalar types the executor computes with
pub trait Element: Float + fmt::Debug + Send + Sync + 'static {}

impl<T> Element for T where T: Float + fmt::Debug + Send + Sync + 'static {}

/// Unary element-wise operation types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElemOp {
    /// Negation: -x
    Neg,
    /// Absolute value: |x|
    Abs,
    /// Exponential: e^x
    Exp,
    /// Natural logarithm: ln(x)
    Log,
    /// ln(1 + x), accurate near zero
    Log1p,
    /// Square root: sqrt(x)
    Sqrt,
    /// Power of 2: x^2
    Sqr,
    /// Reciprocal: 1/x
    Recip,
    /// Hyperbolic tangent: tanh(x)
    Tanh,
    /// Sigmoid: 1 / (1 + e^(-x))
    Sigmoid,
    /// Rectified Linear Unit: max(0, x)
    ReLU,
}

impl ElemOp {
    /// Every unary operator, in declaration order
    pub const ALL: [ElemOp; 11] = [
        ElemOp::Neg,
        ElemOp::Abs,
        ElemOp::Exp,
        ElemOp::Log,
        ElemOp::Log1p,
        ElemOp::Sqrt,
        ElemOp::Sqr,
        ElemOp::Recip,
        ElemOp::Tanh,
        ElemOp::Sigmoid,
        ElemOp::ReLU,
    ];

    /// Apply to one value
    pub fn apply<T: Float>(self, v: T) -> T {
        match self {
            ElemOp::Neg => -v,
            ElemOp::Abs => v.abs(),
            ElemOp::Exp => v.exp(),
            ElemOp::Log => v.ln(),
            ElemOp::Log1p => v.ln_1p(),
            ElemOp::Sqrt => v.sqrt(),
            ElemOp::Sqr => v * v,
            ElemOp::Recip => v.recip(),
            ElemOp::Tanh => v.tanh(),
            ElemOp::Sigmoid => {
                let one = T::one();
                one / (one + (-v).exp())
            }
            ElemOp::ReLU => {
                let zero = T::zero();
                if v > zero {
                    v
                } else {
                    zero
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElemOp::Neg => "neg",
            ElemOp::Abs => "abs",
            ElemOp::Exp => "exp",
            ElemOp::Log => "log",
            ElemOp::Log1p => "log1p",
            ElemOp::Sqrt => "sqrt",
            ElemOp::Sqr => "sqr",
            ElemOp::Recip => "recip",
            ElemOp::Tanh => "tanh",
            ElemOp::Sigmoid => "sigmoid",
            ElemOp::ReLU => "relu",
        }
    }
}

/// Binary element-wise operation types (operations on two tensors)
///
/// The same tags name the reduction operator of a `Reduction` and the sum and
/// product of a semiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Element-wise addition: x + y
    Add,
    /// Element-wise subtraction: x - y
    Sub,
    /// Element-wise multiplication: x * y
    Mul,
    /// Element-wise division: x / y
    Div,
    /// Element-wise power: x^y
    Pow,
    /// Element-wise maximum: max(x, y)
    Maximum,
    /// Element-wise minimum: min(x, y)
    Minimum,
    /// ln(e^x + e^y), computed without overflow
    LogAddExp,
}

impl BinaryOp {
    /// Every binary operator, in declaration order
    pub const ALL: [BinaryOp; 8] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
        BinaryOp::Maximum,
        BinaryOp::Minimum,
        BinaryOp::LogAddExp,
    ];

    /// Apply to one pair of values
    pub fn apply<T: Float>(self, x: T, y: T) -> T {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mul => x * y,
            BinaryOp::Div => x / y,
            BinaryOp::Pow => x.powf(y),
            BinaryOp::Maximum => x.max(y),
            BinaryOp::Minimum => x.min(y),
            BinaryOp::LogAddExp => log_add_exp(x, y),
        }
    }

    /// Identity element, if the operator has one usable as a reduction seed
    ///
    /// ```
    /// use lazyten_exec::BinaryOp;
    ///
    /// assert_eq!(BinaryOp::Add.identity::<f64>(), Some(0.0));
    /// assert_eq!(BinaryOp::Maximum.identity::<f64>(), Some(f64::NEG_INFINITY));
    /// assert_eq!(BinaryOp::Sub.identity::<f64>(), None);
    /// ```
    pub fn identity<T: Float>(self) -> Option<T> {
        match self {
            BinaryOp::Add => Some(T::zero()),
            BinaryOp::Mul => Some(T::one()),
            BinaryOp::Maximum | BinaryOp::LogAddExp => Some(T::neg_infinity()),
            BinaryOp::Minimum => Some(T::infinity()),
            BinaryOp::Sub | BinaryOp::Div | BinaryOp::Pow => None,
        }
    }

    pub fn is_associative(self) -> bool {
        !matches!(self, BinaryOp::Sub | BinaryOp::Div | BinaryOp::Pow)
    }

    pub fn is_commutative(self) -> bool {
        !matches!(self, BinaryOp::Sub | BinaryOp::Div | BinaryOp::Pow)
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Pow => "pow",
            BinaryOp::Maximum => "maximum",
            BinaryOp::Minimum => "minimum",
            BinaryOp::LogAddExp => "logaddexp",
        }
    }
}

fn log_add_exp<T: Float>(x: T, y: T) -> T {
    if x == T::neg_infinity() {
        return y;
    }
    if y == T::neg_infinity() {
        return x;
    }
    if x == y && x.is_infinite() {
        return x;
    }
    let m = x.max(y);
    m + (-(x - y).abs()).exp().ln_1p()
}

impl fmt::Display for ElemOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pairwise CPU executor
///
/// Follows the plan step by step: every step contracts two live
/// intermediates into one, and a last pass reduces the survivor to the
/// requested output dims.
#[derive(Debug, Clone)]
pub struct CpuExecutor {
    /// Run [`Plan::validate`](lazyten_planner::Plan::validate) before executing
    pub validate_plans: bool,
}

impl CpuExecutor {
    /// Create a new CPU executor with default settings
    pub fn new() -> Self {
        Self {
            validate_plans: true,
        }
    }

    /// Enable or disable plan validation
    pub fn with_plan_validation(mut self, enable: bool) -> Self {
        self.validate_plans = enable;
        self
    }
}

/// Reference executor
///
/// Ignores the plan and loops once over the joint index space of every
/// operand. Exponential in the number of distinct dims; meant for checking
/// other backends on small inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveExecutor;

impl NaiveExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_apply() {
        assert_eq!(BinaryOp::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(BinaryOp::Sub.apply(2.0, 3.0), -1.0);
        assert_eq!(BinaryOp::Pow.apply(2.0, 3.0), 8.0);
        assert_eq!(BinaryOp::Maximum.apply(2.0, 3.0), 3.0);
        assert_eq!(BinaryOp::Minimum.apply(2.0, 3.0), 2.0);
    }

    #[test]
    fn test_log_add_exp() {
        let v: f64 = BinaryOp::LogAddExp.apply(1.0_f64.ln(), 3.0_f64.ln());
        assert!((v - 4.0_f64.ln()).abs() < 1e-12);

        let big = BinaryOp::LogAddExp.apply(1000.0_f64, 1000.0);
        assert!((big - (1000.0 + 2.0_f64.ln())).abs() < 1e-9);

        let ninf = f64::NEG_INFINITY;
        assert_eq!(BinaryOp::LogAddExp.apply(ninf, ninf), ninf);
        assert_eq!(BinaryOp::LogAddExp.apply(ninf, 2.0), 2.0);
        assert_eq!(BinaryOp::LogAddExp.apply(f64::INFINITY, f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_identities_are_neutral() {
        for op in BinaryOp::ALL {
            if let Some(id) = op.identity::<f64>() {
                for x in [-2.5, 0.0, 1.0, 7.25] {
                    assert_eq!(op.apply(id, x), x, "{} identity", op);
                }
            }
        }
    }

    #[test]
    fn test_operator_properties() {
        assert!(BinaryOp::LogAddExp.is_associative());
        assert!(BinaryOp::Mul.is_commutative());
        assert!(!BinaryOp::Div.is_commutative());
        assert!(!BinaryOp::Pow.is_associative());
    }

    #[test]
    fn test_elem_apply() {
        assert_eq!(ElemOp::Neg.apply(2.0), -2.0);
        assert_eq!(ElemOp::Sqr.apply(3.0), 9.0);
        assert_eq!(ElemOp::ReLU.apply(-1.0), 0.0);
        assert_eq!(ElemOp::Sigmoid.apply(0.0), 0.5);
        assert!((ElemOp::Log1p.apply(1e-10_f64) - 1e-10).abs() < 1e-20);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = BinaryOp::ALL.iter().map(|op| op.name()).collect();
        names.extend(ElemOp::ALL.iter().map(|op| op.name()));
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}

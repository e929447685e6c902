//! Scalar operators shared by the elementwise nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Elementwise single-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Negate,
    Abs,
    Sqrt,
}

impl UnaryOp {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryOp::Negate => -x,
            UnaryOp::Abs => x.abs(),
            UnaryOp::Sqrt => x.sqrt(),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnaryOp::Negate => "negate",
            UnaryOp::Abs => "abs",
            UnaryOp::Sqrt => "sqrt",
        };
        f.write_str(name)
    }
}

/// Elementwise two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_ops_apply() {
        assert_eq!(BinaryOp::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(BinaryOp::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(BinaryOp::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(BinaryOp::Divide.apply(3.0, 2.0), 1.5);
    }

    #[test]
    fn unary_ops_apply() {
        assert_eq!(UnaryOp::Negate.apply(2.0), -2.0);
        assert_eq!(UnaryOp::Abs.apply(-2.5), 2.5);
        assert_eq!(UnaryOp::Sqrt.apply(9.0), 3.0);
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&BinaryOp::Multiply).unwrap(), "\"multiply\"");
        let op: UnaryOp = serde_json::from_str("\"negate\"").unwrap();
        assert_eq!(op, UnaryOp::Negate);
    }
}

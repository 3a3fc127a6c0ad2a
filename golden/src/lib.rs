pub mod bench;
mod builder;
mod eval;

pub use builder::ExpressionBuilder;
pub use eval::{evaluate, EvaluationError, Operator};

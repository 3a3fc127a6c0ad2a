//! Golden model of the calculator core.
//!
//! The expression is evaluated in a single pass with two stacks (operands
//! and pending operators). All values are `i64`; overflow wraps like the
//! two's-complement datapath does, and division truncates toward zero.

use std::fmt::Display;

/// Reasons for the calculator core to raise its fault flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EvaluationError {
    /// The right operand of a `/` evaluated to zero.
    DivisionByZero,
    /// A `)` without a pending `(`.
    UnmatchedCloseParen,
    /// A `(` still pending when the input ends.
    UnmatchedOpenParen,
    /// Too few operands for an operator, or not exactly one value left.
    MalformedExpression,
    /// A character outside `[0-9()+\-*/ =]`. `pos` is the byte offset.
    InvalidCharacter { ch: char, pos: usize },
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::DivisionByZero => write!(f, "division by zero"),
            EvaluationError::UnmatchedCloseParen => write!(f, "unmatched `)`"),
            EvaluationError::UnmatchedOpenParen => write!(f, "unmatched `(`"),
            EvaluationError::MalformedExpression => write!(f, "malformed expression"),
            EvaluationError::InvalidCharacter { ch, pos } => {
                write!(f, "invalid character {ch:?} at offset {pos}")
            }
        }
    }
}

impl std::error::Error for EvaluationError {}

type BinaryFn = fn(i64, i64) -> Result<i64, EvaluationError>;

macro_rules! define_operators {
    {
        $( $name:ident = $sym:literal, $prec:literal, $func:expr; )*
    } => {
        /// Binary operators understood by the calculator core.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Operator {
            $( $name, )*
        }

        impl Operator {
            pub fn from_symbol(c: char) -> Option<Self> {
                match c {
                    $( $sym => Some(Self::$name), )*
                    _ => None,
                }
            }

            pub fn symbol(self) -> char {
                match self {
                    $( Self::$name => $sym, )*
                }
            }

            /// Larger binds tighter. Parentheses are not operators and
            /// rank below all of these.
            pub fn precedence(self) -> u8 {
                match self {
                    $( Self::$name => $prec, )*
                }
            }

            fn function(self) -> BinaryFn {
                match self {
                    $( Self::$name => {
                        let f: BinaryFn = $func;
                        f
                    } )*
                }
            }
        }
    };
}

define_operators! {
    Add = '+', 1, |l, r| Ok(l.wrapping_add(r));
    Sub = '-', 1, |l, r| Ok(l.wrapping_sub(r));
    Mul = '*', 2, |l, r| Ok(l.wrapping_mul(r));
    Div = '/', 2, |l, r| {
        if r == 0 {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(l.wrapping_div(r))
    };
}

impl Operator {
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, EvaluationError> {
        (self.function())(lhs, rhs)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Entry of the operator stack. `Open` is the barrier pushed by `(`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Open,
    Apply(Operator),
}

/// Pop one operator and its two operands, push the result.
fn fold(values: &mut Vec<i64>, ops: &mut Vec<Pending>) -> Result<(), EvaluationError> {
    let (Some(rhs), Some(lhs)) = (values.pop(), values.pop()) else {
        return Err(EvaluationError::MalformedExpression);
    };
    let Some(Pending::Apply(op)) = ops.pop() else {
        return Err(EvaluationError::MalformedExpression);
    };

    let v = op.apply(lhs, rhs)?;
    tracing::trace!(%op, lhs, rhs, result = v, "fold");
    values.push(v);
    Ok(())
}

/// Evaluate an infix expression like `(2+3)*4=`.
///
/// Whitespace and `=` are skipped. Numbers are unsigned literals; there is
/// no unary minus, so `-7/2=` is malformed while `(0-7)/2=` gives `-3`.
pub fn evaluate(expression: &str) -> Result<i64, EvaluationError> {
    let mut values: Vec<i64> = Vec::new();
    let mut ops: Vec<Pending> = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c.is_ascii_whitespace() || c == '=' {
            continue;
        }

        if let Some(d) = c.to_digit(10) {
            let mut num = d as i64;
            while let Some(d) = chars.peek().and_then(|&(_, c)| c.to_digit(10)) {
                num = num.wrapping_mul(10).wrapping_add(d as i64);
                chars.next();
            }
            values.push(num);
            continue;
        }

        match c {
            '(' => ops.push(Pending::Open),
            ')' => loop {
                match ops.last().copied() {
                    Some(Pending::Open) => {
                        ops.pop();
                        break;
                    }
                    Some(Pending::Apply(_)) => fold(&mut values, &mut ops)?,
                    None => return Err(EvaluationError::UnmatchedCloseParen),
                }
            },
            _ => {
                let op = Operator::from_symbol(c)
                    .ok_or(EvaluationError::InvalidCharacter { ch: c, pos })?;
                // left associative: equal precedence folds first
                while let Some(&Pending::Apply(top)) = ops.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    fold(&mut values, &mut ops)?;
                }
                ops.push(Pending::Apply(op));
            }
        }
    }

    while let Some(&top) = ops.last() {
        match top {
            Pending::Open => return Err(EvaluationError::UnmatchedOpenParen),
            Pending::Apply(_) => fold(&mut values, &mut ops)?,
        }
    }

    match values.as_slice() {
        [v] => Ok(*v),
        _ => Err(EvaluationError::MalformedExpression),
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, EvaluationError::*, Operator};

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2+3*4="), Ok(14));
        assert_eq!(evaluate("(2+3)*4="), Ok(20));
        assert_eq!(evaluate("2*3+4="), Ok(10));
        assert_eq!(evaluate("8/4*2="), Ok(4));
        assert_eq!(evaluate("1+2*3-4/2="), Ok(5));
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(evaluate("10-3-2="), Ok(5));
        assert_eq!(evaluate("100/10/5="), Ok(2));
        assert_eq!(evaluate("10-(3-2)="), Ok(9));
    }

    #[test]
    fn test_literals_and_spaces() {
        assert_eq!(evaluate("42="), Ok(42));
        assert_eq!(evaluate("42"), Ok(42));
        assert_eq!(evaluate(" 12 +\t30 = "), Ok(42));
        assert_eq!(evaluate("007+1="), Ok(8));
        assert_eq!(evaluate("((((7))))="), Ok(7));
        assert_eq!(evaluate("4294967296*2="), Ok(8589934592));
    }

    /// Rust `/` truncates toward zero, so a negative quotient rounds up.
    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(evaluate("7/2="), Ok(3));
        assert_eq!(evaluate("(0-7)/2="), Ok(-3));
        assert_eq!(evaluate("7/(0-2)="), Ok(-3));
        assert_eq!(evaluate("(0-7)/(0-2)="), Ok(3));
        // no unary minus
        assert_eq!(evaluate("-7/2="), Err(MalformedExpression));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("5/0="), Err(DivisionByZero));
        assert_eq!(evaluate("5/(3-3)="), Err(DivisionByZero));
        assert_eq!(evaluate("1+(5/0)*2="), Err(DivisionByZero));
        assert_eq!(evaluate("0/5="), Ok(0));
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(evaluate(")5(="), Err(UnmatchedCloseParen));
        assert_eq!(evaluate("(1+2))="), Err(UnmatchedCloseParen));
        assert_eq!(evaluate("(5="), Err(UnmatchedOpenParen));
        assert_eq!(evaluate("((1+2)*3="), Err(UnmatchedOpenParen));
        assert_eq!(evaluate("()="), Err(MalformedExpression));
        // pending operators fold before the leftover `(` is reached
        assert_eq!(evaluate("(5+="), Err(MalformedExpression));
        assert_eq!(evaluate("1+(2*3="), Err(UnmatchedOpenParen));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(evaluate("5+="), Err(MalformedExpression));
        assert_eq!(evaluate("="), Err(MalformedExpression));
        assert_eq!(evaluate(""), Err(MalformedExpression));
        assert_eq!(evaluate("+5="), Err(MalformedExpression));
        assert_eq!(evaluate("2 3="), Err(MalformedExpression));
        assert_eq!(evaluate("2**3="), Err(MalformedExpression));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            evaluate("2^3="),
            Err(InvalidCharacter { ch: '^', pos: 1 })
        );
        assert_eq!(
            evaluate("x="),
            Err(InvalidCharacter { ch: 'x', pos: 0 })
        );
        assert_eq!(
            evaluate("1+é="),
            Err(InvalidCharacter { ch: 'é', pos: 2 })
        );
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(evaluate("9223372036854775807+1="), Ok(i64::MIN));
        assert_eq!(evaluate("0-9223372036854775807-1="), Ok(i64::MIN));
        assert_eq!(
            evaluate("(0-9223372036854775807-1)/(0-1)="),
            Ok(i64::MIN)
        );
        // literals wider than 64 bits wrap while they are accumulated
        assert_eq!(evaluate("9223372036854775808="), Ok(i64::MIN));
        assert_eq!(
            evaluate("99999999999999999999="),
            Ok(7766279631452241919)
        );
        assert_eq!(evaluate("18446744073709551616+3="), Ok(3));
    }

    #[test]
    fn test_idempotent() {
        let expr = "(12+7)*3-40/(1+1)=";
        let first = evaluate(expr);
        for _ in 0..8 {
            assert_eq!(evaluate(expr), first);
        }
        assert_eq!(first, Ok(37));
    }

    #[test]
    fn test_operator_table() {
        for (c, prec) in [('+', 1), ('-', 1), ('*', 2), ('/', 2)] {
            let op = Operator::from_symbol(c).unwrap();
            assert_eq!(op.symbol(), c);
            assert_eq!(op.precedence(), prec);
            assert_eq!(op.to_string(), c.to_string());
        }
        assert_eq!(Operator::from_symbol('('), None);
        assert_eq!(Operator::Div.apply(9, 0), Err(DivisionByZero));
        assert_eq!(Operator::Sub.apply(2, 9), Ok(-7));
    }
}

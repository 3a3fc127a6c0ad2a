//! Compare the response of the device with the golden model.

use std::fmt::Display;
use std::str::FromStr;

use ansi_term::Colour;

use crate::eval::EvaluationError;

/// Width of the result register of the calculator core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DataWidth(u32);

impl DataWidth {
    pub const MAX: u32 = 64;

    pub fn new(bits: u32) -> Option<Self> {
        (1..=Self::MAX).contains(&bits).then_some(Self(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Keep the low `bits` bits of `value` and sign-extend them, which is
    /// how the register reads back as a signed integer.
    pub fn truncate(self, value: i64) -> i64 {
        let shift = Self::MAX - self.0;
        (value << shift) >> shift
    }
}

impl FromStr for DataWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u32 = s.parse().map_err(|e| format!("{e}"))?;
        Self::new(bits).ok_or(format!("width must be within 1..={}", Self::MAX))
    }
}

impl Default for DataWidth {
    fn default() -> Self {
        Self(32)
    }
}

/// One result handshake: the fault flag and the result register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Response {
    pub fault: bool,
    pub value: i64,
}

impl Response {
    pub fn ok(value: i64) -> Self {
        Self {
            fault: false,
            value,
        }
    }

    pub fn fault() -> Self {
        Self {
            fault: true,
            value: 0,
        }
    }

    /// The response the device is expected to give. Every error maps to the
    /// single fault flag.
    pub fn golden(result: &Result<i64, EvaluationError>, width: DataWidth) -> Self {
        match result {
            Ok(v) => Self::ok(width.truncate(*v)),
            Err(_) => Self::fault(),
        }
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fault {
            write!(f, "fault")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Verdict {
    /// Neither side faulted and the values agree.
    Pass,
    /// Both sides agree that the expression is invalid.
    Invalid,
    /// Value mismatch, or only one side raised the fault flag.
    Fail,
}

impl Verdict {
    pub fn is_fail(self) -> bool {
        self == Verdict::Fail
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Pass => Colour::Green.paint("PASS"),
            Verdict::Invalid => Colour::Red.paint("Invalid Expression"),
            Verdict::Fail => Colour::Red.bold().paint("FAIL"),
        };
        write!(f, "{s}")
    }
}

/// The value register is ignored while the fault flag is raised.
pub fn compare(dut: Response, golden: Response) -> Verdict {
    match (dut.fault, golden.fault) {
        (true, true) => Verdict::Invalid,
        (false, false) if dut.value == golden.value => Verdict::Pass,
        _ => Verdict::Fail,
    }
}

//! This module drives a calculator device with expressions and checks every
//! response against the golden model.

mod compare;
mod dut;

use std::fmt::Display;

pub use compare::{compare, DataWidth, Response, Verdict};
pub use dut::{ModelDut, ReplayDut};

use ansi_term::Colour;

use crate::eval::{evaluate, EvaluationError};

/// Frame printed around every test case report.
pub const RULE: &str = "==============================================";

/// The device under test, seen through its data port and result handshake.
pub trait Dut {
    /// Feed one character of the expression. Blocks until the device is
    /// ready to accept it.
    fn put_data(&mut self, c: u8) -> anyhow::Result<()>;

    /// Wait for the result of the expression terminated by `=` and
    /// acknowledge it.
    fn get_result(&mut self) -> anyhow::Result<Response>;
}

/// Outcome of one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// 1-based test case number
    pub index: usize,
    pub expression: String,
    pub dut: Response,
    pub golden: Result<i64, EvaluationError>,
    pub verdict: Verdict,
}

impl Display for CaseReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Test Case : {}", self.index)?;
        writeln!(f, "Expression: \"{}\"", self.expression)?;
        writeln!(f, "Result    : {}", self.dut)?;
        match &self.golden {
            Ok(v) => writeln!(f, "Expected  : {v}")?,
            Err(err) => {
                let detail = Colour::Fixed(244).paint(format!("({err})"));
                writeln!(f, "Expected  : fault {detail}")?
            }
        }
        writeln!(f, "Compare result: {}", self.verdict)?;
        write!(f, "{RULE}")
    }
}

/// All case reports of one run.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub cases: Vec<CaseReport>,
}

impl Summary {
    fn count(&self, verdict: Verdict) -> usize {
        self.cases.iter().filter(|c| c.verdict == verdict).count()
    }
    pub fn passed(&self) -> usize {
        self.count(Verdict::Pass)
    }
    pub fn invalid(&self) -> usize {
        self.count(Verdict::Invalid)
    }
    pub fn failed(&self) -> usize {
        self.count(Verdict::Fail)
    }
    /// No case failed. Agreeing on a fault counts as success.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cases: {} passed, {} invalid, {} failed",
            self.cases.len(),
            self.passed(),
            self.invalid(),
            self.failed()
        )
    }
}

pub struct Testbench {
    width: DataWidth,
}

impl Testbench {
    pub fn new(width: DataWidth) -> Self {
        Self { width }
    }

    pub fn width(&self) -> DataWidth {
        self.width
    }

    /// Shift `line` into the device up to and including the first `=`
    /// (appending one if the line has none), then collect and check the
    /// response.
    pub fn run_case(
        &self,
        dut: &mut dyn Dut,
        index: usize,
        line: &str,
    ) -> anyhow::Result<CaseReport> {
        let mut terminated = false;
        for c in line.bytes() {
            dut.put_data(c)?;
            if c == b'=' {
                terminated = true;
                break;
            }
        }
        if !terminated {
            dut.put_data(b'=')?;
        }
        let response = dut.get_result()?;

        let golden = evaluate(line);
        let verdict = compare(response, Response::golden(&golden, self.width));
        tracing::debug!(index, line, %response, ?golden, ?verdict, "case done");
        if verdict.is_fail() {
            tracing::warn!("case {index} failed: \"{line}\"");
        }

        Ok(CaseReport {
            index,
            expression: line.to_string(),
            dut: response,
            golden,
            verdict,
        })
    }

    /// Run every non-blank line of `src` as one case.
    pub fn run(&self, dut: &mut dyn Dut, src: &str) -> anyhow::Result<Summary> {
        let mut summary = Summary::default();
        for line in src.lines().filter(|l| !l.trim().is_empty()) {
            let index = summary.cases.len() + 1;
            let report = self.run_case(dut, index, line)?;
            summary.cases.push(report);
        }
        tracing::info!("{summary}");
        Ok(summary)
    }
}

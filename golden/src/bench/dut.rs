//! Devices that can sit behind the [`Dut`] interface.

use std::collections::VecDeque;
use std::path::Path;

use anyhow::Context;
use regex::Regex;

use super::{DataWidth, Dut, Response};
use crate::builder::ExpressionBuilder;

/// Software model of the calculator core. It answers every expression with
/// the golden response at its own register width.
#[derive(Debug, Default)]
pub struct ModelDut {
    width: DataWidth,
    expr: ExpressionBuilder,
}

impl ModelDut {
    pub fn new(width: DataWidth) -> Self {
        Self {
            width,
            expr: ExpressionBuilder::new(),
        }
    }
}

impl Dut for ModelDut {
    fn put_data(&mut self, c: u8) -> anyhow::Result<()> {
        self.expr.push(c);
        Ok(())
    }

    fn get_result(&mut self) -> anyhow::Result<Response> {
        anyhow::ensure!(
            self.expr.is_complete(),
            "result requested before `=`: \"{}\"",
            self.expr
        );
        let r = Response::golden(&self.expr.evaluate(), self.width);
        tracing::trace!(expr = %self.expr, %r, "model response");
        self.expr.clear();
        Ok(r)
    }
}

/// Replays the responses recorded from a simulation run of the real core.
///
/// A trace has one response per line: either `fault` or a signed decimal
/// value. Blank lines and `#` comments are ignored.
#[derive(Debug)]
pub struct ReplayDut {
    responses: VecDeque<Response>,
    consumed: usize,
}

impl ReplayDut {
    pub fn from_trace(src: &str) -> anyhow::Result<Self> {
        let re = Regex::new(r"^\s*(?:(?P<fault>fault)|(?P<value>-?[0-9]+))?\s*(?:#.*)?$")?;

        let mut responses = VecDeque::new();
        for (i, line) in src.lines().enumerate() {
            let Some(caps) = re.captures(line) else {
                anyhow::bail!("invalid trace line {}: {:?}", i + 1, line);
            };
            if caps.name("fault").is_some() {
                responses.push_back(Response::fault());
            } else if let Some(v) = caps.name("value") {
                let value = v
                    .as_str()
                    .parse()
                    .with_context(|| format!("value out of range on trace line {}", i + 1))?;
                responses.push_back(Response::ok(value));
            }
        }

        Ok(Self {
            responses,
            consumed: 0,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read trace `{}`", path.display()))?;
        Self::from_trace(&content).with_context(|| format!("in trace `{}`", path.display()))
    }

    /// Responses not yet handed out.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Dut for ReplayDut {
    fn put_data(&mut self, _c: u8) -> anyhow::Result<()> {
        Ok(())
    }

    fn get_result(&mut self) -> anyhow::Result<Response> {
        let r = self.responses.pop_front().ok_or(anyhow::anyhow!(
            "trace exhausted after {} responses",
            self.consumed
        ))?;
        self.consumed += 1;
        Ok(r)
    }
}

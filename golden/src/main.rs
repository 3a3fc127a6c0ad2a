use anyhow::{Context, Result};
use binutils::{clap, verbose};
use calc_golden::bench::{DataWidth, Dut, ModelDut, ReplayDut, Testbench};
use clap::Parser;

/// Check a calculator core against the golden model, one expression per line.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = binutils::get_styles(),
)]
struct Args {
    /// Path to the expression file
    #[arg(default_value = "tests/input.txt")]
    input: String,

    /// Responses recorded from the device, one per expression
    ///
    /// Each line is either `fault` or the signed result value (see `cgev`).
    /// Without a trace the built-in software model of the core is checked.
    #[arg(short = 't', long)]
    trace: Option<String>,

    /// Width of the result register in bits
    #[arg(short = 'w', long, default_value = "32")]
    width: DataWidth,

    #[command(flatten)]
    verbose: verbose::Verbosity,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = binutils::verbose_level_to_trace(args.verbose.log_level());
    binutils::logging_setup(log_level, None::<&std::fs::File>);

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("could not read file `{}`", &args.input))?;

    let mut dut: Box<dyn Dut> = match &args.trace {
        Some(path) => Box::new(ReplayDut::open(path)?),
        None => Box::new(ModelDut::new(args.width)),
    };

    let tb = Testbench::new(args.width);
    tracing::info!("checking `{}` at {} bits", &args.input, tb.width().bits());
    let summary = tb.run(dut.as_mut(), &content)?;

    for case in &summary.cases {
        println!("{case}");
    }
    println!("{summary}");

    if !summary.is_success() {
        anyhow::bail!("{} of {} cases failed", summary.failed(), summary.cases.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_arg() {
        let args = Args::try_parse_from(["calc-golden", "in.txt", "-w", "16"]).unwrap();
        assert_eq!(args.width.bits(), 16);
        let args = Args::try_parse_from(["calc-golden", "in.txt"]).unwrap();
        assert_eq!(args.width, DataWidth::default());

        for bad in ["0", "65", "wide"] {
            let err = Args::try_parse_from(["calc-golden", "in.txt", "--width", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }
}

use anyhow::{Context, Result};
use binutils::{clap, verbose};
use calc_golden::bench::{DataWidth, Response};
use clap::Parser;

/// Golden answer generator for the calculator testbench.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    long_about = None,
    styles = binutils::get_styles(),
    arg_required_else_help = true,
)]
struct Args {
    /// Path to the expression file
    input: String,

    /// Output filename (default is input%.golden)
    #[arg(short = 'o', long)]
    output: Option<String>,

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

    let mut out = String::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let golden = calc_golden::evaluate(line);
        if let Err(err) = &golden {
            tracing::debug!("\"{line}\": {err}");
        }
        out += &format!("{}\n", Response::golden(&golden, args.width));
    }

    let output_path = if let Some(path) = args.output {
        path
    } else {
        let mut path = std::path::PathBuf::from(&args.input);
        path.set_extension("golden");
        path.to_string_lossy().to_string()
    };
    std::fs::write(&output_path, out)
        .with_context(|| format!("could not write file `{}`", &output_path))?;
    println!("writing to file `{}`", &output_path);
    Ok(())
}

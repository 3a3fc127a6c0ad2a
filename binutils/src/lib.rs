//! Command line plumbing shared by the binaries of this workspace.

pub use clap;
pub use clap_verbosity_flag as verbose;

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Cargo-like colors for `--help` output.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Map the `-v`/`-q` count to a tracing level. Without flags the verbosity
/// level is `Error`, which shows warnings and errors; each `-v` lowers the
/// threshold by one level and `-q` leaves only errors.
pub fn verbose_level_to_trace(level: Option<verbose::Level>) -> &'static tracing::Level {
    match level {
        Some(verbose::Level::Error) => &tracing::Level::WARN,
        Some(verbose::Level::Warn) => &tracing::Level::INFO,
        Some(verbose::Level::Info) => &tracing::Level::DEBUG,
        Some(verbose::Level::Debug) => &tracing::Level::TRACE,
        Some(verbose::Level::Trace) => &tracing::Level::TRACE,
        None => &tracing::Level::ERROR,
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr in the compact text format. If `log_file` is given,
/// they are written to that file as JSON lines instead. Calling this twice
/// keeps the first subscriber.
pub fn logging_setup(level: &tracing::Level, log_file: Option<&std::fs::File>) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(*level)
        .with_target(false);

    let r = match log_file.map(|f| f.try_clone()) {
        Some(Ok(file)) => builder
            .json()
            .with_writer(std::sync::Mutex::new(file))
            .try_init(),
        Some(Err(err)) => {
            eprintln!("can not open log file, logging to stderr: {err}");
            builder.compact().with_writer(std::io::stderr).try_init()
        }
        None => builder.compact().with_writer(std::io::stderr).try_init(),
    };
    if let Err(err) = r {
        eprintln!("logging already initialized: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_verbosity_shows_warnings() {
        let v = verbose::Verbosity::<verbose::ErrorLevel>::new(0, 0);
        assert_eq!(v.log_level(), Some(verbose::Level::Error));
        assert_eq!(verbose_level_to_trace(v.log_level()), &tracing::Level::WARN);
    }

    #[test]
    fn test_verbose_mapping() {
        assert_eq!(verbose_level_to_trace(None), &tracing::Level::ERROR);
        assert_eq!(
            verbose_level_to_trace(Some(verbose::Level::Error)),
            &tracing::Level::WARN
        );
        assert_eq!(
            verbose_level_to_trace(Some(verbose::Level::Info)),
            &tracing::Level::DEBUG
        );
        assert_eq!(
            verbose_level_to_trace(Some(verbose::Level::Trace)),
            &tracing::Level::TRACE
        );
    }
}

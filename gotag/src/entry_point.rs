use crate::cli::Cli;
use crate::commands::{run_tag, TagRunOptions};
use crate::config::Config;
use crate::constants::{DEFAULT_LOG_DIRECTIVE, VERBOSE_LOG_DIRECTIVE};
use crate::output;
use crate::tagger::{TagSpec, Target};
use anyhow::Result;
use clap::Parser;

/// Runs gotag with the given arguments.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run gotag with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
/// Failures of the run itself are printed to stderr and turn into exit code 1.
///
/// # Errors
///
/// Returns an error if writing help or version text fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["gotag".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    init_tracing(cli_var.output.verbose);

    match build_options(&cli_var).and_then(|options| run_tag(&options, writer)) {
        Ok(code) => Ok(code),
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            output::print_error(&mut std::io::stderr(), &err.to_string())?;
            Ok(1)
        }
    }
}

/// Merge command-line flags over the config file found next to the target.
fn build_options(cli: &Cli) -> Result<TagRunOptions> {
    let target: Target = cli.offset.parse()?;
    let config = Config::load_from_path(&target.path).gotag;

    let Some(tag) = cli.tag.tag.clone().or(config.tag) else {
        anyhow::bail!("no tag given; pass --tag or set `tag` in .gotag.toml");
    };
    let spec = TagSpec::new(
        tag,
        cli.tag.prefix.clone().or(config.prefix).unwrap_or_default(),
        cli.tag.suffix.clone().or(config.suffix).unwrap_or_default(),
    )?;
    let write = cli.output.write || (config.write.unwrap_or(false) && !cli.output.diff);

    Ok(TagRunOptions {
        target,
        spec,
        write,
        diff: cli.output.diff,
        json: cli.output.json,
        verbose: cli.output.verbose,
    })
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` wins over the verbosity flag. Safe to call more than once.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose {
        VERBOSE_LOG_DIRECTIVE
    } else {
        DEFAULT_LOG_DIRECTIVE
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second initialisation in the same process (tests) is not an error
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_help_goes_to_writer() {
        let mut out = Vec::new();
        let code = run_with_args_to(args(&["--help"]), &mut out).unwrap();
        assert_eq!(code, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("--offset"));
        assert!(text.contains(".gotag.toml"));
    }

    #[test]
    fn test_bad_flag_exits_one() {
        let mut out = Vec::new();
        assert_eq!(run_with_args_to(args(&["--nope"]), &mut out).unwrap(), 1);
    }

    #[test]
    fn test_invalid_position_exits_one() {
        let mut out = Vec::new();
        let code = run_with_args_to(args(&["-o", "file.go", "-t", "json"]), &mut out).unwrap();
        assert_eq!(code, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_tag_from_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".gotag.toml"),
            "[gotag]\ntag = \"yaml\"\nsuffix = \",omitempty\"\n",
        )
        .unwrap();
        let file = dir.path().join("t.go");
        std::fs::write(&file, "package main\n\ntype T struct {\n\tA int\n}\n").unwrap();

        let mut out = Vec::new();
        let spec = format!("{}:#22", file.display());
        let code = run_with_args_to(args(&["-o", &spec]), &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "package main\n\ntype T struct {\n\tA int `yaml:\"A,omitempty\"`\n}\n"
        );
    }

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gotag.toml"), "[gotag]\ntag = \"yaml\"\n").unwrap();
        let file = dir.path().join("t.go");
        std::fs::write(&file, "package main\n\ntype T struct {\n\tA int\n}\n").unwrap();

        let mut out = Vec::new();
        let spec = format!("{}:#22", file.display());
        run_with_args_to(args(&["-o", &spec, "-t", "json", "--prefix", "x_"]), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("`json:\"x_A\"`"));
    }

    #[test]
    fn test_missing_tag_exits_one() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("t.go");
        std::fs::write(&file, "package main\n\ntype T struct {\n\tA int\n}\n").unwrap();

        let mut out = Vec::new();
        let spec = format!("{}:#22", file.display());
        assert_eq!(run_with_args_to(args(&["-o", &spec]), &mut out).unwrap(), 1);
    }
}

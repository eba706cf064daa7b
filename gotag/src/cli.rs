use clap::{Args, Parser};

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.gotag.toml):
  Looked up from the directory of the target file upwards.
  Command-line options take precedence.

  [gotag]
  tag = \"json\"             # Tag key to add
  prefix = \"\"              # Prepended to each field name
  suffix = \",omitempty\"    # Appended to each field name
  write = false            # Rewrite the file in place
";

/// What to add to the selected struct.
#[derive(Args, Debug, Default, Clone)]
pub struct TagOptions {
    /// Tag key to add to each field (e.g. json, xml, yaml).
    /// Falls back to `tag` in the config file.
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Text placed before the field name in the tag value.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Text placed after the field name in the tag value (e.g. ",omitempty").
    #[arg(long)]
    pub suffix: Option<String>,
}

/// Where the result goes and how much is reported.
#[derive(Args, Debug, Default, Clone)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are legitimately booleans
pub struct OutputOptions {
    /// Rewrite the file in place instead of printing it.
    #[arg(short, long, conflicts_with = "diff")]
    pub write: bool,

    /// Print a unified diff instead of the whole file.
    #[arg(short, long)]
    pub diff: bool,

    /// Print a JSON report of what happened to each field instead of the source.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    name = "gotag",
    author,
    version,
    about = "Add struct tags to every exported field of a Go struct",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Position of the struct as <file>:#<byte offset>.
    /// Any offset inside the struct type works; nested structs win over outer ones.
    #[arg(short, long, value_name = "FILE:#OFFSET")]
    pub offset: String,

    /// Tag options.
    #[command(flatten)]
    pub tag: TagOptions,

    /// Output options.
    #[command(flatten)]
    pub output: OutputOptions,
}

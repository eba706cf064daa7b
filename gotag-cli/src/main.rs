//! Command-line interface entry point for `gotag`.

use anyhow::Result;
use gotag::entry_point;

fn main() -> Result<()> {
    // Same entry point as the `gotag-bin` target of the library crate
    let code = entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}

//! Main binary entry point for gotag.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()` function
//! so it behaves exactly like the `gotag` binary from `gotag-cli`.

use anyhow::Result;

fn main() -> Result<()> {
    let code = gotag::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}

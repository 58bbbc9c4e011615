//! metric-slots CLI entry point.

use metric_slots::cli::{self, Cli};
use metric_slots::core::Result;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Execute the command
    cli::execute(cli)
}

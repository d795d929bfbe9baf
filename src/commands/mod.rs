//! Implementations of the `kp` CLI subcommands.

mod call_tool;
mod contribute;
mod search;

pub use call_tool::call_tool;
pub use contribute::contribute;
pub use search::{search, SearchOpts};

use owo_colors::OwoColorize;

use crate::result::KpResult;

/// Print a normalized failure to stderr and return the process exit code.
fn report_failure<T>(result: &KpResult<T>) -> i32 {
    if let Some(failure) = result.failure() {
        eprintln!("{} {}", "error:".red().bold(), failure.message);
        if let Some(details) = &failure.details {
            if let Some(excerpt) = &details.body_excerpt {
                eprintln!("  {}", excerpt.dimmed());
            }
        }
        return 1;
    }
    0
}

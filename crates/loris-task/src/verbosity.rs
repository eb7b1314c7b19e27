//! Reporting verbosity shared across the workspace.

use std::fmt;
use std::str::FromStr;

/// How much progress reporting the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No progress output at all.
    Silent,
    /// One line per termination reason plus a final summary.
    #[default]
    Normal,
    /// Per-iteration detail: plans, flaws, refinement decisions.
    Verbose,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(Verbosity::Silent),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            other => Err(format!(
                "unknown verbosity '{other}' (expected silent, normal, or verbose)"
            )),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verbosity::Silent => "silent",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
        };
        write!(f, "{label}")
    }
}

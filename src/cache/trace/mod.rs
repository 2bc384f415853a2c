use std::path::Path;

use crate::cache::errors::Errors;
use crate::cache::trace::parser::{ArcParser, LirsParser};

pub mod parser;
pub mod synthetic;

/// Syntax of a trace file.
#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum TraceFormat {
    /// One key per line, lines starting with `*` are comments
    Lirs,
    /// `start_block count ...` per line, expanded to `count` consecutive keys, last block first
    Arc,
}

impl TraceFormat {
    /// Reads every key of the trace file, stops at the first malformed line.
    pub fn load(self, path: &Path) -> Result<Vec<u64>, Errors> {
        match self {
            TraceFormat::Lirs => LirsParser::open(path)?.collect(),
            TraceFormat::Arc => ArcParser::open(path)?.collect(),
        }
    }
}

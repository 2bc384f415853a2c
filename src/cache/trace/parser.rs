use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::ops::Range;
use std::path::Path;

use crate::cache::errors::Errors;

/// Reads one key per line. Blank lines and lines starting with `*` are skipped.
pub struct LirsParser<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
}

impl LirsParser<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Errors> {
        Ok(LirsParser::new(open(path)?))
    }
}

impl<R: BufRead> LirsParser<R> {
    pub fn new(reader: R) -> Self {
        LirsParser { lines: reader.lines(), line_number: 0 }
    }
}

impl<R: BufRead> Iterator for LirsParser<R> {
    type Item = Result<u64, Errors>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match next_line(&mut self.lines, &mut self.line_number)? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('*') {
                continue;
            }
            return Some(parse_number(line, self.line_number));
        }
    }
}

/// Reads `start_block count` per line and yields the keys of `start_block..start_block + count` from the last
/// block down to `start_block`.
/// Trailing fields are ignored, blank lines are skipped.
pub struct ArcParser<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    pending: Range<u64>,
}

impl ArcParser<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Errors> {
        Ok(ArcParser::new(open(path)?))
    }
}

impl<R: BufRead> ArcParser<R> {
    pub fn new(reader: R) -> Self {
        ArcParser { lines: reader.lines(), line_number: 0, pending: 0..0 }
    }

    fn parse_block(line: &str, line_number: usize) -> Result<Option<Range<u64>>, Errors> {
        let mut fields = line.split_whitespace();
        let Some(start) = fields.next() else { return Ok(None); };
        let start = parse_number(start, line_number)?;
        let count = match fields.next() {
            Some(count) => parse_number(count, line_number)?,
            None => return Err(Errors::TraceParse(line_number, "missing block count".to_string())),
        };
        Ok(Some(start..start.saturating_add(count)))
    }
}

impl<R: BufRead> Iterator for ArcParser<R> {
    type Item = Result<u64, Errors>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key) = self.pending.next_back() {
                return Some(Ok(key));
            }
            let line = match next_line(&mut self.lines, &mut self.line_number)? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            match Self::parse_block(&line, self.line_number) {
                Ok(Some(block)) => self.pending = block,
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, Errors> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|err| Errors::TraceUnavailable(format!("{}: {}", path.display(), err)))
}

fn next_line<R: BufRead>(lines: &mut Lines<R>, line_number: &mut usize) -> Option<Result<String, Errors>> {
    let line = lines.next()?;
    *line_number += 1;
    Some(line.map_err(|err| Errors::TraceParse(*line_number, err.to_string())))
}

fn parse_number(field: &str, line_number: usize) -> Result<u64, Errors> {
    field.parse::<u64>().map_err(|_| Errors::TraceParse(line_number, format!("invalid number '{}'", field)))
}

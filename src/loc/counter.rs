use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::util::{count_reader_lines, is_binary_reader};

/// Count the lines of a source file. Returns `None` for binary files.
pub fn count_lines(path: &Path) -> io::Result<Option<usize>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    if is_binary_reader(&mut reader)? {
        return Ok(None);
    }

    Ok(Some(count_reader_lines(reader)?))
}

#[cfg(test)]
#[path = "counter_test.rs"]
mod tests;

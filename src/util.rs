use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use crate::error::{AttribError, Result};

/// Check whether a reader points to a binary file by looking for null bytes
/// in the first 512 bytes. Resets the reader position to the start afterward.
pub fn is_binary_reader<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let mut header = [0u8; 512];
    let n = reader.read(&mut header)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(header[..n].contains(&0))
}

/// Lines of a byte buffer as a universal-newline text reader splits them:
/// `\n`, `\r\n` and a lone `\r` each end a line, and trailing text without
/// a terminator is one more line. Terminators are not included.
pub struct UniversalLines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for UniversalLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(pos) = self.rest.iter().position(|&b| b == b'\n' || b == b'\r') else {
            let line = self.rest;
            self.rest = &[];
            return Some(line);
        };
        let line = &self.rest[..pos];
        let skip = if self.rest[pos] == b'\r' && self.rest.get(pos + 1) == Some(&b'\n') {
            2
        } else {
            1
        };
        self.rest = &self.rest[pos + skip..];
        Some(line)
    }
}

pub fn universal_lines(bytes: &[u8]) -> UniversalLines<'_> {
    UniversalLines { rest: bytes }
}

/// Count lines the way [`universal_lines`] splits them. Bytes are not
/// required to be valid UTF-8.
pub fn count_reader_lines<R: Read>(mut reader: R) -> io::Result<usize> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(universal_lines(&bytes).count())
}

/// Count the lines of a file. The handle is closed before returning.
pub fn count_file_lines(path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    count_reader_lines(BufReader::new(file))
}

/// Lines of a text file, split like [`universal_lines`], with invalid UTF-8
/// replaced.
pub fn read_source_lines(path: &Path) -> io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(universal_lines(&bytes)
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect())
}

/// Lexically normalize a path: drop `.` components and resolve `..`
/// against preceding normal components. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against the current directory, then normalize it.
/// Falls back to the lexical form when the current directory is unknown.
pub fn absolute_path(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(abs) => normalize_path(&abs),
        Err(_) => normalize_path(path),
    }
}

/// Read a detector report from a file, or from stdin when `path` is `-`.
/// Invalid UTF-8 is replaced, whichever the source.
pub fn read_report(path: &Path) -> Result<String> {
    let read = if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin().lock().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        std::fs::read(path)
    };
    read.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|source| AttribError::ReportRead {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[path = "util_test.rs"]
mod tests;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Lazily reads non-blank lines from a file, stopping after `limit` lines.
/// Each item carries its 1-based line number in the file and the raw line
/// bytes without the trailing newline.
///
/// Lines are not decoded here: a stray non-UTF-8 byte is a problem with that
/// one line, not a read failure, so decoding is left to the record parser.
///
/// The file handle is owned by the iterator and released as soon as the cap
/// is reached, so reading the head of a multi-megabyte transcript only costs
/// the bytes up to the last returned line.
pub struct Lines {
    inner: Option<BufReader<File>>,
    remaining: Option<usize>,
    line_no: usize,
}

/// Open `path` for streaming. Errors opening the file surface immediately.
pub fn read_lines(path: &Path, limit: Option<usize>) -> io::Result<Lines> {
    let file = File::open(path)?;
    Ok(Lines {
        inner: Some(BufReader::new(file)),
        remaining: limit,
        line_no: 0,
    })
}

fn trim_newline(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

impl Iterator for Lines {
    type Item = io::Result<(usize, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            self.inner = None;
            return None;
        }
        let reader = self.inner.as_mut()?;
        loop {
            let mut buf = Vec::new();
            let read = reader.read_until(b'\n', &mut buf);
            self.line_no += 1;
            match read {
                Ok(0) => {
                    self.inner = None;
                    return None;
                }
                Err(e) => {
                    self.inner = None;
                    return Some(Err(e));
                }
                Ok(_) => {
                    trim_newline(&mut buf);
                    if buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    if let Some(n) = self.remaining.as_mut() {
                        *n -= 1;
                        if *n == 0 {
                            self.inner = None;
                        }
                    }
                    return Some(Ok((self.line_no, buf)));
                }
            }
        }
    }
}

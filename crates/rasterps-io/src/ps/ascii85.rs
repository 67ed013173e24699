//! ASCII85 (Base-85) encoding
//!
//! Used by the PostScript output module to embed binary image data
//! in a text-safe representation.  Each group of 4 input bytes maps
//! to 5 printable ASCII characters (`!` through `u`); an all-zero
//! group is shortened to `z`, and the sequence `~>` marks end-of-data.
//!
//! A trailing group of `n` bytes (1 to 3) is zero-padded, encoded, and
//! truncated to `n + 1` characters. The `z` shortcut never applies to
//! such a group.
//!
//! Two encoders are provided:
//!
//! - [`Ascii85Writer`] streams bytes one at a time into any [`Write`],
//!   wrapping the output into fixed-width lines as it goes.
//! - [`encode`] / [`encode_unwrapped`] work on a complete slice.

use crate::{IoError, IoResult};
use std::io::{self, Write};

/// Characters per output line
pub const DEFAULT_LINE_WIDTH: usize = 72;

/// Longest line a DSC-conforming reader must accept
pub const MAX_LINE_WIDTH: usize = 255;

/// End-of-data marker
pub const EOD_MARKER: &str = "~>";

/// Place values of the five base-85 digits, most significant first
const POWERS: [u32; 5] = [85 * 85 * 85 * 85, 85 * 85 * 85, 85 * 85, 85, 1];

/// Encoding of one complete 4-byte group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedTuple {
    /// The all-zero group, written as `z`
    Zero,
    /// Five base-85 digits, already offset by `!`
    Digits([u8; 5]),
}

impl EncodedTuple {
    /// The output characters as ASCII bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EncodedTuple::Zero => b"z",
            EncodedTuple::Digits(digits) => digits,
        }
    }
}

/// Encode one complete 4-byte group, read as a big-endian word.
pub fn encode_tuple(tuple: [u8; 4]) -> EncodedTuple {
    let word = u32::from_be_bytes(tuple);
    if word == 0 {
        EncodedTuple::Zero
    } else {
        EncodedTuple::Digits(digits(word))
    }
}

/// Five base-85 digits of `word`, without the zero shortcut.
fn digits(word: u32) -> [u8; 5] {
    let mut out = [0u8; 5];
    for (slot, power) in out.iter_mut().zip(POWERS) {
        *slot = b'!' + ((word / power) % 85) as u8;
    }
    out
}

/// Encoding of a trailing partial group: `n + 1` digits for `n` bytes.
fn encode_partial(bytes: &[u8]) -> ([u8; 5], usize) {
    debug_assert!((1..4).contains(&bytes.len()));
    let mut tuple = [0u8; 4];
    tuple[..bytes.len()].copy_from_slice(bytes);
    (digits(u32::from_be_bytes(tuple)), bytes.len() + 1)
}

/// Streaming ASCII85 encoder with line wrapping.
///
/// Bytes go in one at a time through [`Ascii85Writer::feed`] (or in bulk
/// through the [`Write`] impl). Completed lines of `line_width` characters
/// are written to the inner writer as soon as they fill up; the pending
/// line never holds more than `line_width + 5` characters.
///
/// [`Ascii85Writer::finish`] must be called once all data has been fed; it
/// encodes the trailing partial group and writes the last short line.
/// Dropping the writer without finishing loses that tail. The end-of-data
/// marker is not written by this type.
#[derive(Debug)]
pub struct Ascii85Writer<W: Write> {
    inner: W,
    tuple: [u8; 4],
    tuple_len: usize,
    line: Vec<u8>,
    line_width: usize,
    lines_written: usize,
}

impl<W: Write> Ascii85Writer<W> {
    /// Create an encoder writing 72-character lines.
    pub fn new(inner: W) -> Self {
        Self::with_line_width(inner, DEFAULT_LINE_WIDTH)
    }

    /// Create an encoder with a custom line width (at least 1).
    ///
    /// Widths above [`MAX_LINE_WIDTH`] are accepted, but the pending line
    /// is only preallocated up to that size.
    pub fn with_line_width(inner: W, line_width: usize) -> Self {
        let line_width = line_width.max(1);
        Self {
            inner,
            tuple: [0; 4],
            tuple_len: 0,
            line: Vec::with_capacity(line_width.min(MAX_LINE_WIDTH) + 5),
            line_width,
            lines_written: 0,
        }
    }

    /// Get the configured line width.
    pub fn line_width(&self) -> usize {
        self.line_width
    }

    /// Number of lines written to the inner writer so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Add one source byte.
    ///
    /// A line left over from an earlier failed write is retried first; if
    /// that fails the byte is not taken. Otherwise the byte is taken, and
    /// an error while writing a newly completed line leaves that line
    /// pending for the next call.
    pub fn feed(&mut self, byte: u8) -> io::Result<()> {
        self.wrap_lines()?;
        self.push(byte)
    }

    fn push(&mut self, byte: u8) -> io::Result<()> {
        self.tuple[self.tuple_len] = byte;
        self.tuple_len += 1;
        if self.tuple_len == 4 {
            let encoded = encode_tuple(self.tuple);
            self.line.extend_from_slice(encoded.as_bytes());
            self.tuple_len = 0;
            self.wrap_lines()?;
        }
        Ok(())
    }

    /// Encode the trailing partial group, write the pending line, and
    /// return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.wrap_lines()?;
        if self.tuple_len > 0 {
            let (digits, len) = encode_partial(&self.tuple[..self.tuple_len]);
            self.line.extend_from_slice(&digits[..len]);
            self.tuple_len = 0;
            self.wrap_lines()?;
        }
        if !self.line.is_empty() {
            self.inner.write_all(&self.line)?;
            self.inner.write_all(b"\n")?;
            self.line.clear();
            self.lines_written += 1;
        }
        log::trace!("ascii85: {} line(s) written", self.lines_written);
        Ok(self.inner)
    }

    /// Write out every complete line held in the pending buffer.
    fn wrap_lines(&mut self) -> io::Result<()> {
        while self.line.len() >= self.line_width {
            self.inner.write_all(&self.line[..self.line_width])?;
            self.inner.write_all(b"\n")?;
            let rest = self.line.len() - self.line_width;
            self.line.copy_within(self.line_width.., 0);
            self.line.truncate(rest);
            self.lines_written += 1;
        }
        Ok(())
    }
}

impl<W: Write> Write for Ascii85Writer<W> {
    /// Returns `Err` only when nothing from `buf` was taken. A failure
    /// after some bytes were taken is reported as a short count; the
    /// unwritten line is retried on the next call.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (taken, &byte) in buf.iter().enumerate() {
            if let Err(e) = self.wrap_lines() {
                return if taken == 0 { Err(e) } else { Ok(taken) };
            }
            if self.push(byte).is_err() {
                return Ok(taken + 1);
            }
        }
        Ok(buf.len())
    }

    /// Flushes the inner writer only; a pending partial group stays
    /// buffered until [`Ascii85Writer::finish`].
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Encode a byte slice as one continuous ASCII85 string.
///
/// No line breaks, no `<~` prefix and no `~>` marker.
pub fn encode_unwrapped(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() / 4 * 5 + 5);
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let tuple = [chunk[0], chunk[1], chunk[2], chunk[3]];
        out.extend(encode_tuple(tuple).as_bytes().iter().map(|&b| b as char));
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let (digits, len) = encode_partial(rest);
        out.extend(digits[..len].iter().map(|&b| b as char));
    }
    out
}

/// Encode a byte slice as an ASCII85 string.
///
/// The output is split into newline-terminated lines of
/// [`DEFAULT_LINE_WIDTH`] characters (the last one may be shorter). It
/// does **not** include the `<~` prefix but does include the `~>`
/// end-of-data marker.
///
/// # Arguments
/// * `data` - Raw binary data to encode
pub fn encode(data: &[u8]) -> String {
    let flat = encode_unwrapped(data);
    let mut out = String::with_capacity(flat.len() + flat.len() / DEFAULT_LINE_WIDTH + 4);
    let mut rest = flat.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(DEFAULT_LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(EOD_MARKER);
    out
}

/// Decode ASCII85 text back to bytes.
///
/// Whitespace is ignored, an optional `<~` prefix is skipped, and decoding
/// stops at the `~>` marker (or at the end of input if it is missing).
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] for characters outside `!`..=`u`,
/// a `z` inside a group, a group that overflows 32 bits, a lone trailing
/// character, or a `~` not followed by `>`.
pub fn decode(text: &str) -> IoResult<Vec<u8>> {
    let body = text.trim_start().strip_prefix("<~").unwrap_or(text);
    let mut out = Vec::with_capacity(body.len() / 5 * 4);
    let mut group = [0u8; 5];
    let mut len = 0;

    let mut bytes = body.bytes();
    while let Some(byte) = bytes.next() {
        match byte {
            b'~' => {
                if bytes.next() == Some(b'>') {
                    break;
                }
                return Err(invalid("'~' not followed by '>'"));
            }
            b'z' if len == 0 => out.extend_from_slice(&[0; 4]),
            b'z' => return Err(invalid("'z' inside an ASCII85 group")),
            b'!'..=b'u' => {
                group[len] = byte - b'!';
                len += 1;
                if len == 5 {
                    out.extend_from_slice(&group_to_word(&group)?);
                    len = 0;
                }
            }
            b if b.is_ascii_whitespace() => {}
            other => return Err(invalid(format!("invalid ASCII85 character 0x{other:02x}"))),
        }
    }

    match len {
        0 => {}
        1 => return Err(invalid("truncated ASCII85 group of one character")),
        n => {
            group[n..].fill(b'u' - b'!');
            let word = group_to_word(&group)?;
            out.extend_from_slice(&word[..n - 1]);
        }
    }
    Ok(out)
}

fn group_to_word(group: &[u8; 5]) -> IoResult<[u8; 4]> {
    let value = group.iter().fold(0u64, |acc, &digit| acc * 85 + digit as u64);
    if value > u32::MAX as u64 {
        return Err(invalid(format!("ASCII85 group value {value} exceeds 32 bits")));
    }
    Ok((value as u32).to_be_bytes())
}

fn invalid(msg: impl Into<String>) -> IoError {
    IoError::InvalidData(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(data: &[u8], line_width: usize) -> String {
        let mut writer = Ascii85Writer::with_line_width(Vec::new(), line_width);
        for &b in data {
            writer.feed(b).unwrap();
        }
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_encode_tuple_known_vector() {
        assert_eq!(encode_tuple(*b"Man ").as_bytes(), b"9jqo^");
        assert_eq!(encode_tuple([0xff; 4]).as_bytes(), b"s8W-!");
    }

    #[test]
    fn test_encode_tuple_zero_shortcut() {
        assert_eq!(encode_tuple([0; 4]), EncodedTuple::Zero);
        assert_eq!(encode_tuple([0; 4]).as_bytes(), b"z");
        assert_eq!(encode_tuple([0, 0, 0, 1]).as_bytes(), b"!!!!\"");
    }

    #[test]
    fn test_partial_group() {
        // 0x4D000000 truncated to 4 characters
        assert_eq!(stream(&[77, 0, 0], 72), "9`P.\n");
        assert_eq!(stream(&[0x4d], 72), "9`\n");
    }

    #[test]
    fn test_partial_zero_group_never_uses_shortcut() {
        assert_eq!(stream(&[0], 72), "!!\n");
        assert_eq!(stream(&[0, 0], 72), "!!!\n");
        assert_eq!(stream(&[0, 0, 0], 72), "!!!!\n");
        assert_eq!(stream(&[0, 0, 0, 0], 72), "z\n");
    }

    #[test]
    fn test_empty_stream_writes_nothing() {
        assert_eq!(stream(&[], 72), "");
        assert_eq!(encode(&[]), "~>");
    }

    #[test]
    fn test_mixed_stream() {
        assert_eq!(encode_unwrapped(&[0, 0, 0, 0, 1, 2, 3, 4, 5]), "z!<N?+\"T");
        assert_eq!(encode_unwrapped(&[10, 20, 30, 50, 60, 70]), "$5=O:4@T");
    }

    #[test]
    fn test_line_wrap() {
        // 60 bytes -> 75 characters -> one full line of 72 plus 3
        let data = vec![0xffu8; 60];
        let out = stream(&data, 72);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 72);
        assert_eq!(lines[1].len(), 3);
        assert_eq!(Some(out.as_str()), encode(&data).strip_suffix(EOD_MARKER));
    }

    #[test]
    fn test_narrow_lines() {
        let out = stream(b"Man Man ", 4);
        assert_eq!(out, "9jqo\n^9jq\no^\n");
    }

    #[test]
    fn test_exact_line_boundary() {
        // 5 characters per tuple, 10-character lines: no trailing short line
        let out = stream(b"Man Man ", 10);
        assert_eq!(out, "9jqo^9jqo^\n");
    }

    #[test]
    fn test_write_impl_matches_feed() {
        let data: Vec<u8> = (0..=255).collect();
        let mut writer = Ascii85Writer::new(Vec::new());
        writer.write_all(&data).unwrap();
        writer.flush().unwrap();
        let via_write = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(via_write, stream(&data, 72));
    }

    #[test]
    fn test_lines_written() {
        let mut writer = Ascii85Writer::with_line_width(Vec::new(), 5);
        for &b in b"Man Man " {
            writer.feed(b).unwrap();
        }
        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.line_width(), 5);
        assert_eq!(writer.get_ref().len(), 12);
    }

    #[test]
    fn test_encode_includes_marker() {
        let out = encode(b"Man ");
        assert_eq!(out, "9jqo^\n~>");
    }

    #[test]
    fn test_decode_known() {
        assert_eq!(decode("9jqo^~>").unwrap(), b"Man ");
        assert_eq!(decode("<~9jqo^~>").unwrap(), b"Man ");
        assert_eq!(decode("z\n9`P.\n~>").unwrap(), vec![0, 0, 0, 0, 77, 0, 0]);
        assert_eq!(decode("!!!").unwrap(), vec![0, 0]);
        assert_eq!(decode("9jq o^ ").unwrap(), b"Man ");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode("9jqo^v"), Err(IoError::InvalidData(_))));
        assert!(matches!(decode("9jzo^"), Err(IoError::InvalidData(_))));
        assert!(matches!(decode("9jqo^9"), Err(IoError::InvalidData(_))));
        assert!(matches!(decode("uuuuu"), Err(IoError::InvalidData(_))));
        assert!(matches!(decode("9jqo^~x"), Err(IoError::InvalidData(_))));
    }

    #[test]
    fn test_write_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = Ascii85Writer::with_line_width(Broken, 5);
        for &b in b"Man" {
            writer.feed(b).unwrap();
        }
        assert!(writer.feed(b' ').is_err());
    }

    /// Fails the first `failures` write calls, then accepts everything
    struct Flaky {
        failures: usize,
        out: Vec<u8>,
    }

    impl Write for Flaky {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(io::Error::other("interrupted device"));
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_reports_short_count_after_failure() {
        let sink = Flaky {
            failures: usize::MAX,
            out: Vec::new(),
        };
        let mut writer = Ascii85Writer::with_line_width(sink, 5);

        // The fourth byte completes a line that cannot be written
        assert_eq!(writer.write(b"Man Man ").unwrap(), 4);
        // The stuck line is retried first, so nothing more is taken
        assert!(writer.write(b"Man ").is_err());
        assert!(writer.get_ref().out.is_empty());
    }

    #[test]
    fn test_write_retries_pending_line() {
        let sink = Flaky {
            failures: 1,
            out: Vec::new(),
        };
        let mut writer = Ascii85Writer::with_line_width(sink, 5);

        assert_eq!(writer.write(b"Man Man ").unwrap(), 4);
        writer.write_all(b"Man ").unwrap();
        let sink = writer.finish().unwrap();
        assert_eq!(sink.out, stream(b"Man Man ", 5).into_bytes());
    }

    #[test]
    fn test_huge_line_width_does_not_preallocate() {
        let out = stream(b"Man Man ", usize::MAX);
        assert_eq!(out, "9jqo^9jqo^\n");
        let writer = Ascii85Writer::with_line_width(Vec::new(), 1usize << 62);
        assert_eq!(writer.line_width(), 1usize << 62);
    }
}

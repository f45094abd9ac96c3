//! Reader input: BOM-aware decoding of UTF-8 / UTF-16 byte streams.
//!
//! `encoding_rs_io` sniffs the byte-order mark and transcodes to UTF-8 on the
//! fly; the decoded text is then handed to the string-based parser.

use std::io::{self, BufReader, Read};

use encoding_rs_io::DecodeReaderBytesBuilder;

/// Read and decode the whole input, failing once more than `max_bytes` of
/// decoded UTF-8 have been produced.
pub(crate) fn read_decoded<R: Read>(reader: R, max_bytes: Option<usize>) -> io::Result<String> {
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(None) // None = sniff BOM / use heuristics
        .strip_bom(true)
        .build(reader);
    let mut reader = BufReader::new(decoder);

    let mut out = String::new();
    let mut chunk = vec![0u8; 8 * 1024];
    let mut pending: Vec<u8> = Vec::new();
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        pending.extend_from_slice(&chunk[..n]);
        // The decoder emits UTF-8, but a read may end inside a multi-byte character.
        let valid = match std::str::from_utf8(&pending) {
            Ok(s) => s.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        if let Some(limit) = max_bytes {
            if out.len().saturating_add(valid) > limit {
                return Err(io::Error::new(
                    io::ErrorKind::FileTooLarge,
                    format!("input size limit of {limit} bytes exceeded"),
                ));
            }
        }
        let text = std::str::from_utf8(&pending[..valid])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        out.push_str(text);
        pending.drain(..valid);
    }
    if !pending.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "input ends inside a UTF-8 sequence",
        ));
    }
    Ok(out)
}

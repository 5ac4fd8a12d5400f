//! Key ingestion from delimited text files.
//!
//! The first line is a header and is skipped. Every non-empty field of every
//! following row becomes one key, in file order. Surrounding whitespace and
//! a single pair of enclosing double quotes are stripped from each field.
use crate::error::BloomResult;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

pub fn read_keys<P: AsRef<Path>>(
    path: P,
    delimiter: char,
) -> BloomResult<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let keys = read_keys_from(BufReader::new(file), delimiter)?;
    debug!(path = %path.display(), count = keys.len(), "read keys");
    Ok(keys)
}

pub fn read_keys_from<R: BufRead>(
    reader: R,
    delimiter: char,
) -> BloomResult<Vec<String>> {
    let mut keys = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        keys.extend(
            line.split(delimiter)
                .map(clean_field)
                .filter(|field| !field.is_empty())
                .map(str::to_owned),
        );
    }
    Ok(keys)
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_skips_header_and_flattens_rows() {
        let data = "email,backup\na@x.com,b@x.com\nc@x.com\n";
        let keys = read_keys_from(Cursor::new(data), ',').unwrap();
        assert_eq!(keys, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn test_blank_lines_and_quotes() {
        let data = "email\n\n \"quoted@x.com\" \r\nplain@x.com,,\n";
        let keys = read_keys_from(Cursor::new(data), ',').unwrap();
        assert_eq!(keys, vec!["quoted@x.com", "plain@x.com"]);
    }

    #[test]
    fn test_header_only_and_empty_input() {
        assert!(read_keys_from(Cursor::new("email\n"), ',').unwrap().is_empty());
        assert!(read_keys_from(Cursor::new(""), ',').unwrap().is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let data = "a;b\none;two\n";
        let keys = read_keys_from(Cursor::new(data), ';').unwrap();
        assert_eq!(keys, vec!["one", "two"]);
    }
}

use std::fmt;
use std::io::{self, Read};

use crate::error::Result;

pub const ALPHABET_SIZE: usize = 256;

/// Printable single-token form of a symbol for the text reports.
///
/// Printable ASCII stays as is; space, control and non-ASCII bytes are
/// escaped (`\x20`, `\n`, `\xff`) so every report line keeps exactly one
/// "symbol value" pair.
pub fn symbol_label(symbol: u8) -> String {
    match symbol {
        b' ' => String::from("\\x20"),
        _ => std::ascii::escape_default(symbol).to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyRecord {
    pub symbol: u8,
    pub count: u64,
}

/// Occurrence counts for every byte value, built from one pass over the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        FrequencyTable { counts }
    }

    /// Count every byte `reader` yields. A read failure aborts the count;
    /// no partial table is returned.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &byte in &buf[..n] {
                counts[byte as usize] += 1;
            }
        }
        Ok(FrequencyTable { counts })
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of symbols counted, i.e. the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }

    /// All 256 records, zero counts included.
    pub fn records(&self) -> impl Iterator<Item = FrequencyRecord> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| FrequencyRecord {
                symbol: symbol as u8,
                count,
            })
    }

    /// Records with count > 0, ascending by symbol.
    pub fn nonzero(&self) -> impl Iterator<Item = FrequencyRecord> + '_ {
        self.records().filter(|r| r.count > 0)
    }

    /// One "symbol count" line per present symbol.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.nonzero() {
            writeln!(f, "{} {}", symbol_label(record.symbol), record.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::HuffmanError;

    #[test]
    fn test_counts_every_byte() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        assert_eq!(table.count(b'a'), 3);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'c'), 1);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.total(), 6);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.records().count(), ALPHABET_SIZE);
    }

    #[test]
    fn test_report_is_ascending() {
        let table = FrequencyTable::from_bytes(b"cabbaa");
        assert_eq!(table.report(), "a 3\nb 2\nc 1\n");
    }

    #[test]
    fn test_report_escapes_whitespace_and_control_bytes() {
        let table = FrequencyTable::from_bytes(b"a\na\n \xff");
        let report = table.report();
        assert_eq!(report, "\\n 2\n\\x20 1\na 2\n\\xff 1\n");
        assert_eq!(report.lines().count(), table.distinct());
        for line in report.lines() {
            assert_eq!(line.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_symbol_label() {
        assert_eq!(symbol_label(b'a'), "a");
        assert_eq!(symbol_label(b'\n'), "\\n");
        assert_eq!(symbol_label(b'\t'), "\\t");
        assert_eq!(symbol_label(b' '), "\\x20");
        assert_eq!(symbol_label(0), "\\x00");
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.report(), "");
        assert_eq!(table.nonzero().count(), 0);
    }

    #[test]
    fn test_reader_matches_slice() {
        let data: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
        let from_reader = FrequencyTable::from_reader(&data[..]).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_read_failure_is_reported() {
        match FrequencyTable::from_reader(FailingReader) {
            Err(HuffmanError::SourceRead(e)) => assert_eq!(e.to_string(), "disk on fire"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

//! Data dumps for the `da`/`db`/`dw`/`dd`/`dq` commands.

use crate::utils::{format_address, printable};

/// Bytes shown per dump row.
const ROW_BYTES: usize = 16;

/// How a data dump groups bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataUnit {
    Ascii,
    Byte,
    Word,
    Dword,
    Qword,
}

impl DataUnit {
    /// Unit selected by a data command name.
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            "da" => Some(Self::Ascii),
            "db" => Some(Self::Byte),
            "dw" => Some(Self::Word),
            "dd" => Some(Self::Dword),
            "dq" => Some(Self::Qword),
            _ => None,
        }
    }

    /// Width in bytes of one value.
    pub fn width(self) -> usize {
        match self {
            Self::Ascii | Self::Byte => 1,
            Self::Word => 2,
            Self::Dword => 4,
            Self::Qword => 8,
        }
    }
}

/// Render at most `lines` rows of `bytes`, the first byte sitting at `addr`.
///
/// Rows stop at the end of `bytes`; a trailing partial value is dropped.
pub fn dump(
    unit: DataUnit,
    addr: u64,
    bytes: &[u8],
    lines: usize,
    big_endian: bool,
    section: Option<&str>,
) -> Vec<String> {
    bytes
        .chunks(ROW_BYTES)
        .take(lines)
        .enumerate()
        .filter_map(|(i, row)| {
            let row_addr = addr + (i * ROW_BYTES) as u64;
            let body = match unit {
                DataUnit::Ascii => printable(row),
                _ => {
                    let values = values(row, unit.width(), big_endian);
                    if values.is_empty() {
                        return None;
                    }
                    values.join(" ")
                }
            };
            Some(format!("{}  {}", format_address(row_addr, section), body))
        })
        .collect()
}

fn values(row: &[u8], width: usize, big_endian: bool) -> Vec<String> {
    row.chunks_exact(width)
        .map(|chunk| {
            let value = if big_endian {
                chunk.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
            } else {
                chunk.iter().rev().fold(0u64, |acc, &b| (acc << 8) | b as u64)
            };
            format!("{:0w$x}", value, w = width * 2)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command() {
        assert_eq!(DataUnit::from_command("dq"), Some(DataUnit::Qword));
        assert_eq!(DataUnit::from_command("dump"), None);
    }

    #[test]
    fn test_bytes_row() {
        let rows = dump(DataUnit::Byte, 0x1000, &[0x90, 0xc3], 10, false, None);
        assert_eq!(rows, vec!["0x1000  90 c3"]);
    }

    #[test]
    fn test_words_respect_endianness() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(
            dump(DataUnit::Word, 0, &bytes, 1, false, None),
            vec!["0x0  0201 0403"]
        );
        assert_eq!(
            dump(DataUnit::Dword, 0, &bytes, 1, true, None),
            vec!["0x0  01020304"]
        );
    }

    #[test]
    fn test_line_limit_and_row_addresses() {
        let bytes = vec![0u8; 64];
        let rows = dump(DataUnit::Qword, 0x400000, &bytes, 3, false, Some(".data"));
        assert_eq!(rows.len(), 3);
        assert!(rows[2].starts_with(".data:0x400020  "));
        assert_eq!(rows[0].split_whitespace().count(), 3);
    }

    #[test]
    fn test_partial_value_dropped() {
        let rows = dump(DataUnit::Dword, 0, &[1, 2, 3, 4, 5, 6], 4, false, None);
        assert_eq!(rows, vec!["0x0  04030201"]);
        assert!(dump(DataUnit::Qword, 0, &[1, 2, 3], 4, false, None).is_empty());
    }

    #[test]
    fn test_ascii_rows() {
        let rows = dump(DataUnit::Ascii, 0x10, b"hello\0world", 1, false, None);
        assert_eq!(rows, vec!["0x10  hello.world"]);
    }
}

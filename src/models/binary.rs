//! Loaded binary representation.

use std::fmt;
use std::path::PathBuf;

use crate::core::SymbolTable;

/// Container format detected by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryFormat {
    Elf,
    Pe,
    /// Headerless blob; architecture comes from the load command.
    Raw,
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elf => write!(f, "ELF"),
            Self::Pe => write!(f, "PE"),
            Self::Raw => write!(f, "RAW"),
        }
    }
}

/// Instruction set of the loaded code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arch {
    X86,
    X64,
    Arm,
    Mips,
    Mips64,
    Unsupported,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "x86"),
            Self::X64 => write!(f, "x64"),
            Self::Arm => write!(f, "arm"),
            Self::Mips => write!(f, "mips"),
            Self::Mips64 => write!(f, "mips64 (octeon)"),
            Self::Unsupported => write!(f, "not supported"),
        }
    }
}

/// A mapped range of the binary. `end` is exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub start: u64,
    pub end: u64,
    /// File offset of `start`, `None` for ranges with no file backing (.bss).
    pub offset: Option<usize>,
}

impl Section {
    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, addr: u64) -> bool {
        (self.start..self.end).contains(&addr)
    }
}

/// A binary handed over by the loader.
#[derive(Clone, Debug)]
pub struct LoadedBinary {
    pub path: PathBuf,
    pub format: BinaryFormat,
    pub arch: Arch,
    pub big_endian: bool,
    pub entry: u64,
    pub symbols: SymbolTable,
    pub sections: Vec<Section>,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl LoadedBinary {
    /// Section containing `addr`, if any.
    pub fn section_at(&self, addr: u64) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(addr))
    }

    /// File bytes from `addr` to the end of its section.
    ///
    /// `None` when the section has no file bytes or its offset points
    /// outside the addressable range.
    pub fn bytes_from(&self, addr: u64) -> Option<&[u8]> {
        let section = self.section_at(addr)?;
        let base = section.offset?;
        let start = base.checked_add(usize::try_from(addr - section.start).ok()?)?;
        let end = base
            .checked_add(usize::try_from(section.size()).ok()?)?
            .min(self.data.len());
        self.data.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> LoadedBinary {
        LoadedBinary {
            path: PathBuf::from("blob"),
            format: BinaryFormat::Raw,
            arch: Arch::X86,
            big_endian: false,
            entry: 0x100,
            symbols: SymbolTable::new(),
            sections: vec![
                Section {
                    name: ".text".to_string(),
                    start: 0x100,
                    end: 0x104,
                    offset: Some(2),
                },
                Section {
                    name: ".bss".to_string(),
                    start: 0x200,
                    end: 0x300,
                    offset: None,
                },
            ],
            data: vec![0, 0, 1, 2, 3, 4, 5],
        }
    }

    #[test]
    fn test_section_lookup() {
        let bin = blob();
        assert_eq!(bin.section_at(0x103).map(|s| s.name.as_str()), Some(".text"));
        assert!(bin.section_at(0x104).is_none());
    }

    #[test]
    fn test_bytes_stop_at_section_end() {
        let bin = blob();
        assert_eq!(bin.bytes_from(0x101), Some(&[2u8, 3, 4][..]));
        assert!(bin.bytes_from(0x200).is_none());
    }

    #[test]
    fn test_bytes_from_rejects_overflowing_offset() {
        let mut bin = blob();
        bin.sections.push(Section {
            name: ".bogus".to_string(),
            start: 0x1000,
            end: 0x1100,
            offset: Some(usize::MAX - 0x10),
        });
        assert!(bin.bytes_from(0x1000).is_none());
        assert!(bin.bytes_from(0x1020).is_none());
    }
}

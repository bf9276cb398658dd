//! Binary loading.
//!
//! The shell talks to loaders through [`Loader`]; [`ObjectLoader`] is the
//! default one, reading ELF and PE headers with `goblin` and mapping raw
//! blobs as a single section at address zero.

use std::path::{Path, PathBuf};

use goblin::Object;
use goblin::elf::Elf;
use goblin::pe::PE;
use log::debug;

use crate::core::SymbolTable;
use crate::core::error::LoadError;
use crate::models::{Arch, BinaryFormat, LoadedBinary, Section};

/// What a load command asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub path: PathBuf,
    /// Set for headerless blobs.
    pub raw: Option<Arch>,
    pub big_endian: bool,
}

pub trait Loader {
    fn load(&self, request: &LoadRequest) -> Result<LoadedBinary, LoadError>;
}

/// ELF/PE/raw loader backed by `goblin`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectLoader;

impl Loader for ObjectLoader {
    fn load(&self, request: &LoadRequest) -> Result<LoadedBinary, LoadError> {
        let data = std::fs::read(&request.path).map_err(|source| LoadError::Io {
            path: request.path.clone(),
            source,
        })?;

        if let Some(arch) = request.raw {
            return Ok(load_raw(&request.path, arch, request.big_endian, data));
        }

        let (format, arch, big_endian, entry, symbols, sections) = match Object::parse(&data) {
            Ok(Object::Elf(elf)) => {
                let (arch, symbols, sections) = describe_elf(&elf);
                (
                    BinaryFormat::Elf,
                    arch,
                    !elf.little_endian,
                    elf.entry,
                    symbols,
                    sections,
                )
            }
            Ok(Object::PE(pe)) => {
                let (arch, symbols, sections) = describe_pe(&pe);
                let entry = (pe.image_base as u64).saturating_add(pe.entry as u64);
                (BinaryFormat::Pe, arch, false, entry, symbols, sections)
            }
            Ok(_) => {
                return Err(LoadError::Unsupported(
                    "only ELF and PE files are recognised, use a lraw* command for raw files"
                        .to_string(),
                ));
            }
            Err(e) => return Err(LoadError::Parse(e.to_string())),
        };

        debug!(
            "loaded {} {} with {} sections and {} symbols",
            format,
            arch,
            sections.len(),
            symbols.len()
        );

        Ok(LoadedBinary {
            path: request.path.clone(),
            format,
            arch,
            big_endian,
            entry,
            symbols,
            sections,
            data,
        })
    }
}

fn load_raw(path: &Path, arch: Arch, big_endian: bool, data: Vec<u8>) -> LoadedBinary {
    let sections = vec![Section {
        name: ".raw".to_string(),
        start: 0,
        end: data.len() as u64,
        offset: Some(0),
    }];

    LoadedBinary {
        path: path.to_path_buf(),
        format: BinaryFormat::Raw,
        arch,
        big_endian,
        entry: 0,
        symbols: SymbolTable::new(),
        sections,
        data,
    }
}

fn describe_elf(elf: &Elf<'_>) -> (Arch, SymbolTable, Vec<Section>) {
    use goblin::elf::header::{EM_386, EM_ARM, EM_MIPS, EM_X86_64};
    use goblin::elf::section_header::SHT_NOBITS;

    let arch = match elf.header.e_machine {
        EM_386 => Arch::X86,
        EM_X86_64 => Arch::X64,
        EM_ARM => Arch::Arm,
        EM_MIPS if elf.is_64 => Arch::Mips64,
        EM_MIPS => Arch::Mips,
        _ => Arch::Unsupported,
    };

    let sections = elf
        .section_headers
        .iter()
        .filter(|sh| sh.is_alloc() && sh.sh_size > 0)
        .map(|sh| Section {
            name: elf
                .shdr_strtab
                .get_at(sh.sh_name)
                .unwrap_or("<unnamed>")
                .to_string(),
            start: sh.sh_addr,
            end: sh.sh_addr.saturating_add(sh.sh_size),
            offset: (sh.sh_type != SHT_NOBITS).then_some(sh.sh_offset as usize),
        })
        .collect();

    let mut symbols = SymbolTable::new();
    let tables = [(&elf.syms, &elf.strtab), (&elf.dynsyms, &elf.dynstrtab)];
    for (syms, strtab) in tables {
        for sym in syms.iter() {
            if sym.st_value == 0 {
                continue;
            }
            if let Some(name) = strtab.get_at(sym.st_name)
                && !name.is_empty()
            {
                symbols.define(name, sym.st_value);
            }
        }
    }

    (arch, symbols, sections)
}

fn describe_pe(pe: &PE<'_>) -> (Arch, SymbolTable, Vec<Section>) {
    use goblin::pe::header::{
        COFF_MACHINE_ARM, COFF_MACHINE_ARMNT, COFF_MACHINE_X86, COFF_MACHINE_X86_64,
    };

    let arch = match pe.header.coff_header.machine {
        COFF_MACHINE_X86 => Arch::X86,
        COFF_MACHINE_X86_64 => Arch::X64,
        COFF_MACHINE_ARM | COFF_MACHINE_ARMNT => Arch::Arm,
        _ => Arch::Unsupported,
    };

    let base = pe.image_base as u64;
    let sections = pe
        .sections
        .iter()
        .map(|s| {
            let size = if s.virtual_size > 0 {
                s.virtual_size
            } else {
                s.size_of_raw_data
            };
            let start = base.saturating_add(s.virtual_address as u64);
            Section {
                name: s.name().unwrap_or("<unnamed>").to_string(),
                start,
                end: start.saturating_add(size as u64),
                offset: (s.pointer_to_raw_data > 0).then_some(s.pointer_to_raw_data as usize),
            }
        })
        .collect();

    let symbols = pe
        .exports
        .iter()
        .filter_map(|exp| {
            exp.name
                .map(|name| (name.to_string(), base.saturating_add(exp.rva as u64)))
        })
        .collect();

    (arch, symbols, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_blob_is_one_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0x90u8; 16]).unwrap();

        let request = LoadRequest {
            path: path.clone(),
            raw: Some(Arch::Mips),
            big_endian: true,
        };
        let binary = ObjectLoader.load(&request).unwrap();
        assert_eq!(binary.format, BinaryFormat::Raw);
        assert_eq!(binary.arch, Arch::Mips);
        assert!(binary.big_endian);
        assert_eq!(binary.sections.len(), 1);
        assert_eq!(binary.sections[0].end, 16);
        assert_eq!(binary.bytes_from(4).map(<[u8]>::len), Some(12));
    }

    #[test]
    fn test_missing_file() {
        let request = LoadRequest {
            path: PathBuf::from("/definitely/not/here"),
            raw: None,
            big_endian: false,
        };
        assert!(matches!(
            ObjectLoader.load(&request),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text, no headers here").unwrap();

        let request = LoadRequest {
            path,
            raw: None,
            big_endian: false,
        };
        assert!(ObjectLoader.load(&request).is_err());
    }
}

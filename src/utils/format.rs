//! Formatting utilities for addresses, sizes, and data rows.

use crate::models::Section;

/// Format an address, prefixed with its section name when one is given
/// (e.g., ".text:0x401000").
pub fn format_address(addr: u64, section: Option<&str>) -> String {
    match section {
        Some(name) => format!("{}:0x{:x}", name, addr),
        None => format!("0x{:x}", addr),
    }
}

/// Format a file size in kilobytes with two decimals (e.g., "1.50 ko").
pub fn format_size_ko(bytes: u64) -> String {
    format!("{:.2} ko", bytes as f64 / 1024.0)
}

/// Format one row of the `sections` listing.
pub fn format_section_row(section: &Section) -> String {
    format!(
        "{:<20} [ 0x{:x} - 0x{:x} - 0x{:x} ]",
        section.name,
        section.start,
        section.end,
        section.size()
    )
}

/// Header matching [`format_section_row`].
pub fn section_header() -> String {
    format!("{:<20} [ START - END - SIZE ]", "NAME")
}

/// Render bytes as printable ASCII, `.` for everything else.
pub fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0x401000, None), "0x401000");
        assert_eq!(format_address(0x401000, Some(".text")), ".text:0x401000");
    }

    #[test]
    fn test_format_size_ko() {
        assert_eq!(format_size_ko(1536), "1.50 ko");
        assert_eq!(format_size_ko(0), "0.00 ko");
    }

    #[test]
    fn test_section_row_alignment() {
        let section = Section {
            name: ".text".to_string(),
            start: 0x1000,
            end: 0x1800,
            offset: Some(0x1000),
        };
        let row = format_section_row(&section);
        assert_eq!(row, ".text                [ 0x1000 - 0x1800 - 0x800 ]");
        assert_eq!(row.find('['), section_header().find('['));
    }

    #[test]
    fn test_printable() {
        assert_eq!(printable(b"ELF\x7f\x00ok"), "ELF..ok");
    }
}

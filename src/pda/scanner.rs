//! Experiment-section discovery.

use log::debug;
use memchr::memmem;

use super::{SECTION_MARKER, VERSION_TERMINATOR};

/// Byte range of one experiment section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Zero-based position of the section in the file
    pub index: usize,
    /// Offset of the section's version record (equals `marker` when there is none)
    pub head: usize,
    /// Offset of the `##BLOCKS=` marker
    pub marker: usize,
    /// Exclusive end: the next section's head, or the buffer length
    pub end: usize,
}

impl Section {
    /// Whether a version record precedes the marker
    pub fn has_version(&self) -> bool {
        self.head < self.marker
    }

    /// Section length in bytes
    pub fn len(&self) -> usize {
        self.end - self.head
    }

    /// Whether the section covers no bytes
    pub fn is_empty(&self) -> bool {
        self.end == self.head
    }
}

/// Locates experiment sections in a `.pda` buffer
pub struct SectionScanner<'a> {
    bytes: &'a [u8],
}

impl<'a> SectionScanner<'a> {
    /// Create a scanner over a fully materialized file
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// All sections in file order; empty when no marker occurs
    pub fn scan(&self) -> Vec<Section> {
        let markers: Vec<usize> = memmem::find_iter(self.bytes, SECTION_MARKER).collect();

        let mut sections: Vec<Section> = Vec::with_capacity(markers.len());
        for (index, &marker) in markers.iter().enumerate() {
            // A version record never reaches back into the previous section
            let floor = sections.last().map_or(0, |s: &Section| s.marker + SECTION_MARKER.len());
            let head = self.version_head(marker, floor);
            sections.push(Section {
                index,
                head,
                marker,
                end: self.bytes.len(),
            });
        }

        for i in 1..sections.len() {
            sections[i - 1].end = sections[i].head;
        }

        debug!("found {} experiment section(s)", sections.len());
        sections
    }

    /// Start of the version record ending two bytes before `marker`.
    ///
    /// Layout: `<text> 00 <separator> ##BLOCKS=`. The text is the longest run of
    /// non-control bytes ending at the terminator.
    fn version_head(&self, marker: usize, floor: usize) -> usize {
        if marker < 2 || marker - 2 < floor {
            return marker;
        }
        let terminator = marker - 2;
        if self.bytes[terminator] != VERSION_TERMINATOR {
            return marker;
        }
        let mut head = terminator;
        while head > floor && !is_control(self.bytes[head - 1]) {
            head -= 1;
        }
        if head == terminator {
            // Terminator with no text in front of it
            return marker;
        }
        head
    }
}

fn is_control(byte: u8) -> bool {
    byte < 0x20 || byte == 0x7F
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_block(version: &str) -> Vec<u8> {
        let mut data = vec![0x01, 0x00];
        data.extend_from_slice(version.as_bytes());
        data.push(0x00);
        data.push(0x0A);
        data.extend_from_slice(b"##BLOCKS= 7\0");
        data
    }

    #[test]
    fn test_no_marker() {
        let sections = SectionScanner::new(b"no sections here").scan();
        assert!(sections.is_empty());
    }

    #[test]
    fn test_single_section() {
        let data = head_block(" 5.42.1.0");
        let sections = SectionScanner::new(&data).scan();

        assert_eq!(sections.len(), 1);
        let section = sections[0];
        assert_eq!(section.head, 2);
        assert_eq!(section.marker, 13);
        assert_eq!(section.end, data.len());
        assert!(section.has_version());
    }

    #[test]
    fn test_two_sections_are_contiguous() {
        let mut data = head_block(" 5.42.1.0");
        data.extend_from_slice(&[0u8; 32]);
        let second_start = data.len();
        data.extend_from_slice(&head_block(" 5.4.52.1.0"));

        let sections = SectionScanner::new(&data).scan();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].end, sections[1].head);
        assert_eq!(sections[1].head, second_start + 2);
        assert_eq!(sections[1].index, 1);
        assert_eq!(sections[1].end, data.len());
    }

    #[test]
    fn test_marker_without_version() {
        let data = b"\x05\x06##BLOCKS= 1\0";
        let sections = SectionScanner::new(data).scan();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].head, sections[0].marker);
        assert!(!sections[0].has_version());
    }

    #[test]
    fn test_marker_at_start() {
        let sections = SectionScanner::new(b"##BLOCKS= 1\0").scan();
        assert_eq!(sections[0].head, 0);
        assert_eq!(sections[0].marker, 0);
    }

    #[test]
    fn test_version_run_stops_at_file_start() {
        let data = b"5.0\0\n##BLOCKS=";
        let sections = SectionScanner::new(data).scan();
        assert_eq!(sections[0].head, 0);
    }
}

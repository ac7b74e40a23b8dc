//! Encoder for the `.pda` section layout.
//!
//! Produces files the extractor can read back. Used to generate demo files and
//! fixtures laid out like real FlexStation III exports.
//!
//! ```rust
//! use softmax_pda::pda::{self, ExperimentRecord, PdaWriter};
//! use softmax_pda::parameters::ParameterName;
//!
//! let mut writer = PdaWriter::new();
//! writer.write_section(&ExperimentRecord::flexstation_demo());
//! let bytes = writer.finish();
//!
//! let params = pda::extract(&bytes);
//! assert_eq!(params.get_str(ParameterName::SoftmaxVersion), Some("5.42.1.0"));
//! ```

use byteorder::{LittleEndian, WriteBytesExt};
use log::warn;

use super::{EXPERIMENT_TAG, NOTE_TAG, SECTION_MARKER};
use crate::tokens::{encode_latin1, NUL};

/// Bytes that lead every section head
pub const RECORD_LEAD: [u8; 2] = [0x01, 0x00];

/// Separator between the version record and the section marker
pub const HEAD_SEPARATOR: u8 = 0x0A;

/// A titled analysis note
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Note title, e.g. `Notes#1`
    pub title: String,
    /// Note body (may contain `\r` and Latin-1 glyphs)
    pub body: String,
}

impl Note {
    /// Create a note
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Transformation descriptor shape, which differs between format revisions
#[derive(Debug, Clone, PartialEq)]
pub enum Transforms {
    /// One combined descriptor string
    Combined(String),
    /// Two labelled descriptors
    Split {
        /// First `(label, value)` pair
        first: (String, String),
        /// Second `(label, value)` pair
        second: (String, String),
    },
}

/// Kinetic read parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticRead {
    /// Number of read points
    pub points: f64,
    /// Total read time
    pub read_time: f64,
    /// Interval between reads
    pub interval: f64,
}

/// Everything written for one experiment section
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    /// Version text, written with a leading space
    pub version: String,
    /// Block count in the section header
    pub blocks: u32,
    /// Opaque bytes between the header and the experiment tag
    pub preamble_len: usize,
    /// Experiment name
    pub experiment_name: String,
    /// Optional revision padding after the experiment name
    pub experiment_padding: Option<u32>,
    /// Analysis notes
    pub notes: Vec<Note>,
    /// Instrument model and ROM string
    pub instrument_info: String,
    /// Optional revision padding after the instrument info
    pub instrument_padding: Option<u32>,
    /// Strip range
    pub strips: String,
    /// Transformation descriptors
    pub transforms: Transforms,
    /// Kinetic read parameters
    pub kinetic: KineticRead,
    /// Read (emission) wavelengths
    pub read_wavelengths: Vec<u32>,
    /// Number of wells or cuvettes
    pub wells: f64,
    /// Excitation wavelengths; written with the same count as `read_wavelengths`
    pub excitation_wavelengths: Vec<u32>,
}

impl ExperimentRecord {
    /// A section resembling a FlexStation III Fura-2 calcium run
    pub fn flexstation_demo() -> Self {
        Self {
            version: "5.42.1.0".to_string(),
            blocks: 7,
            preamble_len: 64,
            experiment_name: "Experiment#1".to_string(),
            experiment_padding: Some(2),
            notes: vec![Note::new(
                "Notes#1",
                "TRPV1 Phosphate mutants\rCells seeded 48hrs prior 40K cel/well \rinjection 1: rows A-D buffer only, E-H 100microM SLIGRL",
            )],
            instrument_info: "Flexstation III ROM v2.1.35 20May09".to_string(),
            instrument_padding: None,
            strips: "1-9".to_string(),
            transforms: Transforms::Combined(
                "Trans1: H=80\u{b5}, R=4, V=20.0\u{b5}, @15. Trans2: H=100\u{b5}, R=4, V=20.0\u{b5}, @115"
                    .to_string(),
            ),
            kinetic: KineticRead {
                points: 65.0,
                read_time: 250.0,
                interval: 3.9,
            },
            read_wavelengths: vec![520, 520],
            wells: 96.0,
            excitation_wavelengths: vec![340, 380],
        }
    }
}

/// Accumulates sections into a `.pda` byte buffer
#[derive(Debug, Default)]
pub struct PdaWriter {
    buf: Vec<u8>,
}

impl PdaWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Append raw bytes (opaque data between sections)
    pub fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append one complete section.
    ///
    /// Note bodies and the wavelength count are stored as `u32`; lengths
    /// above `u32::MAX` are written as `u32::MAX` and the file will not
    /// decode past that field.
    pub fn write_section(&mut self, record: &ExperimentRecord) -> &mut Self {
        self.write_head(&record.version, record.blocks);
        self.buf.resize(self.buf.len() + record.preamble_len, 0);

        self.buf.extend_from_slice(EXPERIMENT_TAG);
        self.write_cstr(&record.experiment_name);
        if let Some(padding) = record.experiment_padding {
            self.write_u32(padding);
        }
        for note in &record.notes {
            self.buf.extend_from_slice(NOTE_TAG);
            self.write_cstr(&note.title);
            let body = encode_latin1(&note.body);
            self.write_u32(length_field(body.len()));
            self.buf.extend_from_slice(&body);
        }

        self.write_cstr(&record.instrument_info);
        if let Some(padding) = record.instrument_padding {
            self.write_u32(padding);
        }
        self.write_cstr(&record.strips);

        match &record.transforms {
            Transforms::Combined(descriptor) => {
                self.buf.push(1);
                self.write_cstr(descriptor);
            }
            Transforms::Split { first, second } => {
                self.buf.push(2);
                for (label, value) in [first, second] {
                    self.write_cstr(label);
                    self.write_cstr(value);
                }
            }
        }

        self.write_f64(record.kinetic.points);
        self.write_f64(record.kinetic.read_time);
        self.write_f64(record.kinetic.interval);

        let count = record.read_wavelengths.len();
        self.write_u32(length_field(count));
        for &wavelength in &record.read_wavelengths {
            self.write_u32(wavelength);
        }
        self.write_f64(record.wells);
        for i in 0..count {
            self.write_u32(record.excitation_wavelengths.get(i).copied().unwrap_or(0));
        }
        self
    }

    /// Finish and return the file contents
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn write_head(&mut self, version: &str, blocks: u32) {
        self.buf.extend_from_slice(&RECORD_LEAD);
        self.buf.push(b' ');
        self.write_cstr(version);
        self.buf.push(HEAD_SEPARATOR);
        self.buf.extend_from_slice(SECTION_MARKER);
        self.write_cstr(&format!(" {blocks}"));
    }

    fn write_cstr(&mut self, text: &str) {
        self.buf.extend_from_slice(&encode_latin1(text));
        self.buf.push(NUL);
    }

    fn write_u32(&mut self, value: u32) {
        // Writing into a Vec cannot fail
        let _ = self.buf.write_u32::<LittleEndian>(value);
    }

    fn write_f64(&mut self, value: f64) {
        let _ = self.buf.write_f64::<LittleEndian>(value);
    }
}

/// Length as stored in a `u32` field, saturating at `u32::MAX`
fn length_field(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| {
        warn!("length {len} exceeds the u32 field; writing {}", u32::MAX);
        u32::MAX
    })
}

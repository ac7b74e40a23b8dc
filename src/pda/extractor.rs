//! Per-section field extraction.
//!
//! Reads the fixed field sequence of one experiment section through the token
//! readers. Each field that decodes is emitted as a `(ParameterName, Token)`
//! pair; a field that does not is skipped. When the layout can no longer be
//! followed (missing experiment tag, unknown descriptor revision, truncation)
//! extraction stops and whatever was decoded so far is returned.

use log::{debug, trace, warn};

use super::scanner::Section;
use super::{
    EXPERIMENT_PADDING, EXPERIMENT_TAG, INSTRUMENT_PADDING, MAX_WAVELENGTHS, NOTE_SEPARATOR,
    NOTE_TAG,
};
use crate::cursor::ByteCursor;
use crate::parameters::ParameterName;
use crate::tokens::{
    read_f64, read_u32, read_until_byte_delimiter, read_with_length_prefix, skip_if_number,
    Token, NUL,
};

/// Raw field as read from the byte stream
pub type RawField = (ParameterName, Token);

/// Extracts the field sequence of one section
pub struct FieldExtractor<'a, 'b> {
    cursor: &'b mut ByteCursor<'a>,
    section: Section,
    fields: Vec<RawField>,
}

impl<'a, 'b> FieldExtractor<'a, 'b> {
    /// Create an extractor for `section` reading through `cursor`
    pub fn new(cursor: &'b mut ByteCursor<'a>, section: Section) -> Self {
        Self {
            cursor,
            section,
            fields: Vec::new(),
        }
    }

    /// Run the extraction and return the decoded fields in stream order
    pub fn extract(mut self) -> Vec<RawField> {
        // `None` only signals that the rest of the layout is unreachable
        let _ = self.extract_fields();
        debug!(
            "section {} @ {}: {} field(s)",
            self.section.index,
            self.section.head,
            self.fields.len()
        );
        self.fields
    }

    fn extract_fields(&mut self) -> Option<()> {
        self.read_version();
        self.read_block_header()?;
        self.seek_experiment_tag()?;

        self.read_text(ParameterName::ExperimentName)?;
        if skip_if_number(self.cursor, EXPERIMENT_PADDING) {
            debug!("skipped experiment padding");
        }
        self.read_notes();

        self.read_text(ParameterName::InstrumentInfo)?;
        if skip_if_number(self.cursor, INSTRUMENT_PADDING) {
            debug!("skipped instrument padding");
        }
        self.read_text(ParameterName::Strips)?;
        self.read_transforms()?;

        self.read_float(ParameterName::KineticPoints)?;
        self.read_float(ParameterName::KineticFlexReadTime)?;
        self.read_float(ParameterName::KineticFlexInterval)?;

        let count = read_u32(self.cursor)?;
        let raw = count.as_i64().unwrap_or_default();
        self.push(ParameterName::NumberOfWavelengths, count);
        let wavelengths = match usize::try_from(raw) {
            Ok(n) if n <= MAX_WAVELENGTHS => n,
            _ => {
                warn!("unsupported wavelength count {raw}");
                return None;
            }
        };

        self.read_wavelengths(ParameterName::ReadWavelength, wavelengths)?;
        self.read_float(ParameterName::NumberOfWellsOrCuvette)?;
        self.read_wavelengths(ParameterName::ExcitationWavelengths, wavelengths)?;
        Some(())
    }

    fn push(&mut self, name: ParameterName, token: Token) {
        trace!("{name} @ {}", token.offset);
        self.fields.push((name, token));
    }

    fn read_version(&mut self) {
        if !self.section.has_version() || self.cursor.seek(self.section.head).is_err() {
            return;
        }
        if let Some(token) = read_until_byte_delimiter(self.cursor, NUL) {
            let offset = token.offset;
            let version = token.as_text().map(str::trim).unwrap_or_default();
            if !version.is_empty() {
                let version = version.to_string();
                self.push(ParameterName::SoftmaxVersion, Token::text(offset, version));
            }
        }
    }

    fn read_block_header(&mut self) -> Option<()> {
        self.cursor.seek(self.section.marker).ok()?;
        let header = read_until_byte_delimiter(self.cursor, NUL)?;
        if let Some(text) = header.as_text() {
            let blocks = text
                .split('=')
                .nth(1)
                .and_then(|n| n.trim().parse::<u32>().ok());
            debug!("section {} declares {:?} block(s)", self.section.index, blocks);
        }
        Some(())
    }

    fn seek_experiment_tag(&mut self) -> Option<()> {
        let Some(at) = self.cursor.find_before(EXPERIMENT_TAG, self.section.end) else {
            warn!("section {} has no experiment record", self.section.index);
            return None;
        };
        self.cursor.seek(at).ok()?;
        let tag = read_with_length_prefix(self.cursor, 1)?;
        (tag.as_text() == Some(tag_text(EXPERIMENT_TAG))).then_some(())
    }

    fn read_text(&mut self, name: ParameterName) -> Option<()> {
        let token = read_until_byte_delimiter(self.cursor, NUL)?;
        self.push(name, token);
        Some(())
    }

    /// Non-finite values are consumed but not emitted
    fn read_float(&mut self, name: ParameterName) -> Option<()> {
        let token = read_f64(self.cursor)?;
        match token.as_f64() {
            Some(v) if !v.is_finite() => {
                debug!("{name} @ {}: dropped non-finite {v}", token.offset);
            }
            _ => self.push(name, token),
        }
        Some(())
    }

    fn read_notes(&mut self) {
        let mut offset = None;
        let mut notes: Vec<String> = Vec::new();
        loop {
            let mark = self.cursor.checkpoint();
            let is_note = read_with_length_prefix(self.cursor, 1)
                .is_some_and(|tag| tag.as_text() == Some(tag_text(NOTE_TAG)));
            if !is_note {
                self.cursor.restore(mark);
                break;
            }
            let Some(title) = read_until_byte_delimiter(self.cursor, NUL) else {
                break;
            };
            let Some(body) = read_with_length_prefix(self.cursor, 4) else {
                break;
            };
            offset.get_or_insert(mark.offset());
            let title = title.into_text().unwrap_or_default();
            let body = body.into_text().unwrap_or_default();
            notes.push(format!("{title}: {body}"));
        }
        if let Some(offset) = offset {
            debug!("read {} note record(s)", notes.len());
            self.push(
                ParameterName::AnalysisNotes,
                Token::text(offset, notes.join(NOTE_SEPARATOR)),
            );
        }
    }

    fn read_transforms(&mut self) -> Option<()> {
        let count = self.cursor.read_byte()?;
        match count {
            1 => self.read_text(ParameterName::Trans),
            2 => {
                for name in [ParameterName::Trans1, ParameterName::Trans2] {
                    let label = read_until_byte_delimiter(self.cursor, NUL)?;
                    trace!("descriptor label {:?}", label.as_text());
                    self.read_text(name)?;
                }
                Some(())
            }
            other => {
                warn!("unknown transformation descriptor count {other}");
                None
            }
        }
    }

    /// An empty list consumes nothing and emits nothing
    fn read_wavelengths(&mut self, name: ParameterName, count: usize) -> Option<()> {
        if count == 0 {
            return Some(());
        }
        let offset = self.cursor.tell();
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let token = read_u32(self.cursor)?;
            values.push(token.as_i64()?.to_string());
        }
        self.push(name, Token::text(offset, values.join(" ")));
        Some(())
    }
}

/// Tag text without its one-byte length prefix
fn tag_text(tag: &'static [u8]) -> &'static str {
    std::str::from_utf8(&tag[1..]).unwrap_or_default()
}

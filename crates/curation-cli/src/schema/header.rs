//! VCF meta-information parsing
//!
//! Only the `##FILTER`, `##FORMAT` and `##INFO` lines matter here; everything
//! else in the header is skipped. Parsing stops at the `#CHROM` line.

use crate::error::{CliError, Result};
use flate2::read::MultiGzDecoder;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

const FILTER_PREFIX: &str = "##FILTER=";
const FORMAT_PREFIX: &str = "##FORMAT=";
const INFO_PREFIX: &str = "##INFO=";
const COLUMN_HEADER_PREFIX: &str = "#CHROM";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A `##FILTER` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterHeader {
    pub id: String,
    pub description: String,
}

/// A `##FORMAT` or `##INFO` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHeader {
    pub id: String,
    pub number: String,
    pub value_type: String,
    pub description: String,
}

/// Descriptions declared in a VCF header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderDescriptions {
    /// In declaration order
    pub filters: Vec<FilterHeader>,
    pub formats: BTreeMap<String, FieldHeader>,
    pub infos: BTreeMap<String, FieldHeader>,
    /// Whether the `#CHROM` line was reached
    pub complete: bool,
}

struct HeaderPatterns {
    filter: Regex,
    field: Regex,
}

impl HeaderPatterns {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(|e| CliError::Other(e.into()));
        Ok(Self {
            filter: compile(r#"^<ID=([^,]+),Description="(.*)">"#)?,
            field: compile(r#"^<ID=([^,]+),Number=([^,]+),Type=([^,]+),Description="(.*)">"#)?,
        })
    }
}

impl HeaderDescriptions {
    /// Parse header lines from a reader until `#CHROM` or end of input.
    ///
    /// A line carrying one of the known prefixes that does not match its
    /// pattern fails with [`CliError::HeaderParse`] (1-based line number).
    /// Bytes that are not valid UTF-8 are replaced, not rejected.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let patterns = HeaderPatterns::new()?;
        let mut descriptions = Self::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim_end();

            if line.starts_with(COLUMN_HEADER_PREFIX) {
                descriptions.complete = true;
                break;
            }

            if let Some(value) = line.strip_prefix(FILTER_PREFIX) {
                let caps = patterns
                    .filter
                    .captures(value)
                    .ok_or_else(|| CliError::header_parse(line_no, line))?;
                descriptions.filters.push(FilterHeader {
                    id: caps[1].to_string(),
                    description: caps[2].to_string(),
                });
            } else if let Some(value) = line.strip_prefix(FORMAT_PREFIX) {
                let field = parse_field(&patterns.field, value)
                    .ok_or_else(|| CliError::header_parse(line_no, line))?;
                descriptions.formats.insert(field.id.clone(), field);
            } else if let Some(value) = line.strip_prefix(INFO_PREFIX) {
                let field = parse_field(&patterns.field, value)
                    .ok_or_else(|| CliError::header_parse(line_no, line))?;
                descriptions.infos.insert(field.id.clone(), field);
            }
        }

        Ok(descriptions)
    }

    /// Parse the leading bytes of a VCF, gunzipping when they are gzip data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(&GZIP_MAGIC) {
            Self::from_reader(BufReader::new(TolerantGz(MultiGzDecoder::new(bytes))))
        } else {
            Self::from_reader(bytes)
        }
    }

    pub fn format_description(&self, id: &str) -> Option<&str> {
        self.formats.get(id).map(|f| f.description.as_str())
    }

    pub fn info_description(&self, id: &str) -> Option<&str> {
        self.infos.get(id).map(|f| f.description.as_str())
    }
}

fn parse_field(pattern: &Regex, value: &str) -> Option<FieldHeader> {
    let caps = pattern.captures(value)?;
    Some(FieldHeader {
        id: caps[1].to_string(),
        number: caps[2].to_string(),
        value_type: caps[3].to_string(),
        description: caps[4].to_string(),
    })
}

/// A header read is usually a prefix of the compressed file, so the stream
/// ends mid-block. Treat that as end of input instead of an error.
struct TolerantGz<R>(R);

impl<R: Read> Read for TolerantGz<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.0.read(buf) {
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(0),
            other => other,
        }
    }
}

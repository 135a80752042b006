//! GFF annotation parsing
//!
//! This module parses tab-separated GFF feature records into resistance-gene
//! annotations and groups them by contig for the labeling pass. Only the
//! fields the labeler needs are kept: contig, resistance identifier,
//! coordinates and strand.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Error as IoError};
use std::num::ParseIntError;

#[derive(Debug)]
pub enum ParseErr {
    NotEnoughFields,
    IoError(IoError),
    InvalidField(ParseIntError),
    InvalidStrand,
    InvalidCoordinates,
    MissingAttribute,
}

impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErr::NotEnoughFields => write!(f, "Not enough fields in GFF record"),
            ParseErr::IoError(e) => write!(f, "IO error: {}", e),
            ParseErr::InvalidField(e) => write!(f, "Invalid field: {}", e),
            ParseErr::InvalidStrand => write!(f, "Invalid strand"),
            ParseErr::InvalidCoordinates => write!(f, "Invalid feature coordinates"),
            ParseErr::MissingAttribute => {
                write!(f, "Missing resistance identifier attribute")
            }
        }
    }
}

impl std::error::Error for ParseErr {}

/// Strand orientation of an annotated feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// One annotated resistance-gene feature.
///
/// Coordinates are normalized to half-open `[start, end)` on a 0-based
/// system: the GFF start column (1-based inclusive) becomes `start - 1` and
/// the GFF end column (1-based inclusive) is kept verbatim as the exclusive
/// bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub contig: String,
    pub resistance_id: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
}

/// Parse a single GFF line. Comment and blank lines yield `Ok(None)`.
fn parse_gff_line(line: &str) -> Result<Option<Annotation>, ParseErr> {
    // Annotation files in the wild occasionally carry CRLF endings
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 9 {
        return Err(ParseErr::NotEnoughFields);
    }

    // The simulation stage appends suffixes to reference names; truncating
    // at the first underscore recovers the original genome identity
    let reference_name = fields[0];
    let contig = match reference_name.find('_') {
        Some(ix) => &reference_name[..ix],
        None => reference_name,
    };

    let start = fields[3].parse::<u64>().map_err(ParseErr::InvalidField)?;
    let end = fields[4].parse::<u64>().map_err(ParseErr::InvalidField)?;
    if start == 0 || end < start {
        return Err(ParseErr::InvalidCoordinates);
    }

    let strand = match fields[6] {
        "+" => Strand::Forward,
        "-" => Strand::Reverse,
        _ => return Err(ParseErr::InvalidStrand),
    };

    // The resistance identifier lives in the value of the second attribute;
    // annotators sometimes emit comma-joined duplicate identifiers there, so
    // only the substring before the first comma is kept
    let attribute = fields[8]
        .split(';')
        .nth(1)
        .ok_or(ParseErr::MissingAttribute)?;
    let value = attribute
        .split_once('=')
        .map(|(_, value)| value)
        .ok_or(ParseErr::MissingAttribute)?;
    let resistance_id = value.split(',').next().unwrap_or(value);
    if resistance_id.is_empty() {
        return Err(ParseErr::MissingAttribute);
    }

    Ok(Some(Annotation {
        contig: contig.to_string(),
        resistance_id: resistance_id.to_string(),
        start: start - 1,
        end,
        strand,
    }))
}

/// Parse all feature records from a GFF stream.
///
/// Malformed records are skipped with a warning rather than aborting the
/// load; I/O failures are fatal.
pub fn parse_gff<R: BufRead>(reader: R) -> Result<Vec<Annotation>, ParseErr> {
    let mut annotations = Vec::new();
    for (line_ix, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(ParseErr::IoError)?;
        match parse_gff_line(&line) {
            Ok(Some(annotation)) => annotations.push(annotation),
            Ok(None) => {}
            Err(e) => warn!("Skipping malformed GFF record at line {}: {}", line_ix + 1, e),
        }
    }
    Ok(annotations)
}

/// Annotations grouped by contig.
///
/// No deduplication happens at load time: exact duplicates across input
/// files are retained and collapsed per read by the labeler. Lookup by
/// contig yields a slice that the labeler scans linearly.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    by_contig: FxHashMap<String, Vec<Annotation>>,
    len: usize,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, annotation: Annotation) {
        self.by_contig
            .entry(annotation.contig.clone())
            .or_default()
            .push(annotation);
        self.len += 1;
    }

    /// All annotations on the given contig, in load order.
    pub fn for_contig(&self, contig: &str) -> &[Annotation] {
        self.by_contig
            .get(contig)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Load every annotation from a list of GFF files into one store.
pub fn load_annotations(gff_paths: &[String]) -> io::Result<AnnotationStore> {
    let mut store = AnnotationStore::new();
    for gff_fp in gff_paths {
        let file = File::open(gff_fp).map_err(|e| {
            IoError::new(
                e.kind(),
                format!("Failed to open annotation file '{}': {}", gff_fp, e),
            )
        })?;
        let annotations = parse_gff(BufReader::new(file)).map_err(|e| {
            IoError::new(
                io::ErrorKind::InvalidData,
                format!("Failed to parse annotations from '{}': {}", gff_fp, e),
            )
        })?;
        debug!("Parsed {} annotations from {}", annotations.len(), gff_fp);
        for annotation in annotations {
            store.insert(annotation);
        }
    }
    Ok(store)
}

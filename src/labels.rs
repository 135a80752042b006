//! Read labeling
//!
//! Streams the simulator's alignment output and assigns each read the set of
//! resistance genes its origin span overlaps on the matching strand. Records
//! are labeled one at a time and discarded, so peak memory is bounded by the
//! annotation store plus a single in-flight record.

use crate::gff::{Annotation, AnnotationStore, Strand};
use crate::overlap::sufficient_overlap;
use noodles::sam;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Error as IoError, Write};

/// Ground-truth placement of one simulated read, taken from the alignment
/// stream. `begin_pos` is 0-based; the covered span is
/// `[begin_pos, end_pos())`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAlignment {
    pub begin_pos: u64,
    pub length: u64,
    pub is_reverse_complement: bool,
}

impl ReadAlignment {
    /// Exclusive upper bound of the read's span.
    pub fn end_pos(&self) -> u64 {
        self.begin_pos + self.length
    }

    fn strand(&self) -> Strand {
        if self.is_reverse_complement {
            Strand::Reverse
        } else {
            Strand::Forward
        }
    }
}

/// Collect the resistance identifiers of every annotation on `contig_name`
/// that matches the read's strand and overlaps it by more than `min_overlap`
/// positions. The result is lexicographically sorted and duplicate-free.
pub fn label_read(
    read: &ReadAlignment,
    contig_name: &str,
    annotations: &[Annotation],
    min_overlap: u64,
) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for annotation in annotations {
        if annotation.contig != contig_name {
            continue;
        }
        // Reads only pick up labels from features on the same strand
        if annotation.strand != read.strand() {
            continue;
        }
        if sufficient_overlap(
            read.begin_pos,
            read.end_pos(),
            annotation.start,
            annotation.end,
            min_overlap,
        ) {
            labels.push(annotation.resistance_id.clone());
        }
    }

    // Annotators emit the same ARO at overlapping coordinates; collapse the
    // duplicates so each identifier appears at most once per read
    labels.sort();
    labels.dedup();
    labels
}

fn alignment_from_record<'a>(
    record: &sam::alignment::RecordBuf,
    contig_names: &'a [String],
) -> Option<(ReadAlignment, &'a str)> {
    let contig_name = contig_names.get(record.reference_sequence_id()?)?;
    let begin_pos = record.alignment_start()?.get() as u64 - 1;
    let read = ReadAlignment {
        begin_pos,
        length: record.sequence().len() as u64,
        is_reverse_complement: record.flags().is_reverse_complemented(),
    };
    Some((read, contig_name.as_str()))
}

/// Label every record in the alignment stream, writing one line per record
/// in input order: either a space-terminated list of identifiers or the
/// sentinel `NONE`. Returns the number of records labeled.
pub fn write_labels<R: BufRead, W: Write>(
    reader: &mut sam::io::Reader<R>,
    store: &AnnotationStore,
    min_overlap: u64,
    out: &mut W,
) -> io::Result<u64> {
    let header = reader.read_header()?;
    let contig_names: Vec<String> = header
        .reference_sequences()
        .keys()
        .map(|name| name.to_string())
        .collect();

    let mut read_count = 0u64;
    for result in reader.record_bufs(&header) {
        let record = result?;

        // Unplaced records carry no origin coordinates and get no labels
        let labels = match alignment_from_record(&record, &contig_names) {
            Some((read, contig_name)) => label_read(
                &read,
                contig_name,
                store.for_contig(contig_name),
                min_overlap,
            ),
            None => Vec::new(),
        };

        if labels.is_empty() {
            out.write_all(b"NONE\n")?;
        } else {
            for label in &labels {
                write!(out, "{} ", label)?;
            }
            out.write_all(b"\n")?;
        }
        read_count += 1;
    }

    Ok(read_count)
}

/// Label the reads of a SAM file into `<output_name>.labels`.
pub fn create_labels(
    sam_fp: &str,
    store: &AnnotationStore,
    min_overlap: u64,
    output_name: &str,
) -> io::Result<u64> {
    let sam_file = File::open(sam_fp).map_err(|e| {
        IoError::new(
            e.kind(),
            format!("Failed to open alignment file '{}': {}", sam_fp, e),
        )
    })?;
    let mut reader = sam::io::Reader::new(BufReader::new(sam_file));

    let labels_fp = format!("{}.labels", output_name);
    let out_file = File::create(&labels_fp).map_err(|e| {
        IoError::new(
            e.kind(),
            format!("Failed to create label file '{}': {}", labels_fp, e),
        )
    })?;
    let mut writer = BufWriter::new(out_file);

    let read_count = write_labels(&mut reader, store, min_overlap, &mut writer)?;
    writer.flush()?;
    Ok(read_count)
}

//! Synthetic metagenome assembly
//!
//! Replicates input genomes according to their relative abundance
//! multipliers and concatenates everything into a single FASTA for the read
//! simulator.

use log::debug;
use noodles::fasta;
use std::fs::File;
use std::io::{self, BufReader, Error as IoError};

/// Copy each genome's record set `abundance` times into
/// `<output_name>_metagenome.fasta` and return that path.
///
/// Record ids are duplicated on purpose; which copy a read came from is not
/// tracked, since the simulator's per-read coordinates are the ground truth
/// consumed downstream.
pub fn assemble(
    genome_paths: &[String],
    abundances: &[u32],
    output_name: &str,
) -> io::Result<String> {
    let mut records: Vec<fasta::Record> = Vec::new();

    for (genome_fp, &abundance) in genome_paths.iter().zip(abundances) {
        let file = File::open(genome_fp).map_err(|e| {
            IoError::new(
                e.kind(),
                format!("Failed to open genome file '{}': {}", genome_fp, e),
            )
        })?;
        let mut reader = fasta::io::Reader::new(BufReader::new(file));
        let genome_records: Vec<fasta::Record> =
            reader.records().collect::<io::Result<Vec<_>>>()?;
        debug!(
            "Read {} records from {}, replicating {}x",
            genome_records.len(),
            genome_fp,
            abundance
        );

        for _ in 0..abundance {
            records.extend(genome_records.iter().cloned());
        }
    }

    let metagenome_fp = format!("{}_metagenome.fasta", output_name);
    let out = File::create(&metagenome_fp).map_err(|e| {
        IoError::new(
            e.kind(),
            format!("Failed to create metagenome file '{}': {}", metagenome_fp, e),
        )
    })?;
    let mut writer = fasta::io::Writer::new(out);
    for record in &records {
        writer.write_record(record)?;
    }

    Ok(metagenome_fp)
}

/// Sum the sequence lengths of every record in a FASTA file in one
/// streaming pass.
pub fn count_nucleotides(fasta_fp: &str) -> io::Result<u64> {
    let file = File::open(fasta_fp).map_err(|e| {
        IoError::new(
            e.kind(),
            format!("Failed to open file '{}': {}", fasta_fp, e),
        )
    })?;
    let mut reader = fasta::io::Reader::new(BufReader::new(file));

    let mut nt_count = 0u64;
    for result in reader.records() {
        let record = result?;
        nt_count += record.sequence().len() as u64;
    }

    Ok(nt_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const GENOME: &str = ">chr1 description\nACGTACGTAC\n>chr2\nGGGGG\n";

    fn write_genome(dir: &TempDir) -> String {
        let genome_fp = dir.path().join("genome.fasta");
        let mut file = File::create(&genome_fp).unwrap();
        file.write_all(GENOME.as_bytes()).unwrap();
        genome_fp.to_str().unwrap().to_string()
    }

    fn read_records(fasta_fp: &str) -> Vec<fasta::Record> {
        let mut reader =
            fasta::io::Reader::new(BufReader::new(File::open(fasta_fp).unwrap()));
        reader.records().collect::<io::Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_assemble_replicates_record_set() {
        let dir = TempDir::new().unwrap();
        let genome_fp = write_genome(&dir);
        let output_name = dir.path().join("out").to_str().unwrap().to_string();

        let metagenome_fp = assemble(&[genome_fp], &[3], &output_name).unwrap();
        assert_eq!(metagenome_fp, format!("{}_metagenome.fasta", output_name));

        let records = read_records(&metagenome_fp);
        assert_eq!(records.len(), 6);
        // Each group of two is an exact copy of the original pair
        for copy in records.chunks(2) {
            assert_eq!(copy[0], records[0]);
            assert_eq!(copy[1], records[1]);
        }
    }

    #[test]
    fn test_assemble_zero_abundance_drops_genome() {
        let dir = TempDir::new().unwrap();
        let genome_fp = write_genome(&dir);
        let output_name = dir.path().join("out").to_str().unwrap().to_string();

        let metagenome_fp = assemble(&[genome_fp], &[0], &output_name).unwrap();
        assert!(read_records(&metagenome_fp).is_empty());
    }

    #[test]
    fn test_assemble_missing_genome_fails() {
        let dir = TempDir::new().unwrap();
        let output_name = dir.path().join("out").to_str().unwrap().to_string();
        let result = assemble(&["/no/such/genome.fasta".to_string()], &[1], &output_name);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_nucleotides() {
        let dir = TempDir::new().unwrap();
        let genome_fp = write_genome(&dir);
        assert_eq!(count_nucleotides(&genome_fp).unwrap(), 15);
    }
}

//! Integration test for the training-data pipeline:
//! assemble -> estimate -> simulate -> annotate -> label.
//! The external read simulator is replaced with a canned implementation so
//! the test runs without mason installed.

use amrsim::coverage::estimate_read_count;
use amrsim::gff::load_annotations;
use amrsim::labels::create_labels;
use amrsim::metagenome::{assemble, count_nucleotides};
use amrsim::simulate::{ReadSimulator, SimulatedReads, SimulationError};
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

const GENOME_A: &str = ">genomeA\n\
GATTACAGATTACAGATTACAGATTACAGATTACAGATTACAGATTACAGATTACAGATTACAGATTACA\n";

const GENOME_B: &str = ">genomeB\n\
CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC\n";

// genomeA carries a forward-strand gene over [100, 400) and a
// reverse-strand gene over [500, 800); reference names carry the suffix the
// annotator appends, which the loader truncates away.
const GFF_A: &str = "\
##gff-version 3
genomeA_annotated\tRGI\tCDS\t101\t400\t.\t+\t0\tID=gene1;Name=ARO:3000123,ARO:3000123;product=x
genomeA_annotated\tRGI\tCDS\t501\t800\t.\t-\t0\tID=gene2;Name=ARO:3000456;product=y
";

const GFF_B: &str = "##gff-version 3\n";

// Five reads of 100bp each:
//   r1 forward inside gene1        -> ARO:3000123
//   r2 reverse inside gene1        -> NONE (wrong strand)
//   r3 reverse inside gene2        -> ARO:3000456
//   r4 forward, 40bp into gene1    -> NONE (overlap below threshold)
//   r5 forward on genomeB          -> NONE (no annotations)
const SEQ: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn sam_text() -> String {
    let mut sam = String::from("@HD\tVN:1.6\tSO:coordinate\n");
    sam.push_str("@SQ\tSN:genomeA\tLN:1000\n");
    sam.push_str("@SQ\tSN:genomeB\tLN:1000\n");
    for (name, flag, contig, pos) in [
        ("r1", 0, "genomeA", 151),
        ("r2", 16, "genomeA", 151),
        ("r3", 16, "genomeA", 601),
        ("r4", 0, "genomeA", 361),
        ("r5", 0, "genomeB", 101),
    ] {
        sam.push_str(&format!(
            "{}\t{}\t{}\t{}\t60\t100M\t*\t0\t0\t{}\t*\n",
            name, flag, contig, pos, SEQ
        ));
    }
    sam
}

/// Stand-in for mason: writes a pre-baked alignment file and read file.
struct CannedSimulator {
    sam: String,
}

impl ReadSimulator for CannedSimulator {
    fn simulate(
        &self,
        _metagenome_fp: &str,
        _read_count: u64,
        _read_length: u32,
        output_name: &str,
    ) -> Result<SimulatedReads, SimulationError> {
        let outputs = SimulatedReads::from_output_name(output_name);
        fs::write(&outputs.sam_fp, &self.sam).map_err(SimulationError::Launch)?;
        fs::write(&outputs.fastq_fp, "@r1\nACGT\n+\nIIII\n")
            .map_err(SimulationError::Launch)?;
        Ok(outputs)
    }
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let output_name = dir.path().join("run").to_str().unwrap().to_string();

    let genomes = vec![
        write_file(&dir, "genomeA.fasta", GENOME_A),
        write_file(&dir, "genomeB.fasta", GENOME_B),
    ];
    let annotations = vec![
        write_file(&dir, "genomeA.gff", GFF_A),
        write_file(&dir, "genomeB.gff", GFF_B),
    ];

    // Assemble with abundances 2:1 -> 2 copies of genomeA, 1 of genomeB
    let metagenome_fp = assemble(&genomes, &[2, 1], &output_name).unwrap();
    let nt_count = count_nucleotides(&metagenome_fp).unwrap();
    assert_eq!(nt_count, 2 * 70 + 70);

    let read_count = estimate_read_count(nt_count, 10, 100).unwrap();
    assert_eq!(read_count, 21);

    let simulator = CannedSimulator { sam: sam_text() };
    let simulated = simulator
        .simulate(&metagenome_fp, read_count, 100, &output_name)
        .unwrap();
    assert_eq!(simulated.sam_fp, format!("{}.sam", output_name));

    let store = load_annotations(&annotations).unwrap();
    assert_eq!(store.len(), 2);

    let labeled = create_labels(&simulated.sam_fp, &store, 50, &output_name).unwrap();
    assert_eq!(labeled, 5);

    let labels = fs::read_to_string(format!("{}.labels", output_name)).unwrap();
    let lines: Vec<&str> = labels.lines().collect();
    assert_eq!(
        lines,
        vec!["ARO:3000123 ", "NONE", "ARO:3000456 ", "NONE", "NONE"]
    );
}

#[test]
fn test_labels_line_up_with_alignment_order() {
    let dir = TempDir::new().unwrap();
    let output_name = dir.path().join("run").to_str().unwrap().to_string();

    let gff_fp = write_file(&dir, "genomeA.gff", GFF_A);
    let sam_fp = write_file(&dir, "reads.sam", &sam_text());

    let store = load_annotations(&[gff_fp]).unwrap();
    let labeled = create_labels(&sam_fp, &store, 50, &output_name).unwrap();

    let labels = fs::read_to_string(format!("{}.labels", output_name)).unwrap();
    assert_eq!(labeled as usize, labels.lines().count());
}

//! Read-simulation collaborator
//!
//! The external read simulator is modeled as an injected capability so the
//! labeling core can be exercised against synthetic alignment records
//! without invoking any binary. The shipped implementation shells out to
//! `mason_simulator` as a blocking, one-shot process and validates that the
//! expected outputs actually appeared before the pipeline moves on.

use std::fmt;
use std::io::Error as IoError;
use std::process::{Command, Stdio};

#[derive(Debug)]
pub enum SimulationError {
    Launch(IoError),
    ExitStatus(Option<i32>),
    MissingOutput(String),
    EmptyOutput(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Launch(e) => {
                write!(f, "Failed to launch read simulator: {}", e)
            }
            SimulationError::ExitStatus(Some(code)) => {
                write!(f, "Read simulator exited with status {}", code)
            }
            SimulationError::ExitStatus(None) => {
                write!(f, "Read simulator terminated by signal")
            }
            SimulationError::MissingOutput(path) => {
                write!(f, "Read simulator did not produce '{}'", path)
            }
            SimulationError::EmptyOutput(path) => {
                write!(f, "Read simulator produced empty '{}'", path)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Paths to the simulator's outputs, fixed by the output-name convention:
/// `<output_name>.sam` for alignments, `<output_name>.fq` for reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedReads {
    pub sam_fp: String,
    pub fastq_fp: String,
}

impl SimulatedReads {
    pub fn from_output_name(output_name: &str) -> Self {
        SimulatedReads {
            sam_fp: format!("{}.sam", output_name),
            fastq_fp: format!("{}.fq", output_name),
        }
    }
}

pub trait ReadSimulator {
    fn simulate(
        &self,
        metagenome_fp: &str,
        read_count: u64,
        read_length: u32,
        output_name: &str,
    ) -> Result<SimulatedReads, SimulationError>;
}

/// Runs `mason_simulator` with sequencing errors disabled, so every read is
/// an exact substring of its origin and the alignment output is exact
/// ground truth.
pub struct MasonSimulator;

impl ReadSimulator for MasonSimulator {
    fn simulate(
        &self,
        metagenome_fp: &str,
        read_count: u64,
        read_length: u32,
        output_name: &str,
    ) -> Result<SimulatedReads, SimulationError> {
        let outputs = SimulatedReads::from_output_name(output_name);

        let status = Command::new("mason_simulator")
            .args(["-ir", metagenome_fp])
            .args(["-n", &read_count.to_string()])
            .args(["-oa", &outputs.sam_fp])
            .args(["-o", &outputs.fastq_fp])
            .args(["--illumina-read-length", &read_length.to_string()])
            .args(["--illumina-prob-insert", "0"])
            .args(["--illumina-prob-deletion", "0"])
            .args(["--illumina-prob-mismatch-scale", "0"])
            .args(["--illumina-prob-mismatch", "0"])
            .args(["--illumina-prob-mismatch-begin", "0"])
            .args(["--illumina-prob-mismatch-end", "0"])
            .stderr(Stdio::null())
            .status()
            .map_err(SimulationError::Launch)?;

        if !status.success() {
            return Err(SimulationError::ExitStatus(status.code()));
        }

        validate_outputs(&outputs)?;
        Ok(outputs)
    }
}

fn validate_outputs(outputs: &SimulatedReads) -> Result<(), SimulationError> {
    for path in [&outputs.sam_fp, &outputs.fastq_fp] {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.len() == 0 => {
                return Err(SimulationError::EmptyOutput(path.clone()))
            }
            Ok(_) => {}
            Err(_) => return Err(SimulationError::MissingOutput(path.clone())),
        }
    }
    Ok(())
}

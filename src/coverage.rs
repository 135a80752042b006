//! Read-depth estimation for the simulated metagenome.

use std::io;

/// Number of reads of `read_length` bases required to cover
/// `total_nucleotides` at `fold_coverage`. Division truncates toward zero.
pub fn estimate_read_count(
    total_nucleotides: u64,
    fold_coverage: u32,
    read_length: u32,
) -> io::Result<u64> {
    if read_length == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "read_length must be greater than zero",
        ));
    }
    Ok(u64::from(fold_coverage) * total_nucleotides / u64::from(read_length))
}

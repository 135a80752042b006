// lib.rs
pub mod coverage;
pub mod gff;
pub mod labels;
pub mod metagenome;
pub mod overlap;
pub mod simulate;

use amrsim::coverage::estimate_read_count;
use amrsim::gff::load_annotations;
use amrsim::labels::create_labels;
use amrsim::metagenome::{assemble, count_nucleotides};
use amrsim::overlap::MIN_OVERLAP;
use amrsim::simulate::{MasonSimulator, ReadSimulator};
use clap::Parser;
use log::info;
use std::io;

/// Generate labeled synthetic training reads from annotated genomes at a
/// specified coverage and relative abundances.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_help_subcommand = true)]
struct Args {
    /// Comma-separated list of genome FASTA files
    #[clap(value_parser)]
    genomes: String,

    /// Comma-separated list of GFF annotation files, one per genome
    #[clap(value_parser)]
    annotations: String,

    /// Comma-separated list of integer relative abundances, one per genome
    #[clap(value_parser)]
    abundances: String,

    /// Required fold-coverage for the metagenome
    #[clap(short = 'c', long, value_parser, default_value_t = 1)]
    coverage: u32,

    /// Length of reads to simulate
    #[clap(short = 'r', long, value_parser, default_value_t = 150)]
    read_length: u32,

    /// Output file name prefix
    #[clap(short = 'o', long, value_parser, default_value = "output")]
    output_name: String,

    /// Verbosity level (0 = error, 1 = info, 2 = debug)
    #[clap(short, long, default_value = "1")]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let genomes = split_list(&args.genomes);
    let annotations = split_list(&args.annotations);
    let abundances = parse_abundances(&args.abundances)?;

    // All three lists are parallel; validate before any processing begins
    if genomes.len() != annotations.len() || annotations.len() != abundances.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "You must provide the same number of genomes, annotations and relative abundances (got {}, {} and {})",
                genomes.len(),
                annotations.len(),
                abundances.len()
            ),
        ));
    }

    info!("Creating synthetic metagenome from: {}", genomes.join(" "));
    let metagenome_fp = assemble(&genomes, &abundances, &args.output_name)?;

    let nt_count = count_nucleotides(&metagenome_fp)?;
    let read_count = estimate_read_count(nt_count, args.coverage, args.read_length)?;

    info!(
        "Simulating Illumina reads: {}bp, {} reads",
        args.read_length, read_count
    );
    let simulated = MasonSimulator
        .simulate(&metagenome_fp, read_count, args.read_length, &args.output_name)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    info!("Parsing GFF annotations: {}", annotations.join(" "));
    let store = load_annotations(&annotations)?;
    info!("Loaded {} annotations", store.len());

    info!("Creating labels: {}.labels", args.output_name);
    let labeled = create_labels(&simulated.sam_fp, &store, MIN_OVERLAP, &args.output_name)?;
    info!("Labeled {} reads", labeled);

    Ok(())
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

fn parse_abundances(value: &str) -> io::Result<Vec<u32>> {
    split_list(value)
        .iter()
        .map(|token| {
            token.parse::<u32>().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid relative abundance '{}'", token),
                )
            })
        })
        .collect()
}

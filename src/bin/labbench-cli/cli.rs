// src/bin/labbench-cli/cli.rs
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use labbench::{Enzyme, ReagentSpec};

#[derive(Parser)]
#[command(name = "labbench-cli", author, version, long_about = None)]
#[command(about = "DNA primer design, protein digestion & m/z, and PCR reagent calculator")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON parameter file. Flags given on the command line take precedence.
    #[arg(long, global = true, value_name = "PARAMS_JSON")]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the first forward/reverse primer pair meeting the GC% and Tm constraints.
    #[command(visible_alias = "pcr")]
    Primers {
        #[command(flatten)]
        input: SequenceArgs,

        /// Primer length (default: 20)
        #[arg(short = 'l', long, value_name = "BASES")]
        primer_length: Option<usize>,

        /// Largest allowed Tm difference between the primers (default: 5)
        #[arg(long, value_name = "CELSIUS")]
        max_tm_diff: Option<f64>,
    },

    /// Digest a protein and list peptide masses and m/z values.
    #[command(visible_alias = "mz")]
    Digest {
        #[command(flatten)]
        input: SequenceArgs,

        /// Protease: trypsin or chymotrypsin
        #[arg(short, long, value_name = "ENZYME")]
        enzyme: Option<Enzyme>,

        /// Charge states to report, e.g. -z 1,2,3 (default: 1,2,3)
        #[arg(short = 'z', long = "charge", value_name = "Z", value_delimiter = ',')]
        charges: Vec<i32>,
    },

    /// Compute master-mix volumes from stock and final concentrations.
    Mix {
        /// Final reaction volume per tube (µL)
        #[arg(short = 'v', long, value_name = "UL")]
        final_volume: Option<f64>,

        /// Number of reactions
        #[arg(short = 'n', long, value_name = "N")]
        reactions: Option<u32>,

        /// Reagents as name:C1:C2 (example: Buffer:10:1 MgCl2:25:1.5)
        #[arg(short, long = "reagent", value_name = "NAME:C1:C2", num_args = 1..)]
        reagents: Vec<ReagentSpec>,

        /// Initial number of template copies, for theoretical yield
        #[arg(long = "n0", value_name = "COPIES", requires = "cycles")]
        initial_copies: Option<f64>,

        /// Number of PCR cycles, for theoretical yield
        #[arg(long, value_name = "CYCLES", requires = "initial_copies")]
        cycles: Option<u32>,
    },
}

/// Where to read the input sequence from
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SequenceArgs {
    /// Sequence given inline
    #[arg(short, long, value_name = "SEQ")]
    pub sequence: Option<String>,

    /// Single-record FASTA (or plain text) file
    #[arg(short, long, value_name = "FILE")]
    pub fasta: Option<PathBuf>,
}

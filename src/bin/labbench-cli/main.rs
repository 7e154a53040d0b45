// src/bin/labbench-cli/main.rs
// Command-line front end: primer design, digestion tables and master-mix setup.

mod cli;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use mimalloc::MiMalloc;
use serde_json::json;

use labbench::{
    design_primers_with, digest_report, mix_summary, parse_sequence_input, pcr_yield,
    AnalysisParams, MeltingModel, PrimerCandidate, SequenceInput, Wallace,
};

use crate::cli::{Cli, Commands, SequenceArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Exit status when the primer scan finishes without a pair
const EXIT_NO_PRIMERS: u8 = 2;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut params = load_params(cli.config.as_deref())?;

    match cli.command {
        Commands::Primers { input, primer_length, max_tm_diff } => {
            if let Some(length) = primer_length {
                params.primer_length = length;
            }
            if let Some(diff) = max_tm_diff {
                params.constraints.max_tm_difference = diff;
            }
            let sequence = read_sequence(&input)?;
            run_primers(&sequence, &params, cli.json)
        }
        Commands::Digest { input, enzyme, charges } => {
            if let Some(enzyme) = enzyme {
                params.enzyme = enzyme;
            }
            if !charges.is_empty() {
                params.charge_states = charges;
            }
            let sequence = read_sequence(&input)?;
            run_digest(&sequence, &params, cli.json)
        }
        Commands::Mix { final_volume, reactions, reagents, initial_copies, cycles } => {
            if let Some(volume) = final_volume {
                params.final_volume = volume;
            }
            if let Some(n) = reactions {
                params.reactions = n;
            }
            let amplification = initial_copies.zip(cycles);
            run_mix(&reagents, &params, amplification, cli.json)
        }
    }
}

fn load_params(path: Option<&Path>) -> Result<AnalysisParams> {
    let Some(path) = path else {
        return Ok(AnalysisParams::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters: {}", path.display()))?;
    let params = AnalysisParams::from_json(&text)
        .with_context(|| format!("Invalid parameter file: {}", path.display()))?;
    info!("parameters loaded from {}", path.display());
    Ok(params)
}

fn read_sequence(args: &SequenceArgs) -> Result<SequenceInput> {
    let text = match (&args.sequence, &args.fasta) {
        (Some(seq), _) => seq.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to open input: {}", path.display()))?,
        (None, None) => anyhow::bail!("no input sequence given"),
    };
    let input = parse_sequence_input(&text).context("Failed to parse input sequence")?;
    debug!("read '{}' ({} chars)", input.name, input.sequence.len());
    Ok(input)
}

fn run_primers(input: &SequenceInput, params: &AnalysisParams, as_json: bool) -> Result<ExitCode> {
    let primer_params = params.primer_params();
    info!(
        "designing {} bp primers with {} (max ΔTm {} °C)",
        primer_params.primer_length,
        Wallace.name(),
        primer_params.constraints.max_tm_difference
    );

    let pair = match design_primers_with(&input.sequence, &primer_params, &Wallace) {
        Ok(pair) => pair,
        Err(e) if e.is_terminal_outcome() => {
            if as_json {
                println!("{}", json!({ "primers": null, "message": e.to_string() }));
            } else {
                println!("\n*** DNA Primer Design Results ***");
                println!("{}", e);
            }
            return Ok(ExitCode::from(EXIT_NO_PRIMERS));
        }
        Err(e) => return Err(e).context("Primer design failed"),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({ "primers": pair }))?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n*** DNA Primer Design Results ***");
    print_primer("Forward", &pair.forward);
    print_primer("Reverse", &pair.reverse);
    println!(
        "Amplicon: {} bp  |  ΔTm: {:.2}°C  |  Scan offset: {}",
        pair.amplicon_length(),
        pair.tm_difference(),
        pair.offset
    );
    Ok(ExitCode::SUCCESS)
}

fn print_primer(label: &str, primer: &PrimerCandidate) {
    println!("{} Primer (5'→3'): {}", label, primer.sequence);
    println!(
        "  Position: {}  |  GC%: {:.2}%  |  Tm: {:.2}°C",
        primer.start + 1,
        primer.gc_percent,
        primer.tm
    );
}

fn run_digest(input: &SequenceInput, params: &AnalysisParams, as_json: bool) -> Result<ExitCode> {
    info!("digesting '{}' with {}", input.name, params.enzyme);
    let rows = digest_report(&input.sequence, params.enzyme, &params.charge_states)
        .context("Digestion failed")?;

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "enzyme": params.enzyme, "peptides": rows }))?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n*** Protein Digestion & m/z Calculator ***");
    println!("\n=== Cleaved Peptides and m/z Values ({}) ===\n", params.enzyme);

    let width = rows.iter().map(|r| r.sequence.len()).max().unwrap_or(0).max(7);
    let mut header = format!("{:<width$} {:>6} {:>12}", "Peptide", "Length", "Mass (Da)");
    for z in &params.charge_states {
        header.push_str(&format!(" {:>12}", format!("m/z (+{})", z)));
    }
    println!("{}", header);

    for row in &rows {
        let mut line = format!("{:<width$} {:>6} {:>12.4}", row.sequence, row.length, row.mass);
        for state in &row.charge_states {
            line.push_str(&format!(" {:>12.4}", state.mz));
        }
        println!("{}", line);
    }

    println!("\nDigestion complete: {} peptides generated.", rows.len());
    Ok(ExitCode::SUCCESS)
}

fn run_mix(
    reagents: &[labbench::ReagentSpec],
    params: &AnalysisParams,
    amplification: Option<(f64, u32)>,
    as_json: bool,
) -> Result<ExitCode> {
    info!(
        "mixing {} reagents for {} x {} µL",
        reagents.len(),
        params.reactions,
        params.final_volume
    );
    let mix = mix_summary(reagents, params.final_volume, params.reactions)
        .context("Cannot set up reaction mix")?;
    let yield_copies = amplification.map(|(n0, cycles)| pcr_yield(n0, cycles));

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "mix": mix, "yield": yield_copies }))?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n*** PCR Reaction Setup Summary ***\n");
    let width = mix
        .entries
        .iter()
        .map(|e| e.name.len())
        .chain(std::iter::once("Nuclease-free Water".len()))
        .max()
        .unwrap_or(0);
    println!(
        "{:<width$} {:>16} {:>16} {:>18} {:>15}",
        "Reagent", "Stock Conc. (C1)", "Final Conc. (C2)", "Vol/Reaction (µL)", "Total Vol (µL)"
    );
    for entry in &mix.entries {
        println!(
            "{:<width$} {:>16} {:>16} {:>18.2} {:>15.2}",
            entry.name,
            entry.stock_concentration,
            entry.final_concentration,
            entry.volume_per_reaction,
            entry.total_volume
        );
    }
    println!(
        "{:<width$} {:>16} {:>16} {:>18.2} {:>15.2}",
        "Nuclease-free Water", "—", "—", mix.water_per_reaction, mix.water_total
    );

    println!("\nTotal per reaction: {:.2} µL", mix.final_volume);
    println!("Total master mix volume: {:.2} µL", mix.total_volume);

    if let (Some((n0, cycles)), Some(copies)) = (amplification, yield_copies) {
        println!("\n*** Theoretical PCR Yield ***");
        println!("Initial copies (N₀): {:.2e}", n0);
        println!("After {} cycles: {:.3e} copies", cycles, copies);
    }

    Ok(ExitCode::SUCCESS)
}

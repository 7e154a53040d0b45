//! Peptide masses and m/z values

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rayon::prelude::*;

use super::error::{AnalysisError, Result};
use super::normalize::normalize_protein;
use super::protein::{digest, Enzyme};
use super::types::{ChargeState, PeptideIon};

/// Monoisotopic mass of water added for the free termini, Da
pub const WATER_MASS: f64 = 18.01056;

/// Proton mass, Da
pub const PROTON_MASS: f64 = 1.007276;

/// Monoisotopic residue masses, Da
pub static RESIDUE_MASSES: Lazy<HashMap<char, f64>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert('A', 71.03711);
    map.insert('R', 156.10111);
    map.insert('N', 114.04293);
    map.insert('D', 115.02694);
    map.insert('C', 103.00919);
    map.insert('E', 129.04259);
    map.insert('Q', 128.05858);
    map.insert('G', 57.02146);
    map.insert('H', 137.05891);
    map.insert('I', 113.08406);
    map.insert('L', 113.08406);
    map.insert('K', 128.09496);
    map.insert('M', 131.04049);
    map.insert('F', 147.06841);
    map.insert('P', 97.05276);
    map.insert('S', 87.03203);
    map.insert('T', 101.04768);
    map.insert('W', 186.07931);
    map.insert('Y', 163.06333);
    map.insert('V', 99.06841);
    map
});

/// Monoisotopic mass of a peptide: water plus the sum of its residues.
/// Fails on the first residue that is not in the table.
pub fn peptide_mass(peptide: &str) -> Result<f64> {
    peptide.chars().try_fold(WATER_MASS, |mass, residue| {
        RESIDUE_MASSES
            .get(&residue)
            .map(|m| mass + m)
            .ok_or(AnalysisError::UnknownResidue(residue))
    })
}

/// m/z of an ion carrying `charge` protons
pub fn mz(mass: f64, charge: i32) -> Result<f64> {
    if charge <= 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "charge must be a positive integer, got {}",
            charge
        )));
    }
    let z = f64::from(charge);
    Ok((mass + z * PROTON_MASS) / z)
}

/// Mass and m/z values for one peptide
pub fn peptide_ion(peptide: &str, charges: &[i32]) -> Result<PeptideIon> {
    let mass = peptide_mass(peptide)?;
    let charge_states = charges
        .iter()
        .map(|&charge| Ok(ChargeState { charge, mz: mz(mass, charge)? }))
        .collect::<Result<Vec<_>>>()?;

    Ok(PeptideIon {
        sequence: peptide.to_string(),
        length: peptide.chars().count(),
        mass,
        charge_states,
    })
}

/// Normalize a protein, digest it and compute every peptide's ions.
///
/// Rows come back in digestion order.
pub fn digest_report(protein: &str, enzyme: Enzyme, charges: &[i32]) -> Result<Vec<PeptideIon>> {
    if let Some(&bad) = charges.iter().find(|&&z| z <= 0) {
        return Err(AnalysisError::InvalidInput(format!(
            "charge must be a positive integer, got {}",
            bad
        )));
    }

    let sequence = normalize_protein(protein)?;
    if sequence.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }

    digest(&sequence, enzyme)
        .par_iter()
        .map(|peptide| peptide_ion(peptide, charges))
        .collect()
}

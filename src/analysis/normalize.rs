//! Sequence normalization and alphabet validation

use bio::alphabets::{dna, protein, Alphabet};
use once_cell::sync::Lazy;

use super::error::{AnalysisError, Result};

/// Standard DNA bases
const STANDARD_BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// The 20 standard amino acids, one-letter codes
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'R', 'N', 'D', 'C', 'E', 'Q', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
];

static DNA_ALPHABET: Lazy<Alphabet> = Lazy::new(dna::alphabet);
static PROTEIN_ALPHABET: Lazy<Alphabet> = Lazy::new(protein::alphabet);

/// Check if a character is a standard DNA base
pub fn is_standard_base(c: char) -> bool {
    STANDARD_BASES.contains(&c)
}

/// Check if a character is one of the 20 standard amino acids
pub fn is_amino_acid(c: char) -> bool {
    AMINO_ACIDS.contains(&c)
}

/// Strip whitespace and uppercase, then require every base to be A, C, G or T.
pub fn normalize_dna(input: &str) -> Result<String> {
    normalize_with(input, &DNA_ALPHABET, is_standard_base)
}

/// Strip whitespace and uppercase, then require every residue to be one of
/// the 20 standard amino acids.
pub fn normalize_protein(input: &str) -> Result<String> {
    normalize_with(input, &PROTEIN_ALPHABET, is_amino_acid)
}

fn normalize_with(input: &str, alphabet: &Alphabet, is_valid: fn(char) -> bool) -> Result<String> {
    let seq: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    // Whole-word check first; only walk symbols to build the diagnostic.
    if alphabet.is_word(seq.as_bytes()) {
        return Ok(seq);
    }

    match seq.chars().enumerate().find(|&(_, c)| !is_valid(c)) {
        Some((position, symbol)) => Err(AnalysisError::InvalidSymbol { symbol, position }),
        None => Ok(seq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dna_strips_and_uppercases() {
        assert_eq!(normalize_dna(" atg c\nGTa ").unwrap(), "ATGCGTA");
    }

    #[test]
    fn test_normalize_dna_rejects_ambiguity_codes() {
        match normalize_dna("ACGNT") {
            Err(AnalysisError::InvalidSymbol { symbol, position }) => {
                assert_eq!(symbol, 'N');
                assert_eq!(position, 3);
            }
            other => panic!("expected InvalidSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_dna_rejects_non_ascii() {
        assert!(matches!(
            normalize_dna("ACGÅ"),
            Err(AnalysisError::InvalidSymbol { symbol: 'Å', position: 3 })
        ));
    }

    #[test]
    fn test_normalize_empty_is_ok() {
        assert_eq!(normalize_dna("  \n").unwrap(), "");
    }

    #[test]
    fn test_normalize_protein() {
        assert_eq!(normalize_protein("mkwv tfi").unwrap(), "MKWVTFI");
        assert!(matches!(
            normalize_protein("AXZ"),
            Err(AnalysisError::InvalidSymbol { symbol: 'X', position: 1 })
        ));
    }

    #[test]
    fn test_alphabet_helpers_agree_with_bio() {
        for c in AMINO_ACIDS {
            assert!(PROTEIN_ALPHABET.symbols.contains(c as usize));
        }
        for c in STANDARD_BASES {
            assert!(DNA_ALPHABET.symbols.contains(c as usize));
        }
    }
}

//! Base-level DNA calculations: reverse complement, GC content, melting temperature

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::error::{AnalysisError, Result};

/// Complement mapping for reverse complement
pub static COMPLEMENT: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert('A', 'T');
    map.insert('T', 'A');
    map.insert('C', 'G');
    map.insert('G', 'C');
    map
});

/// Compute the reverse complement of a DNA sequence.
///
/// Lowercase input is accepted and comes back uppercase. Anything other
/// than A, C, G or T fails with the symbol and its position.
pub fn reverse_complement(seq: &str) -> Result<String> {
    let complemented = seq
        .chars()
        .enumerate()
        .map(|(position, c)| {
            COMPLEMENT
                .get(&c.to_ascii_uppercase())
                .copied()
                .ok_or(AnalysisError::InvalidSymbol { symbol: c, position })
        })
        .collect::<Result<Vec<char>>>()?;

    Ok(complemented.into_iter().rev().collect())
}

/// GC content as a percentage (0-100). Empty sequences have no GC content.
pub fn gc_content(seq: &str) -> Result<f64> {
    let mut total = 0usize;
    let mut gc = 0usize;
    for c in seq.chars() {
        total += 1;
        if matches!(c.to_ascii_uppercase(), 'G' | 'C') {
            gc += 1;
        }
    }

    if total == 0 {
        return Err(AnalysisError::EmptySequence);
    }
    Ok(gc as f64 / total as f64 * 100.0)
}

/// Wallace rule: Tm = 2 * (A + T) + 4 * (G + C), in °C
pub fn tm_wallace(seq: &str) -> u32 {
    seq.chars()
        .map(|c| match c.to_ascii_uppercase() {
            'A' | 'T' => 2,
            'G' | 'C' => 4,
            _ => 0,
        })
        .sum()
}

/// A melting temperature model for short oligos.
///
/// The primer search only needs a number per candidate; swapping in a more
/// accurate model usually means loosening `max_tm_difference` as well.
pub trait MeltingModel: Sync {
    fn name(&self) -> &'static str;

    /// Tm in °C of a normalized (uppercase ACGT) oligo
    fn melting_temperature(&self, seq: &str) -> f64;
}

/// Wallace rule model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wallace;

impl MeltingModel for Wallace {
    fn name(&self) -> &'static str {
        "Wallace (2·AT + 4·GC)"
    }

    fn melting_temperature(&self, seq: &str) -> f64 {
        f64::from(tm_wallace(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("ATGC").unwrap(), "GCAT");
        assert_eq!(reverse_complement("atgc").unwrap(), "GCAT");
        assert_eq!(reverse_complement("AAATTTGGGCCC").unwrap(), "GGGCCCAAATTT");
        assert_eq!(reverse_complement("").unwrap(), "");
    }

    #[test]
    fn test_reverse_complement_rejects_unknown_bases() {
        match reverse_complement("ATXGC") {
            Err(AnalysisError::InvalidSymbol { symbol, position }) => {
                assert_eq!(symbol, 'X');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidSymbol, got {:?}", other),
        }
        assert!(reverse_complement("ACGN").is_err());
    }

    #[test]
    fn test_gc_content() {
        assert_eq!(gc_content("GGCC").unwrap(), 100.0);
        assert_eq!(gc_content("AATT").unwrap(), 0.0);
        assert_eq!(gc_content("ATGC").unwrap(), 50.0);
        assert_eq!(gc_content("atgc").unwrap(), 50.0);
    }

    #[test]
    fn test_gc_content_empty_fails() {
        assert!(matches!(gc_content(""), Err(AnalysisError::EmptySequence)));
    }

    #[test]
    fn test_tm_wallace() {
        assert_eq!(tm_wallace("ATGC"), 12);
        assert_eq!(tm_wallace("AAAA"), 8);
        assert_eq!(tm_wallace("GGGG"), 16);
        assert_eq!(tm_wallace(""), 0);
    }

    #[test]
    fn test_wallace_model_matches_rule() {
        assert_eq!(Wallace.melting_temperature("ATGCATGCATGCATGCATGC"), 60.0);
    }
}

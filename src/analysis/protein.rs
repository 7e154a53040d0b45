//! Enzymatic protein digestion

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::AnalysisError;

/// Residue that blocks cleavage when it follows a site residue
pub const PROLINE: u8 = b'P';

/// Where a protease cuts: after any residue in its site set, unless the
/// next residue is the blocking one.
pub trait CleavageRule {
    fn site_residues(&self) -> &'static [u8];

    fn blocking_residue(&self) -> Option<u8> {
        Some(PROLINE)
    }

    /// Whether the peptide bond between `residue` and `next` is cut.
    /// `next` is `None` at the C-terminus.
    fn cleaves_between(&self, residue: u8, next: Option<u8>) -> bool {
        self.site_residues().contains(&residue)
            && !matches!((next, self.blocking_residue()), (Some(n), Some(b)) if n == b)
    }
}

/// Supported proteases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enzyme {
    /// Cleaves after K or R
    Trypsin,
    /// Cleaves after F, W or Y
    Chymotrypsin,
}

impl Enzyme {
    pub const ALL: [Enzyme; 2] = [Enzyme::Trypsin, Enzyme::Chymotrypsin];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trypsin => "trypsin",
            Self::Chymotrypsin => "chymotrypsin",
        }
    }

    pub fn description(&self) -> String {
        let sites: Vec<String> = self
            .site_residues()
            .iter()
            .map(|&b| (b as char).to_string())
            .collect();
        format!("cleaves after {} (not before P)", sites.join("/"))
    }
}

impl Default for Enzyme {
    fn default() -> Self {
        Self::Trypsin
    }
}

impl CleavageRule for Enzyme {
    fn site_residues(&self) -> &'static [u8] {
        match self {
            Self::Trypsin => b"KR",
            Self::Chymotrypsin => b"FWY",
        }
    }
}

impl fmt::Display for Enzyme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Enzyme {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trypsin" => Ok(Self::Trypsin),
            "chymotrypsin" => Ok(Self::Chymotrypsin),
            other => Err(AnalysisError::InvalidInput(format!(
                "unknown enzyme '{}', expected trypsin or chymotrypsin",
                other
            ))),
        }
    }
}

/// Digest a protein sequence with one of the supported enzymes.
///
/// Peptides are returned in order and concatenate back to the input.
pub fn digest(sequence: &str, enzyme: Enzyme) -> Vec<&str> {
    digest_with(sequence, &enzyme)
}

/// Digest with any cleavage rule.
///
/// Segmentation only looks at bytes, so it never fails; residue validity is
/// checked when masses are computed. Cut points always follow an ASCII
/// site residue, which keeps every slice on a char boundary.
pub fn digest_with<'a, R: CleavageRule + ?Sized>(sequence: &'a str, rule: &R) -> Vec<&'a str> {
    let bytes = sequence.as_bytes();
    let mut peptides = Vec::new();
    let mut start = 0;

    for (i, &residue) in bytes.iter().enumerate() {
        if rule.cleaves_between(residue, bytes.get(i + 1).copied()) {
            peptides.push(&sequence[start..=i]);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        peptides.push(&sequence[start..]);
    }

    peptides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trypsin_proline_rule() {
        assert_eq!(digest("AKRPQ", Enzyme::Trypsin), vec!["AK", "RPQ"]);
    }

    #[test]
    fn test_trypsin_multiple_sites() {
        assert_eq!(digest("AKRFAK", Enzyme::Trypsin), vec!["AK", "R", "FAK"]);
    }

    #[test]
    fn test_chymotrypsin_proline_rule() {
        assert_eq!(digest("FWYPG", Enzyme::Chymotrypsin), vec!["F", "W", "YPG"]);
    }

    #[test]
    fn test_no_sites_yields_whole_sequence() {
        assert_eq!(digest("GASPV", Enzyme::Trypsin), vec!["GASPV"]);
        assert_eq!(digest("GASPV", Enzyme::Chymotrypsin), vec!["GASPV"]);
    }

    #[test]
    fn test_site_at_c_terminus() {
        assert_eq!(digest("GAK", Enzyme::Trypsin), vec!["GAK"]);
        assert_eq!(digest("K", Enzyme::Trypsin), vec!["K"]);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(digest("", Enzyme::Trypsin).is_empty());
    }

    #[test]
    fn test_enzyme_from_str() {
        assert_eq!("Trypsin".parse::<Enzyme>().unwrap(), Enzyme::Trypsin);
        assert_eq!(" CHYMOTRYPSIN ".parse::<Enzyme>().unwrap(), Enzyme::Chymotrypsin);
        assert!("pepsin".parse::<Enzyme>().is_err());
    }

    #[test]
    fn test_enzyme_serde_names() {
        assert_eq!(serde_json::to_string(&Enzyme::Chymotrypsin).unwrap(), "\"chymotrypsin\"");
        let e: Enzyme = serde_json::from_str("\"trypsin\"").unwrap();
        assert_eq!(e, Enzyme::Trypsin);
    }

    #[test]
    fn test_custom_rule_without_blocker() {
        struct LysC;
        impl CleavageRule for LysC {
            fn site_residues(&self) -> &'static [u8] {
                b"K"
            }
            fn blocking_residue(&self) -> Option<u8> {
                None
            }
        }
        assert_eq!(digest_with("AKPKG", &LysC), vec!["AK", "PK", "G"]);
    }
}

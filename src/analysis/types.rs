//! Data types for primer design, digestion and reaction setup

use serde::{Deserialize, Serialize};

use super::error::{AnalysisError, Result};
use super::protein::Enzyme;

/// Default primer length in bases
pub const DEFAULT_PRIMER_LENGTH: usize = 20;

/// Charge states reported for each peptide unless configured otherwise
pub const DEFAULT_CHARGE_STATES: [i32; 3] = [1, 2, 3];

/// Acceptance window for a primer pair. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimerConstraints {
    pub min_gc: f64,
    pub max_gc: f64,
    pub min_tm: f64,
    pub max_tm: f64,
    /// Largest allowed |Tm(fwd) - Tm(rev)|, °C
    pub max_tm_difference: f64,
}

impl Default for PrimerConstraints {
    fn default() -> Self {
        Self {
            min_gc: 40.0,
            max_gc: 60.0,
            min_tm: 55.0,
            max_tm: 65.0,
            max_tm_difference: 5.0,
        }
    }
}

impl PrimerConstraints {
    pub fn gc_in_range(&self, gc_percent: f64) -> bool {
        (self.min_gc..=self.max_gc).contains(&gc_percent)
    }

    pub fn tm_in_range(&self, tm: f64) -> bool {
        (self.min_tm..=self.max_tm).contains(&tm)
    }

    pub fn tm_difference_ok(&self, difference: f64) -> bool {
        difference.abs() <= self.max_tm_difference
    }

    /// GC and Tm of a single candidate are inside the window
    pub fn accepts_candidate(&self, candidate: &PrimerCandidate) -> bool {
        self.gc_in_range(candidate.gc_percent) && self.tm_in_range(candidate.tm)
    }

    /// Both candidates pass and their melting temperatures are close enough
    pub fn accepts(&self, forward: &PrimerCandidate, reverse: &PrimerCandidate) -> bool {
        self.accepts_candidate(forward)
            && self.accepts_candidate(reverse)
            && self.tm_difference_ok(forward.tm - reverse.tm)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [self.min_gc, self.max_gc, self.min_tm, self.max_tm, self.max_tm_difference];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "primer constraints must be finite numbers".to_string(),
            ));
        }
        if self.min_gc > self.max_gc {
            return Err(AnalysisError::InvalidInput(format!(
                "minimum GC% {} is above maximum {}",
                self.min_gc, self.max_gc
            )));
        }
        if self.min_tm > self.max_tm {
            return Err(AnalysisError::InvalidInput(format!(
                "minimum Tm {} is above maximum {}",
                self.min_tm, self.max_tm
            )));
        }
        if self.max_tm_difference < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Tm difference tolerance must not be negative, got {}",
                self.max_tm_difference
            )));
        }
        Ok(())
    }
}

/// Primer search parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimerParams {
    pub primer_length: usize,
    pub constraints: PrimerConstraints,
}

impl Default for PrimerParams {
    fn default() -> Self {
        Self {
            primer_length: DEFAULT_PRIMER_LENGTH,
            constraints: PrimerConstraints::default(),
        }
    }
}

/// Global analysis parameters, loadable from JSON. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub primer_length: usize,
    pub constraints: PrimerConstraints,
    pub enzyme: Enzyme,
    pub charge_states: Vec<i32>,
    /// Final volume of one reaction, µL
    pub final_volume: f64,
    pub reactions: u32,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            primer_length: DEFAULT_PRIMER_LENGTH,
            constraints: PrimerConstraints::default(),
            enzyme: Enzyme::Trypsin,
            charge_states: DEFAULT_CHARGE_STATES.to_vec(),
            final_volume: 25.0,
            reactions: 1,
        }
    }
}

impl AnalysisParams {
    pub fn from_json(text: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(text)?;
        params.constraints.validate()?;
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn primer_params(&self) -> PrimerParams {
        PrimerParams {
            primer_length: self.primer_length,
            constraints: self.constraints,
        }
    }
}

/// A single primer with its derived properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerCandidate {
    /// Primer sequence, 5'→3'
    pub sequence: String,
    /// 0-based start of the binding window on the forward strand
    pub start: usize,
    pub gc_percent: f64,
    pub tm: f64,
}

/// Accepted forward/reverse primer pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerPair {
    pub forward: PrimerCandidate,
    pub reverse: PrimerCandidate,
    /// Scan offset at which the pair was accepted
    pub offset: usize,
}

impl PrimerPair {
    /// Length of the product from the forward start to the end of the reverse window
    pub fn amplicon_length(&self) -> usize {
        self.reverse.start + self.reverse.sequence.len() - self.forward.start
    }

    pub fn tm_difference(&self) -> f64 {
        (self.forward.tm - self.reverse.tm).abs()
    }
}

/// m/z of a peptide at one charge state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub charge: i32,
    pub mz: f64,
}

/// One digestion product with its mass and m/z values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideIon {
    pub sequence: String,
    pub length: usize,
    /// Monoisotopic mass, Da
    pub mass: f64,
    pub charge_states: Vec<ChargeState>,
}

/// Reagent as entered: stock (C1) and final (C2) concentrations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentSpec {
    pub name: String,
    pub stock_concentration: f64,
    pub final_concentration: f64,
}

impl ReagentSpec {
    pub fn new(name: impl Into<String>, stock_concentration: f64, final_concentration: f64) -> Self {
        Self {
            name: name.into(),
            stock_concentration,
            final_concentration,
        }
    }
}

/// Reagent with its pipetting volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReagentEntry {
    pub name: String,
    pub stock_concentration: f64,
    pub final_concentration: f64,
    /// V1 for a single reaction, µL
    pub volume_per_reaction: f64,
    /// V1 scaled to all reactions, µL
    pub total_volume: f64,
}

/// Complete master-mix setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixSummary {
    pub reactions: u32,
    pub final_volume: f64,
    pub entries: Vec<ReagentEntry>,
    pub water_per_reaction: f64,
    pub water_total: f64,
    /// Final volume scaled to all reactions, µL
    pub total_volume: f64,
}

/// Everything computed in one session, for export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionResults {
    pub params: AnalysisParams,
    pub primers: Option<PrimerPair>,
    pub peptides: Vec<PeptideIon>,
    pub mix: Option<MixSummary>,
    pub pcr_yield: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(gc_percent: f64, tm: f64) -> PrimerCandidate {
        PrimerCandidate {
            sequence: String::new(),
            start: 0,
            gc_percent,
            tm,
        }
    }

    #[test]
    fn test_constraint_bounds_are_inclusive() {
        let c = PrimerConstraints::default();
        assert!(c.accepts(&candidate(40.0, 55.0), &candidate(60.0, 60.0)));
        assert!(!c.accepts(&candidate(39.9, 60.0), &candidate(50.0, 60.0)));
        assert!(!c.accepts(&candidate(50.0, 66.0), &candidate(50.0, 64.0)));
    }

    #[test]
    fn test_per_value_window_checks() {
        let c = PrimerConstraints::default();
        assert!(c.gc_in_range(40.0) && c.gc_in_range(60.0));
        assert!(!c.gc_in_range(65.0));
        assert!(c.tm_in_range(55.0) && !c.tm_in_range(54.0));
        assert!(c.tm_difference_ok(-5.0));
        assert!(!c.tm_difference_ok(6.0));
    }

    #[test]
    fn test_tm_difference_tolerance() {
        let strict = PrimerConstraints::default();
        let loose = PrimerConstraints {
            max_tm_difference: 10.0,
            ..Default::default()
        };
        let (fwd, rev) = (candidate(50.0, 56.0), candidate(50.0, 64.0));
        assert!(!strict.accepts(&fwd, &rev));
        assert!(loose.accepts(&fwd, &rev));
    }

    #[test]
    fn test_params_from_partial_json() {
        let params =
            AnalysisParams::from_json(r#"{"primer_length": 18, "constraints": {"max_tm_difference": 10}}"#)
                .unwrap();
        assert_eq!(params.primer_length, 18);
        assert_eq!(params.constraints.max_tm_difference, 10.0);
        assert_eq!(params.constraints.min_gc, 40.0);
        assert_eq!(params.enzyme, Enzyme::Trypsin);
        assert_eq!(params.charge_states, vec![1, 2, 3]);
    }

    #[test]
    fn test_params_json_roundtrip() {
        let params = AnalysisParams {
            enzyme: Enzyme::Chymotrypsin,
            reactions: 8,
            ..Default::default()
        };
        let json = params.to_json_pretty().unwrap();
        assert_eq!(AnalysisParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_params_rejects_inverted_window() {
        let err = AnalysisParams::from_json(r#"{"constraints": {"min_gc": 70}}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert!(matches!(
            AnalysisParams::from_json("{not json").unwrap_err(),
            AnalysisError::Config(_)
        ));
    }

    #[test]
    fn test_amplicon_length() {
        let pair = PrimerPair {
            forward: PrimerCandidate { sequence: "ACGT".into(), start: 2, gc_percent: 50.0, tm: 12.0 },
            reverse: PrimerCandidate { sequence: "ACGT".into(), start: 10, gc_percent: 50.0, tm: 12.0 },
            offset: 2,
        };
        assert_eq!(pair.amplicon_length(), 12);
        assert_eq!(pair.tm_difference(), 0.0);
    }
}

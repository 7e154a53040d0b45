//! PCR master-mix volumes and theoretical yield

use std::str::FromStr;

use super::error::{AnalysisError, Result};
use super::types::{MixSummary, ReagentEntry, ReagentSpec};

/// Relative overshoot of the summed reagent volumes still treated as a full tube
const VOLUME_TOLERANCE: f64 = 1e-9;

/// Volume (V1) of stock needed so that C1·V1 = C2·V2
pub fn reagent_volume(c1: f64, c2: f64, final_volume: f64) -> Result<f64> {
    if !(c1.is_finite() && c1 > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "stock concentration must be positive, got {}",
            c1
        )));
    }
    if !(c2.is_finite() && c2 >= 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "final concentration must not be negative, got {}",
            c2
        )));
    }
    check_final_volume(final_volume)?;
    Ok(c2 * final_volume / c1)
}

/// Volumes for every reagent plus the water that tops each reaction up to
/// `final_volume`, scaled to `reactions` tubes.
///
/// Fails with `VolumeExceeded` when the reagents alone overflow the
/// reaction. Only float rounding on an exactly full tube is absorbed, as
/// 0 µL of water.
pub fn mix_summary(specs: &[ReagentSpec], final_volume: f64, reactions: u32) -> Result<MixSummary> {
    check_final_volume(final_volume)?;
    if reactions == 0 {
        return Err(AnalysisError::InvalidInput(
            "number of reactions must be at least 1".to_string(),
        ));
    }
    let scale = f64::from(reactions);

    let entries = specs
        .iter()
        .map(|spec| {
            let volume = reagent_volume(
                spec.stock_concentration,
                spec.final_concentration,
                final_volume,
            )?;
            Ok(ReagentEntry {
                name: spec.name.clone(),
                stock_concentration: spec.stock_concentration,
                final_concentration: spec.final_concentration,
                volume_per_reaction: volume,
                total_volume: volume * scale,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let reagent_total: f64 = entries.iter().map(|e| e.volume_per_reaction).sum();
    let mut water = final_volume - reagent_total;
    if water < -VOLUME_TOLERANCE * final_volume {
        return Err(AnalysisError::VolumeExceeded {
            required: reagent_total,
            available: final_volume,
        });
    }
    // Rounding overshoot on an exactly full tube
    if water < 0.0 {
        water = 0.0;
    }

    Ok(MixSummary {
        reactions,
        final_volume,
        entries,
        water_per_reaction: water,
        water_total: water * scale,
        total_volume: final_volume * scale,
    })
}

/// Ideal amplification: N = N0 · 2^cycles
pub fn pcr_yield(initial_copies: f64, cycles: u32) -> f64 {
    initial_copies * f64::from(cycles).exp2()
}

fn check_final_volume(final_volume: f64) -> Result<()> {
    if final_volume.is_finite() && final_volume > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidInput(format!(
            "final volume must be positive, got {}",
            final_volume
        )))
    }
}

impl FromStr for ReagentSpec {
    type Err = AnalysisError;

    /// Parse `name:C1:C2`, e.g. `MgCl2:25:1.5`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnalysisError::InvalidInput(format!("invalid reagent format: {}", s));

        let mut parts = s.trim().split(':');
        let (Some(name), Some(c1), Some(c2), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let c1: f64 = c1.trim().parse().map_err(|_| invalid())?;
        let c2: f64 = c2.trim().parse().map_err(|_| invalid())?;

        Ok(ReagentSpec::new(name, c1, c2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reagent_volume() {
        assert_eq!(reagent_volume(10.0, 1.0, 20.0).unwrap(), 2.0);
        assert_eq!(reagent_volume(10.0, 0.0, 20.0).unwrap(), 0.0);
    }

    #[test]
    fn test_reagent_volume_rejects_bad_input() {
        assert!(reagent_volume(0.0, 1.0, 20.0).is_err());
        assert!(reagent_volume(-5.0, 1.0, 20.0).is_err());
        assert!(reagent_volume(10.0, -1.0, 20.0).is_err());
        assert!(reagent_volume(10.0, 1.0, 0.0).is_err());
        assert!(reagent_volume(f64::NAN, 1.0, 20.0).is_err());
    }

    #[test]
    fn test_mix_summary_balances_water() {
        let specs = vec![
            ReagentSpec::new("Buffer", 10.0, 1.0),
            ReagentSpec::new("MgCl2", 25.0, 1.5),
            ReagentSpec::new("dNTPs", 10.0, 0.2),
        ];
        let mix = mix_summary(&specs, 25.0, 4).unwrap();

        assert_eq!(mix.entries.len(), 3);
        assert_eq!(mix.entries[0].volume_per_reaction, 2.5);
        assert_eq!(mix.entries[0].total_volume, 10.0);
        assert!((mix.entries[1].volume_per_reaction - 1.5).abs() < 1e-12);

        let reagents: f64 = mix.entries.iter().map(|e| e.volume_per_reaction).sum();
        assert!((reagents + mix.water_per_reaction - 25.0).abs() < 1e-12);
        assert!((mix.water_total - mix.water_per_reaction * 4.0).abs() < 1e-12);
        assert_eq!(mix.total_volume, 100.0);
    }

    #[test]
    fn test_mix_summary_without_reagents_is_all_water() {
        let mix = mix_summary(&[], 20.0, 1).unwrap();
        assert_eq!(mix.water_per_reaction, 20.0);
        assert_eq!(mix.total_volume, 20.0);
    }

    #[test]
    fn test_mix_summary_volume_exceeded() {
        let specs = vec![
            ReagentSpec::new("Buffer", 2.0, 1.0),
            ReagentSpec::new("Enhancer", 2.0, 1.5),
        ];
        match mix_summary(&specs, 20.0, 1) {
            Err(AnalysisError::VolumeExceeded { required, available }) => {
                assert_eq!(required, 25.0);
                assert_eq!(available, 20.0);
            }
            other => panic!("expected VolumeExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_mix_summary_exactly_full_is_allowed() {
        let specs = vec![ReagentSpec::new("Stock", 2.0, 2.0)];
        let mix = mix_summary(&specs, 10.0, 1).unwrap();
        assert_eq!(mix.water_per_reaction, 0.0);
    }

    #[test]
    fn test_mix_summary_absorbs_rounding_on_full_tube() {
        // 6 x 4.1666.. µL sums one ulp above 25.0
        let specs: Vec<ReagentSpec> = (1..=6)
            .map(|i| ReagentSpec::new(format!("Reagent {}", i), 3.0, 0.5))
            .collect();
        let mix = mix_summary(&specs, 25.0, 1).unwrap();
        assert_eq!(mix.water_per_reaction, 0.0);
        assert_eq!(mix.water_total, 0.0);
        assert_eq!(mix.entries.len(), 6);
    }

    #[test]
    fn test_mix_summary_small_real_overflow_is_rejected() {
        let specs = vec![ReagentSpec::new("Stock", 2.0, 2.0001)];
        assert!(matches!(
            mix_summary(&specs, 10.0, 1),
            Err(AnalysisError::VolumeExceeded { .. })
        ));
    }

    #[test]
    fn test_mix_summary_rejects_zero_reactions() {
        assert!(matches!(
            mix_summary(&[], 20.0, 0),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_pcr_yield() {
        assert_eq!(pcr_yield(1.0, 3), 8.0);
        assert_eq!(pcr_yield(1000.0, 0), 1000.0);
        assert_eq!(pcr_yield(1e3, 30), 1e3 * 1_073_741_824.0);
    }

    #[test]
    fn test_parse_reagent_spec() {
        let spec: ReagentSpec = "MgCl2:25:1.5".parse().unwrap();
        assert_eq!(spec, ReagentSpec::new("MgCl2", 25.0, 1.5));

        let spec: ReagentSpec = " Taq polymerase : 5 : 0.05 ".parse().unwrap();
        assert_eq!(spec.name, "Taq polymerase");
    }

    #[test]
    fn test_parse_reagent_spec_rejects_malformed() {
        for bad in ["Buffer", "Buffer:10", "Buffer:10:1:2", ":10:1", "Buffer:ten:1"] {
            assert!(bad.parse::<ReagentSpec>().is_err(), "{} should not parse", bad);
        }
    }
}

//! Primer pair search
//!
//! Slides a window of the primer length inward from both ends of the
//! template. At each offset the forward primer is read from the 5' end
//! and the reverse primer is the reverse complement of the mirrored
//! window at the 3' end. The first offset whose pair satisfies every
//! constraint wins; later offsets are never compared against it.

use rayon::prelude::*;

use super::error::{AnalysisError, Result};
use super::normalize::normalize_dna;
use super::nucleotide::{gc_content, reverse_complement, MeltingModel, Wallace};
use super::types::{PrimerCandidate, PrimerPair, PrimerParams};

/// Design primers with the default constraints and the Wallace rule
pub fn design_primers(sequence: &str, primer_length: usize) -> Result<PrimerPair> {
    let params = PrimerParams {
        primer_length,
        ..Default::default()
    };
    design_primers_with(sequence, &params, &Wallace)
}

/// Design primers with explicit constraints and melting temperature model.
///
/// Offsets are evaluated in parallel, but the pair returned is always the
/// one at the lowest accepted offset.
pub fn design_primers_with<M: MeltingModel>(
    sequence: &str,
    params: &PrimerParams,
    model: &M,
) -> Result<PrimerPair> {
    let primer_length = params.primer_length;
    if primer_length == 0 {
        return Err(AnalysisError::InvalidInput(
            "primer length must be at least 1".to_string(),
        ));
    }
    params.constraints.validate()?;

    // Length is checked before the alphabet so a short template is always
    // reported as too short.
    let length = sequence.chars().filter(|c| !c.is_whitespace()).count();
    let required = primer_length.saturating_mul(2);
    if length < required {
        return Err(AnalysisError::SequenceTooShort { length, required });
    }

    let template = normalize_dna(sequence)?;
    let reverse_strand = reverse_complement(&template)?;
    let offsets = length - required;

    (0..offsets)
        .into_par_iter()
        .find_map_first(|offset| {
            evaluate_offset(&template, &reverse_strand, offset, params, model).transpose()
        })
        .unwrap_or_else(|| {
            Err(AnalysisError::NoPrimerFound {
                offsets_scanned: offsets,
            })
        })
}

/// Build the candidate pair at `offset` and test it.
///
/// `reverse_strand` is the reverse complement of the whole template, so
/// `reverse_strand[offset..offset + L]` equals the reverse complement of
/// `template[n - offset - L..n - offset]`.
fn evaluate_offset<M: MeltingModel>(
    template: &str,
    reverse_strand: &str,
    offset: usize,
    params: &PrimerParams,
    model: &M,
) -> Result<Option<PrimerPair>> {
    let primer_length = params.primer_length;
    let forward = build_candidate(
        &template[offset..offset + primer_length],
        offset,
        model,
    )?;
    let reverse = build_candidate(
        &reverse_strand[offset..offset + primer_length],
        template.len() - offset - primer_length,
        model,
    )?;

    if params.constraints.accepts(&forward, &reverse) {
        Ok(Some(PrimerPair {
            forward,
            reverse,
            offset,
        }))
    } else {
        Ok(None)
    }
}

fn build_candidate<M: MeltingModel>(oligo: &str, start: usize, model: &M) -> Result<PrimerCandidate> {
    Ok(PrimerCandidate {
        sequence: oligo.to_string(),
        start,
        gc_percent: gc_content(oligo)?,
        tm: model.melting_temperature(oligo),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::analysis::types::PrimerConstraints;
    use proptest::prelude::*;

    fn dna(min_len: usize, max_len: usize) -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')],
            min_len..=max_len,
        )
        .prop_map(|v| v.into_iter().collect())
    }

    /// Straight sequential scan, slicing the mirrored window directly.
    fn first_accepted_offset(seq: &str, params: &PrimerParams) -> Option<usize> {
        let n = seq.len();
        let l = params.primer_length;
        (0..n.saturating_sub(2 * l)).find(|&offset| {
            let fwd = &seq[offset..offset + l];
            let rev = reverse_complement(&seq[n - offset - l..n - offset]).unwrap();
            let forward = build_candidate(fwd, offset, &Wallace).unwrap();
            let reverse = build_candidate(&rev, n - offset - l, &Wallace).unwrap();
            params.constraints.accepts(&forward, &reverse)
        })
    }

    proptest! {
        #[test]
        fn reverse_primer_binds_its_recorded_window(seq in dna(40, 160)) {
            if let Ok(pair) = design_primers(&seq, 20) {
                let start = pair.reverse.start;
                let site = reverse_complement(&pair.reverse.sequence).unwrap();
                prop_assert_eq!(&seq[start..start + 20], site.as_str());
                prop_assert_eq!(&seq[pair.forward.start..pair.forward.start + 20], pair.forward.sequence.as_str());
                prop_assert_eq!(start, seq.len() - pair.offset - 20);
            }
        }

        #[test]
        fn accepted_pair_is_the_first_match(seq in dna(16, 120), primer_length in 6usize..=20) {
            let params = PrimerParams {
                primer_length,
                constraints: PrimerConstraints {
                    min_tm: 0.0,
                    max_tm: 100.0,
                    ..Default::default()
                },
            };
            let expected = first_accepted_offset(&seq, &params);
            match design_primers_with(&seq, &params, &Wallace) {
                Ok(pair) => {
                    prop_assert_eq!(Some(pair.offset), expected);
                    prop_assert!(params.constraints.accepts(&pair.forward, &pair.reverse));
                }
                Err(AnalysisError::NoPrimerFound { .. }) => prop_assert_eq!(expected, None),
                Err(AnalysisError::SequenceTooShort { .. }) => prop_assert!(seq.len() < 2 * primer_length),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        #[test]
        fn short_templates_are_always_too_short(seq in dna(0, 39)) {
            let is_too_short = matches!(
                design_primers(&seq, 20),
                Err(AnalysisError::SequenceTooShort { .. })
            );
            prop_assert!(is_too_short);
        }
    }
}

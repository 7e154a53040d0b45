//! Sequence input parsing: single-record FASTA or raw pasted text

use super::error::{AnalysisError, Result};

/// A named input sequence, not yet normalized
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceInput {
    pub name: String,
    pub sequence: String,
}

/// Parse a single sequence from FASTA or raw text.
///
/// With a `>` header the first record is taken and its lines joined; any
/// further record is an error. Without one, every non-empty line is part of
/// the sequence. Whitespace is dropped, case is kept.
pub fn parse_sequence_input(text: &str) -> Result<SequenceInput> {
    let mut name: Option<String> = None;
    let mut sequence = String::new();
    let mut records = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            records += 1;
            if records > 1 {
                return Err(AnalysisError::InvalidInput(
                    "input must contain exactly 1 sequence, found more".to_string(),
                ));
            }
            name = Some(header.trim().to_string());
        } else {
            sequence.extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if sequence.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }

    Ok(SequenceInput {
        name: name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Sequence_1".to_string()),
        sequence,
    })
}

//! Labbench - Primer Design, Protein Digestion and PCR Mix Calculator
//!
//! Pure, synchronous analysis routines shared by the desktop app and the
//! command-line tool:
//!
//! - **Primer design** - first forward/reverse pair meeting GC% and Tm windows
//! - **Protein digestion** - trypsin/chymotrypsin cleavage with the proline rule
//! - **Peptide masses** - monoisotopic mass and m/z per charge state
//! - **Reaction setup** - C1V1 = C2V2 volumes, water balance and ideal yield
//!
//! ```
//! use labbench::{design_primers, digest, peptide_mass, Enzyme};
//!
//! let peptides = digest("AKRPQ", Enzyme::Trypsin);
//! assert_eq!(peptides, vec!["AK", "RPQ"]);
//! assert!(peptide_mass("AK").unwrap() > 200.0);
//! assert!(design_primers("ACGT", 20).is_err());
//! ```

pub mod analysis;

pub use analysis::*;

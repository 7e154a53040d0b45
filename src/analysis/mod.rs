mod error;
mod types;
mod normalize;
mod nucleotide;
mod fasta;
mod primer;
mod protein;
mod mass;
mod reagent;

pub use error::*;
pub use types::*;
pub use normalize::*;
pub use nucleotide::*;
pub use fasta::*;
pub use primer::*;
pub use protein::*;
pub use mass::*;
pub use reagent::*;

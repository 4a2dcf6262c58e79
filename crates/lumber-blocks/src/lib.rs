//! Block type-id classification and the phase state carried by custom logs.
#![forbid(unsafe_code)]

pub mod names;
pub mod types;

pub use names::{Namespaces, is_leaf, is_loggable, is_stem_family, species_of};
pub use types::Phase;

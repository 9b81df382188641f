// qsar-domain library entry point
pub mod depiction;
pub mod errors;
pub mod molecule;
pub mod smiles;

pub use errors::DomainError;
pub use molecule::Molecule;
pub use smiles::{Atom, Bond, BondOrder};

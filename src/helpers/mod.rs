pub mod xml;
pub(crate) mod zip;

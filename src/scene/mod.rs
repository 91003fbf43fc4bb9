//! JSON graph descriptions and their instantiation into live effect instances.

pub(crate) mod graph;

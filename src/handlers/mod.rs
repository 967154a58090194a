//! HTTP handlers for étudiant CRUD and search.

pub mod etudiant;

pub use etudiant::*;

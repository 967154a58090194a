//! Route tables: the étudiant API and the common ops endpoints.

mod common;
mod etudiant;

pub use common::common_routes_with_ready;
pub use etudiant::etudiant_routes;

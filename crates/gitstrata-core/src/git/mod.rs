//! Git history inspection via the git subprocess

pub mod log;
pub mod process;
pub mod repository;

pub use repository::{CheckoutOutcome, RepoManager};

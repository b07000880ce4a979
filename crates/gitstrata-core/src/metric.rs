//! Interface to the external structural-parser collaborator
//!
//! The engine never parses source code itself. It consumes a capability
//! with the contract "given a filesystem root, visit every declaration in
//! a best-effort project-level parse and count the ones matching a
//! predicate". A per-file parse failure inside the collaborator must not
//! abort the project-level visit; that policy lives on the collaborator's
//! side of this interface.

use std::path::Path;

use crate::error::Result;

/// Declaration shape exposed by the collaborator's project parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeclKind {
    /// Ordinary class declaration
    Class,
    /// Interface declaration
    Interface,
    /// Enumeration declaration
    Enumeration,
    /// Record-like data carrier
    Record,
    /// Annotation declaration
    Annotation,
}

/// One declaration node as seen by a counting predicate.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Declaration kind
    pub kind: DeclKind,
    /// Simple name of the declaration
    pub name: String,
    /// Record-style component list, empty for non-record kinds
    pub components: Vec<String>,
    /// Implemented-interface names
    pub interfaces: Vec<String>,
    /// Type-parameter arity
    pub type_params: usize,
}

/// Best-effort project parser: visits every declaration under a root.
pub trait ProjectParser {
    /// Walk the project rooted at `root` and invoke `visit` for each
    /// declaration. Partial on a per-file parse failure, but never
    /// aborting the whole project.
    fn visit_declarations(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(&Declaration),
    ) -> Result<()>;
}

/// Count declarations under `root` matching `predicate`.
pub fn count_matching<P, F>(parser: &P, root: &Path, predicate: F) -> Result<u64>
where
    P: ProjectParser + ?Sized,
    F: Fn(&Declaration) -> bool,
{
    let mut count = 0u64;
    parser.visit_declarations(root, &mut |decl| {
        if predicate(decl) {
            count += 1;
        }
    })?;
    Ok(count)
}

/// The scalar metric the engine evaluates on a checked-out tree.
///
/// The grid sweep fans repository cells across workers, so metrics must
/// be shareable between threads.
pub trait Metric: Sync {
    /// Evaluate the metric over the working directory at `workdir`.
    fn measure(&self, workdir: &Path) -> Result<u64>;
}

// Closures double as metrics, which keeps fakes in tests and embedders'
// one-off measurements free of boilerplate.
impl<F> Metric for F
where
    F: Fn(&Path) -> Result<u64> + Sync,
{
    fn measure(&self, workdir: &Path) -> Result<u64> {
        self(workdir)
    }
}

/// Adapter that turns a [`ProjectParser`] plus a declaration predicate
/// into a [`Metric`].
pub struct DeclCountMetric<P, F> {
    parser: P,
    predicate: F,
}

impl<P, F> DeclCountMetric<P, F>
where
    P: ProjectParser + Sync,
    F: Fn(&Declaration) -> bool + Sync,
{
    /// Pair a parser with the predicate it should count.
    pub fn new(parser: P, predicate: F) -> Self {
        Self { parser, predicate }
    }
}

impl<P, F> Metric for DeclCountMetric<P, F>
where
    P: ProjectParser + Sync,
    F: Fn(&Declaration) -> bool + Sync,
{
    fn measure(&self, workdir: &Path) -> Result<u64> {
        count_matching(&self.parser, workdir, &self.predicate)
    }
}

//! Class/interface hierarchy store and tightest-common-ancestor queries for
//! the Enclave rewriter.
//!
//! Re-emitting rewritten bytecode requires answering, for arbitrary pairs of
//! type names appearing anywhere in the rewritten program, "what is their
//! tightest common ancestor?" — the underlying verifier demands this when
//! stack-map frames are recomputed, and ordinary class loading cannot answer
//! it because many of the types involved are synthetic or not yet generated.
//!
//! The crate is organized around that query:
//! - [`Hierarchy`]: a mutable, incrementally-built multi-rooted graph over
//!   [`ClassDescriptor`]s, tolerating out-of-order and partial input via
//!   placeholder (ghost) nodes.
//! - [`verify`]: structural validation of a completed hierarchy; only a
//!   verified hierarchy may be queried, which [`VerifiedHierarchy`] encodes in
//!   the type system.
//! - [`AncestorQuery`]: the double-marking tightest-common-ancestor search,
//!   with explicit ambiguity reporting.
//! - [`unify`]: the namespace-unification policy normalizing the overlapping
//!   name spaces (plain, renamed, exception-wrapped, array-wrapped, fixed
//!   roots) down to a single hierarchy query.
//!
//! A `Hierarchy` is built once per rewritten program, verified once, then
//! queried any number of times — sequentially. Nothing here is safe for
//! concurrent use of a single instance; independent programs get independent
//! instances.

#![forbid(unsafe_code)]

mod descriptor;
mod hierarchy;
mod node;
mod resolve;
mod unify;
mod verify;

pub use crate::descriptor::ClassDescriptor;
pub use crate::hierarchy::{Hierarchy, HierarchyError, Shape, VerifiedHierarchy};
pub use crate::node::Node;
pub use crate::resolve::{tightest_common_ancestor, AncestorError, AncestorQuery};
pub use crate::unify::{unify, UnifyError};
pub use crate::verify::{verify, VerificationResult};

pub type Result<T> = std::result::Result<T, HierarchyError>;

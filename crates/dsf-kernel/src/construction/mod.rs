//! Construction Phase
//!
//! Step graphs are declared by name and validated exactly once. All
//! structural checks happen here, producing a [`crate::StepGraph`] whose
//! traversal never fails.
//!
//! 1. **Declaration**: `StepGraphBuilder` collects `StepSpec`s with
//!    name-based `next`/`prev` references.
//! 2. **Validation**: `GraphValidator` resolves references to arena indices
//!    and rejects duplicates, dangling references, missing or repeated START
//!    steps and cycles.

pub mod builder;
pub mod validator;

pub use builder::{StepGraphBuilder, StepSpec};
pub use validator::GraphValidator;

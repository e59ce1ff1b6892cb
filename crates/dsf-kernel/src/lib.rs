//! DSF Kernel (dsf-kernel)
//!
//! Step-graph engine for the domain setup flow, with a two-phase design:
//! 1. **Construction Phase**: declare step maps by name and validate them once
//! 2. **Traversal Phase**: walk pre-validated graphs by arena index
//!
//! # Quick Start
//!
//! ```rust
//! use dsf_kernel::prelude::*;
//!
//! let graph = step_maps::connect_domain();
//! let entry = EntrySignals::new().with_domain_connect(false).resolve();
//! let progress = build_progress_list(Mode::Suggested, graph);
//!
//! assert_eq!(entry, step_maps::slugs::SUGGESTED_START);
//! assert_eq!(progress.visible().count(), 3);
//! ```

pub mod construction;
pub mod error;
pub mod graph;
pub mod progress;
pub mod resolver;
pub mod step_maps;
pub mod types;

// Re-exports
pub use construction::{GraphValidator, StepGraphBuilder, StepSpec};
pub use error::{EdgeKind, GraphError};
pub use graph::StepGraph;
pub use progress::{build_progress_list, ProgressEntry, ProgressList};
pub use resolver::{resolve_entry_step, update_step_for, EntrySignals};
pub use types::*;

/// Common imports for hosts of the setup flow
pub mod prelude {
    pub use crate::construction::{StepGraphBuilder, StepSpec};
    pub use crate::error::GraphError;
    pub use crate::graph::StepGraph;
    pub use crate::progress::{build_progress_list, ProgressList};
    pub use crate::resolver::{resolve_entry_step, EntrySignals};
    pub use crate::step_maps;
    pub use crate::types::{Mode, Step, StepId, StepName, StepType};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

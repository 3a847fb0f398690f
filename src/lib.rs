//! An in-memory knowledge-base query engine.
//!
//! Two phases, matching the two halves of this crate:
//!
//! ```ascii
//!  raw JSON KB                    program (names + literal args)
//!       │                                      │
//!       ▼                                      ▼
//!  kb::build::KnowledgeBase::build      interpreter::Interpreter::run
//!       │                                      │
//!       ▼                                      ▼
//!  kb::KnowledgeBase  ───────read-only────►  primitives::apply (×27)
//!                                              │
//!                                              ▼
//!                                      interpreter::Answer
//! ```
//!
//! [`kb::KnowledgeBase::build`] ingests a [`kb::raw::RawKnowledgeBase`],
//! merging the concept hierarchy into the entity store, mirroring
//! concept-targeted relations, and materializing the secondary indices the
//! primitive library reads from. [`interpreter::Interpreter::run`] then
//! infers the dependency DAG of a flat primitive-name sequence and evaluates
//! it, producing an [`interpreter::Answer`].

pub mod error;
pub mod interpreter;
pub mod kb;
pub mod primitives;
pub mod value;

pub use error::{Error, Reason, Result};
pub use interpreter::{Answer, Interpreter, Program};
pub use kb::raw::RawKnowledgeBase;
pub use kb::KnowledgeBase;
pub use value::Value;

//! Galaxy lazy combinator evaluator.
//!
//! ```text
//! graph builder → Graph (arena of nodes) → force → builtins
//!                                            ↓
//!                         Interaction ⇄ modulation codec ⇄ Transport
//! ```
//!
//! Values are nodes in a [`Graph`]. Applications stay unevaluated until
//! [`Graph::force`] reduces them, and each application caches its normal
//! form so shared sub-terms are reduced once. The [`Interaction`] loop
//! drives a protocol value against an external [`Transport`].

mod builtins;
pub mod error;
pub mod graph;
pub mod interact;
pub mod render;
pub mod transport;

pub use error::{EvalError, EvalResult};
pub use galaxy_types::{Bits, Builtin, Data, Point};
pub use graph::{Closure, Graph, Node, NodeId};
pub use interact::{Interaction, Outcome, Phase};
pub use render::Picture;
pub use transport::{Transport, TransportError};

// Internal modules
pub mod config;
pub mod dispatch;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod runtime;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use dispatch::{apply, apply_unary, DispatchError};
pub use lexical::{build, BuildError, BuildMetrics, TreeBuilder};
pub use runtime::Value;
pub use tokens::{Keyword, NodeId, Operator, Token, TokenTree};
pub use utils::{Position, Span};

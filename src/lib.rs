//! Static analysis tool that keeps IDE-helper `@method` annotations on PHP
//! action classes in sync with their handler signatures.
//!
//! Classes gain `run`, `dispatch` and `dispatchOn` entry points through
//! capability traits; those entry points only exist at runtime, so editors
//! need doc-comment annotations to offer completion for them. This crate
//! parses the PHP source directly (no autoloading, nothing is executed),
//! derives each class's capabilities and handler signature, and patches the
//! class doc comment in place, preserving every hand-written line.
//!
//! The pipeline:
//! 1. [`parser`] turns a PHP file into owned class/import/method data.
//! 2. [`analyser`] resolves type names against imports and PSR-4 mappings
//!    and merges inherited methods into a [`types::ClassSnapshot`].
//! 3. [`generate`] decides which annotation lines the class should carry.
//! 4. [`update`] diffs or splices them into the file.
//! 5. [`sync`] drives all of the above across a namespace.

pub mod analyser;
pub mod composer;
pub mod config;
pub mod docblock;
pub mod error;
pub mod generate;
pub mod parser;
pub mod sync;
pub mod types;
pub mod update;

pub use analyser::ClassAnalyser;
pub use config::Config;
pub use error::{Result, SyncError};
pub use sync::{DocBlockSync, SyncOutcome};
pub use types::{CapabilityFlags, ClassSnapshot, DiffEntry, DiffKind, MethodInfo, ParameterInfo};

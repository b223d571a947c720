//! Gentree: composable code generators over a conflict-checked virtual file tree.
//!
//! Generators turn typed inputs into [`File`]s. A [`Pipeline`] runs them in order, passes
//! every file through its post-processors and collects the result into a [`FileTree`].
//! The tree is then written to disk, or verified against what is already there so a build
//! can fail when committed generated code is stale.
//!
//! ```ignore
//! let mut pipeline = gentree::Pipeline::with_namer("models", |m: &Model| m.name.clone());
//! pipeline.append_one_to_one(RustStructGen).append_many_to_one(ModIndexGen);
//! let tree = pipeline.generate(&models)?;
//! if check_only {
//!     tree.verify("src/generated")?.into_result()?;
//! } else {
//!     tree.write("src/generated")?;
//! }
//! ```

pub mod adapt;
pub mod engine;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod sync;
pub mod tree;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use adapt::{Adapt, adapt_many_to_many, adapt_many_to_one, adapt_one_to_many, adapt_one_to_one};
pub use error::{GenError, MultiError};
pub use generator::{
    FnGenerator, Generator, ManyToMany, ManyToOne, Named, OneToMany, OneToOne, Shape,
};
pub use pipeline::{FileMapper, Pipeline};
pub use sync::{CancelToken, SyncOpts, Verification};
pub use tree::FileTree;

pub use anyhow::Error;
/// Result alias for generator and post-processor bodies.
pub type Result<T> = std::result::Result<T, Error>;

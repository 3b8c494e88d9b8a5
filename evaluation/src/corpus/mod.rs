//! Sample corpus
//!
//! A corpus is a directory tree where every sample lives in its own
//! directory, named by the sample identifier, next to a
//! `sample_metadata.yaml` descriptor:
//!
//! ```text
//! corpus/
//! ├── 0a1b2c.../
//! │   ├── sample_metadata.yaml   # issue: ..., log_file: build.log
//! │   └── build.log
//! └── nested/3d4e5f.../
//!     └── sample_metadata.yaml
//! ```

pub mod sample;
pub mod walker;

pub use sample::SampleRecord;
pub use walker::{CorpusWalker, DESCRIPTOR_FILE_NAME};

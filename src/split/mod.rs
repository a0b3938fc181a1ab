//! Region-aware splitting of large CSV dumps.
//!
//! - `splitter`: the streaming grouping and rotation algorithm
//! - `writer`: atomic, encoding-aware output files
//! - `region_token`: filename-safe tokens for region values

mod region_token;
mod splitter;
mod writer;

pub use region_token::region_token;
pub use splitter::{
    split_file, SplitConfig, SplitSummary, DEFAULT_GROUP_COLUMN, DEFAULT_ROWS_PER_FILE_LIMIT,
    MOBILE_COLUMN,
};
pub use writer::{OutputEncoding, RegionFileWriter};

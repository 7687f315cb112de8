pub mod traits;
pub mod feed_list;
pub mod scratch_dir;

pub use traits::FeedListRepository;
pub use feed_list::FeedListFile;
pub use scratch_dir::{ArtifactKey, ScratchDir};

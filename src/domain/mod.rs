pub mod feed;
pub mod item;
pub mod snapshot;

pub use feed::FeedSource;
pub use item::{Item, UNTITLED};
pub use snapshot::Snapshot;

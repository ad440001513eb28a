//! # Newswire
//!
//! A run-once syndication feed aggregator.
//!
//! ## Architecture
//!
//! Each invocation runs the same pipeline from left to right:
//!
//! ```text
//! Config → {Fetch → Normalize → Filter} per source → Merge → Rank → Truncate → Write/Publish
//! ```
//!
//! Nothing is kept between runs except the previous snapshot, which is
//! read once to decide whether the new one needs publishing, and the
//! last-run marker.
//!
//! ## Quick Start
//!
//! ```bash
//! # feeds.json in the working directory, writes news.json and .last_run
//! newswire
//!
//! # Commit and push the snapshot when its content changed
//! newswire --git
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Run context and error types
//! - [`cli`]: Command-line flags and the run-once command
//! - [`config`]: Feed list loading and validation
//! - [`domain`]: Core models (FeedSource, Item, Snapshot)
//! - [`fetcher`]: HTTP retrieval and per-source collection
//! - [`normalizer`]: Feed parsing and entry normalization
//! - [`pipeline`]: Recency window, merge, dedupe and ranking
//! - [`store`]: Snapshot persistence with change detection
//! - [`publish`]: Change-triggered publishing

/// Run context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together fetcher,
/// clock, publisher and store for a single run.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Injectable wall-clock.
pub mod clock;

/// JSON configuration: feed list (plain URLs or objects) and tunables.
pub mod config;

/// Core domain models.
///
/// - [`FeedSource`](domain::FeedSource): a configured feed
/// - [`Item`](domain::Item): canonical record with a SHA-1 derived id
/// - [`Snapshot`](domain::Snapshot): the output document
pub mod domain;

/// Feed retrieval.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching feed bytes
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`FeedCollector`](fetcher::FeedCollector): per-source isolation, polite spacing
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Reads RSS 0.9x/1.0/2.0, Atom 0.3/1.0 and JSON Feed 1.0 through feed-rs
/// and maps entries to [`Item`](domain::Item)s.
pub mod normalizer;

/// Recency filtering, merging, deduplication and ranking.
pub mod pipeline;

/// Publishing collaborators invoked when the snapshot changed.
pub mod publish;

/// Snapshot persistence.
///
/// - [`SnapshotStore`](store::SnapshotStore): Trait for the durable files
/// - [`FileStore`](store::FileStore): atomic file-based implementation
/// - [`SnapshotWriter`](store::SnapshotWriter): truncate, write, detect change, publish
pub mod store;

//! # bulkimg
//!
//! Bulk image downloader: for each keyword, search Bing Images and save the
//! first candidate that downloads, decodes, and passes the requested format
//! and quality checks.
//!
//! # Architecture: One Sequential Pipeline
//!
//! ```text
//! keyword → search (candidate URLs) → fetch each candidate until one saves
//!         → record outcome → next keyword → final report
//! ```
//!
//! Everything runs on one thread, one request at a time, with randomized
//! pauses between requests. There is deliberately no concurrency, no
//! persistent state, and no resume support — the tool is a polite scraper,
//! and the pacing is part of that politeness.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`keyword`] | keyword cleaning, comma-list parsing, filename schemes |
//! | [`quality`] | resolution tiers — pure pixel-count classification |
//! | [`format`] | format/transparency policies and saved-file extensions |
//! | [`transport`] | blocking HTTP seam: `ureq` agent behind the [`transport::Transport`] trait |
//! | [`search`] | Bing result-markup scraping into an ordered candidate list |
//! | [`fetch`] | download → decode → validate → save → integrity re-check |
//! | [`run`] | the keyword loop: retry by candidate substitution, pacing, report |
//! | [`output`] | pure `format_*` line builders plus `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Outcomes, Not Exceptions
//!
//! A fetch attempt answers with a [`fetch::DownloadOutcome`] value for every
//! failure mode — bad status, undecodable body, rejected quality or format,
//! post-save corruption. The orchestrator's retry loop is a plain bounded
//! iteration with early exit on the first `Saved`.
//!
//! ## Validate After Writing
//!
//! A saved file is re-opened and fully decoded before it counts. If that
//! re-decode fails the file is deleted on the spot, so a run never leaves a
//! corrupt or partial image behind.
//!
//! ## One Network Seam
//!
//! Both the search request and every image download go through the
//! [`transport::Transport`] trait. The whole pipeline — scraping, fetching,
//! the full keyword loop — is tested against a scripted mock transport with
//! images synthesized in memory; no test touches the network.

pub mod fetch;
pub mod format;
pub mod keyword;
pub mod output;
pub mod quality;
pub mod run;
pub mod search;
pub mod transport;

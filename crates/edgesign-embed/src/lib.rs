#![forbid(unsafe_code)]
//! Adapters for host applications that embed signed download links.

pub mod fallback;
pub mod link;

pub use fallback::{sign_or_fallback, Fallback, SigningOutcome};
pub use link::{render_download_link, DownloadLink};

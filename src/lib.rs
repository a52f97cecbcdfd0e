//! Tic-tac-toe engine that chooses its moves with Monte Carlo Tree Search.
//!
//! - [`game`] holds the rules: the bitboard position, legal moves and wins.
//! - [`search`] holds the MCTS: random playouts, the node arena and the
//!   time-budgeted controller that reuses its tree between moves.
//! - [`Engine`] wires the search to line-based input and output.

// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![deny(clippy::perf)]

pub mod engine;
pub mod error;
pub mod game;
pub mod search;

use std::io::Write;

pub use engine::Engine;
pub use error::Error;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the engine version and the build type on startup.
///
/// # Errors
///
/// If writing to `out` fails.
pub fn print_engine_info(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Oxo tic-tac-toe engine {}", engine_version())?;
    writeln!(out, "Release build: {}", !shadow_rs::is_debug())?;
    if !shadow_rs::git_clean() {
        writeln!(out, "Warning: built with uncommitted changes")?;
    }
    writeln!(out, "Moves are \"column row\", \"-1 -1\" lets the engine start.")?;
    writeln!(out)
}

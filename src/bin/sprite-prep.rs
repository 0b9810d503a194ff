//! Sprite preparation CLI tool
//!
//! Removes the background from one image, optionally resizes it, and writes
//! an RGBA PNG ready for use as a game sprite.

#[cfg(feature = "cli")]
use sprite_prep::cli;

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::main().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}

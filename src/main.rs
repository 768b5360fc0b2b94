//! Kodegen Bundler Android - release pipeline for Cordova Android projects.
//!
//! This binary builds a Cordova project, signs the release artifact with a
//! persisted keystore identity and installs or opens the result.

use std::process;

use kodegen_bundler_android::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

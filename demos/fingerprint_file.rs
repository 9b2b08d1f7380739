//! File fingerprinting example.
//!
//! Opens a file through tokio, adapts it to a fragment stream and derives
//! its fingerprint and file key.
//!
//! Run with:
//!     cargo run --example fingerprint_file -- /path/to/file

use std::env;

use chunkprint::{FileHandle, FingerprintConfig, ReaderFragments};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    let size = tokio::fs::metadata(&path).await?.len();
    println!("Fingerprinting file: {} ({} bytes)\n", path, size);

    let opener = {
        let path = path.clone();
        move || {
            let path = path.clone();
            async move {
                let file = tokio::fs::File::open(&path).await?;
                Ok::<_, std::io::Error>(ReaderFragments::new(file.compat()))
            }
        }
    };

    let handle = FileHandle::new(opener, size, FingerprintConfig::default());

    let fingerprint = handle.fingerprint().await?;
    println!("Fingerprint: {}", fingerprint);

    // Cached: does not reopen the file
    let key = handle
        .compute_file_key(&b"demo-owner"[..], vec![0u8; 32], path.into_bytes())
        .await?;
    println!("File key:    {}", key);

    Ok(())
}

//! In-memory fingerprinting example.
//!
//! Shows the chunk sequence both reassemblers produce and the resulting
//! fingerprint.
//!
//! Run with:
//!     cargo run --example fingerprint_bytes

use chunkprint::{
    Blake3MerkleTree, FingerprintConfig, GeneralReassembler, Reassembler, RecordingSink,
    ZeroCopyBatchReassembler, fingerprint_reader,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();

    // Same bytes, split into reads of different sizes
    let mut general = GeneralReassembler::new();
    let mut general_sink = RecordingSink::new();
    for fragment in data.chunks(600) {
        general.feed(fragment, &mut general_sink)?;
    }
    general.finish(&mut general_sink)?;

    let mut batched = ZeroCopyBatchReassembler::new(4096);
    let mut batched_sink = RecordingSink::new();
    for fragment in data.chunks(7000) {
        batched.feed(fragment, &mut batched_sink)?;
    }
    batched.finish(&mut batched_sink)?;

    println!("General (600-byte reads):");
    for chunk in general_sink.chunks() {
        println!("  {}", chunk);
    }

    println!("\nZeroCopyBatch (7000-byte reads):");
    println!("  batched pushes: {:?}", batched_sink.batch_lens());
    println!("  single pushes:  {}", batched_sink.single_calls());

    assert_eq!(general_sink.boundaries(), batched_sink.boundaries());

    let fingerprint = fingerprint_reader(
        &data[..],
        &FingerprintConfig::default(),
        Blake3MerkleTree::new(),
    )?;
    println!("\nFingerprint: {}", fingerprint);

    Ok(())
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use chunkprint::{
    CHUNK_SIZE, GeneralReassembler, MerkleAccumulator, Reassembler, RecordingSink,
    ZeroCopyBatchReassembler,
};

fn run<R: Reassembler>(mut reassembler: R, data: &[u8], cuts: &[u8]) -> RecordingSink {
    let mut sink = RecordingSink::new();
    let mut pos = 0;
    let mut i = 0;
    while pos < data.len() {
        // Fragment sizes up to ~2.5 chunks, driven by the input
        let step = cuts.get(i % cuts.len().max(1)).map_or(data.len(), |&b| b as usize * 10 + 1);
        let end = (pos + step).min(data.len());
        reassembler.feed(&data[pos..end], &mut sink).unwrap();
        pos = end;
        i += 1;
    }
    reassembler.finish(&mut sink).unwrap();
    sink
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>, u16)| {
    let (data, cuts, batch) = input;

    let general = run(GeneralReassembler::new(), &data, &cuts);
    let batched = run(ZeroCopyBatchReassembler::new(batch as usize * 16), &data, &cuts);

    // Verify: every chunk but the last is full, the last is non-empty
    let boundaries = general.boundaries();
    for (i, &(offset, len)) in boundaries.iter().enumerate() {
        assert_eq!(offset, (i * CHUNK_SIZE) as u64);
        if i + 1 < boundaries.len() {
            assert_eq!(len, CHUNK_SIZE);
        } else {
            assert!(len > 0 && len <= CHUNK_SIZE);
        }
    }

    // Verify: both variants see identical chunks
    assert_eq!(batched.boundaries(), boundaries);
    assert_eq!(general.concat(), data);
    assert_eq!(batched.concat(), data);
    assert_eq!(general.root(), batched.root());

    // Verify: batches are whole chunks
    for &len in batched.batch_lens() {
        assert_eq!(len % CHUNK_SIZE, 0);
    }
});

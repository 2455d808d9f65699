#![no_main]

use libfuzzer_sys::fuzz_target;
use linesrs::{DecodePolicy, LineAccumulator, LineConfig, MappedScanner};

fuzz_target!(|input: (Vec<u8>, u8)| {
    let (data, step) = input;
    let step = usize::from(step).max(1);
    let config = LineConfig::default().with_decode_policy(DecodePolicy::Lossy);

    // Whole input in one chunk
    let mut acc = LineAccumulator::new(config);
    let mut whole: Vec<_> = acc.ingest(&data);
    whole.extend(acc.finalize());
    let whole: Vec<String> = whole.into_iter().map(|l| l.unwrap().text).collect();

    // Same input in `step`-sized chunks
    let mut acc = LineAccumulator::new(config);
    let mut stepped = Vec::new();
    for chunk in data.chunks(step) {
        stepped.extend(acc.ingest(chunk));
    }
    let pending = acc.pending_len();
    assert!(pending <= data.len());
    stepped.extend(acc.finalize());
    let stepped: Vec<String> = stepped.into_iter().map(|l| l.unwrap().text).collect();

    // Verify: chunking never changes the lines
    assert_eq!(whole, stepped);

    // Verify: the mapped scanner agrees with the accumulator
    let scanned: Vec<String> = MappedScanner::new(&data, DecodePolicy::Lossy)
        .map(|l| l.unwrap().text)
        .collect();
    assert_eq!(whole, scanned);

    // Verify: one line per separator, plus the tail if any
    let separators = data.iter().filter(|&&b| b == b'\n').count();
    let tail = usize::from(!data.is_empty() && !data.ends_with(b"\n"));
    assert_eq!(whole.len(), separators + tail);
});

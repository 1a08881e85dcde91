#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lexscan::search::{Algorithm, MAX_PATTERN_LENGTH};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    pattern: &'a [u8],
    text: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let kmp = Algorithm::Kmp.search(input.text, input.pattern);
    let shift_and = Algorithm::ShiftAnd.search(input.text, input.pattern);
    let shift_or = Algorithm::ShiftOr.search(input.text, input.pattern);

    if input.pattern.is_empty() {
        assert!(kmp.is_err() && shift_and.is_err() && shift_or.is_err());
        return;
    }

    let kmp: Vec<usize> = kmp.unwrap().positions().collect();
    if input.pattern.len() > MAX_PATTERN_LENGTH {
        assert!(shift_and.is_err() && shift_or.is_err());
        return;
    }

    // All three automata must find the same matches
    let shift_and: Vec<usize> = shift_and.unwrap().positions().collect();
    let shift_or: Vec<usize> = shift_or.unwrap().positions().collect();
    assert_eq!(kmp, shift_and);
    assert_eq!(kmp, shift_or);
});

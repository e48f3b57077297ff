//! Template fuzz target: feed arbitrary text to the builder.
//! Parsing must not panic, every parsed width must be within the field limit, and a
//! complete builder must encode to exactly `encoded_len` bytes.
//! Build with: cargo fuzz run template_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let builder = fieldpack::Builder::with_template(s);
    for field in builder.iter() {
        assert!(field.size > 0 && field.size <= fieldpack::parser::MAX_FIELD_SIZE);
    }
    if builder.is_correct() {
        let raw = builder.encode().expect("complete builder encodes");
        assert_eq!(Some(raw.len()), builder.encoded_len());
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run template_fuzz");
}

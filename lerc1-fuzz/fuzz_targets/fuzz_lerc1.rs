#![no_main]

use lerc1::{DecodeSettings, Lerc1};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let settings = DecodeSettings {
        max_pixels: Some(1 << 24),
    };

    let mut lerc = Lerc1::with_settings(data, &settings);

    if let Some(samples) = lerc.decode() {
        let header = lerc.header().unwrap();
        assert_eq!(samples.len() as u64, header.num_pixels());
    }
});

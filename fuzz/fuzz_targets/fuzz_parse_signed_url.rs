#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(url) = std::str::from_utf8(data) {
        if let Ok(parts) = edgesign_sign::parse_signed_url(url) {
            assert!(!parts.resource.is_empty());
            assert!(url.starts_with(&parts.resource));
        }
    }
});

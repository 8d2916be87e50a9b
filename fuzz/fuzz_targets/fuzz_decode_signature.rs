#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let encoded = edgesign_sign::encoding::encode_signature(data);
    assert!(!encoded.contains(['+', '=', '/']));
    assert_eq!(
        edgesign_sign::encoding::decode_signature(&encoded).as_deref(),
        Ok(data)
    );
});

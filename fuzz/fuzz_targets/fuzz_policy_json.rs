#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, i64)| {
    let (resource, expires) = input;
    let json = edgesign_core::AccessPolicy::new(resource.as_str(), expires).to_json();
    let value: serde_json::Value = serde_json::from_str(&json).expect("policy must be valid JSON");
    assert_eq!(value["Statement"][0]["Resource"], resource.as_str());
    assert_eq!(value["Statement"][0]["Condition"]["DateLessThan"]["AWS:EpochTime"], expires);
});

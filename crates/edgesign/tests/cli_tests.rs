//! CLI integration: each subcommand, its JSON output, and its failure modes.

use test_helpers::{
    edgesign_bin, edgesign_json, fixture, run, run_failing, run_ok, signed_url_at,
};

const RESOURCE: &str = "https://cdn.example.com/file.pdf";
const NOW: i64 = 1700000000;

// ── Sign ────────────────────────────────────────────────────────

#[test]
fn sign_json_reports_expiry_and_key() {
    let settings = fixture("settings.json");
    let v = edgesign_json(
        &[
            "sign",
            RESOURCE,
            "--settings",
            settings.as_str(),
            "--now",
            "1700000000",
            "--json",
        ],
        0,
    );
    assert_eq!(v[0]["expires"], 1700000300);
    assert_eq!(v[0]["key_pair_id"], "APKAEXAMPLE");
    assert_eq!(v[0]["algorithm"], "rsa-sha1");

    let url = v[0]["url"].as_str().unwrap();
    let signature = url
        .split("Signature=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap();
    assert!(!signature.is_empty());
    assert!(!signature.contains(['+', '=', '/']));
}

#[test]
fn sign_reads_settings_from_env() {
    let out = edgesign_bin()
        .env("EDGESIGN_SETTINGS", fixture("settings.json"))
        .args(["sign", RESOURCE, "--now", "1700000000"])
        .output()
        .expect("failed to run edgesign");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Expires=1700000300"));
}

#[test]
fn sign_resource_ending_in_question_mark() {
    let url = signed_url_at("https://x/f.pdf?", &fixture("settings.json"), NOW);
    assert!(url.starts_with("https://x/f.pdf?&Expires=1700000300&Signature="));
}

#[test]
fn sign_with_bad_key_fails_without_url() {
    let settings = fixture("settings_bad_key.json");
    let stderr = run_failing(&["sign", RESOURCE, "--settings", settings.as_str()]);
    assert!(stderr.contains("invalid key material"));
}

#[test]
fn sign_with_zero_lifetime_is_configuration_error() {
    let settings = fixture("settings_zero_lifetime.json");
    let stderr = run_failing(&["sign", RESOURCE, "--settings", settings.as_str()]);
    assert!(stderr.contains("lifetime must be positive"));
}

#[test]
fn sign_with_missing_settings_names_path() {
    let settings = fixture("nope.json");
    let stderr = run_failing(&["sign", RESOURCE, "--settings", settings.as_str()]);
    assert!(stderr.contains("nope.json"));
}

#[test]
fn sign_with_inline_pem_in_temp_settings() {
    let dir = tempfile::tempdir().unwrap();
    let pem = std::fs::read_to_string(fixture("keys/rsa_pkcs8.pem")).unwrap();
    let settings = serde_json::json!({
        "pem": pem,
        "key_pair_id": "K2",
        "lifetime_minutes": 10,
    });
    let path = dir.path().join("settings.json");
    std::fs::write(&path, settings.to_string()).unwrap();

    let v = edgesign_json(
        &[
            "sign",
            RESOURCE,
            "--settings",
            path.to_str().unwrap(),
            "--now",
            "1700000000",
            "--json",
        ],
        0,
    );
    assert_eq!(v[0]["expires"], 1700000600);
    assert_eq!(v[0]["key_pair_id"], "K2");
}

// ── Verify ──────────────────────────────────────────────────────

fn verify_json(url: &str, algorithm: &str, now: &str, expected_exit: i32) -> serde_json::Value {
    let pubkey = fixture("keys/rsa_public.pem");
    edgesign_json(
        &[
            "verify",
            url,
            "--pubkey",
            pubkey.as_str(),
            "--algorithm",
            algorithm,
            "--now",
            now,
            "--json",
        ],
        expected_exit,
    )
}

#[test]
fn verify_round_trip() {
    let url = signed_url_at(RESOURCE, &fixture("settings.json"), NOW);
    let v = verify_json(&url, "rsa-sha1", "1700000100", 0);
    assert_eq!(v["valid"], true);
    assert_eq!(v["resource"], RESOURCE);
    assert_eq!(v["expires"], 1700000300);
    assert_eq!(v["key_pair_id"], "APKAEXAMPLE");
}

#[test]
fn verify_sha256_needs_matching_algorithm() {
    let url = signed_url_at(RESOURCE, &fixture("settings_sha256.json"), NOW);
    assert_eq!(verify_json(&url, "rsa-sha256", "1700000100", 0)["valid"], true);

    let bad = verify_json(&url, "rsa-sha1", "1700000100", 1);
    assert_eq!(bad["valid"], false);
    assert_eq!(bad["error"], "signature does not match policy");
}

#[test]
fn verify_expired_url() {
    let url = signed_url_at(RESOURCE, &fixture("settings.json"), NOW);
    let v = verify_json(&url, "rsa-sha1", "1700000300", 1);
    assert_eq!(v["error"], "signed URL expired at 1700000300");
}

#[test]
fn verify_with_other_key_fails() {
    let url = signed_url_at(RESOURCE, &fixture("settings.json"), NOW);
    let pubkey = fixture("keys/other_public.pem");
    let stderr = run_failing(&[
        "verify",
        url.as_str(),
        "--pubkey",
        pubkey.as_str(),
        "--now",
        "1700000100",
    ]);
    assert!(stderr.contains("verification failed"));
}

#[test]
fn verify_rejects_unknown_algorithm() {
    let pubkey = fixture("keys/rsa_public.pem");
    let out = run(&[
        "verify",
        "https://x/f?Expires=1&Signature=a&Key-Pair-Id=K",
        "--pubkey",
        pubkey.as_str(),
        "--algorithm",
        "ecdsa",
    ]);
    assert_ne!(out.code, Some(0));
    assert!(out.stderr.contains("unknown algorithm"));
}

// ── Link ────────────────────────────────────────────────────────

#[test]
fn link_renders_proxy_anchor() {
    let settings = fixture("settings.json");
    let html = run_ok(&[
        "link",
        RESOURCE,
        "--settings",
        settings.as_str(),
        "--label",
        "Get the PDF",
        "--filename",
        "file.pdf",
        "--now",
        "1700000000",
    ]);
    assert!(html.starts_with(
        "<p><a href='/wp-content/plugins/wordpress-aws-signed-pdf-download/download.php?filename=file.pdf&downloadUrl=https%3A%2F%2Fcdn.example.com%2Ffile.pdf%3FExpires%3D1700000300%26Signature%3D"
    ));
    assert!(html.trim().ends_with("%26Key-Pair-Id%3DAPKAEXAMPLE'>Get the PDF</a></p>"));
}

#[test]
fn link_uses_shortcode_defaults() {
    let settings = fixture("settings.json");
    let html = run_ok(&[
        "link",
        RESOURCE,
        "--settings",
        settings.as_str(),
        "--proxy-base",
        "/dl",
    ]);
    assert!(html.contains("href='/dl/download.php?filename=download.txt&downloadUrl="));
    assert!(html.contains(">Download Link</a>"));
}

#[test]
fn link_with_bad_key_fails_by_default() {
    let settings = fixture("settings_bad_key.json");
    run_failing(&["link", RESOURCE, "--settings", settings.as_str()]);
}

#[test]
fn link_allow_unsigned_degrades_and_warns() {
    let settings = fixture("settings_bad_key.json");
    let out = run(&[
        "link",
        RESOURCE,
        "--settings",
        settings.as_str(),
        "--allow-unsigned",
    ]);
    assert_eq!(out.code, Some(0));
    assert!(out
        .stdout
        .contains("downloadUrl=https%3A%2F%2Fcdn.example.com%2Ffile.pdf'"));
    assert!(!out.stdout.contains("Signature"));
    assert!(out.stderr.contains("signing failed, serving unsigned URL"));
    assert!(out.stderr.contains("linked UNSIGNED"));
}

#[test]
fn link_allow_unsigned_still_rejects_bad_configuration() {
    let settings = fixture("settings.json");
    let stderr = run_failing(&["link", "", "--settings", settings.as_str(), "--allow-unsigned"]);
    assert!(stderr.contains("resource must not be empty"));
    assert!(!stderr.contains("serving unsigned URL"));
}

// ── Settings ────────────────────────────────────────────────────

#[test]
fn settings_json_is_redacted() {
    let settings = fixture("settings.json");
    let v = edgesign_json(&["settings", "--settings", settings.as_str(), "--json"], 0);
    assert_eq!(v["pem"], "<redacted>");
    assert_eq!(v["pem_file"], "keys/rsa_pkcs1.pem");
    assert_eq!(v["lifetime_minutes"], 5);
    assert_eq!(v["algorithm"], "rsa-sha1");
}

#[test]
fn settings_rejects_unusable_key() {
    let settings = fixture("settings_bad_key.json");
    let stderr = run_failing(&["settings", "--settings", settings.as_str()]);
    assert!(stderr.contains("unusable key"));
}

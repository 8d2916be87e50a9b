//! CloudFront's URL-safe base64 alphabet.
//!
//! Standard base64 with `+` → `-`, `=` → `_`, `/` → `~`. This is not the
//! RFC 4648 URL-safe alphabet and not percent-encoding; the edge rejects
//! signatures in either of those forms.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use edgesign_core::VerifyError;

pub fn encode_signature(signature: &[u8]) -> String {
    STANDARD
        .encode(signature)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '=' => '_',
            '/' => '~',
            c => c,
        })
        .collect()
}

pub fn decode_signature(encoded: &str) -> Result<Vec<u8>, VerifyError> {
    if let Some(c) = encoded.chars().find(|c| matches!(c, '+' | '=' | '/')) {
        return Err(VerifyError::MalformedUrl(format!(
            "signature contains {c:?}, which the URL alphabet never emits"
        )));
    }
    let standard: String = encoded
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '=',
            '~' => '/',
            c => c,
        })
        .collect();
    STANDARD
        .decode(standard)
        .map_err(|e| VerifyError::MalformedUrl(format!("invalid signature encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_three_characters() {
        // 0xfb 0xff encodes to "+/8=" in standard base64.
        assert_eq!(encode_signature(&[0xfb, 0xff]), "-~8_");
    }

    #[test]
    fn never_emits_unsafe_characters() {
        let bytes: Vec<u8> = (0..=255).collect();
        for len in 0..bytes.len() {
            let encoded = encode_signature(&bytes[..len]);
            assert!(!encoded.contains(['+', '=', '/']), "{encoded}");
        }
    }

    #[test]
    fn decode_reverses_encode() {
        let data = [0xfb, 0xff, 0x00, 0x10];
        assert_eq!(decode_signature(&encode_signature(&data)).unwrap(), data);
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(matches!(
            decode_signature("+/8="),
            Err(VerifyError::MalformedUrl(_))
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_signature("!!!").is_err());
    }
}

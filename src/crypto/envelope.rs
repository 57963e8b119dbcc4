//! AES-256-GCM ciphertext envelopes
//!
//! Turns one UTF-8 plaintext string into a self-contained textual envelope
//! and back. Each encryption generates a unique random nonce.
//!
//! The envelope format is `v1.<nonce>.<ciphertext>`: a version tag for
//! future algorithm upgrades, then the nonce and the ciphertext with its
//! authentication tag, both standard base64. The `.` delimiter is outside
//! the base64 alphabet, so the envelope needs no escaping and is safe to
//! store in any plain text column.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::crypto::key::MasterKey;
use crate::error::{ShieldError, ShieldResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Version tag of the current envelope format
const VERSION_TAG: &str = "v1";

/// Delimiter between envelope sections
const DELIMITER: char = '.';

/// Encrypts and decrypts single string payloads under the master key
///
/// The key enters through [`Codec::new`] and lives only inside the cipher;
/// it is zeroed when the consumed [`MasterKey`] drops.
pub struct Codec {
    cipher: Aes256Gcm,
}

impl Codec {
    /// Build a codec from the master key, consuming it
    pub fn new(key: MasterKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt a plaintext string into an envelope
    ///
    /// Generates a fresh random nonce per call; encrypting the same
    /// plaintext twice yields two different envelopes.
    pub fn encode(&self, plaintext: &str) -> ShieldResult<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| ShieldError::ValueFormat("plaintext exceeds cipher limits".into()))?;

        Ok(format!(
            "{VERSION_TAG}{DELIMITER}{}{DELIMITER}{}",
            STANDARD.encode(nonce_bytes),
            STANDARD.encode(&ciphertext)
        ))
    }

    /// Decrypt an envelope back to its plaintext string
    ///
    /// Fails with [`ShieldError::MalformedEnvelope`] when the envelope
    /// cannot be parsed or carries an unsupported version tag, and with
    /// [`ShieldError::Authentication`] when the ciphertext does not verify.
    /// Never returns partially decrypted data.
    pub fn decode(&self, envelope: &str) -> ShieldResult<String> {
        let mut sections = envelope.splitn(3, DELIMITER);
        let (Some(version), Some(nonce_b64), Some(ciphertext_b64)) =
            (sections.next(), sections.next(), sections.next())
        else {
            return Err(ShieldError::MalformedEnvelope(
                "expected version, nonce and ciphertext sections".into(),
            ));
        };

        if version != VERSION_TAG {
            return Err(ShieldError::MalformedEnvelope(
                "unsupported envelope version".into(),
            ));
        }

        let nonce_bytes = STANDARD
            .decode(nonce_b64)
            .map_err(|_| ShieldError::MalformedEnvelope("invalid nonce encoding".into()))?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(ShieldError::MalformedEnvelope(format!(
                "invalid nonce size: expected {}, got {}",
                NONCE_SIZE,
                nonce_bytes.len()
            )));
        }
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = STANDARD
            .decode(ciphertext_b64)
            .map_err(|_| ShieldError::MalformedEnvelope("invalid ciphertext encoding".into()))?;

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| ShieldError::Authentication)?;

        String::from_utf8(plaintext).map_err(|_| {
            ShieldError::MalformedEnvelope("decrypted payload is not valid UTF-8".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> Codec {
        Codec::new(MasterKey::from_bytes([7u8; 32]))
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = test_codec();
        let envelope = codec.encode("1500.75").unwrap();
        assert_eq!(codec.decode(&envelope).unwrap(), "1500.75");
    }

    #[test]
    fn test_envelope_structure() {
        let codec = test_codec();
        let envelope = codec.encode("120000").unwrap();
        let sections: Vec<&str> = envelope.split('.').collect();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0], "v1");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let codec = test_codec();
        let first = codec.encode("1000").unwrap();
        let second = codec.encode("1000").unwrap();
        assert_ne!(first, second);
        assert_eq!(codec.decode(&first).unwrap(), codec.decode(&second).unwrap());
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let codec = test_codec();
        let envelope = codec.encode("250000").unwrap();

        let (prefix, ciphertext_b64) = envelope.rsplit_once('.').unwrap();
        let mut ciphertext = STANDARD.decode(ciphertext_b64).unwrap();
        ciphertext[0] ^= 0xFF;
        let tampered = format!("{}.{}", prefix, STANDARD.encode(&ciphertext));

        let err = codec.decode(&tampered).unwrap_err();
        assert!(matches!(err, ShieldError::Authentication));
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let envelope = test_codec().encode("5000").unwrap();
        let other = Codec::new(MasterKey::from_bytes([9u8; 32]));
        let err = other.decode(&envelope).unwrap_err();
        assert!(matches!(err, ShieldError::Authentication));
    }

    #[test]
    fn test_plain_string_is_malformed() {
        let codec = test_codec();
        let err = codec.decode("just some stored note").unwrap_err();
        assert!(matches!(err, ShieldError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_unsupported_version_is_malformed() {
        let codec = test_codec();
        let envelope = codec.encode("1").unwrap();
        let bumped = envelope.replacen("v1", "v9", 1);
        let err = codec.decode(&bumped).unwrap_err();
        assert!(matches!(err, ShieldError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_bad_base64_sections_are_malformed() {
        let codec = test_codec();
        let err = codec.decode("v1.!!!.!!!").unwrap_err();
        assert!(matches!(err, ShieldError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_truncated_envelope_is_malformed() {
        let codec = test_codec();
        let envelope = codec.encode("98765").unwrap();
        // Dropping one trailing character leaves the ciphertext section
        // with a base64 length no decoder accepts
        let truncated = &envelope[..envelope.len() - 1];
        let err = codec.decode(truncated).unwrap_err();
        assert!(matches!(err, ShieldError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_short_nonce_is_malformed() {
        let codec = test_codec();
        let envelope = format!("v1.{}.{}", STANDARD.encode([0u8; 4]), STANDARD.encode([0u8; 20]));
        let err = codec.decode(&envelope).unwrap_err();
        assert!(matches!(err, ShieldError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let codec = test_codec();
        let envelope = codec.encode("").unwrap();
        assert_eq!(codec.decode(&envelope).unwrap(), "");
    }
}

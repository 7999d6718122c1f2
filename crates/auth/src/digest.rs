//! Digest and text-encoding helpers for stored credentials.
//!
//! A digested secret is `Hash(algorithm, "principal:realm:password")`,
//! rendered as hexadecimal or base64 in the credential file.

use core::str::FromStr;

use base64::Engine;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use usersroles_core::{Realm, StoreError};

/// Hash algorithm applied to `principal:realm:password`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[default]
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    pub fn hash(self, input: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => Md5::digest(input).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl core::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "MD5" => Ok(DigestAlgorithm::Md5),
            "SHA-256" | "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA-384" | "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA-512" | "SHA512" => Ok(DigestAlgorithm::Sha512),
            other => Err(StoreError::config(format!(
                "unknown digest algorithm '{other}'"
            ))),
        }
    }
}

/// Text encoding of a stored digest.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
}

impl Encoding {
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => hex::encode(bytes),
            Encoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode a rendered digest. Hex input is accepted in either case.
    pub fn decode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Hex => hex::decode(text).ok(),
            Encoding::Base64 => base64::engine::general_purpose::STANDARD.decode(text).ok(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Hex => "HEX",
            Encoding::Base64 => "BASE64",
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HEX" => Ok(Encoding::Hex),
            "BASE64" | "BASE_64" => Ok(Encoding::Base64),
            other => Err(StoreError::config(format!("unknown digest encoding '{other}'"))),
        }
    }
}

/// Algorithm + encoding pair used for digested credential files.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub algorithm: DigestAlgorithm,
    pub encoding: Encoding,
}

impl DigestConfig {
    pub fn new(algorithm: DigestAlgorithm, encoding: Encoding) -> Self {
        Self { algorithm, encoding }
    }

    /// Raw digest bytes for a credential.
    pub fn credential_digest(&self, principal: &str, realm: &Realm, password: &str) -> Vec<u8> {
        let input = format!("{principal}:{}:{password}", realm.as_str());
        self.algorithm.hash(input.as_bytes())
    }

    /// Rendered digest, as it appears in a credential file.
    pub fn render_credential(&self, principal: &str, realm: &Realm, password: &str) -> String {
        self.encoding
            .encode(&self.credential_digest(principal, realm, password))
    }

    /// Rendered digest of an arbitrary string (no realm scoping).
    pub fn render(&self, input: &str) -> String {
        self.encoding.encode(&self.algorithm.hash(input.as_bytes()))
    }
}

/// Fixed-length fingerprint used to compare variable-length secrets.
pub(crate) fn fingerprint(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Constant-time equality for equal-length byte strings.
pub(crate) fn ct_equal(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn md5_hex_matches_known_vector() {
        let config = DigestConfig::default();
        assert_eq!(config.render(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(config.render("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn md5_base64_matches_known_vector() {
        let config = DigestConfig::new(DigestAlgorithm::Md5, Encoding::Base64);
        assert_eq!(config.render("abc"), "kAFQmDzST7DWlj99KOF/cg==");
    }

    #[test]
    fn sha256_hex_matches_known_vector() {
        let config = DigestConfig::new(DigestAlgorithm::Sha256, Encoding::Hex);
        assert_eq!(
            config.render("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn credential_digest_mixes_in_realm() {
        let config = DigestConfig::default();
        let realm = Realm::new("realm");
        assert_eq!(
            config.render_credential("anil", &realm, "anilPwd"),
            config.render("anil:realm:anilPwd")
        );
        assert_ne!(
            config.render_credential("anil", &realm, "anilPwd"),
            config.render_credential("anil", &Realm::new("other"), "anilPwd")
        );
    }

    #[test]
    fn output_len_matches_hash() {
        for algorithm in [
            DigestAlgorithm::Md5,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            assert_eq!(algorithm.hash(b"x").len(), algorithm.output_len());
        }
    }

    #[test]
    fn hex_decode_accepts_upper_case() {
        let lower = Encoding::Hex.decode("900150983cd24fb0d6963f7d28e17f72").unwrap();
        let upper = Encoding::Hex.decode("900150983CD24FB0D6963F7D28E17F72").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn malformed_input_does_not_decode() {
        assert!(Encoding::Hex.decode("xyz").is_none());
        assert!(Encoding::Hex.decode("abc").is_none());
        assert!(Encoding::Base64.decode("not base64!").is_none());
    }

    #[test]
    fn names_parse_loosely() {
        assert_eq!("md5".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Md5);
        assert_eq!("sha_256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert_eq!("SHA512".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha512);
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert!("crc32".parse::<DigestAlgorithm>().is_err());
        assert!("octal".parse::<Encoding>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&DigestConfig::new(
            DigestAlgorithm::Sha256,
            Encoding::Base64,
        ))
        .unwrap();
        assert_eq!(json, r#"{"algorithm":"SHA-256","encoding":"BASE64"}"#);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: hex rendering survives a decode/re-encode cycle unchanged.
        #[test]
        fn hex_reencodes_identically(input in ".*") {
            let rendered = DigestConfig::default().render(&input);
            let bytes = Encoding::Hex.decode(&rendered).unwrap();
            prop_assert_eq!(Encoding::Hex.encode(&bytes), rendered);
        }

        /// Property: hex and base64 renderings of the same digest never coincide.
        #[test]
        fn hex_and_base64_renderings_differ(input in ".*") {
            let bytes = DigestAlgorithm::Md5.hash(input.as_bytes());
            prop_assert_ne!(Encoding::Hex.encode(&bytes), Encoding::Base64.encode(&bytes));
        }
    }
}

//! Time-based one-time passcode generation (RFC 6238)
//!
//! Derives the current 6-digit passcode from the shared base32 secret using
//! HMAC-SHA1 over a 30-second time step. Generation is deterministic: two
//! calls within the same time step yield the same passcode.

use crate::core::error::RemediateError;
use base32::Alphabet;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Validity window of a passcode, in seconds
const TIME_STEP_SECS: i64 = 30;

/// Number of digits in a passcode
const CODE_DIGITS: u32 = 6;

/// A derived passcode together with the end of its validity window.
///
/// Used exactly once per token request; never persisted.
#[derive(Debug, Clone)]
pub struct Passcode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Passcode generator over a decoded shared secret
#[derive(Debug)]
pub struct OtpGenerator {
    key: SecretSlice<u8>,
}

impl OtpGenerator {
    /// Decode the base32 shared secret and build a generator.
    ///
    /// Whitespace, padding characters, and lowercase input are tolerated.
    /// A malformed secret fails fast with a configuration error.
    pub fn new(secret: &SecretString) -> Result<Self, RemediateError> {
        let normalized: String = secret
            .expose_secret()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .collect::<String>()
            .to_uppercase();

        if normalized.is_empty() {
            return Err(RemediateError::InvalidTotpSecret {
                message: "シークレットが空です".to_string(),
            });
        }

        let key = base32::decode(Alphabet::Rfc4648 { padding: false }, &normalized).ok_or_else(
            || RemediateError::InvalidTotpSecret {
                message: "base32としてデコードできません".to_string(),
            },
        )?;

        Ok(Self { key: key.into() })
    }

    /// Generate the passcode for the current wall-clock time
    pub fn generate(&self) -> Result<Passcode, RemediateError> {
        self.generate_at(Utc::now())
    }

    /// Generate the passcode for a specific instant
    pub fn generate_at(&self, now: DateTime<Utc>) -> Result<Passcode, RemediateError> {
        let step = now.timestamp().div_euclid(TIME_STEP_SECS);
        let code = self.hotp(step as u64)?;
        let remaining = TIME_STEP_SECS - now.timestamp().rem_euclid(TIME_STEP_SECS);
        let expires_at = now + Duration::seconds(remaining);

        Ok(Passcode { code, expires_at })
    }

    /// RFC 4226 HOTP value for one counter, zero-padded to `CODE_DIGITS`
    fn hotp(&self, counter: u64) -> Result<String, RemediateError> {
        let mut mac = HmacSha1::new_from_slice(self.key.expose_secret()).map_err(|e| {
            RemediateError::InvalidTotpSecret {
                message: e.to_string(),
            }
        })?;
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        // Dynamic truncation (RFC 4226 §5.3)
        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = u32::from_be_bytes([
            digest[offset] & 0x7f,
            digest[offset + 1],
            digest[offset + 2],
            digest[offset + 3],
        ]);
        let code = binary % 10u32.pow(CODE_DIGITS);

        Ok(format!("{:0width$}", code, width = CODE_DIGITS as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // RFC 6238 Appendix B reference secret: ASCII "12345678901234567890"
    const REFERENCE_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn generator() -> OtpGenerator {
        OtpGenerator::new(&SecretString::new(REFERENCE_SECRET.into())).unwrap()
    }

    fn at(timestamp: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(timestamp, 0).unwrap()
    }

    #[test]
    fn test_rfc6238_reference_vectors() {
        let generator = generator();

        // 6-digit truncations of the RFC 6238 Appendix B SHA-1 vectors
        let vectors = [
            (59, "287082"),
            (1111111109, "081804"),
            (1111111111, "050471"),
            (1234567890, "005924"),
            (2000000000, "279037"),
        ];

        for (timestamp, expected) in vectors {
            let passcode = generator.generate_at(at(timestamp)).unwrap();
            assert_eq!(passcode.code, expected, "timestamp {}", timestamp);
        }
    }

    #[test]
    fn test_same_time_step_is_deterministic() {
        let generator = generator();

        let first = generator.generate_at(at(0)).unwrap();
        let second = generator.generate_at(at(29)).unwrap();
        assert_eq!(first.code, second.code);

        // Next step rolls over to the next HOTP counter
        let third = generator.generate_at(at(30)).unwrap();
        assert_eq!(third.code, "287082");
        assert_ne!(first.code, third.code);
    }

    #[test]
    fn test_expiry_is_end_of_window() {
        let generator = generator();

        let passcode = generator.generate_at(at(59)).unwrap();
        assert_eq!(passcode.expires_at, at(60));

        let passcode = generator.generate_at(at(60)).unwrap();
        assert_eq!(passcode.expires_at, at(90));
    }

    #[test]
    fn test_secret_normalization() {
        let padded = SecretString::new("gezdgnbvgy3tqojq gezdgnbvgy3tqojq==".into());
        let generator = OtpGenerator::new(&padded).unwrap();

        let passcode = generator.generate_at(at(59)).unwrap();
        assert_eq!(passcode.code, "287082");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let error = OtpGenerator::new(&SecretString::new("  ".into())).expect_err("empty secret");
        assert_eq!(error.code(), "CONFIG_INVALID_TOTP_SECRET");
    }

    #[test]
    fn test_malformed_secret_rejected() {
        // 0, 1, 8, and 9 are outside the RFC 4648 base32 alphabet
        let error =
            OtpGenerator::new(&SecretString::new("0189!!".into())).expect_err("invalid base32");
        assert!(error.is_fatal());
        assert_eq!(error.code(), "CONFIG_INVALID_TOTP_SECRET");
    }

    #[test]
    fn test_code_is_zero_padded() {
        let generator = generator();
        let passcode = generator.generate_at(at(1234567890)).unwrap();
        assert_eq!(passcode.code.len(), 6);
        assert!(passcode.code.starts_with("00"));
    }
}

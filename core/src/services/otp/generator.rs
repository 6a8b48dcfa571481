//! Secret generation for pins and link tokens.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::domain::entities::otp_record::SendChannel;
use crate::errors::{OtpError, OtpResult};

use super::settings::OtpSettings;

/// Byte length of a link token before hex encoding (128 bits)
pub const LINK_TOKEN_BYTES: usize = 16;

/// Generates pins and link tokens from the OS CSPRNG
///
/// Pins are short and drawn from a configured alphabet; link tokens are
/// opaque 128-bit bearer credentials embedded in a URL and never go
/// through the alphabet-based path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinGenerator;

impl PinGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a pin of `length` characters drawn uniformly from `alphabet`
    pub fn generate_pin(&self, alphabet: &str, length: usize) -> OtpResult<String> {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            return Err(OtpError::invalid_argument("Pin alphabet must not be empty"));
        }
        if length == 0 {
            return Err(OtpError::invalid_argument("Pin length must be positive"));
        }

        let mut rng = OsRng;
        let pin = (0..length)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect();
        Ok(pin)
    }

    /// Generate an opaque hex-encoded 128-bit link token
    pub fn generate_link_token(&self) -> String {
        let mut bytes = [0u8; LINK_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Generate the secret appropriate for a channel
    pub fn secret_for(&self, channel: SendChannel, settings: &OtpSettings) -> OtpResult<String> {
        if channel.is_link() {
            Ok(self.generate_link_token())
        } else {
            self.generate_pin(&settings.alphabet, settings.pin_length)
        }
    }
}

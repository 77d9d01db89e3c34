pub mod otp;
pub mod token;

pub use otp::{OtpGenerator, Passcode};
pub use token::{BearerToken, TokenAcquirer, mask_token};

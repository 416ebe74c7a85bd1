pub mod dsa;
pub mod params;
pub mod sha1;

#[cfg(test)]
mod tests;

// Re-export DSA functionality
pub use dsa::{
    derive_generator, public_key, sign, verify, verify_signature, SignOutcome, Signature,
    Verification,
};

// Re-export parameter validation
pub use params::{
    parse_parameter, DomainParameters, KeyMaterial, Nonce, RawParameters, SigningInputs,
    VerificationInputs,
};

// Re-export SHA-1 functionality
pub use sha1::{sha1_digest, Digest, Sha1, SHA1_OUTPUT_SIZE};

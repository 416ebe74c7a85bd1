pub mod artifact;
pub mod config;
pub mod error;
pub mod logger;
pub mod math;
pub mod security;

pub use artifact::{sign_file, signed_path, verify_file, SignedFile};
pub use config::DsaConfig;
pub use error::{Error, Parameter, ParameterIssue, Result};
pub use security::{
    sign, verify, DomainParameters, KeyMaterial, Nonce, RawParameters, SignOutcome, Signature,
    Verification,
};

use std::fmt;
use std::path::PathBuf;

use num_bigint_dig::BigUint;
use thiserror::Error;

/// Result type for signing and verification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The five caller-supplied DSA inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Q,
    P,
    H,
    X,
    K,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Q => "Q",
            Parameter::P => "P",
            Parameter::H => "H",
            Parameter::X => "X",
            Parameter::K => "K",
        };
        f.write_str(name)
    }
}

/// Why a parameter was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterIssue {
    /// No value supplied.
    Missing,
    /// The text is not a decimal integer.
    Malformed(String),
    /// Zero or negative.
    NotPositive,
    /// Failed the Miller-Rabin check (only `P` and `Q`).
    NotPrime,
    /// `(P - 1)` is not divisible by `Q`.
    SubgroupMismatch,
    /// Outside the inclusive range `[min, max]`.
    OutOfRange { min: BigUint, max: BigUint },
}

impl fmt::Display for ParameterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterIssue::Missing => f.write_str("is required"),
            ParameterIssue::Malformed(text) => write!(f, "contains invalid symbols ({text:?})"),
            ParameterIssue::NotPositive => f.write_str("can't be negative or zero"),
            ParameterIssue::NotPrime => f.write_str("should be prime"),
            ParameterIssue::SubgroupMismatch => f.write_str("(P - 1) should be divided by Q"),
            ParameterIssue::OutOfRange { min, max } => {
                write!(f, "should lie between {min} and {max} inclusive")
            }
        }
    }
}

/// Errors surfaced by the signer, the verifier and the file boundary.
///
/// Every variant is terminal for the call that produced it; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A supplied number fails parsing, positivity, primality, the subgroup
    /// relation, or its range. Raised before any signature arithmetic.
    #[error("invalid parameter {parameter}: {issue}")]
    InvalidParameter {
        parameter: Parameter,
        issue: ParameterIssue,
    },

    /// `g = h^((p-1)/q) mod p` came out as 1.
    #[error("degenerate generator: G should not equal 1")]
    DegenerateGenerator,

    /// The computed signature has a zero component. Pick another nonce or key.
    #[error("degenerate signature: R and S should not be 0 (r zero: {r_zero}, s zero: {s_zero})")]
    DegenerateSignature { r_zero: bool, s_zero: bool },

    /// The artifact has no parseable trailing `r,s` line.
    #[error("the file is not signed")]
    UnsignedArtifact,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn invalid(parameter: Parameter, issue: ParameterIssue) -> Self {
        Error::InvalidParameter { parameter, issue }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

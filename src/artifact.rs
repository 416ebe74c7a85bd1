//! Signed-file format and the file boundary around the signer.
//!
//! A signed artifact is the original bytes, a `\n`, then one line `r,s` in
//! decimal. Signing never touches the source file: it writes a sibling named
//! `<stem>(signed).txt`. Files are read whole, since the digest needs the
//! complete message and its length.
//!
//! No locking is done. Signing and verifying the same path concurrently is
//! the caller's problem.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use num_bigint_dig::BigUint;

use crate::error::{Error, Result};
use crate::security::dsa::{self, SignOutcome, Signature, Verification};
use crate::security::params::{DomainParameters, KeyMaterial, Nonce};

/// Inserted between the source stem and the `.txt` extension.
pub const SIGNED_SUFFIX: &str = "(signed)";

/// Extension of every signed artifact.
pub const SIGNED_EXTENSION: &str = "txt";

/// Result of [`sign_file`]: where the artifact went and what was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFile {
    pub path: PathBuf,
    pub outcome: SignOutcome,
}

/// Path of the artifact produced for `source`.
///
/// The file name is cut at its last `.`, then `(signed).txt` is appended, so
/// `notes.md` becomes `notes(signed).txt`. A name without a `.`, or whose
/// only `.` is the leading one (`.profile`), is kept whole. The stem's bytes
/// are kept as they are, even when they are not valid UTF-8.
pub fn signed_path(source: &Path) -> PathBuf {
    let mut name = source.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    name.push(SIGNED_SUFFIX);
    name.push(".");
    name.push(SIGNED_EXTENSION);
    source.with_file_name(name)
}

/// Splits an artifact into the signed content and its last line.
///
/// The content is every byte before the final `\n` (nothing at all when the
/// artifact has no newline). The last line is everything after that newline,
/// or the whole artifact when there is none; an empty artifact has no line.
pub fn split_signed(artifact: &[u8]) -> (&[u8], Option<&[u8]>) {
    if artifact.is_empty() {
        return (&[], None);
    }
    match artifact.iter().rposition(|&b| b == b'\n') {
        Some(idx) => (&artifact[..idx], Some(&artifact[idx + 1..])),
        None => (&[], Some(artifact)),
    }
}

/// Parses a trailing `r,s` line.
///
/// Exactly two comma-separated non-negative decimal fields are accepted,
/// whitespace around each ignored and a trailing `\r` dropped. Anything
/// else is [`Error::UnsignedArtifact`]; malformed and absent signatures are
/// not told apart. Range checks against `q` happen in the verifier.
pub fn parse_signature_line(line: &[u8]) -> Result<Signature> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let text = std::str::from_utf8(line).map_err(|_| Error::UnsignedArtifact)?;

    let mut fields = text.split(',');
    let (Some(r), Some(s), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Error::UnsignedArtifact);
    };

    Ok(Signature {
        r: parse_decimal(r)?,
        s: parse_decimal(s)?,
    })
}

/// The line appended to a signed artifact, newline included.
pub fn signature_line(signature: &Signature) -> String {
    format!("\n{signature}")
}

/// Signs the file at `source` and writes `<stem>(signed).txt` beside it.
///
/// Nothing is written unless signing succeeds.
pub fn sign_file(
    source: &Path,
    params: &DomainParameters,
    key: &KeyMaterial,
    nonce: &Nonce,
) -> Result<SignedFile> {
    let message = read_all(source)?;
    let outcome = dsa::sign(params, key, nonce, &message)?;

    let path = signed_path(source);
    let line = signature_line(&outcome.signature);
    let mut artifact = message;
    artifact.extend_from_slice(line.as_bytes());
    fs::write(&path, &artifact).map_err(|e| Error::io(&path, e))?;

    info!(
        "signed {} -> {} ({} bytes)",
        source.display(),
        path.display(),
        artifact.len()
    );
    Ok(SignedFile { path, outcome })
}

/// Reads a signed artifact and computes `(r, v, digest)`.
pub fn verify_file(path: &Path, params: &DomainParameters, key: &KeyMaterial) -> Result<Verification> {
    let artifact = read_all(path)?;
    let verification = dsa::verify(params, key, &artifact)?;
    info!(
        "checked {}: r={} v={} ({})",
        path.display(),
        verification.r,
        verification.v,
        if verification.is_valid() { "match" } else { "mismatch" }
    );
    Ok(verification)
}

fn read_all(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

fn parse_decimal(field: &str) -> Result<BigUint> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::UnsignedArtifact);
    }
    BigUint::parse_bytes(field.as_bytes(), 10).ok_or(Error::UnsignedArtifact)
}

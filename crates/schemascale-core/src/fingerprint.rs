use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::schema::Schema;

/// SHA-256 (hex) of the canonical pretty JSON of a schema.
///
/// Two runs with identical inputs must produce the same fingerprint.
pub fn schema_fingerprint(schema: &Schema) -> Result<String> {
    let json = schema.to_pretty_json()?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

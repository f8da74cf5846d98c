// Randomness hygiene for VRF bytes.
//
// The IC's raw_rand supplies 32 bytes per call. One spin needs three
// independent draws (extra revolutions, duration jitter, flavor message),
// so secondary values are derived with SHA256(vrf_bytes || index).

use sha2::{Digest, Sha256};

/// Validate randomness bytes are not degenerate (all zeros or all ones).
/// This guards against catastrophic VRF failure modes.
pub fn validate_randomness(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 8 {
        return Err("Insufficient randomness bytes".to_string());
    }

    let first_8 = &bytes[0..8];
    if first_8.iter().all(|&b| b == 0) {
        return Err("Degenerate randomness detected: all zeros".to_string());
    }
    if first_8.iter().all(|&b| b == 0xFF) {
        return Err("Degenerate randomness detected: all ones".to_string());
    }

    Ok(())
}

/// Convert VRF bytes to float in range [0.0, 1.0)
/// Uses the standard technique of extracting 53 bits (f64 mantissa precision)
/// by right-shifting 11 bits from a u64, then dividing by 2^53.
pub fn bytes_to_float(bytes: &[u8]) -> Result<f64, String> {
    validate_randomness(bytes)?;

    let mut byte_array = [0u8; 8];
    byte_array.copy_from_slice(&bytes[0..8]);
    let random_u64 = u64::from_be_bytes(byte_array);
    // >> 11 extracts most significant 53 bits for f64 mantissa precision
    let random = (random_u64 >> 11) as f64 / (1u64 << 53) as f64;
    Ok(random)
}

/// Derive an independent float for a given draw index.
/// Uses SHA256(vrf_bytes || index) to generate cryptographically independent values.
pub fn derive_sub_float(vrf_bytes: &[u8], index: u8) -> Result<f64, String> {
    validate_randomness(vrf_bytes)?;

    let mut hasher = Sha256::new();
    hasher.update(vrf_bytes);
    hasher.update([index]);
    let hash = hasher.finalize();

    let mut byte_array = [0u8; 8];
    byte_array.copy_from_slice(&hash[0..8]);
    let random_u64 = u64::from_be_bytes(byte_array);
    let random = (random_u64 >> 11) as f64 / (1u64 << 53) as f64;
    Ok(random)
}

/// Create SHA256 hash of the randomness bytes for audit/display
pub fn create_randomness_hash(bytes: &[u8]) -> String {
    let hash_bytes = if bytes.len() >= 32 { &bytes[0..32] } else { bytes };
    let mut hasher = Sha256::new();
    hasher.update(hash_bytes);
    hex::encode(hasher.finalize())
}

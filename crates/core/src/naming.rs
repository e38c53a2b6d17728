//! Identifier derivation for categories and pictures.
//!
//! Category ids are deterministic slugs of the display name and double as
//! foreign keys. Picture ids are opaque tokens that never derive from user
//! input, so rapid concurrent uploads cannot collide.

use rand::Rng;

/// Alphabet for the random suffix of a picture id (base36, lowercase).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of a picture id.
const ID_SUFFIX_LEN: usize = 9;

/// Derive a category id from its display name.
///
/// Lowercases the name and collapses each whitespace run into a single
/// hyphen. The result is stable for a given name, so re-creating a category
/// with the same name yields the same id.
///
/// # Examples
///
/// ```
/// use atelier_core::naming::category_slug;
///
/// assert_eq!(category_slug("Red Art"), "red-art");
/// assert_eq!(category_slug("Ultra Modern Aya"), "ultra-modern-aya");
/// ```
pub fn category_slug(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Generate an opaque picture id: `pic_{unix_millis}_{random suffix}`.
///
/// The millisecond prefix keeps ids roughly sortable; the random suffix
/// makes collisions within the same millisecond vanishingly unlikely.
pub fn picture_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("pic_{millis}_{suffix}")
}

//! Fixed color palettes and the normalized bucket index
//!
//! Nine steps each, index 0 the most intense. Primary search results
//! use the warm ramp, references and co-authors the cool one.

/// Warm 9-step ramp (primary results, publications in author mode)
pub const PRIMARY_PALETTE: [&str; 9] = [
    "#7f0000", "#b30000", "#d7301f", "#ef6548", "#fc8d59", "#fdbb84", "#fdd49e", "#fee8c8",
    "#fff7ec",
];

/// Cool 9-step ramp (references, co-authors)
pub const SECONDARY_PALETTE: [&str; 9] = [
    "#08306b", "#08519c", "#2171b5", "#4292c6", "#6baed6", "#9ecae1", "#c6dbef", "#deebf7",
    "#f7fbff",
];

/// Map a count onto a palette index: `floor(8 * (1 - count / max))`,
/// clamped to [0, 8]. The set maximum lands on the most intense entry.
/// A zero maximum cannot occur for a non-empty candidate set but is
/// still mapped to the palest bucket instead of dividing by zero.
pub fn bucket(count: u64, max: u64) -> usize {
    if max == 0 {
        return 8;
    }
    let raw = 8.0 * (1.0 - count as f64 / max as f64);
    (raw.floor().clamp(0.0, 8.0)) as usize
}

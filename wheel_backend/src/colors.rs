// Wheel palette shared between the canvas segments and the statistics bars.
//
// A name hashes to the same color everywhere, for every client, so the
// hash must stay byte-for-byte stable: 32-bit `h = c + (h << 5) - h` over
// UTF-16 code units, then abs(h) mod palette size.

pub const COLORS: [&str; 10] = [
    "#FF6B6B", // Red
    "#4ECDC4", // Teal
    "#45B7D1", // Blue
    "#96CEB4", // Green
    "#FFEAA7", // Yellow
    "#DDA0DD", // Plum
    "#98D8C8", // Mint
    "#F7DC6F", // Gold
    "#BB8FCE", // Purple
    "#85C1E9", // Light Blue
];

pub fn color_for_name(name: &str) -> &'static str {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    let index = hash.unsigned_abs() as usize % COLORS.len();
    COLORS[index]
}

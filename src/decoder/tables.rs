use crate::models::{ECLevel, SymbolVersion};

// Tables from the QR Code specification (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Data and error correction block lengths for one version and level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Data codewords per block, shorter blocks first
    pub data_block_lengths: Vec<usize>,
    /// Error correction codewords per block (all equal)
    pub ec_block_lengths: Vec<usize>,
}

impl BlockLayout {
    /// Number of blocks
    pub fn num_blocks(&self) -> usize {
        self.data_block_lengths.len()
    }

    /// Total data codewords
    pub fn data_codewords(&self) -> usize {
        self.data_block_lengths.iter().sum()
    }

    /// Total codewords, data and error correction
    pub fn total_codewords(&self) -> usize {
        self.data_codewords() + self.ec_block_lengths.iter().sum::<usize>()
    }
}

/// Modules available for data and error correction, remainder bits included
pub fn raw_data_modules(version: SymbolVersion) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Whole codewords that fit in the symbol
pub fn total_codewords(version: SymbolVersion) -> usize {
    raw_data_modules(version) / 8
}

/// Block structure for `version` at `ec_level`
pub fn block_layout(version: SymbolVersion, ec_level: ECLevel) -> BlockLayout {
    let v = version.number() as usize;
    let level = ec_level.index();
    let ecc = ECC_CODEWORDS_PER_BLOCK[level][v] as usize;
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[level][v] as usize;

    let data_total = total_codewords(version) - blocks * ecc;
    let short_len = data_total / blocks;
    let num_long = data_total % blocks;

    let data_block_lengths = (0..blocks)
        .map(|i| if i < blocks - num_long { short_len } else { short_len + 1 })
        .collect();

    BlockLayout {
        data_block_lengths,
        ec_block_lengths: vec![ecc; blocks],
    }
}

const fn alignment_row(version: usize) -> [u8; 7] {
    let mut out = [0u8; 7];
    if version < 2 {
        return out;
    }
    let count = version / 7 + 2;
    let size = version * 4 + 17;
    let step = (version * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
    out[0] = 6;
    let mut i = 1;
    while i < count {
        out[i] = (size - 7 - (count - 1 - i) * step) as u8;
        i += 1;
    }
    out
}

const fn build_alignment_table() -> [[u8; 7]; 41] {
    let mut table = [[0u8; 7]; 41];
    let mut v = 2;
    while v <= 40 {
        table[v] = alignment_row(v);
        v += 1;
    }
    table
}

/// Alignment pattern centre coordinates per version; unused slots are zero
static ALIGNMENT_PATTERN_POSITIONS: [[u8; 7]; 41] = build_alignment_table();

/// Alignment pattern centre rows/columns for a version (empty for version 1)
pub fn alignment_pattern_positions(version: SymbolVersion) -> &'static [u8] {
    let v = version.number() as usize;
    let count = if v < 2 { 0 } else { v / 7 + 2 };
    &ALIGNMENT_PATTERN_POSITIONS[v][..count]
}

/// XOR mask applied to every format codeword
pub const FORMAT_MASK: u16 = 0b101_0100_0001_0010;

const fn format_codeword(data: u16) -> u16 {
    let mut rem = data;
    let mut i = 0;
    while i < 10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
        i += 1;
    }
    (data << 10) | rem
}

const fn version_codeword(version: u32) -> u32 {
    let mut rem = version;
    let mut i = 0;
    while i < 12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
        i += 1;
    }
    (version << 12) | rem
}

const fn build_format_codewords() -> [u16; 32] {
    let mut table = [0u16; 32];
    let mut d = 0;
    while d < 32 {
        table[d] = format_codeword(d as u16);
        d += 1;
    }
    table
}

const fn build_version_codewords() -> [u32; 34] {
    let mut table = [0u32; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = version_codeword(i as u32 + 7);
        i += 1;
    }
    table
}

/// BCH(15,5) codewords indexed by their 5 data bits, before masking
pub static FORMAT_CODEWORDS: [u16; 32] = build_format_codewords();

/// BCH(18,6) codewords for versions 7 through 40
pub static VERSION_CODEWORDS: [u32; 34] = build_version_codewords();

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    fn v(n: i32) -> SymbolVersion {
        SymbolVersion::new(n).unwrap()
    }

    #[test]
    fn test_block_layout_invariants() {
        for n in 1..=40 {
            for level in LEVELS {
                let layout = block_layout(v(n), level);
                assert_eq!(layout.total_codewords(), total_codewords(v(n)), "v{n} {level:?}");
                let min = *layout.data_block_lengths.iter().min().unwrap();
                let max = *layout.data_block_lengths.iter().max().unwrap();
                assert!(max - min <= 1);
                assert!(layout.data_block_lengths.windows(2).all(|w| w[0] <= w[1]));
                assert!(layout.ec_block_lengths.iter().all(|&e| e == layout.ec_block_lengths[0]));
            }
        }
    }

    #[test]
    fn test_known_layouts() {
        let layout = block_layout(v(1), ECLevel::M);
        assert_eq!(layout.data_block_lengths, vec![16]);
        assert_eq!(layout.ec_block_lengths, vec![10]);

        // 5-Q: two blocks of 15 and two of 16 data codewords, 18 EC each
        let layout = block_layout(v(5), ECLevel::Q);
        assert_eq!(layout.data_block_lengths, vec![15, 15, 16, 16]);
        assert_eq!(layout.ec_block_lengths, vec![18; 4]);

        let layout = block_layout(v(40), ECLevel::H);
        assert_eq!(layout.num_blocks(), 81);
        assert_eq!(layout.data_codewords(), 1276);
        assert_eq!(total_codewords(v(40)), 3706);
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(v(1)).is_empty());
        assert_eq!(alignment_pattern_positions(v(2)), &[6, 18]);
        assert_eq!(alignment_pattern_positions(v(7)), &[6, 22, 38]);
        assert_eq!(alignment_pattern_positions(v(14)), &[6, 26, 46, 66]);
        assert_eq!(alignment_pattern_positions(v(32)), &[6, 34, 60, 86, 112, 138]);
        assert_eq!(alignment_pattern_positions(v(40)), &[6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn test_bch_codewords() {
        // M, mask 5 as it appears in the symbol after masking
        assert_eq!(FORMAT_CODEWORDS[0b00101] ^ FORMAT_MASK, 0x40CE);
        assert_eq!(FORMAT_CODEWORDS[0], 0);
        assert_eq!(VERSION_CODEWORDS[0], 0x07C94);
        assert_eq!(VERSION_CODEWORDS[33], 0x28C69);
    }
}

//! Synthetic symbol encoder and renderers shared by the integration tests and benches
#![allow(dead_code)]

use qrscan::utils::geometry::PerspectiveTransform;
use qrscan::{BinaryImage, ECLevel, ParsedSymbol, Point, SymbolVersion};

const ALPHANUMERIC: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

// Symbol capacities and alignment centres as published for Model 2 symbols.

/// Alignment centres per version, version 1 first
pub const PUBLISHED_ALIGNMENT: [&[u8]; 40] = [
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// Total codewords per version, version 1 first
pub const PUBLISHED_TOTAL: [usize; 40] = [
    26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901,
    991, 1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611,
    2761, 2876, 3034, 3196, 3362, 3532, 3706,
];

/// Data codewords per level (L, M, Q, H) and version
pub const PUBLISHED_DATA: [[usize; 40]; 4] = [
    [
        19, 34, 55, 80, 108, 136, 156, 194, 232, 274, 324, 370, 428, 461, 523, 589, 647,
        721, 795, 861, 932, 1006, 1094, 1174, 1276, 1370, 1468, 1531, 1631, 1735, 1843,
        1955, 2071, 2191, 2306, 2434, 2566, 2702, 2812, 2956,
    ],
    [
        16, 28, 44, 64, 86, 108, 124, 154, 182, 216, 254, 290, 334, 365, 415, 453, 507, 563,
        627, 669, 714, 782, 860, 914, 1000, 1062, 1128, 1193, 1267, 1373, 1455, 1541, 1631,
        1725, 1812, 1914, 1992, 2102, 2216, 2334,
    ],
    [
        13, 22, 34, 48, 62, 76, 88, 110, 132, 154, 180, 206, 244, 261, 295, 325, 367, 397,
        445, 485, 512, 568, 614, 664, 718, 754, 808, 871, 911, 985, 1033, 1115, 1171, 1231,
        1286, 1354, 1426, 1502, 1582, 1666,
    ],
    [
        9, 16, 26, 36, 46, 60, 66, 86, 100, 122, 140, 158, 180, 197, 223, 253, 283, 313,
        341, 385, 406, 442, 464, 514, 538, 596, 628, 661, 701, 745, 793, 845, 901, 961, 986,
        1054, 1096, 1142, 1222, 1276,
    ],
];

/// Error correction blocks per level (L, M, Q, H) and version
pub const PUBLISHED_BLOCKS: [[usize; 40]; 4] = [
    [
        1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20,
        21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30,
        32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];


/// One segment to encode
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    Numeric(&'a str),
    Alphanumeric(&'a str),
    Byte(&'a [u8]),
    /// Shift-JIS double-byte codes
    Kanji(&'a [u16]),
    /// ECI designator, 8-bit form
    Eci(u8),
}

/// Module grid of an encoded symbol, `true` = dark
#[derive(Debug, Clone, PartialEq)]
pub struct TestSymbol {
    pub version: u8,
    pub modules: Vec<Vec<bool>>,
}

impl TestSymbol {
    pub fn size(&self) -> usize {
        self.modules.len()
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y][x]
    }

    pub fn flip(&mut self, x: usize, y: usize) {
        self.modules[y][x] = !self.modules[y][x];
    }

    /// The grid as a 1 px per module image without quiet zone
    pub fn to_image(&self) -> BinaryImage {
        render(self, 1, 0)
    }

    pub fn to_parsed(&self) -> ParsedSymbol {
        ParsedSymbol::new(version_of(self.version), self.to_image().pixels().to_vec()).unwrap()
    }
}

struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn push(&mut self, value: u32, len: usize) {
        for i in (0..len).rev() {
            self.0.push((value >> i) & 1 == 1);
        }
    }
}

fn count_bits(mode: usize, version: u8) -> usize {
    let tier = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    [[10, 12, 14], [9, 11, 13], [8, 16, 16], [8, 10, 12]][mode][tier]
}

fn push_segment(bits: &mut BitBuffer, segment: &Segment<'_>, version: u8) {
    match *segment {
        Segment::Numeric(digits) => {
            bits.push(0b0001, 4);
            bits.push(digits.len() as u32, count_bits(0, version));
            for group in digits.as_bytes().chunks(3) {
                let value = group.iter().fold(0u32, |acc, &d| acc * 10 + (d - b'0') as u32);
                bits.push(value, [0, 4, 7, 10][group.len()]);
            }
        }
        Segment::Alphanumeric(text) => {
            bits.push(0b0010, 4);
            bits.push(text.len() as u32, count_bits(1, version));
            let index = |c: u8| {
                ALPHANUMERIC
                    .iter()
                    .position(|&a| a == c)
                    .expect("character outside the alphanumeric set") as u32
            };
            for pair in text.as_bytes().chunks(2) {
                match pair {
                    [a, b] => bits.push(index(*a) * 45 + index(*b), 11),
                    [a] => bits.push(index(*a), 6),
                    _ => unreachable!(),
                }
            }
        }
        Segment::Byte(bytes) => {
            bits.push(0b0100, 4);
            bits.push(bytes.len() as u32, count_bits(2, version));
            for &b in bytes {
                bits.push(b as u32, 8);
            }
        }
        Segment::Kanji(codes) => {
            bits.push(0b1000, 4);
            bits.push(codes.len() as u32, count_bits(3, version));
            for &code in codes {
                let offset = if code <= 0x9FFC { code - 0x8140 } else { code - 0xC140 };
                bits.push(((offset >> 8) * 0xC0 + (offset & 0xFF)) as u32, 13);
            }
        }
        Segment::Eci(designator) => {
            bits.push(0b0111, 4);
            bits.push(designator as u32, 8);
        }
    }
}

fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= 0x1D;
        }
        b >>= 1;
    }
    product
}

/// Generator polynomial with roots α^0..α^(n-1), highest degree first
fn rs_generator(n: usize) -> Vec<u8> {
    let mut generator = vec![1u8];
    let mut root = 1u8;
    for _ in 0..n {
        let mut next = vec![0u8; generator.len() + 1];
        for (j, &c) in generator.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= gf_mul(c, root);
        }
        generator = next;
        root = gf_mul(root, 2);
    }
    generator
}

/// Error correction codewords for `data`
pub fn rs_ecc(data: &[u8], n: usize) -> Vec<u8> {
    let generator = rs_generator(n);
    let mut remainder = data.to_vec();
    remainder.resize(data.len() + n, 0);
    for i in 0..data.len() {
        let c = remainder[i];
        if c != 0 {
            for (j, &g) in generator.iter().enumerate() {
                remainder[i + j] ^= gf_mul(g, c);
            }
        }
    }
    remainder.split_off(data.len())
}

fn level_bits(level: ECLevel) -> u32 {
    match level {
        ECLevel::L => 0b01,
        ECLevel::M => 0b00,
        ECLevel::Q => 0b11,
        ECLevel::H => 0b10,
    }
}

/// Masked 15-bit format word
pub fn format_word(level: ECLevel, mask: u8) -> u16 {
    let data = (level_bits(level) << 3) | mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    (((data << 10) | rem) ^ 0x5412) as u16
}

/// 18-bit version word
pub fn version_word(version: u8) -> u32 {
    let mut rem = version as u32;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    ((version as u32) << 12) | rem
}

fn mask_applies(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (y / 2 + x / 3) % 2 == 0,
        5 => (x * y) % 2 + (x * y) % 3 == 0,
        6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
        _ => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
    }
}

fn level_row(level: ECLevel) -> usize {
    match level {
        ECLevel::L => 0,
        ECLevel::M => 1,
        ECLevel::Q => 2,
        ECLevel::H => 3,
    }
}

/// Data capacity in codewords
pub fn data_capacity(version: u8, level: ECLevel) -> usize {
    PUBLISHED_DATA[level_row(level)][version as usize - 1]
}

/// Data codewords per block, shorter blocks first, and the EC codewords of each block
pub fn block_lengths(version: u8, level: ECLevel) -> (Vec<usize>, usize) {
    let v = version as usize - 1;
    let data = data_capacity(version, level);
    let count = PUBLISHED_BLOCKS[level_row(level)][v];
    let ec_total = PUBLISHED_TOTAL[v] - data;
    assert_eq!(ec_total % count, 0, "v{version} {level:?}");
    let long = data % count;
    let lengths = (0..count)
        .map(|i| data / count + usize::from(i >= count - long))
        .collect();
    (lengths, ec_total / count)
}

pub fn version_of(version: u8) -> SymbolVersion {
    SymbolVersion::new(version as i32).unwrap()
}

/// Interleaved data and error correction codewords for the given segments
pub fn codewords(version: u8, level: ECLevel, segments: &[Segment<'_>]) -> Vec<u8> {
    let (lengths, ec_len) = block_lengths(version, level);
    let capacity = data_capacity(version, level) * 8;

    let mut bits = BitBuffer(Vec::new());
    for segment in segments {
        push_segment(&mut bits, segment, version);
    }
    assert!(
        bits.0.len() <= capacity,
        "{} bits do not fit in {capacity}",
        bits.0.len()
    );
    let terminator = (capacity - bits.0.len()).min(4);
    bits.push(0, terminator);
    while bits.0.len() % 8 != 0 {
        bits.0.push(false);
    }

    let mut data: Vec<u8> = bits
        .0
        .chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect();
    for pad in [0xEC, 0x11].into_iter().cycle() {
        if data.len() >= capacity / 8 {
            break;
        }
        data.push(pad);
    }

    let mut blocks = Vec::new();
    let mut start = 0;
    for &len in &lengths {
        let block = data[start..start + len].to_vec();
        let ec = rs_ecc(&block, ec_len);
        blocks.push((block, ec));
        start += len;
    }

    let longest = lengths.iter().copied().max().unwrap_or(0);
    let mut out = Vec::with_capacity(PUBLISHED_TOTAL[version as usize - 1]);
    for i in 0..longest {
        for (block, _) in &blocks {
            if let Some(&c) = block.get(i) {
                out.push(c);
            }
        }
    }
    for i in 0..ec_len {
        for (_, ec) in &blocks {
            out.push(ec[i]);
        }
    }
    out
}

/// Encode `segments` as a complete symbol
pub fn encode(version: u8, level: ECLevel, mask: u8, segments: &[Segment<'_>]) -> TestSymbol {
    let size = 17 + 4 * version as usize;
    let mut modules = vec![vec![false; size]; size];
    let mut reserved = vec![vec![false; size]; size];

    for i in 8..size - 8 {
        modules[6][i] = i % 2 == 0;
        modules[i][6] = i % 2 == 0;
        reserved[6][i] = true;
        reserved[i][6] = true;
    }

    for (cx, cy) in [(3isize, 3isize), (size as isize - 4, 3), (3, size as isize - 4)] {
        for dy in -4isize..=4 {
            for dx in -4isize..=4 {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= size as isize || y >= size as isize {
                    continue;
                }
                let ring = dx.abs().max(dy.abs());
                modules[y as usize][x as usize] = ring != 2 && ring != 4;
                reserved[y as usize][x as usize] = true;
            }
        }
    }

    let centres = PUBLISHED_ALIGNMENT[version as usize - 1];
    let last = centres.len().saturating_sub(1);
    for (i, &cx) in centres.iter().enumerate() {
        for (j, &cy) in centres.iter().enumerate() {
            if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                continue;
            }
            for dy in -2isize..=2 {
                for dx in -2isize..=2 {
                    let x = (cx as isize + dx) as usize;
                    let y = (cy as isize + dy) as usize;
                    modules[y][x] = dx.abs().max(dy.abs()) != 1;
                    reserved[y][x] = true;
                }
            }
        }
    }

    for i in 0..9 {
        reserved[8][i] = true;
        reserved[i][8] = true;
    }
    for i in size - 8..size {
        reserved[8][i] = true;
        reserved[i][8] = true;
    }
    if version >= 7 {
        for i in 0..18 {
            reserved[i / 3][size - 11 + i % 3] = true;
            reserved[size - 11 + i % 3][i / 3] = true;
        }
    }

    let free = reserved.iter().flatten().filter(|&&r| !r).count();
    assert_eq!(free / 8, PUBLISHED_TOTAL[version as usize - 1], "v{version} data modules");

    let bits: Vec<bool> = codewords(version, level, segments)
        .iter()
        .flat_map(|&c| (0..8).rev().map(move |i| (c >> i) & 1 == 1))
        .collect();
    let mut next = 0;
    let mut right = size as isize - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = ((right + 1) & 2) == 0;
        for vert in 0..size {
            let y = if upward { size - 1 - vert } else { vert };
            for j in 0..2 {
                let x = (right - j) as usize;
                if reserved[y][x] {
                    continue;
                }
                let bit = bits.get(next).copied().unwrap_or(false);
                modules[y][x] = bit ^ mask_applies(mask, x, y);
                next += 1;
            }
        }
        right -= 2;
    }

    let mut symbol = TestSymbol { version, modules };
    write_format(&mut symbol, format_word(level, mask), format_word(level, mask));
    if version >= 7 {
        write_version(&mut symbol, version_word(version));
    }
    symbol
}

/// Overwrite both version blocks with `word`
pub fn write_version(symbol: &mut TestSymbol, word: u32) {
    let size = symbol.size();
    for i in 0..18 {
        let dark = (word >> i) & 1 == 1;
        symbol.modules[i / 3][size - 11 + i % 3] = dark;
        symbol.modules[size - 11 + i % 3][i / 3] = dark;
    }
}

/// Overwrite the two format copies, bit 14 first
pub fn write_format(symbol: &mut TestSymbol, main: u16, secondary: u16) {
    let size = symbol.size();
    let main_coords = (0..6)
        .map(|x| (x, 8))
        .chain([(7, 8), (8, 8), (8, 7)])
        .chain((0..6).rev().map(|y| (8, y)));
    for (k, (x, y)) in main_coords.enumerate() {
        symbol.modules[y][x] = (main >> (14 - k)) & 1 == 1;
    }
    let secondary_coords = (size - 7..size)
        .rev()
        .map(|y| (8, y))
        .chain((size - 8..size).map(|x| (x, 8)));
    for (k, (x, y)) in secondary_coords.enumerate() {
        symbol.modules[y][x] = (secondary >> (14 - k)) & 1 == 1;
    }
    symbol.modules[size - 8][8] = true;
}

/// Axis-aligned rendering at `scale` px per module with a `quiet`-module margin
pub fn render(symbol: &TestSymbol, scale: usize, quiet: usize) -> BinaryImage {
    let size = symbol.size();
    let side = (size + 2 * quiet) * scale;
    BinaryImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / scale, y / scale);
        (quiet..quiet + size).contains(&mx)
            && (quiet..quiet + size).contains(&my)
            && symbol.get(mx - quiet, my - quiet)
    })
}

fn module_at(symbol: &TestSymbol, mx: f64, my: f64) -> bool {
    let size = symbol.size() as f64;
    if !(0.0..size).contains(&mx) || !(0.0..size).contains(&my) {
        return false;
    }
    symbol.get(mx.floor() as usize, my.floor() as usize)
}

/// Rendering rotated by `theta` radians about the image centre
pub fn render_rotated(symbol: &TestSymbol, scale: f64, theta: f64) -> BinaryImage {
    let size = symbol.size() as f64;
    let side = ((size + 8.0) * scale * 1.5) as usize;
    let centre = side as f64 / 2.0;
    let (sin, cos) = theta.sin_cos();
    BinaryImage::from_fn(side, side, |x, y| {
        let dx = x as f64 + 0.5 - centre;
        let dy = y as f64 + 0.5 - centre;
        let u = cos * dx + sin * dy;
        let v = -sin * dx + cos * dy;
        module_at(symbol, u / scale + size / 2.0, v / scale + size / 2.0)
    })
}

/// Rendering with the symbol corners (top-left, top-right, bottom-right,
/// bottom-left) at `corners` in a `side`x`side` image
pub fn render_perspective(symbol: &TestSymbol, corners: [Point; 4], side: usize) -> BinaryImage {
    let size = symbol.size() as f64;
    let module_corners = [
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ];
    let to_module = PerspectiveTransform::from_points(&corners, &module_corners)
        .expect("non-degenerate quad");
    BinaryImage::from_fn(side, side, |x, y| {
        to_module
            .map(Point::new(x as f64 + 0.5, y as f64 + 0.5))
            .is_some_and(|p| module_at(symbol, p.x, p.y))
    })
}

/// Printable ASCII payload of `len` bytes, varied by `seed`
pub fn ascii_payload(len: usize, seed: usize) -> Vec<u8> {
    (0..len).map(|i| 32 + ((i * 7 + seed) % 95) as u8).collect()
}

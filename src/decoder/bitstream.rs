/// Data-area traversal and bit packing
use crate::decoder::function_mask::FunctionMask;

/// Data module coordinates `(x, y)` in codeword order.
///
/// Two-module columns are visited right to left, skipping the vertical timing
/// column. The first column runs bottom to top and the direction alternates;
/// within each row of a column the right module comes before the left.
pub fn data_module_order(func: &FunctionMask) -> Vec<(usize, usize)> {
    let size = func.size();
    let mut order = Vec::with_capacity(func.data_modules_count());
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
                if !func.is_function(x, y) {
                    order.push((x, y));
                }
            }
        }
        right -= 2;
    }

    order
}

/// Pack bits MSB-first into bytes. A trailing partial byte is left-aligned.
pub fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut current = 0u8;
    let mut filled = 0;

    for bit in bits {
        current = (current << 1) | bit as u8;
        filled += 1;
        if filled == 8 {
            bytes.push(current);
            current = 0;
            filled = 0;
        }
    }
    if filled > 0 {
        bytes.push(current << (8 - filled));
    }

    bytes
}

use std::sync::OnceLock;

use crate::decoder::tables::alignment_pattern_positions;
use crate::models::SymbolVersion;

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    size: usize,
    cells: Vec<bool>,
    version: SymbolVersion,
}

static MASKS: [OnceLock<FunctionMask>; 40] = [const { OnceLock::new() }; 40];

impl FunctionMask {
    /// Shared, lazily built mask for `version`
    pub fn for_version(version: SymbolVersion) -> &'static FunctionMask {
        MASKS[version.number() as usize - 1].get_or_init(|| FunctionMask::new(version))
    }

    /// Build the mask for `version`
    pub fn new(version: SymbolVersion) -> Self {
        let size = version.size();
        let mut mask = Self {
            size,
            cells: vec![false; size * size],
            version,
        };

        // Finder patterns + separators (8x8 areas, clipped to bounds)
        mask.mark_finder_area(0, 0);
        mask.mark_finder_area(size - 7, 0);
        mask.mark_finder_area(0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i);
            mask.set(i, 6);
        }

        // Alignment patterns, except the three that would overlap finders
        let align = alignment_pattern_positions(version);
        let last = align.len().saturating_sub(1);
        for (i, &cx) in align.iter().enumerate() {
            for (j, &cy) in align.iter().enumerate() {
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        mask.set(cx as usize - 2 + dx, cy as usize - 2 + dy);
                    }
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i);
            mask.set(i, 8);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8);
            mask.set(8, size - 1 - i);
        }

        // Version info blocks: 3 wide by 6 tall top-right, 6 wide by 3 tall bottom-left
        if version.has_version_info() {
            for long in 0..6 {
                for short in 0..3 {
                    mask.set(size - 11 + short, long);
                    mask.set(long, size - 11 + short);
                }
            }
        }

        mask
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.size
    }

    /// Version this mask belongs to
    pub fn version(&self) -> SymbolVersion {
        self.version
    }

    /// Whether column `x`, row `y` is a function module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.size + x]
    }

    /// Number of data modules
    pub fn data_modules_count(&self) -> usize {
        self.cells.iter().filter(|&&f| !f).count()
    }

    fn set(&mut self, x: usize, y: usize) {
        if x < self.size && y < self.size {
            self.cells[y * self.size + x] = true;
        }
    }

    fn mark_finder_area(&mut self, x: usize, y: usize) {
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(self.size);
        let end_y = (y + 8).min(self.size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                self.set(xx, yy);
            }
        }
    }
}

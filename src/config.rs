//! Scanner tunables, overridable through `QR_*` environment variables

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Tunables for one [`QrScanner`](crate::QrScanner)
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Allowed relative deviation of each run from the 1:1:3:1:1 finder ratio
    pub finder_tolerance: f64,
    /// Maximum distance in pixels between a finder hit and a cluster mean
    pub cluster_distance: f64,
    /// Maximum Hamming distance accepted when matching format information
    pub max_format_distance: u32,
    /// Half-size of the alignment search window, in modules
    pub alignment_search_modules: f64,
    /// Scan image rows for finder patterns on the rayon pool
    pub parallel_rows: bool,
    /// Trust the encoded version block over the geometric estimate (v7+)
    pub read_version_info: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            finder_tolerance: 0.4,
            cluster_distance: 5.0,
            max_format_distance: 3,
            alignment_search_modules: 4.0,
            parallel_rows: true,
            read_version_info: true,
        }
    }
}

impl ScanConfig {
    /// Defaults overridden by any valid `QR_*` environment variable.
    ///
    /// Values are clamped; the format distance never exceeds 3 because the
    /// format code's minimum distance is 7.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            finder_tolerance: parse_env_f64("QR_FINDER_TOLERANCE", defaults.finder_tolerance)
                .clamp(0.05, 0.9),
            cluster_distance: parse_env_f64("QR_CLUSTER_DISTANCE", defaults.cluster_distance)
                .clamp(0.5, 100.0),
            max_format_distance: parse_env_u32(
                "QR_MAX_FORMAT_DISTANCE",
                defaults.max_format_distance,
            )
            .min(3),
            alignment_search_modules: parse_env_f64(
                "QR_ALIGNMENT_SEARCH_MODULES",
                defaults.alignment_search_modules,
            )
            .clamp(1.5, 16.0),
            parallel_rows: parse_env_bool_u8("QR_PARALLEL_ROWS", defaults.parallel_rows),
            read_version_info: parse_env_bool_u8(
                "QR_READ_VERSION_INFO",
                defaults.read_version_info,
            ),
        }
    }
}

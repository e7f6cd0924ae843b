/// Binary pixel grids and windows
pub mod image;
/// Generic 2D points and vector operations
pub mod point;
/// Versions, format information and sampled module grids
pub mod qr_code;
/// Segments and decoded content
pub mod segment;

pub use image::{BinaryImage, DARK, LIGHT, Rect};
pub use point::Point;
pub use qr_code::{ECLevel, FormatInfo, MaskPattern, ParsedSymbol, SymbolVersion};
pub use segment::{ContentType, DataSegment, DecodedData, Mode, Payload, ScanResult};

//! The scan pipeline: locate, estimate, sample, decode

use log::debug;
use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::decoder::{
    CodewordAssembler, DataSegmenter, ErrorCorrector, FormatInfoDecoder, ReedSolomonDecoder,
    SegmentDecoder, VersionInfoDecoder,
};
use crate::detector::{
    AlignmentPatternLocator, FinderPatternLocator, FinderPatternTrio, GeometryEstimator,
    PerspectiveSampler, SymbolGeometry,
};
use crate::error::Result;
use crate::models::{
    BinaryImage, DataSegment, DecodedData, FormatInfo, ParsedSymbol, Point, Rect, ScanResult,
    SymbolVersion,
};

/// Anything that can turn a binary image into a scan result
pub trait CodeScanner {
    /// Scan one image; failures are reported as an unsuccessful result
    fn scan(&self, image: &BinaryImage) -> ScanResult;
}

/// Everything recovered from a successfully decoded symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Symbol version (from the version block when readable)
    pub version: SymbolVersion,
    /// Error correction level and data mask
    pub format: FormatInfo,
    /// Segments of the corrected data
    pub segments: Vec<DataSegment>,
    /// Typed content
    pub data: DecodedData,
    /// Located finder patterns
    pub trio: FinderPatternTrio,
    /// Alignment pattern centre, when one was found and used
    pub alignment: Option<Point>,
}

impl From<Result<Decoded>> for ScanResult {
    fn from(result: Result<Decoded>) -> Self {
        match result {
            Ok(decoded) => decoded.data.into(),
            Err(_) => ScanResult::failure(),
        }
    }
}

/// A sampled symbol and how it was sampled
#[derive(Debug, Clone, PartialEq)]
pub struct Sampled {
    /// Module grid
    pub symbol: ParsedSymbol,
    /// Located finder patterns
    pub trio: FinderPatternTrio,
    /// Geometry estimated from the finders
    pub geometry: SymbolGeometry,
    /// Alignment pattern centre used for the projective transform
    pub alignment: Option<Point>,
}

/// QR scanner: finder location through payload decoding
pub struct QrScanner {
    config: ScanConfig,
    corrector: Box<dyn ErrorCorrector>,
}

impl Default for QrScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl QrScanner {
    /// Scanner with the Reed-Solomon block corrector
    pub fn new(config: ScanConfig) -> Self {
        Self::with_corrector(config, Box::new(ReedSolomonDecoder))
    }

    /// Scanner with a custom block corrector
    pub fn with_corrector(config: ScanConfig, corrector: Box<dyn ErrorCorrector>) -> Self {
        Self { config, corrector }
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Locate the finder trio
    pub fn locate_finders(&self, image: &BinaryImage) -> Result<FinderPatternTrio> {
        FinderPatternLocator::new(&self.config).locate(image)
    }

    /// Locate, estimate and resample the symbol.
    ///
    /// For versions 7 and up the version block of the sampled grid overrides the
    /// geometric estimate when it decodes to a different version.
    pub fn sample(&self, image: &BinaryImage) -> Result<Sampled> {
        let trio = self.locate_finders(image)?;
        let geometry = GeometryEstimator.estimate(&trio)?;
        let sampled = self.sample_at(image, trio, geometry, geometry.version)?;

        if !self.config.read_version_info || !geometry.version.has_version_info() {
            return Ok(sampled);
        }
        match VersionInfoDecoder::default().decode(&sampled.symbol) {
            Ok(version) if version != geometry.version => {
                debug!(
                    "version block reads {version}, geometry estimated {}; resampling",
                    geometry.version
                );
                self.sample_at(image, trio, geometry, version)
            }
            Ok(_) => Ok(sampled),
            Err(err) => {
                debug!("{err}; keeping estimated version {}", geometry.version);
                Ok(sampled)
            }
        }
    }

    fn sample_at(
        &self,
        image: &BinaryImage,
        trio: FinderPatternTrio,
        geometry: SymbolGeometry,
        version: SymbolVersion,
    ) -> Result<Sampled> {
        let alignment = self.find_alignment(image, &trio, &geometry, version);
        let symbol = PerspectiveSampler.sample(image, &trio, alignment, version)?;
        Ok(Sampled {
            symbol,
            trio,
            geometry,
            alignment,
        })
    }

    /// Alignment centre near its predicted position. A miss falls back to the
    /// affine transform rather than failing the scan.
    fn find_alignment(
        &self,
        image: &BinaryImage,
        trio: &FinderPatternTrio,
        geometry: &SymbolGeometry,
        version: SymbolVersion,
    ) -> Option<Point> {
        if version.number() < 2 {
            return None;
        }
        let predicted = PerspectiveSampler.predict_alignment(trio, version)?;
        let half = self.config.alignment_search_modules * geometry.module_size;
        let window = Rect::around(predicted, half, image.width(), image.height())?;
        match AlignmentPatternLocator.locate(image, window) {
            Ok(centre) => Some(centre),
            Err(err) => {
                debug!("{err} near ({:.1}, {:.1}); using affine sampling", predicted.x, predicted.y);
                None
            }
        }
    }

    /// Full decode with the typed failure of the stage that stopped it.
    ///
    /// A missing alignment pattern is not a failure: the symbol is sampled
    /// through the finder-only affine transform and [`Decoded::alignment`] is
    /// `None`. Only the finder search reports [`crate::ScanError::PatternNotFound`].
    pub fn decode(&self, image: &BinaryImage) -> Result<Decoded> {
        let Sampled {
            symbol,
            trio,
            alignment,
            ..
        } = self.sample(image)?;
        self.decode_symbol(&symbol).map(|(format, segments, data)| Decoded {
            version: symbol.version(),
            format,
            segments,
            data,
            trio,
            alignment,
        })
    }

    /// Decode an already sampled module grid
    pub fn decode_symbol(
        &self,
        symbol: &ParsedSymbol,
    ) -> Result<(FormatInfo, Vec<DataSegment>, DecodedData)> {
        let format = FormatInfoDecoder::new(self.config.max_format_distance).decode(symbol)?;
        let data_codewords = CodewordAssembler::new(self.corrector.as_ref()).assemble(symbol, format)?;
        let segments = DataSegmenter.segment(&data_codewords, symbol.version())?;
        let data = SegmentDecoder.decode_all(&segments)?;
        Ok((format, segments, data))
    }

    /// Scan independent images concurrently
    pub fn scan_batch(&self, images: &[BinaryImage]) -> Vec<ScanResult> {
        images.par_iter().map(|image| self.scan(image)).collect()
    }
}

impl CodeScanner for QrScanner {
    fn scan(&self, image: &BinaryImage) -> ScanResult {
        let result = self.decode(image);
        if let Err(err) = &result {
            debug!("scan failed: {err}");
        }
        result.into()
    }
}

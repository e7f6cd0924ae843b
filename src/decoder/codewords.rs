/// Codeword extraction, block deinterleaving and error correction
use log::{debug, trace};

use crate::decoder::bitstream::{data_module_order, pack_bits};
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::reed_solomon::ErrorCorrector;
use crate::decoder::tables::{BlockLayout, block_layout};
use crate::error::{Result, ScanError};
use crate::models::{FormatInfo, ParsedSymbol};

/// One Reed-Solomon block as stored in the symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Data codewords
    pub data: Vec<u8>,
    /// Error correction codewords
    pub ec: Vec<u8>,
}

/// Reads the data area of a symbol and turns it into corrected data codewords
pub struct CodewordAssembler<'a> {
    corrector: &'a dyn ErrorCorrector,
}

impl<'a> CodewordAssembler<'a> {
    /// Assembler correcting each block with `corrector`
    pub fn new(corrector: &'a dyn ErrorCorrector) -> Self {
        Self { corrector }
    }

    /// Corrected data codewords of all blocks, in block order
    pub fn assemble(&self, symbol: &ParsedSymbol, format: FormatInfo) -> Result<Vec<u8>> {
        let layout = block_layout(symbol.version(), format.ec_level);
        let codewords = read_codewords(symbol, format);
        trace!(
            "read {} codewords for {} blocks (layout {:?}/{:?})",
            codewords.len(),
            layout.num_blocks(),
            layout.data_block_lengths,
            layout.ec_block_lengths
        );
        self.correct_blocks(&codewords, &layout)
    }

    /// Correct every block and concatenate the data parts
    pub fn correct_blocks(&self, codewords: &[u8], layout: &BlockLayout) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(layout.data_codewords());
        for (index, block) in split_blocks(codewords, layout).into_iter().enumerate() {
            let corrected = self.corrector.correct(&block.data, &block.ec).map_err(|_| {
                debug!("block {index} of {} is uncorrectable", layout.num_blocks());
                ScanError::BlockCorrectionFailed { block: index }
            })?;
            data.extend_from_slice(&corrected);
        }
        Ok(data)
    }
}

/// Unmasked data-area bits packed into codewords, in placement order
pub fn read_codewords(symbol: &ParsedSymbol, format: FormatInfo) -> Vec<u8> {
    let func = FunctionMask::for_version(symbol.version());
    let bits = data_module_order(func)
        .into_iter()
        .map(|(x, y)| symbol.is_dark(x, y) ^ format.mask.is_masked(x, y));
    pack_bits(bits)
}

/// Undo the round-robin interleaving. Data codewords come first, one from each
/// block in turn (short blocks run out first), then the EC codewords the same
/// way. Codewords missing from a short stream read as zero.
pub fn split_blocks(codewords: &[u8], layout: &BlockLayout) -> Vec<Block> {
    let mut blocks: Vec<Block> = layout
        .data_block_lengths
        .iter()
        .zip(&layout.ec_block_lengths)
        .map(|(&data_len, &ec_len)| Block {
            data: Vec::with_capacity(data_len),
            ec: Vec::with_capacity(ec_len),
        })
        .collect();
    let mut stream = codewords.iter().copied().chain(std::iter::repeat(0));

    let max_data = layout.data_block_lengths.iter().copied().max().unwrap_or(0);
    for i in 0..max_data {
        for (block, &len) in blocks.iter_mut().zip(&layout.data_block_lengths) {
            if i < len {
                block.data.push(stream.next().unwrap_or(0));
            }
        }
    }

    let max_ec = layout.ec_block_lengths.iter().copied().max().unwrap_or(0);
    for i in 0..max_ec {
        for (block, &len) in blocks.iter_mut().zip(&layout.ec_block_lengths) {
            if i < len {
                block.ec.push(stream.next().unwrap_or(0));
            }
        }
    }

    blocks
}

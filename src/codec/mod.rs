//! Fixed-width binary codec for flat genotypes.
//!
//! Every gene becomes one 64-bit block. Constants are scaled to integers,
//! offset to be non-negative, Gray-coded and then bit-interleaved so that
//! numerically close values share long bit prefixes. Operators and input
//! references use reserved codewords taken from a disjoint part of the same
//! space, which makes the whole mapping bijective on grammar-conformant
//! genotypes.
//!
//! # Layout of one block
//!
//! Given the 64-bit Gray word `g` written MSB-first as `f0 … f31 s0 … s31`,
//! the second half is reversed (`r_i = s_{31-i}`) and interleaved with the
//! first: `r0 f0 r1 f1 … r31 f31`.
//!
//! # Examples
//!
//! ```
//! use u_symreg::codec::Codec;
//!
//! let codec = Codec::new(1000.0).unwrap();
//! let bits = codec.encode_value(12.5);
//! assert_eq!(bits.len(), 64);
//! assert_eq!(codec.decode_value(&bits).unwrap(), 12.5);
//! ```

use crate::error::{Result, SymregError};
use crate::genotype::Genotype;
use crate::grammar::{Gene, Operator};

/// Bits per encoded gene.
pub const GENE_BITS: usize = 64;

/// Fixed resolution of encoded constants.
pub const SCALE: f64 = 1e6;

/// Input references that have a reserved codeword (`INPUT_0..INPUT_9`).
pub const MAX_INPUTS: usize = 10;

/// Largest `numerical_value_max` whose offset range stays below `2^63`.
pub const VALUE_MAX_LIMIT: f64 = 4.6e12;

/// Tag bit that separates reserved codewords from constants.
const RESERVED_TAG: u64 = 1 << 63;

const OPERATOR_COUNT: usize = Operator::ALL.len();

/// Bijective gene ↔ bitstring codec bound to a value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Codec {
    numerical_value_max: f64,
    offset: i64,
}

impl Codec {
    /// Creates a codec clamping constants into `[-max, max]`.
    ///
    /// Fails unless `0 < max ≤ 4.6e12`.
    pub fn new(numerical_value_max: f64) -> Result<Self> {
        if !(numerical_value_max > 0.0 && numerical_value_max <= VALUE_MAX_LIMIT) {
            return Err(SymregError::config(
                "numerical_value_max",
                format!("must be in (0, {VALUE_MAX_LIMIT:e}], got {numerical_value_max}"),
            ));
        }
        Ok(Self {
            numerical_value_max,
            offset: (numerical_value_max * SCALE).round() as i64,
        })
    }

    pub fn numerical_value_max(&self) -> f64 {
        self.numerical_value_max
    }

    /// Encodes one constant as a 64-character bitstring.
    ///
    /// Values outside `[-max, max]` are clamped. NaN encodes as zero.
    pub fn encode_value(&self, value: f64) -> String {
        to_bits(self.encode_block(value))
    }

    /// Decodes a 64-character constant codeword.
    pub fn decode_value(&self, bits: &str) -> Result<f64> {
        check_bits(bits)?;
        if bits.len() != GENE_BITS {
            return Err(SymregError::InvalidBitLength(bits.len()));
        }
        Ok(self.decode_block(parse_block(bits.as_bytes())))
    }

    /// Encodes every gene and concatenates the blocks.
    pub fn encode_genotype(&self, genotype: &Genotype) -> Result<String> {
        let mut out = String::with_capacity(genotype.len() * GENE_BITS);
        for gene in genotype.genes() {
            out.push_str(&to_bits(self.encode_gene(gene)?));
        }
        Ok(out)
    }

    /// Parses the `;`-separated text form, then encodes it.
    pub fn encode_text(&self, text: &str) -> Result<String> {
        self.encode_genotype(&text.parse()?)
    }

    /// Splits into 64-bit blocks and decodes each one.
    pub fn decode_genotype(&self, bits: &str) -> Result<Genotype> {
        check_bits(bits)?;
        if bits.len() % GENE_BITS != 0 {
            return Err(SymregError::InvalidBitLength(bits.len()));
        }
        let genes = bits
            .as_bytes()
            .chunks(GENE_BITS)
            .map(|chunk| self.decode_gene(parse_block(chunk)))
            .collect();
        Ok(Genotype::from_genes(genes))
    }

    /// Decodes into the `;`-separated text form.
    pub fn decode_text(&self, bits: &str) -> Result<String> {
        Ok(self.decode_genotype(bits)?.to_string())
    }

    fn encode_gene(&self, gene: &Gene) -> Result<u64> {
        match *gene {
            Gene::Constant(x) => Ok(self.encode_block(x)),
            Gene::Input(index) if index < MAX_INPUTS => {
                Ok(reserved_codeword(OPERATOR_COUNT + index))
            }
            Gene::Input(index) => Err(SymregError::InputOutOfRange {
                index,
                available: MAX_INPUTS,
            }),
            Gene::Operator(op) => Ok(reserved_codeword(op.index())),
        }
    }

    fn decode_gene(&self, block: u64) -> Gene {
        match reserved_index(block) {
            Some(k) if k < OPERATOR_COUNT => Gene::Operator(Operator::ALL[k]),
            Some(k) => Gene::Input(k - OPERATOR_COUNT),
            None => Gene::Constant(self.decode_block(block)),
        }
    }

    fn encode_block(&self, value: f64) -> u64 {
        let max = self.numerical_value_max;
        let clamped = if value.is_nan() {
            0.0
        } else {
            value.clamp(-max, max)
        };
        let scaled = (clamped * SCALE).round() as i64 + self.offset;
        interleave(gray(scaled.max(0) as u64))
    }

    fn decode_block(&self, block: u64) -> f64 {
        let raw = gray_inverse(deinterleave(block));
        (raw as i128 - self.offset as i128) as f64 / SCALE
    }
}

/// Codeword of the `k`-th entry in `[operators..., INPUT_0..INPUT_9]`.
fn reserved_codeword(k: usize) -> u64 {
    interleave(gray(RESERVED_TAG | k as u64))
}

fn reserved_index(block: u64) -> Option<usize> {
    let raw = gray_inverse(deinterleave(block));
    if raw & RESERVED_TAG == 0 {
        return None;
    }
    let k = (raw & !RESERVED_TAG) as usize;
    (k < OPERATOR_COUNT + MAX_INPUTS).then_some(k)
}

fn gray(v: u64) -> u64 {
    v ^ (v >> 1)
}

fn gray_inverse(mut g: u64) -> u64 {
    let mut v = 0;
    while g != 0 {
        v ^= g;
        g >>= 1;
    }
    v
}

/// MSB-first bit `i` of the output is `r_{i/2}` for even `i`, `f_{i/2}` for odd.
fn interleave(word: u64) -> u64 {
    let mut out = 0u64;
    for i in 0..32 {
        // r_i is raw bit i (LSB side), f_i is raw bit 63 - i.
        out |= ((word >> i) & 1) << (63 - 2 * i);
        out |= ((word >> (63 - i)) & 1) << (62 - 2 * i);
    }
    out
}

fn deinterleave(block: u64) -> u64 {
    let mut word = 0u64;
    for i in 0..32 {
        word |= ((block >> (63 - 2 * i)) & 1) << i;
        word |= ((block >> (62 - 2 * i)) & 1) << (63 - i);
    }
    word
}

fn to_bits(block: u64) -> String {
    format!("{block:064b}")
}

fn check_bits(bits: &str) -> Result<()> {
    match bits.chars().find(|c| *c != '0' && *c != '1') {
        Some(c) => Err(SymregError::InvalidBit(c)),
        None => Ok(()),
    }
}

/// Folds an already checked `0`/`1` block, MSB first.
fn parse_block(block: &[u8]) -> u64 {
    block
        .iter()
        .fold(0u64, |acc, b| (acc << 1) | u64::from(*b == b'1'))
}

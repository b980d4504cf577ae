//! Pixel-value differencing (PVD) steganography.
//!
//! Bits are hidden in the difference of horizontally adjacent pixel pairs of
//! the same channel and row. The number of bits a pair carries depends on its
//! difference (see [`capacity`]), so edges carry more than smooth regions.
//!
//! The payload is framed as
//!
//! ```text
//! [32-bit big-endian message bit length][message bits]
//! ```
//!
//! and pairs are visited channel by channel, row by row, columns `(0,1)`,
//! `(2,3)`, ... The last column of an odd-width image is never used. Encoder
//! and decoder must agree on this order exactly.
//!
//! Two variants exist:
//!
//! - [`PvdVariant::RangePreserving`] moves each pair to a difference inside
//!   the same capacity range, so the decoder always recomputes the same
//!   capacity. Round-trips are exact and embedding is refused up front when
//!   the carrier is too small.
//! - [`PvdVariant::Legacy`] keeps the classic update rule bit for bit, for
//!   reading and writing files made by older encoders. It writes the raw
//!   value as the new difference, which may fall into a smaller capacity range
//!   or be clamped at zero; both corrupt the payload silently. Its decoder
//!   reads each difference at full binary width but advances the length
//!   prefix by the pair's capacity only, and keeps a trailing partial byte.

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::capacity::{capacity, range_lower_bound};
use super::image::PixelGrid;
use super::{Scheme, StegoCodec, StegoError};
use crate::bits::{
    bits_to_uint, decode_text, decode_text_with_remainder, encode_text, BitString, BITS_PER_CHAR,
};

/// Width of the message length header.
pub const LENGTH_PREFIX_BITS: usize = 32;

/// Pixel update rule used by [`PvdImageCodec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PvdVariant {
    /// New difference stays in the original capacity range. Round-trip safe.
    #[default]
    #[value(alias = "range")]
    RangePreserving,
    /// Classic update rule. Not round-trip safe on textured images.
    Legacy,
}

/// Adaptive-rate image codec over pixel pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PvdImageCodec {
    variant: PvdVariant,
}

impl PvdImageCodec {
    pub fn new(variant: PvdVariant) -> Self {
        Self { variant }
    }

    /// Codec using the classic update rule.
    pub fn legacy() -> Self {
        Self::new(PvdVariant::Legacy)
    }

    pub fn variant(&self) -> PvdVariant {
        self.variant
    }

    fn recover_bits(&self, diff: u8) -> BitString {
        match self.variant {
            PvdVariant::RangePreserving => recover_range_preserving(diff),
            PvdVariant::Legacy => recover_legacy(diff),
        }
    }
}

impl StegoCodec for PvdImageCodec {
    type Carrier = PixelGrid;

    fn scheme(&self) -> Scheme {
        Scheme::PvdImage
    }

    /// Sum of pair capacities for the carrier as it is now.
    ///
    /// Exact for [`PvdVariant::RangePreserving`]; only an estimate for
    /// [`PvdVariant::Legacy`], where capacities drift during embedding.
    fn capacity_bits(&self, carrier: &PixelGrid) -> usize {
        let samples = carrier.samples();
        pair_offsets(carrier)
            .map(|(a, b)| usize::from(capacity(samples[a].abs_diff(samples[b]))))
            .sum()
    }

    fn max_message_chars(&self, carrier: &PixelGrid) -> usize {
        self.capacity_bits(carrier).saturating_sub(LENGTH_PREFIX_BITS) / BITS_PER_CHAR
    }

    fn embed(&self, carrier: &mut PixelGrid, text: &str) -> Result<(), StegoError> {
        let framed = frame(text)?;

        if self.variant == PvdVariant::RangePreserving {
            let available = self.capacity_bits(carrier);
            debug!("pvd-image: {} framed bits, {available} available", framed.len());
            if framed.len() > available {
                return Err(StegoError::CapacityExceeded {
                    scheme: Scheme::PvdImage,
                    needed: framed.len(),
                    available,
                });
            }
        }

        let pairs: Vec<(usize, usize)> = pair_offsets(carrier).collect();
        let samples = carrier.samples_mut();
        let bits = framed.as_slice();
        let mut cursor = 0;
        let mut used = 0;

        for (a, b) in pairs {
            if cursor >= bits.len() {
                break;
            }
            let (p1, p2) = (samples[a], samples[b]);
            let cap = usize::from(capacity(p1.abs_diff(p2)));
            let end = (cursor + cap).min(bits.len());
            let chunk = &bits[cursor..end];
            cursor = end;

            let (q1, q2) = match self.variant {
                PvdVariant::RangePreserving => embed_pair_range_preserving(p1, p2, chunk),
                PvdVariant::Legacy => embed_pair_legacy(p1, p2, chunk),
            };
            samples[a] = q1;
            samples[b] = q2;
            used += 1;
        }

        if cursor < bits.len() {
            warn!(
                "pvd-image: carrier exhausted after {cursor} of {} bits, payload is truncated",
                bits.len()
            );
        }
        debug!("pvd-image: embedded {cursor} bits into {used} pairs");
        Ok(())
    }

    fn extract(&self, carrier: &PixelGrid) -> String {
        let samples = carrier.samples();
        let mut reader = FrameReader::new();
        let mut visited = 0;

        for (a, b) in pair_offsets(carrier) {
            let diff = samples[a].abs_diff(samples[b]);
            let bits = self.recover_bits(diff);
            reader.push_counted(bits.as_slice(), usize::from(capacity(diff)));
            visited += 1;
            if reader.is_done() {
                break;
            }
        }

        match reader.state() {
            FrameState::CollectingLength { counted, .. } => {
                debug!("pvd-image: only {counted} length bits found, no payload");
            }
            FrameState::CollectingMessage { target, bits } => {
                warn!(
                    "pvd-image: carrier exhausted after {} of {target} message bits",
                    bits.len()
                );
            }
            FrameState::Done { bits } => {
                debug!("pvd-image: recovered {} bits from {visited} pairs", bits.len());
            }
        }
        match self.variant {
            PvdVariant::RangePreserving => reader.finish(),
            PvdVariant::Legacy => reader
                .into_message()
                .map(|bits| decode_text_with_remainder(bits.as_slice()))
                .unwrap_or_default(),
        }
    }
}

/// Builds `[32-bit length][message bits]`.
fn frame(text: &str) -> Result<BitString, StegoError> {
    let message = encode_text(text)?;
    let length = u32::try_from(message.len()).map_err(|_| StegoError::CapacityExceeded {
        scheme: Scheme::PvdImage,
        needed: message.len(),
        available: u32::MAX as usize,
    })?;

    let mut framed = BitString::with_capacity(LENGTH_PREFIX_BITS + message.len());
    framed.push_uint(u64::from(length), LENGTH_PREFIX_BITS);
    framed.extend_from_bits(message.as_slice());
    Ok(framed)
}

/// Flat sample offsets of every pixel pair, in traversal order.
fn pair_offsets(grid: &PixelGrid) -> impl Iterator<Item = (usize, usize)> {
    let (rows, cols, channels) = grid.dimensions();
    (0..channels).flat_map(move |channel| {
        (0..rows).flat_map(move |row| {
            (0..cols / 2).map(move |pair| {
                let first = (row * cols + pair * 2) * channels + channel;
                (first, first + channels)
            })
        })
    })
}

/// Rewrites a pair so that `|q1 - q2| == target`.
///
/// The larger pixel stays put and the smaller one moves; if that would go
/// below zero the pair becomes `(0, target)` in the original orientation.
fn with_difference(p1: u8, p2: u8, target: u8) -> (u8, u8) {
    if p1 > p2 {
        match p1.checked_sub(target) {
            Some(q2) => (p1, q2),
            None => (target, 0),
        }
    } else {
        match p2.checked_sub(target) {
            Some(q1) => (q1, p2),
            None => (0, target),
        }
    }
}

/// Range-preserving update. `chunk` holds up to `capacity(diff)` bits; a short
/// final chunk is left-aligned so the decoder reads its bits first.
fn embed_pair_range_preserving(p1: u8, p2: u8, chunk: &[bool]) -> (u8, u8) {
    let diff = p1.abs_diff(p2);
    let cap = usize::from(capacity(diff));
    let value = bits_to_uint(chunk) << (cap - chunk.len());
    // value < 2^cap, and every range is at least that wide
    with_difference(p1, p2, range_lower_bound(diff) + value as u8)
}

/// Classic update rule: the smaller pixel is replaced by `larger - value`,
/// clamped at zero.
fn embed_pair_legacy(p1: u8, p2: u8, chunk: &[bool]) -> (u8, u8) {
    let value = bits_to_uint(chunk) as i32;
    let fixed = p1.max(p2);
    let shifted = i32::from(fixed) - value;
    if shifted < 0 {
        warn!(
            "pvd-image: pair ({p1}, {p2}) clamped at zero, embedded value {value} will not decode"
        );
    }
    let shifted = shifted.clamp(0, 255) as u8;
    if p1 > p2 {
        (p1, shifted)
    } else {
        (shifted, p2)
    }
}

fn recover_range_preserving(diff: u8) -> BitString {
    let cap = usize::from(capacity(diff));
    let value = (diff - range_lower_bound(diff)) & ((1u8 << cap) - 1);
    let mut bits = BitString::with_capacity(cap);
    bits.push_uint(u64::from(value), cap);
    bits
}

/// The raw difference in binary, zero-padded to at least `capacity(diff)`
/// digits. Wider differences yield more bits than the capacity.
fn recover_legacy(diff: u8) -> BitString {
    let significant = (u8::BITS - diff.leading_zeros()) as usize;
    let width = significant.max(usize::from(capacity(diff)));
    let mut bits = BitString::with_capacity(width);
    bits.push_uint(u64::from(diff), width);
    bits
}

/// Progress of a [`FrameReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameState {
    /// Fewer than 32 length bits counted so far. `bits` may hold more than
    /// `counted` when groups are wider than their pair's capacity.
    CollectingLength { bits: BitString, counted: usize },
    /// Length known; message bits still arriving.
    CollectingMessage { target: usize, bits: BitString },
    /// Message complete, truncated to exactly `target` bits.
    Done { bits: BitString },
}

/// Reassembles a length-prefixed frame from per-pair bit groups.
///
/// A group that straddles the end of the length prefix is split: the leading
/// bits complete the prefix and the rest start the message. The prefix value
/// is read from every bit collected before the split and saturates at
/// `usize::MAX`.
#[derive(Debug, Clone)]
pub struct FrameReader {
    state: FrameState,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            state: FrameState::CollectingLength {
                bits: BitString::with_capacity(LENGTH_PREFIX_BITS),
                counted: 0,
            },
        }
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, FrameState::Done { .. })
    }

    /// Feeds the bits recovered from one pair. Ignored once done.
    pub fn push(&mut self, incoming: &[bool]) {
        self.push_counted(incoming, incoming.len());
    }

    /// Feeds a group of which only `counted` bits advance the length prefix.
    ///
    /// The whole group is still appended. When `counted` crosses the end of
    /// the prefix, the group is split after the bits still needed.
    pub fn push_counted(&mut self, incoming: &[bool], counted: usize) {
        let state = std::mem::replace(
            &mut self.state,
            FrameState::Done {
                bits: BitString::new(),
            },
        );

        self.state = match state {
            FrameState::CollectingLength {
                mut bits,
                counted: so_far,
            } => {
                let needed = LENGTH_PREFIX_BITS - so_far;
                if counted < needed {
                    bits.extend_from_bits(incoming);
                    FrameState::CollectingLength {
                        bits,
                        counted: so_far + counted,
                    }
                } else if counted == needed {
                    bits.extend_from_bits(incoming);
                    Self::collect_message(saturating_length(bits.as_slice()), BitString::new())
                } else {
                    let split = needed.min(incoming.len());
                    bits.extend_from_bits(&incoming[..split]);
                    Self::collect_message(
                        saturating_length(bits.as_slice()),
                        BitString::from(incoming[split..].to_vec()),
                    )
                }
            }
            FrameState::CollectingMessage { target, mut bits } => {
                bits.extend_from_bits(incoming);
                Self::collect_message(target, bits)
            }
            done @ FrameState::Done { .. } => done,
        };
    }

    fn collect_message(target: usize, mut bits: BitString) -> FrameState {
        if bits.len() >= target {
            bits.truncate(target);
            FrameState::Done { bits }
        } else {
            FrameState::CollectingMessage { target, bits }
        }
    }

    /// Message bits collected so far, or `None` if the length prefix never
    /// completed.
    pub fn into_message(self) -> Option<BitString> {
        match self.state {
            FrameState::CollectingLength { .. } => None,
            FrameState::CollectingMessage { bits, .. } | FrameState::Done { bits } => Some(bits),
        }
    }

    /// Decodes whatever message bits were collected.
    ///
    /// Returns an empty string if the length prefix never completed, and a
    /// partial message if the carrier ran out early.
    pub fn finish(self) -> String {
        self.into_message()
            .map(|bits| decode_text(bits.as_slice()))
            .unwrap_or_default()
    }
}

fn saturating_length(bits: &[bool]) -> usize {
    bits.iter()
        .try_fold(0usize, |acc, &bit| acc.checked_mul(2)?.checked_add(usize::from(bit)))
        .unwrap_or(usize::MAX)
}

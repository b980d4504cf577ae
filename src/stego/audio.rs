//! WAV carriers and LSB audio steganography.
//!
//! [`PcmBuffer`] holds the raw frame bytes of an integer-PCM WAV file exactly
//! as they appear in its data chunk (little-endian, 8-bit samples unsigned),
//! together with the stream format. [`LsbAudioCodec`] hides one bit in the
//! low bit of each leading frame byte, followed by a null-byte terminator.
//!
//! Format: [8 bits per character][8 zero bits]
//! Every byte is one carrier slot, whatever the sample width.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::{lsb, Scheme, StegoCodec, StegoError};

/// Stream parameters copied verbatim from input to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Interleaved channels per frame.
    pub channels: u16,
    /// Bytes per sample (1 to 4).
    pub sample_width: u16,
    /// Frames per second.
    pub frame_rate: u32,
}

impl PcmFormat {
    /// Bytes per frame (all channels).
    pub fn frame_size(&self) -> usize {
        usize::from(self.channels) * usize::from(self.sample_width)
    }

    fn from_spec(spec: WavSpec) -> Result<Self, StegoError> {
        if spec.sample_format != SampleFormat::Int {
            return Err(StegoError::invalid(
                Scheme::WavContainer,
                "only integer PCM is supported, got float samples",
            ));
        }
        if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(StegoError::invalid(
                Scheme::WavContainer,
                format!("unsupported sample width: {} bits", spec.bits_per_sample),
            ));
        }
        Ok(Self {
            channels: spec.channels,
            sample_width: spec.bits_per_sample / 8,
            frame_rate: spec.sample_rate,
        })
    }

    fn to_spec(self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.frame_rate,
            bits_per_sample: self.sample_width * 8,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Raw PCM frames held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    format: PcmFormat,
    frames: Vec<u8>,
}

impl PcmBuffer {
    /// Creates a buffer from raw frame bytes.
    pub fn new(format: PcmFormat, frames: Vec<u8>) -> Result<Self, StegoError> {
        if format.channels == 0 || !(1..=4).contains(&format.sample_width) {
            return Err(StegoError::invalid(
                Scheme::WavContainer,
                format!(
                    "bad format: {} channels, {} bytes per sample",
                    format.channels, format.sample_width
                ),
            ));
        }
        if frames.len() % format.frame_size() != 0 {
            return Err(StegoError::invalid(
                Scheme::WavContainer,
                format!(
                    "{} bytes is not a whole number of {}-byte frames",
                    frames.len(),
                    format.frame_size()
                ),
            ));
        }
        Ok(Self { format, frames })
    }

    /// Loads a WAV file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let reader = WavReader::open(path.as_ref()).map_err(|e| {
            StegoError::invalid(
                Scheme::WavContainer,
                format!("{}: {e}", path.as_ref().display()),
            )
        })?;
        Self::from_reader(reader)
    }

    /// Decodes WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| StegoError::invalid(Scheme::WavContainer, e.to_string()))?;
        Self::from_reader(reader)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, StegoError> {
        let format = PcmFormat::from_spec(reader.spec())?;
        let width = usize::from(format.sample_width);

        let mut frames = Vec::with_capacity(reader.len() as usize * width);
        for sample in reader.into_samples::<i32>() {
            let sample =
                sample.map_err(|e| StegoError::invalid(Scheme::WavContainer, e.to_string()))?;
            push_sample_bytes(&mut frames, sample, width);
        }
        Self::new(format, frames)
    }

    fn write_to<W: Write + Seek>(&self, writer: W) -> Result<(), StegoError> {
        let failed = |e: hound::Error| StegoError::WriteFailed {
            container: Scheme::WavContainer,
            reason: e.to_string(),
        };

        let mut writer = WavWriter::new(writer, self.format.to_spec()).map_err(failed)?;
        for bytes in self.frames.chunks_exact(usize::from(self.format.sample_width)) {
            writer.write_sample(sample_from_bytes(bytes)).map_err(failed)?;
        }
        writer.finalize().map_err(failed)
    }

    /// Saves as a WAV file with the original format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write_to(file)
    }

    /// Returns the buffer encoded as WAV.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    pub fn format(&self) -> &PcmFormat {
        &self.format
    }

    /// Raw frame bytes, little-endian.
    pub fn frames(&self) -> &[u8] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [u8] {
        &mut self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len() / self.format.frame_size()
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.format.frame_rate)
    }
}

/// Appends the data-chunk bytes of one sample. 8-bit samples are stored
/// unsigned with a 128 offset, wider ones as signed little-endian.
fn push_sample_bytes(out: &mut Vec<u8>, sample: i32, width: usize) {
    if width == 1 {
        out.push((sample + 128) as u8);
    } else {
        out.extend_from_slice(&sample.to_le_bytes()[..width]);
    }
}

/// Inverse of [`push_sample_bytes`].
fn sample_from_bytes(bytes: &[u8]) -> i32 {
    match *bytes {
        [b] => i32::from(b) - 128,
        [b0, b1] => i32::from(i16::from_le_bytes([b0, b1])),
        [b0, b1, b2] => {
            let sign = if b2 & 0x80 != 0 { 0xFF } else { 0x00 };
            i32::from_le_bytes([b0, b1, b2, sign])
        }
        [b0, b1, b2, b3] => i32::from_le_bytes([b0, b1, b2, b3]),
        _ => unreachable!("sample width is validated to 1..=4 bytes"),
    }
}

/// One bit per frame byte, terminated by a null byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbAudioCodec;

impl StegoCodec for LsbAudioCodec {
    type Carrier = PcmBuffer;

    fn scheme(&self) -> Scheme {
        Scheme::LsbAudio
    }

    fn capacity_bits(&self, carrier: &PcmBuffer) -> usize {
        carrier.frames().len()
    }

    fn max_message_chars(&self, carrier: &PcmBuffer) -> usize {
        lsb::max_message_chars(carrier.frames().len())
    }

    fn embed(&self, carrier: &mut PcmBuffer, text: &str) -> Result<(), StegoError> {
        lsb::embed(carrier.frames_mut(), text, Scheme::LsbAudio)
    }

    fn extract(&self, carrier: &PcmBuffer) -> String {
        lsb::extract(carrier.frames(), Scheme::LsbAudio)
    }
}

/// Creates a 16-bit mono test buffer holding a 440 Hz tone.
#[cfg(test)]
pub(crate) fn create_test_audio(frame_count: usize) -> PcmBuffer {
    let format = PcmFormat {
        channels: 1,
        sample_width: 2,
        frame_rate: 44100,
    };
    let mut frames = Vec::with_capacity(frame_count * 2);
    for i in 0..frame_count {
        let t = i as f64 / 44100.0;
        let sample = (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i32;
        push_sample_bytes(&mut frames, sample, 2);
    }
    PcmBuffer::new(format, frames).unwrap()
}

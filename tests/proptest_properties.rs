use proptest::prelude::*;

use steganote::bits::{decode_text, encode_text};
use steganote::stego::{
    capacity, LsbAudioCodec, LsbImageCodec, PcmBuffer, PcmFormat, PixelGrid, PvdImageCodec,
    StegoCodec, StegoError,
};

fn latin1_text(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(1u8..=255, 0..max_len)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

fn grid(max_side: usize) -> impl Strategy<Value = PixelGrid> {
    (1usize..max_side, 1usize..max_side, 1usize..=4).prop_flat_map(|(rows, cols, channels)| {
        proptest::collection::vec(any::<u8>(), rows * cols * channels)
            .prop_map(move |samples| PixelGrid::new(rows, cols, channels, samples).unwrap())
    })
}

proptest! {
    #[test]
    fn prop_bits_roundtrip(text in latin1_text(64)) {
        let bits = encode_text(&text).unwrap();
        prop_assert_eq!(bits.len(), text.chars().count() * 8);
        prop_assert_eq!(decode_text(bits.as_slice()), text);
    }

    #[test]
    fn prop_capacity_monotonic(a in any::<u8>(), b in any::<u8>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(capacity(lo) <= capacity(hi));
        prop_assert!((1..=5).contains(&capacity(a)));
    }

    #[test]
    fn prop_lsb_image_roundtrip(mut carrier in grid(24), text in latin1_text(40)) {
        let original = carrier.clone();
        match LsbImageCodec.embed(&mut carrier, &text) {
            Ok(()) => prop_assert_eq!(LsbImageCodec.extract(&carrier), text),
            Err(StegoError::CapacityExceeded { needed, available, .. }) => {
                prop_assert_eq!(needed, text.chars().count() * 8 + 8);
                prop_assert!(needed > available);
                prop_assert_eq!(carrier, original);
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    #[test]
    fn prop_pvd_roundtrip(mut carrier in grid(32), text in latin1_text(40)) {
        let codec = PvdImageCodec::default();
        let original = carrier.clone();
        let available = codec.capacity_bits(&carrier);
        match codec.embed(&mut carrier, &text) {
            Ok(()) => {
                prop_assert!(32 + text.chars().count() * 8 <= available);
                prop_assert_eq!(codec.capacity_bits(&carrier), available);
                prop_assert_eq!(codec.extract(&carrier), text);
            }
            Err(StegoError::CapacityExceeded { needed, .. }) => {
                prop_assert!(needed > available);
                prop_assert_eq!(carrier, original);
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    #[test]
    fn prop_lsb_audio_roundtrip(
        frames in proptest::collection::vec(any::<u8>(), 0..1024).prop_map(|mut f| { f.truncate(f.len() / 4 * 4); f }),
        text in latin1_text(40),
    ) {
        let format = PcmFormat { channels: 2, sample_width: 2, frame_rate: 8000 };
        let mut audio = PcmBuffer::new(format, frames).unwrap();
        let fits = text.chars().count() * 8 + 8 <= audio.frames().len();
        let result = LsbAudioCodec.embed(&mut audio, &text);
        prop_assert_eq!(result.is_ok(), fits);
        if fits {
            prop_assert_eq!(LsbAudioCodec.extract(&audio), text);
        }
    }

    #[test]
    fn prop_extract_never_panics(carrier in grid(16)) {
        let _ = LsbImageCodec.extract(&carrier);
        let _ = PvdImageCodec::default().extract(&carrier);
        let _ = PvdImageCodec::legacy().extract(&carrier);
    }
}

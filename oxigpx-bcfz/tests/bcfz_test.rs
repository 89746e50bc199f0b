//! BCFZ decompression integration tests.

use oxigpx_bcfz::{BcfzDecoder, decompress_body};
use oxigpx_core::{BitReader, BitWriter, DecodeEvents, NoopEvents};
use proptest::prelude::*;
use std::cell::RefCell;

/// Assemble a BCFZ bit stream token by token.
struct StreamBuilder {
    writer: BitWriter,
}

impl StreamBuilder {
    fn new() -> Self {
        Self {
            writer: BitWriter::new(),
        }
    }

    fn with_declared_len(len: u32) -> Self {
        let mut builder = Self::new();
        builder.writer.write_bytes(&len.to_le_bytes());
        builder
    }

    /// Emit `bytes` as literal runs of at most three bytes.
    fn literals(mut self, bytes: &[u8]) -> Self {
        for run in bytes.chunks(3) {
            self.writer.write_bit(false);
            self.writer.write_bits_reversed(run.len() as u32, 2);
            self.writer.write_bytes(run);
        }
        self
    }

    fn back_reference(mut self, word_size: u8, offset: u32, size: u32) -> Self {
        self.writer.write_bit(true);
        self.writer.write_bits(word_size as u32, 4);
        self.writer.write_bits_reversed(offset, word_size);
        self.writer.write_bits_reversed(size, word_size);
        self
    }

    fn build(self) -> Vec<u8> {
        self.writer.into_vec()
    }
}

fn decode_raw(stream: &[u8], declared_len: usize) -> Vec<u8> {
    let mut reader = BitReader::new(stream);
    BcfzDecoder::new(declared_len).decode_raw(&mut reader, &NoopEvents)
}

#[derive(Default)]
struct Recorder {
    exhausted: RefCell<Vec<(usize, usize)>>,
    finished: RefCell<Vec<usize>>,
}

impl DecodeEvents for Recorder {
    fn stream_exhausted(&self, _bit_position: u64, produced: usize, declared_len: usize) {
        self.exhausted.borrow_mut().push((produced, declared_len));
    }

    fn decompressed(&self, produced: usize) {
        self.finished.borrow_mut().push(produced);
    }
}

#[test]
fn test_bcfz_literal_body_with_sub_header() {
    let body = StreamBuilder::with_declared_len(4 + 11)
        .literals(b"BCFSscore.gpif")
        .build();

    let output = decompress_body(&body, &NoopEvents).expect("length field present");
    // 14 literal bytes, declared 15: the loop runs out of real tokens and
    // the zero padding decodes as an empty literal run before the stream ends.
    assert_eq!(output, b"score.gpif");
}

#[test]
fn test_bcfz_mixed_tokens() {
    // "abcabcabc-" built from a literal, two back-references and a literal.
    let stream = StreamBuilder::new()
        .literals(b"abc")
        .back_reference(3, 3, 3)
        .back_reference(4, 6, 3)
        .literals(b"-")
        .build();

    assert_eq!(decode_raw(&stream, 10), b"abcabcabc-");
}

#[test]
fn test_bcfz_max_word_size() {
    let prefix: Vec<u8> = (0..=255).collect();
    let stream = StreamBuilder::new()
        .literals(&prefix)
        .back_reference(15, 256, 0x7FFF)
        .build();

    let output = decode_raw(&stream, 512);
    assert_eq!(output.len(), 512);
    assert_eq!(&output[..256], &output[256..]);
}

#[test]
fn test_bcfz_reports_exhaustion() {
    let stream = StreamBuilder::new().literals(b"abc").build();
    let recorder = Recorder::default();

    let mut reader = BitReader::new(&stream);
    let output = BcfzDecoder::new(1000).decode_raw(&mut reader, &recorder);

    assert_eq!(output, b"abc");
    assert_eq!(recorder.exhausted.borrow().as_slice(), &[(3, 1000)]);
    assert_eq!(recorder.finished.borrow().as_slice(), &[3]);
}

#[test]
fn test_bcfz_no_exhaustion_event_when_complete() {
    let stream = StreamBuilder::new().literals(b"abc").build();
    let recorder = Recorder::default();

    let mut reader = BitReader::new(&stream);
    BcfzDecoder::new(3).decode_raw(&mut reader, &recorder);

    assert!(recorder.exhausted.borrow().is_empty());
}

proptest! {
    /// All-literal streams decode to the literal bytes in order.
    #[test]
    fn prop_literals_concatenate(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let stream = StreamBuilder::new().literals(&bytes).build();
        prop_assert_eq!(decode_raw(&stream, bytes.len()), bytes);
    }

    /// offset == size == N repeats the preceding N bytes.
    #[test]
    fn prop_back_reference_repeats(
        bytes in prop::collection::vec(any::<u8>(), 1..200),
        n in 1u32..200,
    ) {
        let n = n.min(bytes.len() as u32);
        let stream = StreamBuilder::new()
            .literals(&bytes)
            .back_reference(8, n, n)
            .build();

        let output = decode_raw(&stream, bytes.len() + n as usize);
        let tail = &bytes[bytes.len() - n as usize..];
        prop_assert_eq!(&output[..bytes.len()], &bytes[..]);
        prop_assert_eq!(&output[bytes.len()..], tail);
    }

    /// A reference before the start appends min(offset, size) zeros.
    #[test]
    fn prop_out_of_range_zero_fill(
        prefix in prop::collection::vec(1u8..=255, 0..20),
        extra in 1u32..1000,
        size in 0u32..1000,
    ) {
        let offset = prefix.len() as u32 + extra;
        let stream = StreamBuilder::new()
            .literals(&prefix)
            .back_reference(11, offset, size)
            .build();

        let expected_len = prefix.len() + offset.min(size) as usize;
        let output = decode_raw(&stream, expected_len);
        prop_assert_eq!(output.len(), expected_len);
        prop_assert!(output[prefix.len()..].iter().all(|&b| b == 0));
    }

    /// Arbitrary input never fails past the length field and is deterministic.
    #[test]
    fn prop_arbitrary_input_is_deterministic(body in prop::collection::vec(any::<u8>(), 4..256)) {
        let first = decompress_body(&body, &NoopEvents);
        let second = decompress_body(&body, &NoopEvents);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first.ok(), second.ok());
    }
}

// src/display/encoding.rs
//! UTF-8 ↔ UTF-16 conversion at the native boundary.

use crate::error::EvaError;

/// Encodes `title` as NUL-terminated UTF-16 within `capacity` units.
///
/// Fails when the title plus terminator does not fit.
pub fn encode_title(title: &str, capacity: usize) -> Result<Vec<u16>, EvaError> {
    let mut units: Vec<u16> = title.encode_utf16().collect();
    if units.len() + 1 > capacity {
        return Err(EvaError::Encoding {
            context: "window title",
            detail: format!(
                "{} UTF-16 units do not fit a {}-unit buffer",
                units.len() + 1,
                capacity
            ),
        });
    }
    units.push(0);
    Ok(units)
}

/// Like [`encode_title`], but cuts the title at the last whole character
/// that fits. A zero capacity yields an empty buffer.
pub fn truncate_title(title: &str, capacity: usize) -> Vec<u16> {
    let Some(room) = capacity.checked_sub(1) else {
        return Vec::new();
    };
    let mut units = Vec::with_capacity(capacity);
    for ch in title.chars() {
        if units.len() + ch.len_utf16() > room {
            break;
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(ch.encode_utf16(&mut buf));
    }
    units.push(0);
    units
}

/// Result of feeding one code unit to a [`Utf16Decoder`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    /// Input that could not be decoded and was discarded.
    pub dropped: Option<EvaError>,
    /// A completed character.
    pub ch: Option<char>,
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

fn unpaired(unit: u16) -> EvaError {
    EvaError::Encoding {
        context: "keystroke",
        detail: format!("unpaired surrogate {:#06x}", unit),
    }
}

/// Reassembles characters from UTF-16 units delivered one at a time.
#[derive(Debug, Default)]
pub struct Utf16Decoder {
    pending_high: Option<u16>,
}

impl Utf16Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: u16) -> Decoded {
        let pending = self.pending_high.take();

        if is_high_surrogate(unit) {
            self.pending_high = Some(unit);
            return Decoded {
                dropped: pending.map(unpaired),
                ch: None,
            };
        }

        if is_low_surrogate(unit) {
            return match pending {
                Some(high) => {
                    let decoded = char::decode_utf16([high, unit])
                        .next()
                        .and_then(|r| r.ok());
                    match decoded {
                        Some(ch) => Decoded {
                            dropped: None,
                            ch: Some(ch),
                        },
                        None => Decoded {
                            dropped: Some(unpaired(high)),
                            ch: None,
                        },
                    }
                }
                None => Decoded {
                    dropped: Some(unpaired(unit)),
                    ch: None,
                },
            };
        }

        Decoded {
            dropped: pending.map(unpaired),
            // Every non-surrogate unit is a valid scalar value.
            ch: char::from_u32(unit as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(units: &[u16]) -> (String, usize) {
        let mut decoder = Utf16Decoder::new();
        let mut text = String::new();
        let mut dropped = 0;
        for &unit in units {
            let step = decoder.push(unit);
            dropped += step.dropped.is_some() as usize;
            text.extend(step.ch);
        }
        (text, dropped)
    }

    #[test]
    fn title_that_fits_is_nul_terminated() {
        let units = encode_title("Hello, eva!", 256).unwrap();
        assert_eq!(units.len(), 12);
        assert_eq!(units.last(), Some(&0));
    }

    #[test]
    fn oversized_title_is_an_encoding_error() {
        let err = encode_title("abcdef", 4).unwrap_err();
        assert!(matches!(err, EvaError::Encoding { context: "window title", .. }));
    }

    #[test]
    fn truncation_never_splits_a_surrogate_pair() {
        // "ab" + U+1F600 needs 2 + 2 units plus the terminator.
        let units = truncate_title("ab\u{1F600}", 4);
        assert_eq!(units, vec![b'a' as u16, b'b' as u16, 0]);
        assert_eq!(String::from_utf16(&units[..units.len() - 1]).unwrap(), "ab");
    }

    #[test]
    fn truncation_to_zero_capacity_is_empty() {
        assert!(truncate_title("title", 0).is_empty());
        assert_eq!(truncate_title("title", 1), vec![0]);
    }

    #[test]
    fn decoder_passes_bmp_characters_through() {
        let units: Vec<u16> = "hé€".encode_utf16().collect();
        assert_eq!(decode_all(&units), ("hé€".to_string(), 0));
    }

    #[test]
    fn decoder_joins_surrogate_pairs() {
        let units: Vec<u16> = "a\u{1F600}b".encode_utf16().collect();
        assert_eq!(units.len(), 4);
        assert_eq!(decode_all(&units), ("a\u{1F600}b".to_string(), 0));
    }

    #[test]
    fn lone_surrogates_are_dropped_without_losing_neighbours() {
        // Lone low, then a high followed by a plain character.
        let units = [0xDC00, b'x' as u16, 0xD83D, b'y' as u16];
        assert_eq!(decode_all(&units), ("xy".to_string(), 2));
    }

    #[test]
    fn two_highs_in_a_row_drop_the_first() {
        let pair: Vec<u16> = "\u{1F600}".encode_utf16().collect();
        let units = [0xD800, pair[0], pair[1]];
        assert_eq!(decode_all(&units), ("\u{1F600}".to_string(), 1));
    }
}

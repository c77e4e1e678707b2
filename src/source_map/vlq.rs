//! Base64 variable-length quantities as used by version 3 source maps.
//!
//! The sign is folded into the lowest bit, then the magnitude is emitted five bits at a
//! time, least significant group first, with `0x20` flagging that another group follows.

const BASE64_DIGITS: &[u8; 64] =
  b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
// binary: 100000
const VLQ_BASE: u64 = 1 << VLQ_BASE_SHIFT;
// binary: 011111
const VLQ_BASE_MASK: u64 = VLQ_BASE - 1;
// binary: 100000
const VLQ_CONTINUATION_BIT: u64 = VLQ_BASE;

/// Append the encoding of `value` to `out`.
///
/// Values must fit in 62 bits of magnitude, far beyond any line or source delta.
pub fn encode_into(value: i64, out: &mut String) {
  let mut vlq = to_vlq_signed(value);
  loop {
    let mut digit = vlq & VLQ_BASE_MASK;
    vlq >>= VLQ_BASE_SHIFT;
    if vlq != 0 {
      digit |= VLQ_CONTINUATION_BIT;
    }
    out.push(char::from(BASE64_DIGITS[digit as usize]));
    if vlq == 0 {
      return;
    }
  }
}

/// Encode a single value.
pub fn encode(value: i64) -> String {
  let mut out = String::new();
  encode_into(value, &mut out);
  out
}

/// Encode a run of values into one mapping segment.
pub fn encode_segment(values: &[i64]) -> String {
  let mut out = String::new();
  for &value in values {
    encode_into(value, &mut out);
  }
  out
}

/// Decode the first value in `input`, returning it with the number of bytes consumed.
///
/// Returns `None` for characters outside the alphabet or a truncated value.
pub fn decode(input: &str) -> Option<(i64, usize)> {
  let mut result: u64 = 0;
  let mut shift = 0u32;
  for (index, byte) in input.bytes().enumerate() {
    let digit = digit_value(byte)?;
    if shift >= 64 {
      return None;
    }
    result |= (digit & VLQ_BASE_MASK) << shift;
    if digit & VLQ_CONTINUATION_BIT == 0 {
      return Some((from_vlq_signed(result), index + 1));
    }
    shift += VLQ_BASE_SHIFT;
  }
  None
}

/// Decode every value in a mapping segment.
pub fn decode_segment(mut input: &str) -> Option<Vec<i64>> {
  let mut values = Vec::new();
  while !input.is_empty() {
    let (value, consumed) = decode(input)?;
    values.push(value);
    input = &input[consumed..];
  }
  Some(values)
}

fn to_vlq_signed(value: i64) -> u64 {
  if value < 0 {
    (value.unsigned_abs() << 1) | 1
  } else {
    (value as u64) << 1
  }
}

fn from_vlq_signed(vlq: u64) -> i64 {
  let magnitude = (vlq >> 1) as i64;
  if vlq & 1 == 1 { -magnitude } else { magnitude }
}

fn digit_value(byte: u8) -> Option<u64> {
  let value = match byte {
    b'A'..=b'Z' => byte - b'A',
    b'a'..=b'z' => byte - b'a' + 26,
    b'0'..=b'9' => byte - b'0' + 52,
    b'+' => 62,
    b'/' => 63,
    _ => return None,
  };
  Some(u64::from(value))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn encodes_known_values() {
    assert_eq!(encode(0), "A");
    assert_eq!(encode(1), "C");
    assert_eq!(encode(-1), "D");
    assert_eq!(encode(15), "e");
    assert_eq!(encode(16), "gB");
    assert_eq!(encode(-16), "hB");
    assert_eq!(encode(123), "2H");
    assert_eq!(encode(1000), "w+B");
  }

  #[test]
  fn encodes_segments() {
    assert_eq!(encode_segment(&[0, 0, 0, 0]), "AAAA");
    assert_eq!(encode_segment(&[0, 1, -3, 0]), "ACHA");
  }

  #[test]
  fn decodes_what_it_encodes() {
    for value in -10_000..=10_000 {
      let encoded = encode(value);
      assert_eq!(decode(&encoded), Some((value, encoded.len())), "value {value}");
    }
  }

  #[test]
  fn decodes_segments() {
    assert_eq!(decode_segment("ACHA"), Some(vec![0, 1, -3, 0]));
    assert_eq!(decode_segment(""), Some(Vec::new()));
  }

  #[test]
  fn rejects_invalid_input() {
    assert_eq!(decode("*"), None);
    assert_eq!(decode("g"), None);
  }
}

//! ## Address encoding
//! Maps a dotted-quad IPv4 address onto a `u32` key by packing its four octets
//! big-endian, so `a.b.c.d` becomes `a << 24 | b << 16 | c << 8 | d`.
//!
//! Every octet must be a base-10 number in `[0, 255]`. Leading zeros are
//! accepted (`010` is `10`), signs and whitespace are not. A single trailing
//! `\r` is ignored so that files with CRLF line endings parse cleanly.

use std::net::Ipv4Addr;

use crate::error::FormatError;

/// Number of octets in an IPv4 address
const OCTETS: usize = 4;

/// Parse dotted-quad `s` into its address key.
#[inline]
pub fn parse(s: &str) -> Result<u32, FormatError> {
    parse_bytes(s.as_bytes())
}

/// Parse a raw line into its address key.
///
/// Works on bytes so the driver never has to validate UTF-8 for lines that
/// are going to be rejected anyway.
pub fn parse_bytes(line: &[u8]) -> Result<u32, FormatError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let mut tokens: [&[u8]; OCTETS] = [b"".as_slice(); OCTETS];
    let mut n = 0;
    for token in line.split(|&b| b == b'.') {
        if n < OCTETS {
            tokens[n] = token;
        }
        n += 1;
    }
    if n != OCTETS {
        return Err(FormatError::OctetCount(n));
    }

    tokens
        .iter()
        .try_fold(0u32, |key, token| Ok((key << 8) | u32::from(parse_octet(token)?)))
}

/// Return the four octets of `key`, most significant first.
#[inline]
pub fn octets(key: u32) -> [u8; OCTETS] {
    key.to_be_bytes()
}

/// Return `key` as a standard library address, mostly for diagnostics.
#[inline]
pub fn to_addr(key: u32) -> Ipv4Addr {
    Ipv4Addr::from(key)
}

/// Parse a single decimal octet
#[inline]
fn parse_octet(token: &[u8]) -> Result<u8, FormatError> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return Err(FormatError::InvalidOctet(
            String::from_utf8_lossy(token).into_owned(),
        ));
    }

    // saturate so that absurdly long tokens still report as out of range
    let value = token.iter().fold(0u64, |acc, &d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    });
    u8::try_from(value).map_err(|_| FormatError::OctetOutOfRange(value))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0.0.0.0" => 0; "all zeros")]
    #[test_case("0.0.0.1" => 1; "lowest non-zero")]
    #[test_case("1.1.1.1" => 0x0101_0101; "ones")]
    #[test_case("10.0.0.1" => 0x0a00_0001; "private")]
    #[test_case("127.255.255.255" => 2_147_483_647; "top of low range")]
    #[test_case("128.0.0.0" => 2_147_483_648; "bottom of high range")]
    #[test_case("192.168.1.1" => 3_232_235_777; "home router")]
    #[test_case("255.255.255.255" => u32::MAX; "broadcast")]
    #[test_case("010.001.000.009" => 0x0a01_0009; "leading zeros")]
    #[test_case("1.2.3.4\r" => 0x0102_0304; "crlf")]
    fn test_parse(s: &str) -> u32 {
        parse(s).unwrap()
    }

    #[test_case("" => FormatError::OctetCount(1); "empty")]
    #[test_case("1.2.3" => FormatError::OctetCount(3); "three octets")]
    #[test_case("1.2.3.4.5" => FormatError::OctetCount(5); "five octets")]
    #[test_case("1.2..4" => FormatError::InvalidOctet(String::new()); "empty octet")]
    #[test_case("1.2.3.x" => FormatError::InvalidOctet("x".into()); "letter")]
    #[test_case("1.2.3.-4" => FormatError::InvalidOctet("-4".into()); "negative")]
    #[test_case("1.2.3.+4" => FormatError::InvalidOctet("+4".into()); "plus sign")]
    #[test_case(" 1.2.3.4" => FormatError::InvalidOctet(" 1".into()); "leading space")]
    #[test_case("1.2.3.4\r\r" => FormatError::InvalidOctet("4\r".into()); "double cr")]
    #[test_case("999.1.1.1" => FormatError::OctetOutOfRange(999); "octet too large")]
    #[test_case("1.1.1.256" => FormatError::OctetOutOfRange(256); "just above range")]
    #[test_case("1.1.1.99999999999999999999999" => FormatError::OctetOutOfRange(u64::MAX); "huge octet")]
    fn test_parse_invalid(s: &str) -> FormatError {
        parse(s).unwrap_err()
    }

    #[test]
    fn test_parse_bytes_non_utf8() {
        let err = parse_bytes(b"1.2.3.\xff").unwrap_err();
        assert!(matches!(err, FormatError::InvalidOctet(_)));
    }

    #[test]
    fn test_round_trip() {
        for s in ["0.0.0.0", "1.2.3.4", "127.255.255.255", "128.0.0.0", "255.255.255.255"] {
            let key = parse(s).unwrap();
            let expected: Vec<u8> = s.split('.').map(|o| o.parse().unwrap()).collect();
            assert_eq!(octets(key).to_vec(), expected);
            assert_eq!(to_addr(key).to_string(), s);
        }
    }

    #[test]
    fn test_round_trip_every_octet() {
        for o in 0..=255u8 {
            for position in 0..OCTETS {
                let mut quad = [0u8; OCTETS];
                quad[position] = o;
                let s = to_addr(u32::from_be_bytes(quad)).to_string();
                assert_eq!(octets(parse(&s).unwrap()), quad);
            }
        }
    }
}

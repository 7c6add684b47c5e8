use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

// Characters escaped when a filter is written into a query string
const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Decode a raw `filter=` query-string value
///
/// `+` is read as a space, as in `application/x-www-form-urlencoded`.
///
/// # Examples
///
/// ```
/// use oneroster_filter::utils::decode_filter_param;
///
/// let decoded = decode_filter_param("status%3D%27active%27+AND+role%3D%27student%27").unwrap();
/// assert_eq!(decoded, "status='active' AND role='student'");
/// ```
pub fn decode_filter_param(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    let decoded = percent_decode_str(&spaced)
        .decode_utf8()
        .context("Filter parameter is not valid UTF-8 after percent-decoding")?;
    Ok(decoded.into_owned())
}

/// Encode a filter for use as a `filter=` query-string value
pub fn encode_filter_param(filter: &str) -> String {
    utf8_percent_encode(filter, QUERY_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plus_and_percent() {
        assert_eq!(decode_filter_param("score%3E%3D90").unwrap(), "score>=90");
        assert_eq!(decode_filter_param("a%3D1+AND+b%3D2").unwrap(), "a=1 AND b=2");
        assert_eq!(decode_filter_param("name%3D%27a%2Bb%27").unwrap(), "name='a+b'");
    }

    #[test]
    fn test_decode_passthrough() {
        assert_eq!(decode_filter_param("status='active'").unwrap(), "status='active'");
        assert_eq!(decode_filter_param("").unwrap(), "");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode_filter_param("name%3D%FF%FE");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_decode_reverses_encode() {
        let filter = "name='Smith & Sons' AND grade>=9";
        let encoded = encode_filter_param(filter);
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('&'));
        assert_eq!(decode_filter_param(&encoded).unwrap(), filter);
    }
}

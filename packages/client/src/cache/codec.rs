//! HTTP/1.x wire encoding of a complete response
//!
//! Stored entries hold the response as the bytes an HTTP/1.x server would
//! have sent: status line, every header in map order, blank line, body.
//! Decoding needs the method of the request being answered to frame the body.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode, Version};

use crate::error::CodecError;

const CRLF: &[u8] = b"\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

/// Serialize status line, headers and body.
#[must_use]
pub fn encode_response(response: &Response<Bytes>) -> Bytes {
    let body = response.body();
    let mut out = Vec::with_capacity(128 + response.headers().len() * 32 + body.len());

    let status = response.status();
    out.extend_from_slice(version_str(response.version()).as_bytes());
    out.push(b' ');
    out.extend_from_slice(status.as_str().as_bytes());
    out.push(b' ');
    out.extend_from_slice(status.canonical_reason().unwrap_or("").as_bytes());
    out.extend_from_slice(CRLF);

    for (name, value) in response.headers() {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(CRLF);
    }
    out.extend_from_slice(CRLF);
    out.extend_from_slice(body);

    Bytes::from(out)
}

/// Rebuild a response from [`encode_response`] output.
///
/// Body framing: empty for `HEAD` and for 1xx/204/304, exactly
/// `Content-Length` bytes when present, otherwise everything that follows
/// the header section.
pub fn decode_response(bytes: Bytes, request_method: &Method) -> Result<Response<Bytes>, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::MissingStatusLine);
    }

    let head_len = find(&bytes, HEAD_END).ok_or(CodecError::UnterminatedHeaders)?;
    let mut lines = bytes[..head_len].split(|b| *b == b'\n').map(|line| line.strip_suffix(b"\r").unwrap_or(line));

    let status_line = lines.next().ok_or(CodecError::MissingStatusLine)?;
    let (version, status) = parse_status_line(status_line)?;

    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = parse_header_line(line)?;
        headers.append(name, value);
    }

    let body = bytes.slice(head_len + HEAD_END.len()..);
    let body = frame_body(body, &headers, status, request_method)?;

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.version_mut() = version;
    *response.headers_mut() = headers;
    Ok(response)
}

fn frame_body(
    body: Bytes,
    headers: &HeaderMap,
    status: StatusCode,
    request_method: &Method,
) -> Result<Bytes, CodecError> {
    if *request_method == Method::HEAD
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
    {
        return Ok(Bytes::new());
    }

    let Some(content_length) = headers.get(http::header::CONTENT_LENGTH) else {
        return Ok(body);
    };

    let expected = content_length
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            CodecError::InvalidHeader(format!("content-length: {}", String::from_utf8_lossy(content_length.as_bytes())))
        })?;

    if body.len() < expected {
        return Err(CodecError::TruncatedBody {
            expected,
            actual: body.len(),
        });
    }

    Ok(body.slice(..expected))
}

/// Parse lines like "HTTP/1.1 200 OK"
fn parse_status_line(line: &[u8]) -> Result<(Version, StatusCode), CodecError> {
    let invalid = || CodecError::InvalidStatusLine(String::from_utf8_lossy(line).into_owned());

    let text = std::str::from_utf8(line).map_err(|_| invalid())?;
    let mut parts = text.splitn(3, ' ');

    let version = match parts.next() {
        Some("HTTP/0.9") => Version::HTTP_09,
        Some("HTTP/1.0") => Version::HTTP_10,
        Some("HTTP/1.1") => Version::HTTP_11,
        Some("HTTP/2.0" | "HTTP/2") => Version::HTTP_2,
        Some("HTTP/3.0" | "HTTP/3") => Version::HTTP_3,
        _ => return Err(invalid()),
    };

    let status = parts
        .next()
        .filter(|code| code.len() == 3)
        .and_then(|code| code.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(invalid)?;

    Ok((version, status))
}

/// Parse lines like "content-type: application/json"
fn parse_header_line(line: &[u8]) -> Result<(HeaderName, HeaderValue), CodecError> {
    let invalid = || CodecError::InvalidHeader(String::from_utf8_lossy(line).into_owned());

    let colon = line.iter().position(|b| *b == b':').ok_or_else(invalid)?;
    let name = HeaderName::from_bytes(&line[..colon]).map_err(|_| invalid())?;
    // exactly the one space the encoder writes; the value keeps its own whitespace
    let raw = &line[colon + 1..];
    let value = HeaderValue::from_bytes(raw.strip_prefix(b" ").unwrap_or(raw)).map_err(|_| invalid())?;

    Ok((name, value))
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

//! Request middleware for the book routes.
//!
//! - [`log_requests`] logs every inbound request with its remote address.
//! - [`validate_content_type`] rejects requests whose `Content-Type` is not
//!   `application/json`.

use crate::handlers::error_response;
use axum::{
    extract::{ConnectInfo, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{debug, info};

/// The only media type accepted on book routes.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Log the method and remote address of each request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    info!("recv a {} request from {}", req.method(), remote);
    next.run(req).await
}

/// Require a `Content-Type` of `application/json`.
///
/// A missing or malformed header is a 400 carrying the parse error; a
/// well-formed but different media type is a 415.
pub async fn validate_content_type(req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().map_err(|_| "mime: invalid media type header"))
        .unwrap_or(Ok(""));

    let media_type = match header.and_then(parse_media_type) {
        Ok(media_type) => media_type,
        Err(message) => {
            debug!("Rejecting request with bad Content-Type: {}", message);
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    if media_type != JSON_MEDIA_TYPE {
        debug!("Rejecting request with Content-Type {}", media_type);
        return error_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, "invalid Content-Type");
    }

    next.run(req).await
}

/// Parse a `Content-Type` value into its lowercased media type.
///
/// The media type is `type/subtype` (a bare `type` is also accepted),
/// followed by `; key=value` parameters whose values are tokens or quoted
/// strings. Parameters are validated and then discarded. A single trailing
/// `;` is ignored.
pub fn parse_media_type(value: &str) -> Result<String, &'static str> {
    let (base, mut rest) = value.split_at(value.find(';').unwrap_or(value.len()));
    let media_type = base.trim().to_ascii_lowercase();
    check_media_type(&media_type)?;

    let mut params: HashMap<String, String> = HashMap::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        match consume_param(rest) {
            Some((key, value, remaining)) => {
                if params.get(&key).is_some_and(|prev| *prev != value) {
                    return Err("mime: duplicate parameter name");
                }
                params.insert(key, value);
                rest = remaining;
            }
            None if rest.trim() == ";" => break,
            None => return Err("mime: invalid media parameter"),
        }
    }

    Ok(media_type)
}

fn check_media_type(media_type: &str) -> Result<(), &'static str> {
    let (kind, rest) = consume_token(media_type);
    if kind.is_empty() {
        return Err("mime: no media type");
    }
    if rest.is_empty() {
        return Ok(());
    }

    let rest = rest
        .strip_prefix('/')
        .ok_or("mime: expected slash after first token")?;
    let (subtype, rest) = consume_token(rest);
    if subtype.is_empty() {
        return Err("mime: expected token after slash");
    }
    if !rest.is_empty() {
        return Err("mime: unexpected content after media subtype");
    }
    Ok(())
}

/// Consume `; key=value` from the front of `s`, returning the lowercased key,
/// the unquoted value and the remainder.
fn consume_param(s: &str) -> Option<(String, String, &str)> {
    let rest = s.trim_start().strip_prefix(';')?.trim_start();
    let (key, rest) = consume_token(rest);
    if key.is_empty() {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let (value, rest) = consume_value(rest)?;
    Some((key.to_ascii_lowercase(), value, rest))
}

fn consume_value(s: &str) -> Option<(String, &str)> {
    let Some(quoted) = s.strip_prefix('"') else {
        let (token, rest) = consume_token(s);
        return (!token.is_empty()).then(|| (token.to_string(), rest));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &quoted[i + 1..])),
            '\\' => match chars.peek() {
                // Only tspecials are escapable; other backslashes are literal.
                Some(&(_, next)) if is_tspecial(next) => {
                    value.push(next);
                    chars.next();
                }
                _ => value.push(c),
            },
            '\r' | '\n' => return None,
            _ => value.push(c),
        }
    }
    // Unterminated quoted string.
    None
}

fn consume_token(s: &str) -> (&str, &str) {
    s.split_at(s.find(|c: char| !is_token_char(c)).unwrap_or(s.len()))
}

// RFC 2045 token: printable ASCII minus space and tspecials.
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !is_tspecial(c)
}

fn is_tspecial(c: char) -> bool {
    "()<>@,;:\\\"/[]?=".contains(c)
}

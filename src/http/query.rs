//! Query parameters inside the request target.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

use crate::http::line::{path, set_path};
use crate::http::PayloadError;

/// Bytes re-escaped when a rewritten target is written back.
/// `/ ? & =` stay literal so the target keeps its structure.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// All values of query parameter `name`, in order. Empty when absent.
pub fn path_param(payload: &[u8], name: &str) -> Result<Vec<String>, PayloadError> {
    let target = path(payload)?;
    let Some((_, query)) = target.split_once('?') else {
        return Ok(Vec::new());
    };
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    Ok(form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .collect())
}

/// Set query parameter `name` to `value`.
///
/// Every `name=...` occurrence (value running to the next `&`, `$` or the
/// end) is rewritten in place; otherwise the parameter is appended. The
/// match is not anchored to a parameter boundary, so `id` also rewrites
/// `uid=...`.
pub fn set_path_param(payload: &[u8], name: &str, value: &str) -> Result<Vec<u8>, PayloadError> {
    let target = path(payload)?;

    let rewritten = match replace_param(&target, name, value) {
        Some(rewritten) => rewritten,
        None => {
            let separator = if target.contains('?') { '&' } else { '?' };
            format!("{target}{separator}{name}={value}")
        }
    };

    let escaped = utf8_percent_encode(&rewritten, PATH_ESCAPE).to_string();
    set_path(payload, &escaped)
}

/// Rewrite every `name=<value>` run. `None` when `name=` never occurs.
fn replace_param(target: &str, name: &str, value: &str) -> Option<String> {
    let needle = format!("{name}=");
    let mut out = String::with_capacity(target.len() + value.len());
    let mut rest = target;
    let mut found = false;

    while let Some(pos) = rest.find(&needle) {
        let value_start = pos + needle.len();
        let value_len = rest[value_start..]
            .find(|c: char| c == '&' || c == '$')
            .unwrap_or(rest.len() - value_start);

        out.push_str(&rest[..pos]);
        out.push_str(&needle);
        out.push_str(value);
        rest = &rest[value_start + value_len..];
        found = true;
    }

    if !found {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_param() {
        let payload = b"GET /test HTTP/1.1\r\n\r\n".to_vec();
        assert!(path_param(&payload, "test").unwrap().is_empty());

        let payload = set_path_param(&payload, "test", "123").unwrap();
        assert_eq!(payload, b"GET /test?test=123 HTTP/1.1\r\n\r\n");
        assert_eq!(path_param(&payload, "test").unwrap(), vec!["123"]);

        let payload = set_path_param(&payload, "qwer", "ty").unwrap();
        assert_eq!(payload, b"GET /test?test=123&qwer=ty HTTP/1.1\r\n\r\n");
        assert_eq!(path_param(&payload, "qwer").unwrap(), vec!["ty"]);
        assert_eq!(path_param(&payload, "test").unwrap(), vec!["123"]);
    }

    #[test]
    fn repeated_params_are_all_returned() {
        let payload = b"GET /s?tag=a&x=1&tag=b#frag HTTP/1.1\r\n\r\n";
        assert_eq!(path_param(payload, "tag").unwrap(), vec!["a", "b"]);
        assert_eq!(path_param(payload, "x").unwrap(), vec!["1"]);
    }

    #[test]
    fn existing_param_is_replaced_in_place() {
        let payload = b"GET /s?a=1&b=2&c=3 HTTP/1.1\r\nHost: h\r\n\r\n";
        let out = set_path_param(payload, "b", "20").unwrap();
        assert_eq!(out, b"GET /s?a=1&b=20&c=3 HTTP/1.1\r\nHost: h\r\n\r\n");
    }

    #[test]
    fn unchanged_value_is_idempotent() {
        let payload = b"GET /s?a=1 HTTP/1.1\r\n\r\n";
        let once = set_path_param(payload, "page", "2").unwrap();
        let twice = set_path_param(&once, "page", "2").unwrap();
        assert_eq!(once, twice);

        let once = set_path_param(payload, "a", "1").unwrap();
        assert_eq!(once, payload);
    }

    #[test]
    fn empty_value_is_idempotent() {
        let payload = b"GET /s HTTP/1.1\r\n\r\n";
        let once = set_path_param(payload, "flag", "").unwrap();
        assert_eq!(once, b"GET /s?flag= HTTP/1.1\r\n\r\n");
        assert_eq!(set_path_param(&once, "flag", "").unwrap(), once);
    }

    #[test]
    fn value_is_escaped_on_write() {
        let payload = b"GET /s HTTP/1.1\r\n\r\n";
        let out = set_path_param(payload, "q", "{x}").unwrap();
        assert_eq!(out, b"GET /s?q=%7Bx%7D HTTP/1.1\r\n\r\n");
        assert_eq!(path_param(&out, "q").unwrap(), vec!["{x}"]);
    }

    #[test]
    fn name_suffix_also_matches() {
        let payload = b"GET /s?uid=7 HTTP/1.1\r\n\r\n";
        let out = set_path_param(payload, "id", "9").unwrap();
        assert_eq!(out, b"GET /s?uid=9 HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn invalid_payload_propagates() {
        assert!(path_param(b"GET", "a").is_err());
        assert!(set_path_param(b"GET", "a", "b").is_err());
    }
}

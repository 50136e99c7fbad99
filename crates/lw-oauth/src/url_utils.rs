//! Navigation-URL parsing helpers
//!
//! Everything here is pure and total: malformed input degrades to absent
//! fields rather than an error. Interpretation of what a URL means for the
//! flow belongs to the redirect interceptor, not to this module.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::types::{CodeAndState, RawRedirectError};

/// Strip the trailing `#!` marker some embedded browsers append to the
/// redirect URL. Idempotent.
pub fn clean_url_string(url: &str) -> &str {
    url.strip_suffix("#!").unwrap_or(url)
}

/// Parse the query component of a URL into percent-decoded key/value pairs.
///
/// Keys without a `=` map to the empty string; a fragment after the query is
/// ignored; a URL without a query component yields an empty map.
pub fn parse_query_params(url: &str) -> HashMap<String, String> {
    let Some((_, after)) = url.split_once('?') else {
        return HashMap::new();
    };
    let query = after.split('#').next().unwrap_or(after);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some((percent_decode(key), percent_decode(value)))
        })
        .collect()
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Extract the `code` and `state` query parameters; either may be absent.
pub fn code_and_state_from_url(url: &str) -> CodeAndState {
    let mut params = parse_query_params(url);
    CodeAndState {
        code: params.remove("code"),
        state: params.remove("state"),
    }
}

/// True iff the URL carries a non-empty `error` query parameter.
pub fn is_error_url(url: &str) -> bool {
    parse_query_params(url)
        .get("error")
        .is_some_and(|error| !error.is_empty())
}

/// Extract the `error` and `error_description` query parameters.
pub fn error_from_url(url: &str) -> RawRedirectError {
    let mut params = parse_query_params(url);
    RawRedirectError {
        error: params.remove("error"),
        error_description: params.remove("error_description"),
    }
}

//! C-ABI wrapper around `betterpick-core`.
//!
//! # Overview
//! Lets an iOS or Android host build every Betterpick request, classify
//! what came back, and receive validated JSON bodies, without linking
//! against serde or an HTTP stack of ours.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `bp_build_*` / `bp_parse_*` mirror the core client 1:1.
//! - Failures reach the host as `FfiErrorKind::{UserNetwork, Server}` only;
//!   the detailed cause rides along in `error_message` for logs.
//! - The C caller owns all returned pointers and must call the matching
//!   `bp_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::ptr;
use std::time::Duration;

use betterpick_core::client::parse_body;
use betterpick_core::error::ApiError;
use betterpick_core::{BetterpickClient, ClientConfig, HttpRequest, HttpResponse, PlayerFilterData};
use serde::Serialize;

use types::*;

fn client_ref<'a>(client: *const FfiBetterpickClient) -> Option<&'a FfiBetterpickClient> {
    unsafe { client.as_ref() }
}

/// Borrow a caller-owned C string. `None` when null or not UTF-8.
fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: str_arg(resp.body).map(str::to_string),
    }
}

fn into_ffi(req: Result<HttpRequest, ApiError>) -> *mut FfiHttpRequest {
    req.map_or(ptr::null_mut(), FfiHttpRequest::from_core)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `base_url`, or for the production API when
/// `base_url` is null. `timeout_ms` of `0` leaves timeouts to the host.
///
/// Returns null if `base_url` is not UTF-8. Free with `bp_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bp_client_new(base_url: *const c_char, timeout_ms: u64) -> *mut FfiBetterpickClient {
    catch_unwind(|| {
        let config = if base_url.is_null() {
            ClientConfig::default()
        } else {
            match str_arg(base_url) {
                Some(url) => ClientConfig::new(url),
                None => return ptr::null_mut(),
            }
        };
        let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        let inner = BetterpickClient::new(config.with_timeout(timeout));
        Box::into_raw(Box::new(FfiBetterpickClient { inner }))
    })
    .unwrap_or(ptr::null_mut())
}

/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bp_client_free(client: *mut FfiBetterpickClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
//
// Each returns null if a required argument is null or not UTF-8, or if the
// URL cannot be assembled. Free with `bp_free_request`.
// ---------------------------------------------------------------------------

/// `GET /leagues`; `league_id` may be null to list all leagues.
#[unsafe(no_mangle)]
pub extern "C" fn bp_build_leagues(
    client: *const FfiBetterpickClient,
    league_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(client) = client_ref(client) else {
            return ptr::null_mut();
        };
        let league_id = match (league_id.is_null(), str_arg(league_id)) {
            (true, _) => None,
            (false, Some(id)) => Some(id),
            (false, None) => return ptr::null_mut(),
        };
        into_ffi(client.inner.build_leagues(league_id))
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_league(
    client: *const FfiBetterpickClient,
    league_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| match (client_ref(client), str_arg(league_id)) {
        (Some(client), Some(id)) => into_ffi(client.inner.build_league(id)),
        _ => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_nationalities(client: *const FfiBetterpickClient) -> *mut FfiHttpRequest {
    catch_unwind(|| match client_ref(client) {
        Some(client) => into_ffi(client.inner.build_nationalities()),
        None => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_club_players(
    client: *const FfiBetterpickClient,
    club_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| match (client_ref(client), str_arg(club_id)) {
        (Some(client), Some(id)) => into_ffi(client.inner.build_club_players(id)),
        _ => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_player(
    client: *const FfiBetterpickClient,
    player_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| match (client_ref(client), str_arg(player_id)) {
        (Some(client), Some(id)) => into_ffi(client.inner.build_player(id)),
        _ => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_search(
    client: *const FfiBetterpickClient,
    name: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| match (client_ref(client), str_arg(name)) {
        (Some(client), Some(name)) => into_ffi(client.inner.build_search(name)),
        _ => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

/// `GET /players/search` for a filter given as JSON, e.g.
/// `{"position":"ST","overall":{"min":80,"max":99},"sort":"asc"}`.
/// Missing fields take their defaults; a null `filter_json` means the
/// default filter. Returns null if the JSON does not describe a valid
/// filter.
#[unsafe(no_mangle)]
pub extern "C" fn bp_build_players(
    client: *const FfiBetterpickClient,
    filter_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(client) = client_ref(client) else {
            return ptr::null_mut();
        };
        let filter = if filter_json.is_null() {
            PlayerFilterData::default()
        } else {
            match str_arg(filter_json).map(serde_json::from_str::<PlayerFilterData>) {
                Some(Ok(filter)) => filter,
                _ => return ptr::null_mut(),
            }
        };
        into_ffi(client.inner.build_players(&filter))
    })
    .unwrap_or(ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_build_club(
    client: *const FfiBetterpickClient,
    club_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| match (client_ref(client), str_arg(club_id)) {
        (Some(client), Some(id)) => into_ffi(client.inner.build_club(id)),
        _ => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a round-trip without decoding into a specific body type.
///
/// `transport_failed` means the host never got an HTTP response (offline,
/// DNS, TLS, timeout). A null `response` without a transport failure is a
/// server failure. Otherwise the status must be 2xx and the body valid JSON.
#[unsafe(no_mangle)]
pub extern "C" fn bp_classify(response: *const FfiHttpResponse, transport_failed: bool) -> FfiErrorKind {
    catch_unwind(|| {
        if transport_failed {
            return FfiErrorKind::UserNetwork;
        }
        let Some(resp) = (unsafe { response.as_ref() }) else {
            return ApiError::ResponseNotCreated.classify().into();
        };
        match parse_body::<serde_json::Value>(ffi_response_to_core(resp)) {
            Ok(_) => FfiErrorKind::Ok,
            Err(e) => e.classify().into(),
        }
    })
    .unwrap_or(FfiErrorKind::Panic)
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn parse_with<B: Serialize>(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
    name: &str,
    parse: fn(&BetterpickClient, HttpResponse) -> Result<B, ApiError>,
) -> *mut FfiResult {
    catch_unwind(|| {
        let Some(client) = client_ref(client) else {
            return FfiResult::null_arg("client");
        };
        let Some(resp) = (unsafe { response.as_ref() }) else {
            return FfiResult::null_arg("response");
        };
        match parse(&client.inner, ffi_response_to_core(resp)) {
            Ok(body) => FfiResult::ok_json(resp.status, &body),
            Err(e) => FfiResult::from_error(resp.status, e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic(&format!("panic in {name}")))
}

/// `json` is a `GetLeaguesResponseBody`.
#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_leagues(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_leagues", BetterpickClient::parse_leagues)
}

/// `json` is a `League` with its clubs.
#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_league(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_league", BetterpickClient::parse_league)
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_nationalities(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_nationalities", BetterpickClient::parse_nationalities)
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_club_players(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_club_players", BetterpickClient::parse_club_players)
}

/// `json` is a full `Player`.
#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_player(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_player", BetterpickClient::parse_player)
}

/// `json` always carries `players`, `clubs` and `leagues` arrays.
#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_search(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_search", BetterpickClient::parse_search)
}

#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_players(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_players", BetterpickClient::parse_players)
}

/// `json` is a `TeamPreview`.
#[unsafe(no_mangle)]
pub extern "C" fn bp_parse_club(
    client: *const FfiBetterpickClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    parse_with(client, response, "bp_parse_club", BetterpickClient::parse_club)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `bp_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bp_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiResult` returned by any `bp_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bp_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.json);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bp_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080/api/v1";

    fn new_client() -> *mut FfiBetterpickClient {
        let url = CString::new(BASE).unwrap();
        bp_client_new(url.as_ptr(), 5_000)
    }

    fn url_of(req: *mut FfiHttpRequest) -> String {
        assert!(!req.is_null());
        let url = unsafe { CStr::from_ptr((*req).url) }.to_str().unwrap().to_string();
        bp_free_request(req);
        url
    }

    fn json_of(result: *mut FfiResult) -> serde_json::Value {
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Ok);
        let json = unsafe { CStr::from_ptr(r.json) }.to_str().unwrap();
        let value = serde_json::from_str(json).unwrap();
        bp_free_result(result);
        value
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        bp_client_free(client);
    }

    #[test]
    fn null_base_url_uses_production_api() {
        let client = bp_client_new(ptr::null(), 0);
        let req = bp_build_nationalities(client);
        assert_eq!(url_of(req), "https://betterpick.dvdblk.com/api/v1/nationalities");
        bp_client_free(client);
    }

    #[test]
    fn client_free_null_is_safe() {
        bp_client_free(ptr::null_mut());
    }

    #[test]
    fn build_leagues_carries_headers_and_timeout() {
        let client = new_client();
        let req = bp_build_leagues(client, ptr::null());
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Get));
        assert_eq!(r.timeout_ms, 5_000);
        assert_eq!(r.headers_len, 1);
        let key = unsafe { CStr::from_ptr((*r.headers).key) }.to_str().unwrap();
        assert_eq!(key, "accept");
        assert_eq!(url_of(req), format!("{BASE}/leagues"));
        bp_client_free(client);
    }

    #[test]
    fn build_leagues_with_id_adds_query() {
        let client = new_client();
        let id = CString::new("53").unwrap();
        assert_eq!(url_of(bp_build_leagues(client, id.as_ptr())), format!("{BASE}/leagues?id=53"));
        bp_client_free(client);
    }

    #[test]
    fn build_leagues_rejects_non_utf8_id() {
        let client = new_client();
        let id = CString::new(vec![0xff, 0xfe]).unwrap();
        assert!(bp_build_leagues(client, id.as_ptr()).is_null());
        assert!(bp_build_league(client, id.as_ptr()).is_null());
        bp_client_free(client);
    }

    #[test]
    fn build_player_encodes_id_segment() {
        let client = new_client();
        let id = CString::new("a/b c").unwrap();
        assert_eq!(
            url_of(bp_build_player(client, id.as_ptr())),
            format!("{BASE}/players/a%2Fb%20c/full")
        );
        bp_client_free(client);
    }

    #[test]
    fn build_with_null_id_returns_null() {
        let client = new_client();
        assert!(bp_build_league(client, ptr::null()).is_null());
        assert!(bp_build_club(client, ptr::null()).is_null());
        assert!(bp_build_search(client, ptr::null()).is_null());
        bp_client_free(client);
    }

    #[test]
    fn build_null_client_returns_null() {
        assert!(bp_build_nationalities(ptr::null()).is_null());
        assert!(bp_build_players(ptr::null(), ptr::null()).is_null());
    }

    #[test]
    fn build_players_from_partial_filter_json() {
        let client = new_client();
        let filter = CString::new(r#"{"position":"GK","sort":"asc"}"#).unwrap();
        assert_eq!(
            url_of(bp_build_players(client, filter.as_ptr())),
            format!("{BASE}/players/search?position=GK&ovr_min=1&ovr_max=99&sort=asc")
        );
        assert_eq!(
            url_of(bp_build_players(client, ptr::null())),
            format!("{BASE}/players/search?ovr_min=1&ovr_max=99&sort=desc")
        );
        bp_client_free(client);
    }

    #[test]
    fn build_players_rejects_inverted_range() {
        let client = new_client();
        let filter = CString::new(r#"{"overall":{"min":90,"max":80}}"#).unwrap();
        assert!(bp_build_players(client, filter.as_ptr()).is_null());
        bp_client_free(client);
    }

    #[test]
    fn classify_covers_both_kinds() {
        let body = CString::new(r#"{"players":[]}"#).unwrap();
        let ok = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let failed = FfiHttpResponse { status: 503, body: body.as_ptr() };
        let empty = FfiHttpResponse { status: 200, body: ptr::null() };

        assert_eq!(bp_classify(&ok, false), FfiErrorKind::Ok);
        assert_eq!(bp_classify(&failed, false), FfiErrorKind::Server);
        assert_eq!(bp_classify(&empty, false), FfiErrorKind::Server);
        assert_eq!(bp_classify(ptr::null(), false), FfiErrorKind::Server);
        assert_eq!(bp_classify(ptr::null(), true), FfiErrorKind::UserNetwork);
    }

    #[test]
    fn parse_players_success() {
        let client = new_client();
        let body = CString::new(
            r#"{"players":[{"id":"158023","name":"L. Messi","overall":94,"position":"RW"}]}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let json = json_of(bp_parse_players(client, &resp));
        assert_eq!(json["players"][0]["name"], "L. Messi");
        assert_eq!(json["players"][0]["position"], "RW");
        bp_client_free(client);
    }

    #[test]
    fn parse_search_fills_missing_lists() {
        let client = new_client();
        let body = CString::new(r#"{"clubs":[]}"#).unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let json = json_of(bp_parse_search(client, &resp));
        assert!(json["players"].as_array().unwrap().is_empty());
        assert!(json["leagues"].as_array().unwrap().is_empty());
        bp_client_free(client);
    }

    #[test]
    fn parse_club_not_found_is_server() {
        let client = new_client();
        let resp = FfiHttpResponse { status: 404, body: ptr::null() };
        let result = bp_parse_club(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.kind, FfiErrorKind::Server);
        assert_eq!(r.http_status, 404);
        assert!(r.json.is_null());
        assert!(!r.error_message.is_null());
        bp_free_result(result);
        bp_client_free(client);
    }

    #[test]
    fn parse_malformed_body_is_server() {
        let client = new_client();
        let body = CString::new(r#"{"teamId":"1","name":"x","logoURL":"not a url"}"#).unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = bp_parse_club(client, &resp);
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::Server);
        bp_free_result(result);
        bp_client_free(client);
    }

    #[test]
    fn parse_null_arguments() {
        let body = CString::new("{}").unwrap();
        let resp = FfiHttpResponse { status: 200, body: body.as_ptr() };
        let result = bp_parse_nationalities(ptr::null(), &resp);
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::NullArg);
        bp_free_result(result);

        let client = new_client();
        let result = bp_parse_leagues(client, ptr::null());
        assert_eq!(unsafe { &*result }.kind, FfiErrorKind::NullArg);
        bp_free_result(result);
        bp_client_free(client);
    }

    #[test]
    fn free_null_is_safe() {
        bp_free_request(ptr::null_mut());
        bp_free_result(ptr::null_mut());
        bp_free_string(ptr::null_mut());
    }
}

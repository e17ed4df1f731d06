//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests go out as plain C structs. Parsed bodies come back as a JSON
//! string inside `FfiResult`: the core has already validated status and
//! shape, so the host decodes a body it knows is well-formed.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use betterpick_core::error::{ApiError, ManagerError};
use betterpick_core::http::HttpMethod;
use serde::Serialize;

/// Opaque handle to a `BetterpickClient`.
pub struct FfiBetterpickClient {
    pub(crate) inner: betterpick_core::BetterpickClient,
}

/// Move `s` to the heap as a C string. Null if `s` holds an interior NUL.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(ptr::null_mut(), CString::into_raw)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request for the host to execute.
///
/// `url` is absolute and already percent-encoded. `timeout_ms` is `0` when
/// the host should use its own default.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: betterpick_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            ptr::null_mut()
        } else {
            let headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            timeout_ms: req.timeout.map_or(0, |t| t.as_millis() as u64),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-owned)
// ---------------------------------------------------------------------------

/// An HTTP response as received by the host. `body` may be null.
///
/// The FFI layer reads but never frees these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Outcome kind. `UserNetwork` and `Server` are the only failures an app
/// screen needs to tell apart; the rest signal misuse of this library.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorKind {
    Ok = 0,
    UserNetwork = 1,
    Server = 2,
    NullArg = 3,
    Panic = 4,
}

impl From<ManagerError> for FfiErrorKind {
    fn from(e: ManagerError) -> Self {
        match e {
            ManagerError::UserNetwork => FfiErrorKind::UserNetwork,
            ManagerError::Server => FfiErrorKind::Server,
        }
    }
}

/// Result envelope for every `bp_parse_*` function.
///
/// On success `kind` is `Ok` and `json` holds the decoded body re-encoded
/// as JSON. On failure `json` is null and `error_message` describes the
/// cause for logging only.
#[repr(C)]
pub struct FfiResult {
    pub kind: FfiErrorKind,
    pub http_status: u16,
    pub error_message: *mut c_char,
    pub json: *mut c_char,
}

impl FfiResult {
    fn boxed(kind: FfiErrorKind, http_status: u16, error_message: *mut c_char, json: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            kind,
            http_status,
            error_message,
            json,
        }))
    }

    pub(crate) fn ok_json<B: Serialize>(status: u16, body: &B) -> *mut Self {
        match serde_json::to_string(body) {
            Ok(json) => Self::boxed(FfiErrorKind::Ok, status, ptr::null_mut(), c_string(json)),
            Err(e) => Self::from_error(status, ApiError::Unknown(e.to_string())),
        }
    }

    pub(crate) fn from_error(status: u16, err: ApiError) -> *mut Self {
        let kind = err.classify().into();
        Self::boxed(kind, status, c_string(err.to_string()), ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorKind::NullArg,
            0,
            c_string(format!("null argument: {name}")),
            ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorKind::Panic, 0, c_string(msg.to_string()), ptr::null_mut())
    }
}

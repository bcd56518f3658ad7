//! Client-side storage seams: where the access token lives and where the CSRF
//! token comes from.

use axum::http::{header, HeaderMap};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Client-storage key of the access token.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
}

pub trait CredentialProvider: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    pub csrf_token: Option<String>,
}

impl CredentialProvider for StaticCredentials {
    fn csrf_token(&self) -> Option<String> {
        self.csrf_token.clone()
    }
}

/// Cookies sent by the browser with one request. Writes to the token are
/// buffered and turned into a `Set-Cookie` header by the handler.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
    pending_token: Mutex<Option<String>>,
}

impl CookieJar {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = BTreeMap::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                if let Some((name, value)) = pair.split_once('=') {
                    let (name, value) = (name.trim(), value.trim());
                    if !name.is_empty() && !value.is_empty() {
                        cookies.insert(name.to_string(), value.to_string());
                    }
                }
            }
        }
        Self {
            cookies,
            pending_token: Mutex::new(None),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Token written during this request, if any.
    pub fn pending_token(&self) -> Option<String> {
        self.pending_token.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn set_cookie_header(&self) -> Option<String> {
        self.pending_token()
            .map(|token| format!("{TOKEN_KEY}={token}; Path=/; HttpOnly; SameSite=Lax"))
    }

    pub fn csrf(&self, cookie_name: &str) -> StaticCredentials {
        StaticCredentials {
            csrf_token: self.get(cookie_name).map(str::to_string),
        }
    }
}

impl TokenStore for CookieJar {
    fn token(&self) -> Option<String> {
        self.pending_token()
            .or_else(|| self.get(TOKEN_KEY).map(str::to_string))
    }

    fn set_token(&self, token: &str) {
        if let Ok(mut guard) = self.pending_token.lock() {
            *guard = Some(token.to_string());
        }
    }
}

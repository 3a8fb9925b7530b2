//! Header injection middlewares (auth tokens, default headers).

use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::Middleware;

/// Set `Authorization: Bearer <token>` on every request.
pub fn bearer_auth(token: impl Into<String>) -> Middleware {
    let value = format!("Bearer {}", token.into());
    Middleware::from_fn(move |ctx, req, next| {
        req.headers().set("Authorization", value.as_str());
        next.call(ctx, req)
    })
}

/// Add `headers` to requests that do not already carry them.
pub fn default_headers(headers: HashMap<String, String>) -> Middleware {
    let headers = Arc::new(headers);
    Middleware::from_fn(move |ctx, req, next| {
        for (key, value) in headers.iter() {
            if !req.headers().contains(key) {
                req.headers().add(key, value.as_str());
            }
        }
        next.call(ctx, req)
    })
}

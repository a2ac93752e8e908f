//! User agent and accept headers

/// User agent sent with every outbound request
pub fn user_agent() -> String {
    format!(
        "image-search-node/{} (+https://github.com/image-search-node/image-search-node)",
        crate::VERSION
    )
}

/// Standard accept headers for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

/// Accept header for image downloads
pub fn accept_image() -> &'static str {
    "image/avif,image/webp,image/png,image/jpeg,image/*;q=0.8,*/*;q=0.5"
}

//! API endpoint URL builders

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Build the receptor list URL
pub fn receptor_list_url(base_url: &str) -> String {
    endpoint_url(base_url, "receptorlist/")
}

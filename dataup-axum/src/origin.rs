use axum::http::header::HOST;
use axum::http::uri::Authority;
use axum::http::{HeaderMap, Uri};
use dataup_core::NetworkOrigin;

fn default_port(scheme: &str) -> u16 {
    match scheme {
        "https" => 443,
        _ => 80,
    }
}

/// Work out how the caller addressed us.
///
/// The `Host` header wins, then the request target's authority (HTTP/2),
/// then `fallback` (the configured listen address). The scheme always comes
/// from `fallback`.
pub fn request_origin(headers: &HeaderMap, uri: &Uri, fallback: &NetworkOrigin) -> NetworkOrigin {
    let from_header = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .and_then(|host| host.parse::<Authority>().ok());

    match from_header.as_ref().or(uri.authority()) {
        Some(authority) => NetworkOrigin::new(
            authority.host(),
            authority
                .port_u16()
                .unwrap_or_else(|| default_port(&fallback.scheme)),
        )
        .with_scheme(fallback.scheme.clone()),
        None => fallback.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn fallback() -> NetworkOrigin {
        NetworkOrigin::new("127.0.0.1", 8080)
    }

    fn with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static(host));
        headers
    }

    #[test]
    fn host_header_with_port() {
        let origin = request_origin(&with_host("videos.local:9000"), &Uri::from_static("/video"), &fallback());
        assert_eq!(origin, NetworkOrigin::new("videos.local", 9000));
    }

    #[test]
    fn host_header_without_port_uses_scheme_default() {
        let origin = request_origin(&with_host("videos.local"), &Uri::from_static("/video"), &fallback());
        assert_eq!(origin.data_url(1), "http://videos.local:80/video/1/data");

        let tls = fallback().with_scheme("https");
        let origin = request_origin(&with_host("videos.local"), &Uri::from_static("/video"), &tls);
        assert_eq!(origin.data_url(1), "https://videos.local:443/video/1/data");
    }

    #[test]
    fn absolute_uri_authority_is_used_without_host_header() {
        let uri = Uri::from_static("http://edge.example:7000/video");
        let origin = request_origin(&HeaderMap::new(), &uri, &fallback());
        assert_eq!(origin, NetworkOrigin::new("edge.example", 7000));
    }

    #[test]
    fn falls_back_to_configured_origin() {
        let origin = request_origin(&HeaderMap::new(), &Uri::from_static("/video"), &fallback());
        assert_eq!(origin, fallback());

        let origin = request_origin(&with_host("bad host!"), &Uri::from_static("/video"), &fallback());
        assert_eq!(origin, fallback());
    }
}

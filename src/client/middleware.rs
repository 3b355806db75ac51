// File: ./src/client/middleware.rs
//! Tower middleware that stamps outgoing catalog requests with our
//! User-Agent and a JSON `Accept` header, and logs the request line.
use http::header::{ACCEPT, USER_AGENT};
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct CatalogHeadersLayer {
    pub user_agent: String,
}

impl CatalogHeadersLayer {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl<S> Layer<S> for CatalogHeadersLayer {
    type Service = CatalogHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CatalogHeadersService {
            inner,
            user_agent: HeaderValue::from_str(&self.user_agent).ok(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogHeadersService<S> {
    inner: S,
    /// `None` when the configured string is not a valid header value.
    user_agent: Option<HeaderValue>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for CatalogHeadersService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        log::debug!("{} {}", req.method(), req.uri());
        let headers = req.headers_mut();
        if let Some(ua) = &self.user_agent {
            headers.entry(USER_AGENT).or_insert_with(|| ua.clone());
        }
        headers
            .entry(ACCEPT)
            .or_insert_with(|| HeaderValue::from_static("application/json"));
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::ServiceExt;

    #[derive(Clone)]
    struct Echo;

    impl Service<Request<String>> for Echo {
        type Response = http::HeaderMap;
        type Error = Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<String>) -> Self::Future {
            std::future::ready(Ok(req.headers().clone()))
        }
    }

    #[tokio::test]
    async fn test_headers_are_added() {
        let svc = CatalogHeadersLayer::new("recipebox/test").layer(Echo);
        let req = Request::get("http://localhost/random.php")
            .body(String::new())
            .unwrap();
        let headers = svc.oneshot(req).await.unwrap();
        assert_eq!(headers[USER_AGENT], "recipebox/test");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[tokio::test]
    async fn test_existing_headers_are_kept() {
        let svc = CatalogHeadersLayer::new("recipebox/test").layer(Echo);
        let req = Request::get("http://localhost/random.php")
            .header(USER_AGENT, "custom/1.0")
            .body(String::new())
            .unwrap();
        let headers = svc.oneshot(req).await.unwrap();
        assert_eq!(headers[USER_AGENT], "custom/1.0");
    }
}

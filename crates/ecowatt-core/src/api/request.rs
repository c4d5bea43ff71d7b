//! Per-call request configuration.

use reqwest::header::{self, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Already-encoded `application/x-www-form-urlencoded` text.
    Form(String),
}

/// Everything the pipeline needs to know about one call.
///
/// `silent` is never sent over the wire. It only changes how the inbound
/// stage reacts to a 404.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub silent: bool,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            silent: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add filter parameters. `None`/null fields are left out.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::InvalidRequest(format!("Unserializable query: {}", e)))?;

        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    push_query_value(&mut self.query, &key, value);
                }
            }
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "Query parameters must be a map, got {}",
                    other
                )))
            }
        }
        Ok(self)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Unserializable body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Form-encode `fields`, percent-encoding every reserved character.
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let encoded = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.body = RequestBody::Form(encoded);
        self
    }

    /// Treat a 404 as expected absence: no notification, original error returned.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Build the wire request against `base_url`. No credential is attached here.
    pub fn build(&self, base_url: &Url) -> Result<Request, ApiError> {
        let mut url = join_url(base_url, &self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        let mut request = Request::new(self.method.clone(), url);
        request
            .headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

        match &self.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                request
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
                *request.body_mut() = Some(bytes.into());
            }
            RequestBody::Form(encoded) => {
                request
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
                *request.body_mut() = Some(encoded.clone().into());
            }
        }

        Ok(request)
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => query.push((key.to_string(), s)),
        Value::Array(items) => {
            for item in items {
                push_query_value(query, key, item);
            }
        }
        other => query.push((key.to_string(), other.to_string())),
    }
}

/// Append `path` to the base address the way a path prefix is expected to work
/// (`http://host/api` + `/bills/` is `http://host/api/bills/`).
fn join_url(base_url: &Url, path: &str) -> Result<Url, ApiError> {
    let base = base_url.as_str().trim_end_matches('/');
    let joined = if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    };
    Url::parse(&joined).map_err(|e| ApiError::InvalidRequest(format!("Bad URL {}: {}", joined, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://localhost:8000/api").unwrap()
    }

    fn body_text(request: &Request) -> String {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_path_is_appended_to_base_prefix() {
        let request = RequestContext::get("/bills/").build(&base()).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/bills/");

        let trailing = Url::parse("http://localhost:8000/api/").unwrap();
        let request = RequestContext::get("users/me").build(&trailing).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/users/me");
    }

    #[test]
    fn test_query_skips_nulls() {
        let ctx = RequestContext::get("/bills/")
            .query(&json!({"bill_type": "gas", "year": 2024, "month": null}))
            .unwrap();
        assert_eq!(
            ctx.query,
            vec![
                ("bill_type".to_string(), "gas".to_string()),
                ("year".to_string(), "2024".to_string())
            ]
        );

        let request = ctx.build(&base()).unwrap();
        assert_eq!(request.url().query(), Some("bill_type=gas&year=2024"));
    }

    #[test]
    fn test_query_rejects_scalars() {
        assert!(matches!(
            RequestContext::get("/x").query(&5),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(RequestContext::get("/x").query(&()).unwrap().query.is_empty());
    }

    #[test]
    fn test_no_query_leaves_url_clean() {
        let request = RequestContext::get("/family/").build(&base()).unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_json_body() {
        let request = RequestContext::post("/bills/")
            .json(&json!({"amount": 12.5}))
            .unwrap()
            .build(&base())
            .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.headers()[header::CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(body_text(&request), r#"{"amount":12.5}"#);
    }

    #[test]
    fn test_form_body_percent_encodes_reserved_characters() {
        let request = RequestContext::post("/users/login")
            .form(&[("username", "a&b=c d"), ("password", "p@ss word+%")])
            .build(&base())
            .unwrap();

        assert_eq!(request.headers()[header::CONTENT_TYPE], CONTENT_TYPE_FORM);
        assert_eq!(
            body_text(&request),
            "username=a%26b%3Dc%20d&password=p%40ss%20word%2B%25"
        );
    }

    #[test]
    fn test_silent_flag_is_not_sent() {
        let ctx = RequestContext::get("/family/").silent();
        assert!(ctx.silent);

        let request = ctx.build(&base()).unwrap();
        assert_eq!(request.url().query(), None);
        assert!(request.headers().iter().all(|(name, _)| !name.as_str().contains("silent")));
    }
}

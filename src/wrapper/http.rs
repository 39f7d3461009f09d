use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct Client {
    cli: reqwest::Client,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> {
        let cli = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { cli })
    }

    /// POSTs `fields` as an `application/x-www-form-urlencoded` body. The body
    /// is read whatever the status code, callers decide what it means.
    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response> {
        let response = self.cli.post(url).form(fields).send().await?;
        Ok(Response {
            status: response.status().into(),
            body: response.text().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        let ok = Response {
            status: 200,
            body: String::new(),
        };
        let bad = Response {
            status: 502,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}

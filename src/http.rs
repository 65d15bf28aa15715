//! Reachability probing of submitted repository URLs.
//!
//! Provides a trait-based abstraction over the HTTP GET used to check that a
//! submission is publicly accessible, so the validation pipeline can be
//! exercised without network access.

use log::debug;
use ureq::ResponseExt;

/// Outcome of probing a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    /// A 2xx response; `final_url` is the URL after following redirects.
    Reachable { final_url: String },
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The request could not be completed (bad URL, DNS, TLS, connection).
    Failed(String),
}

/// Issues the GET request that decides whether a submission is accessible.
pub trait ReachabilityProbe {
    fn probe(&self, url: &str) -> Reachability;
}

/// HTTP probe using `ureq`. Redirects are followed.
pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ReachabilityProbe for HttpProbe {
    fn probe(&self, url: &str) -> Reachability {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(e) => {
                debug!("GET {} failed: {}", url, e);
                return Reachability::Failed(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let final_url = response.get_uri().to_string();
        debug!("GET {} -> {} ({})", url, status, final_url);
        reachability_from_status(status, final_url)
    }
}

/// Map a completed response to a [`Reachability`].
fn reachability_from_status(status: u16, final_url: String) -> Reachability {
    if (200..300).contains(&status) {
        Reachability::Reachable { final_url }
    } else {
        Reachability::Status(status)
    }
}

use crate::dataset::{ContributionDataset, ContributionDay, Origin, YMD_FMT};
use crate::year::CalendarYear;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use thiserror::Error;
use time::Date;
use tracing::debug;

pub(crate) const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";
pub(crate) const REST_ENDPOINT: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static CONTRIBUTIONS_QUERY: &str = "
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}
";

/// Client for the two GitHub endpoints the calendar needs.  The token is
/// only required for the contribution query.
#[derive(Clone, Debug)]
pub(crate) struct GitHubClient {
    http: Client,
    token: Option<String>,
    graphql_url: String,
    rest_url: String,
}

impl GitHubClient {
    pub(crate) fn new(token: Option<String>) -> Result<GitHubClient, FetchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(GitHubClient {
            http,
            token,
            graphql_url: String::from(GRAPHQL_ENDPOINT),
            rest_url: String::from(REST_ENDPOINT),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_endpoints<S: Into<String>, T: Into<String>>(
        mut self,
        graphql_url: S,
        rest_url: T,
    ) -> GitHubClient {
        self.graphql_url = graphql_url.into();
        self.rest_url = rest_url.into();
        self
    }

    pub(crate) fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn fetch_contributions(
        &self,
        username: &str,
        year: CalendarYear,
    ) -> Result<ContributionDataset, FetchError> {
        let Some(token) = self.token.as_deref() else {
            return Err(FetchError::MissingToken);
        };
        let body = GraphQlRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: Variables {
                username,
                from: format!("{:04}-01-01T00:00:00Z", year.get()),
                to: format!("{:04}-12-31T23:59:59Z", year.get()),
            },
        };
        let url = self.graphql_url.as_str();
        debug!(username, %year, url, "querying contribution calendar");
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .map_err(|source| FetchError::transport(url, source))?;
        let payload = read_json::<GraphQlResponse>(url, response)?;
        payload
            .into_dataset()
            .map_err(|reason| FetchError::malformed(url, reason))
    }

    pub(crate) fn fetch_user_stats(&self, username: &str) -> Result<UserStats, FetchError> {
        let url = self.user_url(username)?;
        debug!(username, url = %url, "querying user profile");
        let mut request = self.http.get(url.clone());
        if let Some(token) = self.token.as_deref() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .map_err(|source| FetchError::transport(url.as_str(), source))?;
        read_json::<UserStats>(url.as_str(), response)
    }

    // The login is pushed as a single path segment so that it is always
    // percent-encoded
    fn user_url(&self, username: &str) -> Result<Url, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            url: self.rest_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.rest_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(String::from("URL cannot be a base")))?
            .pop_if_empty()
            .extend(["users", username]);
        Ok(url)
    }
}

fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, FetchError> {
    let status = response.status();
    debug!(url, %status, "received response");
    let text = response
        .text()
        .map_err(|source| FetchError::transport(url, source))?;
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_owned(),
            status,
            body: text,
        });
    }
    serde_json::from_str(&text).map_err(|e| FetchError::malformed(url, e.to_string()))
}

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("no GitHub token configured")]
    MissingToken,
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("invalid endpoint {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    fn transport(url: &str, source: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: url.to_owned(),
            source,
        }
    }

    fn malformed<S: Into<String>>(url: &str, reason: S) -> FetchError {
        FetchError::Malformed {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Public profile numbers shown in the heatmap header
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub(crate) struct UserStats {
    #[serde(default)]
    pub(crate) public_repos: u32,
    #[serde(default)]
    pub(crate) followers: u32,
    #[serde(default)]
    pub(crate) following: u32,
}

impl UserStats {
    /// Shown when the profile cannot be fetched
    pub(crate) const PLACEHOLDER: UserStats = UserStats {
        public_repos: 25,
        followers: 150,
        following: 75,
    };
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
struct Variables<'a> {
    username: &'a str,
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    fn into_dataset(self) -> Result<ContributionDataset, String> {
        if let Some(e) = self.errors.first() {
            return Err(format!("GraphQL error: {}", e.message));
        }
        let calendar = self
            .data
            .and_then(|data| data.user)
            .ok_or("response has no user")?
            .contributions_collection
            .contribution_calendar;
        let contributions = calendar
            .weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| {
                Date::parse(&day.date, &YMD_FMT)
                    .map(|date| ContributionDay::new(date, day.contribution_count))
                    .map_err(|e| format!("invalid date {:?}: {e}", day.date))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ContributionDataset {
            contributions,
            total_contributions: calendar.total_contributions,
            origin: Origin::Remote,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionCalendar {
    total_contributions: u32,
    weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarWeek {
    contribution_days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDay {
    date: String,
    contribution_count: u32,
}

#[cfg(test)]
pub(crate) mod testing {
    //! A one-shot HTTP server on the loopback interface
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{Receiver, channel};
    use std::thread;

    /// Serve a single canned response and hand back the raw request that was
    /// received
    pub(crate) fn serve_once(status_line: &str, body: &str) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = channel();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let request = read_request(&mut stream);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = tx.send(request);
        });
        (format!("http://{addr}"), rx)
    }

    fn read_request<R: Read>(stream: &mut R) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let Ok(n) = stream.read(&mut buf) else {
                break;
            };
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::serve_once;
    use super::*;
    use crate::level::Level;
    use time::macros::date;

    static CALENDAR_BODY: &str = r#"{
        "data": {
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": 18,
                        "weeks": [
                            {"contributionDays": [
                                {"date": "2025-01-01", "contributionCount": 3},
                                {"date": "2025-01-02", "contributionCount": 0}
                            ]},
                            {"contributionDays": [
                                {"date": "2025-01-05", "contributionCount": 15}
                            ]}
                        ]
                    }
                }
            }
        }
    }"#;

    fn client(url: &str, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(token.map(String::from))
            .unwrap()
            .with_endpoints(url, url)
    }

    fn year(y: i32) -> CalendarYear {
        CalendarYear::new(y).unwrap()
    }

    #[test]
    fn test_contributions_flattened() {
        let (url, requests) = serve_once("200 OK", CALENDAR_BODY);
        let dataset = client(&url, Some("s3cret"))
            .fetch_contributions("octocat", year(2025))
            .unwrap();
        assert_eq!(dataset.origin, Origin::Remote);
        assert_eq!(dataset.total_contributions, 18);
        assert_eq!(
            dataset.contributions,
            vec![
                ContributionDay::new(date!(2025 - 01 - 01), 3),
                ContributionDay::new(date!(2025 - 01 - 02), 0),
                ContributionDay::new(date!(2025 - 01 - 05), 15),
            ]
        );
        assert_eq!(dataset.contributions[2].level, Level::Peak);
        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST "));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer s3cret"));
        assert!(request.contains(r#""from":"2025-01-01T00:00:00Z""#));
        assert!(request.contains(r#""to":"2025-12-31T23:59:59Z""#));
        assert!(request.contains(r#""username":"octocat""#));
    }

    #[test]
    fn test_missing_token() {
        let r = client("http://127.0.0.1:9", None).fetch_contributions("octocat", year(2025));
        assert!(matches!(r, Err(FetchError::MissingToken)));
    }

    #[test]
    fn test_server_error() {
        let (url, _requests) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#);
        let r = client(&url, Some("t")).fetch_contributions("octocat", year(2025));
        match r {
            Err(FetchError::Status { status, body, .. }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, r#"{"message":"boom"}"#);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_user() {
        let (url, _requests) = serve_once(
            "200 OK",
            r#"{"data":{"user":null},"errors":[{"message":"Could not resolve to a User"}]}"#,
        );
        let r = client(&url, Some("t")).fetch_contributions("nobody", year(2025));
        match r {
            Err(FetchError::Malformed { reason, .. }) => {
                assert_eq!(reason, "GraphQL error: Could not resolve to a User");
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_not_json() {
        let (url, _requests) = serve_once("200 OK", "<html>rate limited</html>");
        let r = client(&url, Some("t")).fetch_contributions("octocat", year(2025));
        assert!(matches!(r, Err(FetchError::Malformed { .. })));
    }

    #[test]
    fn test_bad_date() {
        let (url, _requests) = serve_once(
            "200 OK",
            r#"{"data":{"user":{"contributionsCollection":{"contributionCalendar":{
                "totalContributions":1,
                "weeks":[{"contributionDays":[{"date":"yesterday","contributionCount":1}]}]
            }}}}}"#,
        );
        let r = client(&url, Some("t")).fetch_contributions("octocat", year(2025));
        assert!(matches!(r, Err(FetchError::Malformed { .. })));
    }

    #[test]
    fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let r = client(&url, Some("t")).fetch_contributions("octocat", year(2025));
        assert!(matches!(r, Err(FetchError::Transport { .. })));
    }

    #[test]
    fn test_user_stats() {
        let (url, requests) = serve_once(
            "200 OK",
            r#"{"login":"octocat","public_repos":8,"followers":1000,"following":9}"#,
        );
        let stats = client(&url, None).fetch_user_stats("octocat").unwrap();
        assert_eq!(
            stats,
            UserStats {
                public_repos: 8,
                followers: 1000,
                following: 9,
            }
        );
        let request = requests.recv().unwrap();
        assert!(request.starts_with("GET /users/octocat "));
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[test]
    fn test_user_stats_login_is_escaped() {
        let (url, requests) = serve_once(
            "200 OK",
            r#"{"public_repos":1,"followers":2,"following":3}"#,
        );
        client(&format!("{url}/"), None)
            .fetch_user_stats("a/b?c")
            .unwrap();
        let request = requests.recv().unwrap();
        assert!(
            request.starts_with("GET /users/a%2Fb%3Fc "),
            "unexpected request line: {request:?}"
        );
    }

    #[test]
    fn test_user_stats_bad_endpoint() {
        let r = client("not a url", None).fetch_user_stats("octocat");
        assert!(matches!(r, Err(FetchError::InvalidUrl { .. })));
    }
}

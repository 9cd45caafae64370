//! Hosted scores API client
//!
//! Talks to the REST proxy in front of the managed score table:
//! - `POST {endpoint}/scores` with `{"player_name", "score"}`
//! - `GET {endpoint}/scores/top?limit=N`
//!
//! Both requests carry the `x-api-key` header.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Leaderboard, LeaderboardEntry};
use crate::error::LeaderboardError;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    player_name: &'a str,
    score: u64,
}

#[derive(Debug, Deserialize)]
struct TopScores {
    #[serde(default)]
    scores: Vec<LeaderboardEntry>,
}

/// Leaderboard behind the scores REST API
pub struct RestLeaderboard {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestLeaderboard {
    /// Create a client for `endpoint` (trailing slashes are ignored)
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LeaderboardError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, endpoint, api_key))
    }

    /// Same, over an already configured client
    pub fn with_client(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn scores_url(&self) -> String {
        format!("{}/scores", self.endpoint)
    }

    fn top_url(&self) -> String {
        format!("{}/scores/top", self.endpoint)
    }
}

impl Leaderboard for RestLeaderboard {
    fn submit(&mut self, player_name: &str, score: u64) -> Result<(), LeaderboardError> {
        log::debug!("POST {} ({} for {})", self.scores_url(), score, player_name);

        let response = self
            .client
            .post(self.scores_url())
            .header("x-api-key", &self.api_key)
            .json(&SubmitRequest { player_name, score })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::Status(status.as_u16()));
        }
        Ok(())
    }

    fn fetch_top(&mut self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        log::debug!("GET {}?limit={}", self.top_url(), limit);

        let response = self
            .client
            .get(self.top_url())
            .query(&[("limit", limit)])
            .header("x-api-key", &self.api_key)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::Status(status.as_u16()));
        }

        let text = response.text()?;
        parse_top_scores(&text)
    }

    fn kind(&self) -> &'static str {
        "rest"
    }
}

/// Decode a top-scores response
///
/// The API answers either `{"scores": [...]}` directly or wrapped in a proxy
/// envelope whose `body` is the JSON document as a string.
pub fn parse_top_scores(text: &str) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let value: Value = serde_json::from_str(text)?;
    scores_from_value(value)
}

fn scores_from_value(value: Value) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    match value {
        Value::Object(mut map) if !map.contains_key("scores") && map.contains_key("body") => {
            match map.remove("body") {
                Some(Value::String(inner)) => parse_top_scores(&inner),
                Some(inner) => scores_from_value(inner),
                None => Ok(Vec::new()),
            }
        }
        other => {
            let top: TopScores = serde_json::from_value(other)?;
            Ok(top.scores)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{LeaderboardEvent, submit_and_fetch};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer one HTTP request per canned `(status line, body)` on a local
    /// port. The handle yields each raw request (head + body) as received.
    fn serve(responses: Vec<(&'static str, String)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/prod/", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut raw = String::new();
                let mut content_length = 0;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 {
                        break;
                    }
                    if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                    raw.push_str(&line);
                    if line == "\r\n" {
                        break;
                    }
                }
                let mut payload = vec![0; content_length];
                reader.read_exact(&mut payload).unwrap();
                raw.push_str(&String::from_utf8(payload).unwrap());

                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                requests.push(raw);
            }
            requests
        });

        (url, handle)
    }

    fn local_board(url: &str) -> RestLeaderboard {
        let client = Client::builder().no_proxy().timeout(REQUEST_TIMEOUT).build().unwrap();
        RestLeaderboard::with_client(client, url, "secret-key")
    }

    fn body_of(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_submit_posts_json_with_api_key() {
        let (url, server) = serve(vec![("200 OK", "{}".to_string())]);
        let mut board = local_board(&url);
        board.submit("Ada", 150).unwrap();

        let requests = server.join().unwrap();
        let raw = &requests[0];
        assert!(raw.starts_with("POST /prod/scores HTTP/1.1\r\n"), "{}", raw);
        let head = raw.to_ascii_lowercase();
        assert!(head.contains("\r\nx-api-key: secret-key\r\n"));
        assert!(head.contains("\r\ncontent-type: application/json\r\n"));
        assert_eq!(body_of(raw), serde_json::json!({ "player_name": "Ada", "score": 150 }));
    }

    #[test]
    fn test_fetch_top_sends_limit_and_unwraps_envelope() {
        let inner = r#"{"scores": [{"player_name": "Ada", "score": 150}, {"player_name": "Bob", "score": 90}]}"#;
        let envelope = serde_json::json!({ "statusCode": 200, "body": inner }).to_string();
        let (url, server) = serve(vec![("200 OK", envelope)]);
        let mut board = local_board(&url);

        let top = board.fetch_top(5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "Ada");

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET /prod/scores/top?limit=5 HTTP/1.1\r\n"), "{}", requests[0]);
        assert!(requests[0].to_ascii_lowercase().contains("\r\nx-api-key: secret-key\r\n"));
    }

    #[test]
    fn test_error_status_fails_the_round_trip() {
        let (url, server) = serve(vec![
            ("500 Internal Server Error", "{}".to_string()),
            ("500 Internal Server Error", "{}".to_string()),
        ]);
        let mut board = local_board(&url);

        assert!(matches!(board.submit("Ada", 150), Err(LeaderboardError::Status(500))));
        assert!(matches!(
            submit_and_fetch(&mut board, "Ada", 150, 10),
            LeaderboardEvent::Failed(_)
        ));
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_direct_payload() {
        let text = r#"{"scores": [{"player_name": "Ada", "score": 150}, {"player_name": "Bob", "score": 90}]}"#;
        let scores = parse_top_scores(text).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].player_name, "Ada");
    }

    #[test]
    fn test_parse_proxy_envelope() {
        let inner = r#"{"scores": [{"player_id": "p1", "player_name": "Ada", "score": 150.0, "timestamp": "2024-05-01T08:00:00.000001"}]}"#;
        let text = serde_json::json!({ "statusCode": 200, "body": inner }).to_string();
        let scores = parse_top_scores(&text).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 150);
        assert_eq!(scores[0].player_id, "p1");
        assert!(scores[0].timestamp.is_some());
    }

    #[test]
    fn test_parse_object_body_and_missing_scores() {
        let text = r#"{"body": {"scores": [{"player_name": "Cy", "score": "12"}]}}"#;
        assert_eq!(parse_top_scores(text).unwrap()[0].score, 12);

        assert!(parse_top_scores("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_top_scores("<html>"), Err(LeaderboardError::Decode(_))));
        assert!(parse_top_scores(r#"{"body": "not json"}"#).is_err());
    }

    #[test]
    fn test_endpoint_is_normalized() {
        let board = RestLeaderboard::new("https://scores.example.com/prod/", "key").unwrap();
        assert_eq!(board.endpoint(), "https://scores.example.com/prod");
        assert_eq!(board.top_url(), "https://scores.example.com/prod/scores/top");
    }
}

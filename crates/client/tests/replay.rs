use dump_client::{ClientConfig, ClientError, DumpClient, Geocoder, PhotoFetcher};
use dump_protocol::Photo;
use dump_template::{ApiCalls, ApiTemplates, CapturedCall};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// One-connection-per-request HTTP/1.1 server answering every request with
/// `status` and `body`.
async fn serve(status: u16, body: &'static str) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let sink = sink.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                sink.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            });
        }
    });
    (format!("http://{addr}"), recorded)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
    let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
    let request_line = lines.next().unwrap().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let length: usize = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0);
    let mut body = buf[head_end..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        body.extend_from_slice(&chunk[..n]);
    }
    Recorded {
        request_line,
        headers,
        body,
    }
}

fn call(base: &str, path: &str, body: Value) -> CapturedCall {
    let mut headers = BTreeMap::new();
    headers.insert("X-Session".to_string(), "abc".to_string());
    headers.insert("Content-Length".to_string(), "9999".to_string());
    headers.insert("Accept-Encoding".to_string(), "br".to_string());
    headers.insert(":authority".to_string(), "bumble.test".to_string());
    CapturedCall {
        url: format!("{base}/mwebapi.phtml?{path}"),
        headers,
        post_body: body.to_string(),
    }
}

fn client_for(base: &str) -> DumpClient {
    let api = ApiCalls {
        get_encounters: call(
            base,
            "SERVER_GET_ENCOUNTERS",
            json!({"body": [{"message_type": 81, "server_get_encounters": {"number": 10}}]}),
        ),
        dislike: call(
            base,
            "SERVER_ENCOUNTERS_VOTE",
            json!({"body": [{"server_encounters_vote": {"person_id": "old", "vote": 2, "vote_source": 1}}]}),
        ),
        update_location: call(
            base,
            "SERVER_UPDATE_LOCATION",
            json!({"body": [{"server_update_location": {"location": {"latitude": 1.0, "longitude": 2.0}}}]}),
        ),
    };
    DumpClient::new(ApiTemplates::load(api).unwrap(), &ClientConfig::default()).unwrap()
}

const PAGE: &str = r#"{"body":[{"client_encounters":{"results":[
    {"user":{"user_id":"u1","name":"Ann","profile_fields":[{"id":"aboutme_text","display_value":"hi"}]}},
    {"user":{"user_id":"u2","name":"Bea"}}
]}}]}"#;

#[tokio::test]
async fn encounters_replay_sends_captured_request() {
    let (base, recorded) = serve(200, PAGE).await;
    let client = client_for(&base);

    let users = client.get_encounters().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].bio(), Some("hi"));
    assert!(users[1].scan_date.is_some());

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.request_line.starts_with("POST /mwebapi.phtml?SERVER_GET_ENCOUNTERS"));
    assert_eq!(request.header("x-session"), Some("abc"));
    assert_ne!(request.header("accept-encoding"), Some("br"));
    assert_eq!(
        request.header("content-length"),
        Some(request.body.len().to_string().as_str())
    );
    assert_eq!(request.json()["body"][0]["server_get_encounters"]["number"], 10);
}

#[tokio::test]
async fn dislike_rewrites_vote_fields() {
    let (base, recorded) = serve(200, "{}").await;
    client_for(&base).dislike("u42").await.unwrap();

    let body = recorded.lock().unwrap()[0].json();
    let vote = &body["body"][0]["server_encounters_vote"];
    assert_eq!(vote["person_id"], "u42");
    assert_eq!(vote["vote"], 3);
    assert_eq!(vote["vote_source"], 1);
}

#[tokio::test]
async fn update_location_rewrites_coordinates() {
    let (base, recorded) = serve(200, "{}").await;
    client_for(&base)
        .update_location(-36.8485, 174.7633)
        .await
        .unwrap();

    let body = recorded.lock().unwrap()[0].json();
    let location = &body["body"][0]["server_update_location"]["location"];
    assert_eq!(location["latitude"], -36.8485);
    assert_eq!(location["longitude"], 174.7633);
}

#[tokio::test]
async fn http_failure_is_reported() {
    let (base, _) = serve(503, "{}").await;
    let err = client_for(&base).get_encounters().await.unwrap_err();
    assert!(matches!(err, ClientError::HttpError(_)), "{err}");
}

#[tokio::test]
async fn photo_fetch_returns_bytes() {
    let (base, recorded) = serve(200, "JPEGDATA").await;
    let photo = Photo {
        id: "p1".to_string(),
        large_url: format!("{base}/p1.jpg"),
        ..Default::default()
    };
    let data = PhotoFetcher::new(&ClientConfig::default())
        .unwrap()
        .fetch(&photo)
        .await
        .unwrap();
    assert_eq!(data, b"JPEGDATA");
    assert!(recorded.lock().unwrap()[0]
        .request_line
        .starts_with("GET /p1.jpg"));
}

#[tokio::test]
async fn geocoder_posts_address_form() {
    let (base, recorded) = serve(200, r#"{"data":{"lat":51.5072,"lng":-0.1276}}"#).await;
    let config = ClientConfig {
        geocode_url: format!("{base}/data.php?operation=geocode"),
        geocode_referer: "https://referer.test/".to_string(),
        ..Default::default()
    };
    let coords = Geocoder::new(&config)
        .unwrap()
        .lookup("London, UK")
        .await
        .unwrap();
    assert_eq!(coords, (51.5072, -0.1276));

    let request = recorded.lock().unwrap()[0].clone();
    assert_eq!(request.header("referer"), Some("https://referer.test/"));
    assert_eq!(
        String::from_utf8(request.body).unwrap(),
        "address=London%2C+UK"
    );
}

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use fightcard_terminal::api::HttpSource;
use fightcard_terminal::model::{Side, Tier};
use fightcard_terminal::provider::{FightSource, run_command};
use fightcard_terminal::state::{Delta, ProviderCommand};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Answers one request per canned response, in order, and reports each request line.
fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }
            let _ = seen_tx.send(request_line.trim_end().to_string());
            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });
    (base, seen_rx)
}

fn source(base: &str) -> HttpSource {
    HttpSource::new(base, Duration::from_secs(5)).expect("client should build")
}

fn next_request(rx: &mpsc::Receiver<String>) -> String {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("server should see a request")
}

#[test]
fn fight_card_is_fetched_and_parsed() {
    let (base, seen) = serve(vec![(200, read_fixture("fight_card.json"))]);
    let card = source(&base).fetch_fight_card().expect("card should load");

    assert_eq!(next_request(&seen), "GET /api/f HTTP/1.1");
    assert_eq!(card.history[0].fighter.name, "Ryu");
    assert_eq!(card.history[1].fighter.tier, Tier::A);
    assert_eq!(card.stats.p2_life, "1000");
}

#[test]
fn history_and_roster_use_their_paths() {
    let (base, seen) = serve(vec![
        (200, read_fixture("history.json")),
        (200, read_fixture("roster.json")),
    ]);
    let source = source(&base);

    let history = source.fetch_history(42).expect("history should load");
    assert_eq!(next_request(&seen), "GET /api/h/42 HTTP/1.1");
    assert_eq!(history.fighter.name, "Akuma");
    assert_eq!(history.wins.len(), 3);

    let roster = source.fetch_roster().expect("roster should load");
    assert_eq!(next_request(&seen), "GET /api/a HTTP/1.1");
    assert_eq!(roster.len(), 4);
}

#[test]
fn error_status_is_an_error() {
    let (base, seen) = serve(vec![(404, "{\"error\":\"no fighter\"}".to_string())]);
    let err = source(&base)
        .fetch_history(9)
        .expect_err("404 should fail");

    assert_eq!(next_request(&seen), "GET /api/h/9 HTTP/1.1");
    let text = format!("{err:#}");
    assert!(text.contains("404"), "unexpected error: {text}");
    assert!(text.contains("no fighter"), "unexpected error: {text}");
}

#[test]
fn server_error_comes_back_as_failed_delta() {
    let (base, _seen) = serve(vec![(500, "boom".to_string())]);
    let source = source(&base);
    let (tx, rx) = mpsc::channel();

    run_command(
        &source,
        ProviderCommand::FetchHistory {
            side: Side::Red,
            id: 3,
        },
        &tx,
    );
    assert!(matches!(
        rx.recv().unwrap(),
        Delta::HistoryFailed { side: Side::Red, id: 3, error } if error.contains("500")
    ));
}

#[test]
fn malformed_body_is_an_error() {
    let (base, _seen) = serve(vec![(200, "{\"History\": [".to_string())]);
    assert!(source(&base).fetch_fight_card().is_err());
}

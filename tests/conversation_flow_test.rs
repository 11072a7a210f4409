use std::time::Duration;

use bukidmate::handler::{FORECAST_FAILED, FORMAT_HINT};
use bukidmate::ui::conversation::{BackendState, ConversationAction, ConversationManager};
use bukidmate::{AppEvent, BackendClient, Config, Sender};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager_for(url: String) -> (ConversationManager, mpsc::UnboundedReceiver<AppEvent>) {
    let config = Config {
        backend_url: url,
        greeting: String::new(),
        ..Config::default()
    };
    let client = BackendClient::new(&config).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (ConversationManager::new(&config, client, tx), rx)
}

fn contents(manager: &ConversationManager) -> Vec<(Sender, String)> {
    manager
        .conversation()
        .messages()
        .iter()
        .map(|m| (m.sender, m.content.clone()))
        .collect()
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event in time")
        .expect("channel open")
}

#[tokio::test]
async fn test_message_then_delayed_follow_up() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/live-model-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "A", "follow_up": "B" })))
        .mount(&server)
        .await;
    let (mut manager, mut rx) = manager_for(server.uri());

    manager.submit("Central Luzon, Tomato");
    // user turn is in place before the request has had a chance to run
    assert_eq!(contents(&manager), [(Sender::User, "Central Luzon, Tomato".to_string())]);
    assert!(manager.conversation().is_typing());

    let event = next_event(&mut rx).await;
    assert!(matches!(event, AppEvent::BackendResult { .. }));

    // the HTTP round trip is done; from here on the clock only moves by hand
    tokio::time::pause();
    manager.handle_app_event(event);
    assert!(!manager.conversation().is_typing());
    assert_eq!(manager.conversation().len(), 2);

    // let the follow-up timer register before moving the clock
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(499)).await;
    assert!(rx.try_recv().is_err(), "follow-up arrived before the default 500 ms");

    tokio::time::advance(Duration::from_millis(1)).await;
    let event = next_event(&mut rx).await;
    assert!(matches!(event, AppEvent::FollowUpDue(_)));
    manager.handle_app_event(event);

    assert_eq!(
        contents(&manager),
        [
            (Sender::User, "Central Luzon, Tomato".to_string()),
            (Sender::Bot, "A".to_string()),
            (Sender::Bot, "B".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_failure_yields_one_bot_turn_and_clears_typing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (mut manager, mut rx) = manager_for(server.uri());

    manager.submit("Central Luzon, Tomato");
    let event = next_event(&mut rx).await;
    manager.handle_app_event(event);

    assert!(!manager.conversation().is_typing());
    assert_eq!(
        contents(&manager),
        [
            (Sender::User, "Central Luzon, Tomato".to_string()),
            (Sender::Bot, FORECAST_FAILED.to_string()),
        ]
    );
    assert!(tokio::time::timeout(Duration::from_millis(150), rx.recv()).await.is_err());
}

#[tokio::test]
async fn test_missing_region_answers_locally() {
    let server = MockServer::start().await;
    let (mut manager, _rx) = manager_for(server.uri());

    manager.submit("Tomato");

    assert!(!manager.conversation().is_typing());
    assert_eq!(
        contents(&manager),
        [
            (Sender::User, "Tomato".to_string()),
            (Sender::Bot, FORMAT_HINT.to_string()),
        ]
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_response_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("crop", "Tomato"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "tomato price" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(query_param("crop", "Onion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "onion price" })))
        .mount(&server)
        .await;
    let (mut manager, mut rx) = manager_for(server.uri());

    manager.submit("Central Luzon, Tomato");
    manager.submit("Onion");
    for _ in 0..2 {
        let event = next_event(&mut rx).await;
        manager.handle_app_event(event);
    }

    assert!(!manager.conversation().is_typing());
    let bot_turns: Vec<String> = contents(&manager)
        .into_iter()
        .filter(|(sender, _)| *sender == Sender::Bot)
        .map(|(_, content)| content)
        .collect();
    assert_eq!(bot_turns, ["onion price"]);
}

#[tokio::test]
async fn test_ids_increase_across_branches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok", "follow_up": "sell?" })))
        .mount(&server)
        .await;
    let (mut manager, mut rx) = manager_for(server.uri());

    manager.submit("Tomato");
    manager.submit("Central Luzon, Tomato");
    manager.handle_app_event(next_event(&mut rx).await);
    manager.handle_app_event(next_event(&mut rx).await);
    manager.submit("OO");
    manager.handle_app_event(next_event(&mut rx).await);

    let ids: Vec<u64> = manager.conversation().messages().iter().map(|m| m.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "ids not increasing: {ids:?}");
    assert_eq!(ids.first(), Some(&1));
}

#[tokio::test]
async fn test_keyboard_submit_and_commands() {
    let server = MockServer::start().await;
    let (mut manager, _rx) = manager_for(server.uri());

    for c in "Tomato".chars() {
        manager.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    manager.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(manager.conversation().messages()[0].content, "Tomato");

    assert!(!manager.is_sidebar_visible());
    manager.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
    assert!(manager.is_sidebar_visible());

    for c in "/help".chars() {
        manager.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    // first Enter accepts the palette entry, second runs it
    manager.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    manager.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    let last = manager.conversation().messages().last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert!(last.content.contains("Region, Crop"));

    assert_eq!(
        manager.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ConversationAction::Exit
    );
}

#[tokio::test]
async fn test_esc_closes_palette_then_quits() {
    let server = MockServer::start().await;
    let (mut manager, _rx) = manager_for(server.uri());
    let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);

    manager.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
    assert_eq!(manager.handle_key(esc), ConversationAction::None);
    assert_eq!(manager.handle_key(esc), ConversationAction::Exit);
}

#[tokio::test]
async fn test_follow_up_lands_after_newer_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("crop", "Tomato"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "A", "follow_up": "B" })))
        .mount(&server)
        .await;
    let (mut manager, mut rx) = manager_for(server.uri());

    manager.submit("Central Luzon, Tomato");
    manager.handle_app_event(next_event(&mut rx).await);
    // typed before the sell prompt showed up
    manager.submit("Onion");
    for _ in 0..2 {
        let event = next_event(&mut rx).await;
        manager.handle_app_event(event);
    }

    let turns = contents(&manager);
    let onion = turns.iter().position(|(_, content)| content == "Onion");
    let sell_prompt = turns.iter().position(|(sender, content)| *sender == Sender::Bot && content == "B");
    assert!(onion.is_some() && sell_prompt.is_some(), "turns: {turns:?}");
    assert!(onion < sell_prompt);
    assert!(turns.iter().any(|(_, content)| content == FORECAST_FAILED));
}

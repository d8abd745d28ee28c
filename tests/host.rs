//! Session host tests: sessions on their own tasks, driven through command
//! channels, with mutations streamed back over the outbound channel.

use std::time::Duration;

use rui_core::app::{AppConfig, Command, SessionHost};
use rui_core::event::{EventPayload, EventTag, Handler, InboundEvent, MouseEvent};
use rui_core::geometry::Point;
use rui_core::session::ClientInfo;
use rui_core::{Error, Mutation, Session};
use tokio::sync::mpsc;
use tokio::time::timeout;

const PAGE: &str = "ListLayout { content = [
    TextView { id = status, text = idle },
    Button { id = go, content = \"Go\" },
] }";

/// Views in `PAGE`: the list, the text, the button and its text child.
const PAGE_VIEWS: usize = 4;

fn build_page(session: &mut Session) -> rui_core::Result<()> {
    let root = session.realize_source(PAGE)?.root;
    session.set_root(root)?;
    let status = session.view_by_id("status").ok_or_else(|| Error::ViewNotFound("status".into()))?;
    let go = session.view_by_id("go").ok_or_else(|| Error::ViewNotFound("go".into()))?;
    session.on(
        go,
        EventTag::Click,
        Handler::bare(move |s| {
            let _ = s.set(status, "text", "clicked");
        }),
    );
    Ok(())
}

fn click(target: &str) -> InboundEvent {
    InboundEvent::new(
        EventTag::Click,
        target,
        EventPayload::Mouse(MouseEvent::at(Point::default())),
    )
}

/// Receive `n` mutations, failing if they do not arrive promptly.
async fn recv_n(rx: &mut mpsc::Receiver<Mutation>, n: usize) -> Vec<Mutation> {
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let next = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("mutation timed out")
            .expect("outbound closed early");
        out.push(next);
    }
    out
}

// ── Lifecycle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn opened_session_streams_initial_tree() {
    let mut host = SessionHost::new(AppConfig::new(), build_page).unwrap();
    let (id, mut rx) = host.open(ClientInfo::default()).unwrap();
    let created = recv_n(&mut rx, PAGE_VIEWS).await;
    assert!(created.iter().all(|m| m.op() == "create-view"));
    assert_eq!(host.session_count(), 1);
    host.finish(id).await.unwrap();
    assert_eq!(host.session_count(), 0);
}

#[tokio::test]
async fn events_produce_mutations() {
    let mut host = SessionHost::new(AppConfig::new(), build_page).unwrap();
    let (id, mut rx) = host.open(ClientInfo::default()).unwrap();
    recv_n(&mut rx, PAGE_VIEWS).await;

    host.event(id, click("go")).unwrap();
    let update = recv_n(&mut rx, 1).await;
    assert!(matches!(
        &update[0],
        Mutation::SetProperty { tag, .. } if tag == "text"
    ));
    host.finish(id).await.unwrap();
}

#[tokio::test]
async fn finished_session_rejects_commands() {
    let mut host = SessionHost::new(AppConfig::new(), build_page).unwrap();
    let (id, mut rx) = host.open(ClientInfo::default()).unwrap();
    host.finish(id).await.unwrap();

    assert!(matches!(host.send(id, Command::Pause), Err(Error::SessionClosed(_))));
    assert!(matches!(host.finish(id).await, Err(Error::SessionClosed(_))));

    // The task dropped its sender; the stream ends after the buffered tree.
    let mut remaining = 0;
    while timeout(Duration::from_secs(2), rx.recv()).await.unwrap().is_some() {
        remaining += 1;
    }
    assert!(remaining >= PAGE_VIEWS);
}

#[tokio::test]
async fn reconnect_replays_tree() {
    let mut host = SessionHost::new(AppConfig::new(), build_page).unwrap();
    let (id, mut rx) = host.open(ClientInfo::default()).unwrap();
    recv_n(&mut rx, PAGE_VIEWS).await;

    host.send(id, Command::Disconnect).unwrap();
    host.send(id, Command::Reconnect).unwrap();
    let replayed = recv_n(&mut rx, PAGE_VIEWS).await;
    assert!(replayed.iter().all(|m| m.op() == "create-view"));
    host.finish(id).await.unwrap();
}

// ── Limits ────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_limit_is_enforced() {
    let config = AppConfig::new().with_max_sessions(1);
    let mut host = SessionHost::new(config, build_page).unwrap();
    let (first, _rx) = host.open(ClientInfo::default()).unwrap();
    assert!(matches!(host.open(ClientInfo::default()), Err(Error::Config(_))));

    host.finish(first).await.unwrap();
    let (second, _rx) = host.open(ClientInfo::default()).unwrap();
    assert_ne!(first, second);
    host.shutdown().await;
}

#[test]
fn small_outbound_capacity_still_delivers_everything() {
    tokio_test::block_on(async {
        let config = AppConfig::new().with_outbound_capacity(1);
        let mut host = SessionHost::new(config, build_page).unwrap();
        let (id, mut rx) = host.open(ClientInfo::default()).unwrap();
        let created = recv_n(&mut rx, PAGE_VIEWS).await;
        assert_eq!(created.len(), PAGE_VIEWS);
        host.finish(id).await.unwrap();
    });
}

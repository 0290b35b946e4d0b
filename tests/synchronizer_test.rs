//! Tests for the board synchronizer's reconcile/revert cycle.

use std::collections::VecDeque;

use strictly_webgame::{
    BoardSynchronizer, MemorySurface, Mark, MoveRequest, Outcome, SessionSnapshot,
    SessionTransport, SyncOutcome, SyncPhase, TransportError,
};

/// Transport answering from a script and recording what was sent.
#[derive(Debug, Default)]
struct ScriptedTransport {
    responses: VecDeque<Result<SessionSnapshot, TransportError>>,
    fetches: Vec<String>,
    submitted: Vec<MoveRequest>,
}

impl ScriptedTransport {
    fn with(responses: Vec<Result<SessionSnapshot, TransportError>>) -> Self {
        Self {
            responses: responses.into(),
            ..Self::default()
        }
    }

    fn next(&mut self) -> Result<SessionSnapshot, TransportError> {
        self.responses
            .pop_front()
            .unwrap_or(Err(TransportError::Request {
                message: "script exhausted".to_string(),
            }))
    }
}

#[async_trait::async_trait]
impl SessionTransport for ScriptedTransport {
    async fn fetch(&mut self, session_id: &str) -> Result<SessionSnapshot, TransportError> {
        self.fetches.push(session_id.to_string());
        self.next()
    }

    async fn submit(
        &mut self,
        _session_id: &str,
        request: &MoveRequest,
    ) -> Result<SessionSnapshot, TransportError> {
        self.submitted.push(*request);
        self.next()
    }
}

fn snapshot(json: &str) -> SessionSnapshot {
    SessionSnapshot::parse(json).expect("Invalid test snapshot")
}

fn empty() -> SessionSnapshot {
    snapshot(r#"{"board": [[0,0,0],[0,0,0],[0,0,0]], "winner": null}"#)
}

fn rejected() -> Result<SessionSnapshot, TransportError> {
    Err(TransportError::Rejected { status: 500 })
}

fn page(
    responses: Vec<Result<SessionSnapshot, TransportError>>,
) -> BoardSynchronizer<ScriptedTransport, MemorySurface> {
    BoardSynchronizer::new(
        "12345".to_string(),
        Mark::OMark,
        ScriptedTransport::with(responses),
        MemorySurface::new(),
    )
}

fn slots(page: &BoardSynchronizer<ScriptedTransport, MemorySurface>) -> String {
    page.view().surface().text()
}

#[tokio::test]
async fn test_initial_load_renders_blank_board() {
    let mut page = page(vec![Ok(empty())]);
    assert_eq!(page.phase(), SyncPhase::Idle);

    let outcome = page.refresh().await.unwrap();

    assert_eq!(outcome, SyncOutcome::Reconciled(Outcome::InProgress));
    assert_eq!(slots(&page), " ".repeat(9));
    assert_eq!(page.view().surface().completion(), None);
    assert_eq!(page.phase(), SyncPhase::Reconciled);
}

#[tokio::test]
async fn test_click_cell_zero_reconciles() {
    let mut page = page(vec![
        Ok(empty()),
        Ok(snapshot(r#"{"board": [[1,0,0],[0,0,0],[0,0,0]], "winner": null}"#)),
    ]);
    page.refresh().await.unwrap();

    let outcome = page.play_cell(0).await.unwrap();

    assert_eq!(outcome, Some(SyncOutcome::Reconciled(Outcome::InProgress)));
    assert_eq!(page.view().surface().slots()[0], 'O');
    assert_eq!(page.view().surface().completion(), None);
    assert_eq!(page.board().cells()[0], Mark::OMark);
}

#[tokio::test]
async fn test_click_posts_set_mark_with_row_and_column() {
    let mut page = page(vec![
        Ok(empty()),
        Ok(snapshot(r#"{"board": [0,0,0,0,1,0,0,0,0], "winner": null}"#)),
    ]);
    page.refresh().await.unwrap();

    page.play_cell(4).await.unwrap();

    assert_eq!(
        page.transport().submitted,
        vec![MoveRequest::set_mark(1, 1, Mark::OMark)]
    );
    assert_eq!(page.transport().fetches, vec!["12345".to_string()]);
}

#[tokio::test]
async fn test_rejected_move_reverts_to_last_good_board() {
    let before = snapshot(r#"{"board": [[0,2,0],[0,0,0],[0,0,0]], "winner": null}"#);
    let mut page = page(vec![Ok(before), rejected()]);
    page.refresh().await.unwrap();
    let displayed_before = slots(&page);

    let event = page.handle_cell_clicked(8).unwrap().unwrap();
    assert_eq!(page.view().surface().slots()[8], 'O');
    assert_eq!(page.phase(), SyncPhase::AwaitingConfirmation);
    assert_eq!(page.pending(), Some(event));

    let outcome = page.submit_move(event.row, event.column, event.mark).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Reverted(TransportError::Rejected { status: 500 })
    );
    assert_eq!(slots(&page), displayed_before);
    assert_eq!(page.last_good(), &before);
    assert_eq!(page.phase(), SyncPhase::Reverted);
    assert_eq!(page.pending(), None);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let first = snapshot(r#"{"board": [1,0,0,0,2,0,0,0,0], "winner": null}"#);
    let mut page = page(vec![Ok(first), rejected()]);
    page.refresh().await.unwrap();

    let outcome = page.refresh().await.unwrap();

    assert!(matches!(outcome, SyncOutcome::Reverted(_)));
    assert_eq!(page.last_good(), &first);
    assert_eq!(slots(&page), "O   X    ");
}

#[tokio::test]
async fn test_winner_response_shows_completion() {
    let mut page = page(vec![
        Ok(empty()),
        Ok(snapshot(r#"{"board": [[2,2,2],[1,1,0],[0,0,0]], "winner": 2}"#)),
    ]);
    page.refresh().await.unwrap();

    let outcome = page.play_cell(4).await.unwrap();

    assert_eq!(outcome, Some(SyncOutcome::Reconciled(Outcome::Won(Mark::XMark))));
    assert_eq!(page.winner(), Some(Mark::XMark));
    assert_eq!(page.winner().map(Mark::label), Some("XMARK"));
    assert_eq!(
        page.view().surface().completion(),
        Some(Outcome::Won(Mark::XMark))
    );
}

#[tokio::test]
async fn test_full_board_without_winner_is_draw() {
    let mut page = page(vec![Ok(snapshot(
        r#"{"board": [[2,1,2],[2,1,1],[1,2,2]], "winner": null}"#,
    ))]);

    let outcome = page.refresh().await.unwrap();

    assert_eq!(outcome, SyncOutcome::Reconciled(Outcome::Draw));
    assert_eq!(page.view().surface().completion(), Some(Outcome::Draw));
}

#[tokio::test]
async fn test_clicks_inert_after_game_over() {
    let mut page = page(vec![Ok(snapshot(
        r#"{"board": [[1,1,1],[2,2,0],[0,0,0]], "winner": 1}"#,
    ))]);
    page.refresh().await.unwrap();
    let displayed = slots(&page);

    assert_eq!(page.handle_cell_clicked(8).unwrap(), None);
    assert_eq!(page.play_cell(5).await.unwrap(), None);

    assert_eq!(slots(&page), displayed);
    assert!(page.transport().submitted.is_empty());
}

#[tokio::test]
async fn test_second_click_ignored_while_move_in_flight() {
    let mut page = page(vec![Ok(empty())]);
    page.refresh().await.unwrap();

    let first = page.handle_cell_clicked(0).unwrap();
    let second = page.handle_cell_clicked(1).unwrap();

    assert!(first.is_some());
    assert_eq!(second, None);
    assert_eq!(page.view().surface().slots()[1], ' ');
}

#[tokio::test]
async fn test_server_reset_reenables_input() {
    let mut page = page(vec![
        Ok(snapshot(r#"{"board": [[1,1,1],[2,2,0],[0,0,0]], "winner": 1}"#)),
        Ok(empty()),
    ]);
    page.refresh().await.unwrap();
    assert_eq!(page.handle_cell_clicked(8).unwrap(), None);

    page.refresh().await.unwrap();

    assert_eq!(page.winner(), None);
    assert_eq!(page.view().surface().completion(), None);
    assert!(page.handle_cell_clicked(8).unwrap().is_some());
}

#[tokio::test]
async fn test_click_out_of_range_is_error() {
    let mut page = page(vec![Ok(empty())]);
    page.refresh().await.unwrap();

    assert!(page.handle_cell_clicked(9).is_err());
    assert_eq!(page.phase(), SyncPhase::Reconciled);
}

#[tokio::test]
async fn test_surface_slot_mismatch_fails_loudly() {
    let mut page = BoardSynchronizer::new(
        "12345".to_string(),
        Mark::OMark,
        ScriptedTransport::with(vec![Ok(empty())]),
        MemorySurface::with_slots(8),
    );

    assert!(page.refresh().await.is_err());
    assert_eq!(page.view().surface().slots(), &[' '; 8]);
}

#[tokio::test]
async fn test_render_failure_leaves_move_cycle() {
    let mut page = BoardSynchronizer::new(
        "12345".to_string(),
        Mark::OMark,
        ScriptedTransport::with(vec![Ok(snapshot(
            r#"{"board": [1,0,0,0,0,0,0,0,0], "winner": null}"#,
        ))]),
        MemorySurface::with_slots(8),
    );

    assert!(page.submit_move(0, 0, Mark::OMark).await.is_err());

    assert_eq!(page.phase(), SyncPhase::Reverted);
    assert_eq!(page.pending(), None);
    assert_eq!(page.last_good(), &SessionSnapshot::empty());
}

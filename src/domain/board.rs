use crate::domain::card::{Card, CardDraft, CardId, CardIdGenerator};
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Identifier of a board lane (e.g. `todo`, `progress`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(String);

impl LaneId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LaneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A named, ordered column of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Lane {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: LaneId::new(id),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn position_of(&self, card_id: &CardId) -> Option<usize> {
        self.cards.iter().position(|c| &c.id == card_id)
    }
}

/// Kanban board state
///
/// Every card sits in exactly one lane. [`Board::move_card`] resolves both
/// ends before touching anything, so a rejected move never leaves a card in
/// zero or two lanes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Board {
    lanes: Vec<Lane>,
    #[serde(skip)]
    ids: CardIdGenerator,
}

impl Board {
    pub fn new(lanes: Vec<Lane>) -> Self {
        Self {
            lanes,
            ids: CardIdGenerator::new(),
        }
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, lane_id: &LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|l| &l.id == lane_id)
    }

    /// Total number of cards across all lanes
    pub fn total_cards(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    /// Finds a card and the lane that holds it
    pub fn find_card(&self, card_id: &CardId) -> Option<(&LaneId, &Card)> {
        self.lanes.iter().find_map(|lane| {
            lane.cards
                .iter()
                .find(|c| &c.id == card_id)
                .map(|card| (&lane.id, card))
        })
    }

    fn lane_index(&self, lane_id: &LaneId) -> Option<usize> {
        self.lanes.iter().position(|l| &l.id == lane_id)
    }

    fn locate(&self, card_id: &CardId) -> Option<(usize, usize)> {
        self.lanes
            .iter()
            .enumerate()
            .find_map(|(li, lane)| lane.position_of(card_id).map(|ci| (li, ci)))
    }

    /// Moves a card to the end of the target lane
    ///
    /// Fails with `CardNotFound` if no lane holds the card and with
    /// `LaneNotFound` if the target lane does not exist; in both cases the
    /// board is unchanged. Dropping a card on its own lane moves it to the end.
    pub fn move_card(&mut self, card_id: &CardId, target: &LaneId) -> Result<()> {
        let Some((source_idx, card_idx)) = self.locate(card_id) else {
            warn!(card = %card_id, "move rejected: card not on board");
            return Err(DashError::CardNotFound(card_id.to_string()));
        };
        let Some(target_idx) = self.lane_index(target) else {
            warn!(card = %card_id, lane = %target, "move rejected: no such lane");
            return Err(DashError::LaneNotFound(target.to_string()));
        };

        let card = self.lanes[source_idx].cards.remove(card_idx);
        self.lanes[target_idx].cards.push(card);

        debug!(
            card = %card_id,
            from = %self.lanes[source_idx].id,
            to = %target,
            "moved card"
        );
        Ok(())
    }

    /// Validates the draft and appends a new card to the lane
    pub fn add_card(&mut self, lane_id: &LaneId, draft: &CardDraft) -> Result<CardId> {
        let lane_idx = self
            .lane_index(lane_id)
            .ok_or_else(|| DashError::LaneNotFound(lane_id.to_string()))?;
        let valid = draft.validate().map_err(|err| {
            warn!(lane = %lane_id, error = %err, "card rejected");
            err
        })?;

        let id = self.ids.next_id();
        let card = valid.into_card(id.clone());
        debug!(card = %id, lane = %lane_id, title = %card.title, "added card");
        self.lanes[lane_idx].cards.push(card);

        Ok(id)
    }
}

/// Card currently being dragged, held between pick-up and drop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    dragged: Option<CardId>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick_up(&mut self, card_id: CardId) {
        self.dragged = Some(card_id);
    }

    pub fn dragged(&self) -> Option<&CardId> {
        self.dragged.as_ref()
    }

    /// Drops the dragged card onto a lane
    ///
    /// Returns the moved card's ID, or `None` when nothing was being dragged.
    /// The drag ends whether or not the move succeeds.
    pub fn drop_on(&mut self, board: &mut Board, lane_id: &LaneId) -> Result<Option<CardId>> {
        let Some(card_id) = self.dragged.take() else {
            return Ok(None);
        };
        board.move_card(&card_id, lane_id)?;
        Ok(Some(card_id))
    }

    /// Abandons the drag without touching the board
    pub fn cancel(&mut self) {
        self.dragged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Priority;
    use chrono::NaiveDate;

    fn card(id: &str, title: &str) -> Card {
        Card {
            id: CardId::from(id),
            title: title.to_string(),
            description: format!("{} description", title),
            assignee: "John Doe".to_string(),
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        }
    }

    fn board() -> Board {
        Board::new(vec![
            Lane::new("todo", "To Do").with_cards(vec![card("a", "A"), card("b", "B")]),
            Lane::new("done", "Done"),
        ])
    }

    fn titles(board: &Board, lane: &str) -> Vec<String> {
        board
            .lane(&LaneId::from(lane))
            .unwrap()
            .cards
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }

    #[test]
    fn test_move_card_to_other_lane() {
        let mut board = board();

        board
            .move_card(&CardId::from("a"), &LaneId::from("done"))
            .unwrap();

        assert_eq!(titles(&board, "todo"), vec!["B"]);
        assert_eq!(titles(&board, "done"), vec!["A"]);
    }

    #[test]
    fn test_move_conserves_total() {
        let mut board = board();
        let before = board.total_cards();

        board
            .move_card(&CardId::from("b"), &LaneId::from("done"))
            .unwrap();
        board
            .move_card(&CardId::from("a"), &LaneId::from("done"))
            .unwrap();

        assert_eq!(board.total_cards(), before);
        assert_eq!(titles(&board, "done"), vec!["B", "A"]);
    }

    #[test]
    fn test_move_unknown_card_is_rejected() {
        let mut board = board();

        let err = board
            .move_card(&CardId::from("zzz"), &LaneId::from("done"))
            .unwrap_err();

        assert!(matches!(err, DashError::CardNotFound(_)));
        assert_eq!(titles(&board, "todo"), vec!["A", "B"]);
        assert!(titles(&board, "done").is_empty());
    }

    #[test]
    fn test_move_to_unknown_lane_keeps_card() {
        let mut board = board();

        let err = board
            .move_card(&CardId::from("a"), &LaneId::from("archive"))
            .unwrap_err();

        assert!(matches!(err, DashError::LaneNotFound(_)));
        assert_eq!(titles(&board, "todo"), vec!["A", "B"]);
        assert_eq!(board.total_cards(), 2);
    }

    #[test]
    fn test_move_within_same_lane_goes_to_end() {
        let mut board = board();

        board
            .move_card(&CardId::from("a"), &LaneId::from("todo"))
            .unwrap();

        assert_eq!(titles(&board, "todo"), vec!["B", "A"]);
    }

    #[test]
    fn test_add_card_appends_to_lane() {
        let mut board = board();
        let draft = CardDraft::new("C", "Third", "Eve Miller", "2024-02-01");

        let id = board.add_card(&LaneId::from("todo"), &draft).unwrap();

        assert_eq!(titles(&board, "todo"), vec!["A", "B", "C"]);
        let (lane, card) = board.find_card(&id).unwrap();
        assert_eq!(lane.as_str(), "todo");
        assert_eq!(card.assignee, "Eve Miller");
    }

    #[test]
    fn test_add_card_with_missing_field_is_rejected() {
        let mut board = board();
        let draft = CardDraft::new("C", "", "Eve Miller", "2024-02-01");

        let err = board.add_card(&LaneId::from("todo"), &draft).unwrap_err();

        assert!(matches!(err, DashError::Validation { .. }));
        assert_eq!(board.total_cards(), 2);
    }

    #[test]
    fn test_add_card_to_unknown_lane() {
        let mut board = board();
        let draft = CardDraft::new("C", "Third", "Eve Miller", "2024-02-01");

        let err = board.add_card(&LaneId::from("nope"), &draft).unwrap_err();

        assert!(matches!(err, DashError::LaneNotFound(_)));
        assert_eq!(board.total_cards(), 2);
    }

    #[test]
    fn test_added_card_ids_are_unique() {
        let mut board = board();
        let draft = CardDraft::new("C", "Third", "Eve Miller", "2024-02-01");

        let first = board.add_card(&LaneId::from("todo"), &draft).unwrap();
        let second = board.add_card(&LaneId::from("todo"), &draft).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_drag_and_drop() {
        let mut board = board();
        let mut drag = DragSession::new();

        drag.pick_up(CardId::from("b"));
        let moved = drag.drop_on(&mut board, &LaneId::from("done")).unwrap();

        assert_eq!(moved, Some(CardId::from("b")));
        assert!(drag.dragged().is_none());
        assert_eq!(titles(&board, "done"), vec!["B"]);
    }

    #[test]
    fn test_drop_without_pick_up_is_noop() {
        let mut board = board();
        let mut drag = DragSession::new();

        let moved = drag.drop_on(&mut board, &LaneId::from("done")).unwrap();

        assert_eq!(moved, None);
        assert_eq!(titles(&board, "todo"), vec!["A", "B"]);
    }

    #[test]
    fn test_cancelled_drag_has_no_effect() {
        let mut board = board();
        let mut drag = DragSession::new();

        drag.pick_up(CardId::from("a"));
        drag.cancel();
        let moved = drag.drop_on(&mut board, &LaneId::from("done")).unwrap();

        assert_eq!(moved, None);
        assert_eq!(titles(&board, "todo"), vec!["A", "B"]);
    }

    #[test]
    fn test_board_serialization_skips_generator() {
        let json = serde_json::to_string(&board()).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.lanes(), board().lanes());
    }
}

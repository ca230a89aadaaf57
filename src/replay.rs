use crate::entities::{Direction, Position};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

pub fn create_replay_logger(enabled: bool, width: usize, height: usize) -> Box<dyn ReplayLogger> {
    match enabled {
        false => Box::new(NoOpReplayLogger {}),
        true => Box::new(JsonReplayLogger::new(width, height)),
    }
}

/// Records what happens on every turn of a simulation.
///
/// All methods default to doing nothing so that recording can be switched off for free.
pub trait ReplayLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_turn(&mut self, turn: usize, snakes: usize) {}

    fn log_spawn_snake(&mut self, turn: usize, id: String, cells: Vec<Position>) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Spawn,
                entity: "Snake".to_string(),
                entity_id: Some(id),
                location: cells.first().copied(),
                cells: Some(cells),
                direction: None,
            },
        );
    }

    fn log_spawn_food(&mut self, turn: usize, location: Position) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Spawn,
                entity: "Food".to_string(),
                entity_id: None,
                location: Some(location),
                cells: None,
                direction: None,
            },
        );
    }

    fn log_remove_food(&mut self, turn: usize, location: Position) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Remove,
                entity: "Food".to_string(),
                entity_id: None,
                location: Some(location),
                cells: None,
                direction: None,
            },
        );
    }

    fn log_move(&mut self, turn: usize, id: String, head: Position, direction: Direction) {
        self.log_snake_event(turn, EventType::Move, id, head, Some(direction));
    }

    fn log_eat(&mut self, turn: usize, id: String, head: Position, direction: Direction) {
        self.log_snake_event(turn, EventType::Eat, id, head, Some(direction));
    }

    fn log_reproduce(&mut self, turn: usize, id: String, head: Position) {
        self.log_snake_event(turn, EventType::Reproduce, id, head, None);
    }

    fn log_snake_event(
        &mut self,
        turn: usize,
        event_type: EventType,
        id: String,
        head: Position,
        direction: Option<Direction>,
    ) {
        self.log_event(
            turn,
            Event {
                event_type,
                entity: "Snake".to_string(),
                entity_id: Some(id),
                location: Some(head),
                cells: None,
                direction,
            },
        );
    }

    #[allow(unused_variables)]
    fn log_event(&mut self, turn: usize, event: Event) {}

    /// The whole replay as JSON, or `None` when nothing is being recorded.
    fn to_json(&self) -> Option<Value> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum EventType {
    Spawn,
    Remove,
    Move,
    Eat,
    Reproduce,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    event_type: EventType,
    entity: String,
    entity_id: Option<String>,
    location: Option<Position>,
    cells: Option<Vec<Position>>,
    direction: Option<Direction>,
}

struct Turn {
    turn: usize,
    snakes: usize,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    width: usize,
    height: usize,
    turns: Vec<Turn>,
    events: HashMap<usize, Vec<Event>>,
}

impl JsonReplayLogger {
    pub fn new(width: usize, height: usize) -> JsonReplayLogger {
        JsonReplayLogger {
            width,
            height,
            turns: Vec::new(),
            events: HashMap::new(),
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_turn(&mut self, turn: usize, snakes: usize) {
        self.turns.push(Turn { turn, snakes });
    }

    fn log_event(&mut self, turn: usize, event: Event) {
        self.events.entry(turn).or_default().push(event);
    }

    fn to_json(&self) -> Option<Value> {
        let turns: Vec<_> = self
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "turn": turn.turn,
                    "snakes": turn.snakes,
                    "events": self.events.get(&turn.turn).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        Some(json!({
            "grid": {
                "width": self.width,
                "height": self.height,
            },
            "turns": turns,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_recording_is_disabled_no_replay_is_produced() {
        let mut logger = create_replay_logger(false, 5, 5);
        logger.log_turn(0, 1);
        logger.log_spawn_food(0, Position::new(1, 1));

        assert!(logger.to_json().is_none());
    }

    #[test]
    fn when_recording_turns_events_are_grouped_under_their_turn() {
        let mut logger = create_replay_logger(true, 5, 4);
        logger.log_spawn_food(0, Position::new(1, 1));
        logger.log_turn(0, 1);
        logger.log_eat(1, "a".to_string(), Position::new(1, 1), Direction::Down);
        logger.log_remove_food(1, Position::new(1, 1));
        logger.log_turn(1, 1);

        let replay = logger.to_json().unwrap();

        assert_eq!(replay["grid"]["width"], 5);
        assert_eq!(replay["grid"]["height"], 4);
        assert_eq!(replay["turns"].as_array().unwrap().len(), 2);
        assert_eq!(replay["turns"][0]["events"][0]["event_type"], "Spawn");
        assert_eq!(replay["turns"][0]["events"][0]["entity"], "Food");
        assert_eq!(replay["turns"][0]["events"][0]["location"]["x"], 1);
        assert_eq!(replay["turns"][1]["events"][0]["event_type"], "Eat");
        assert_eq!(replay["turns"][1]["events"][0]["entity_id"], "a");
        assert_eq!(replay["turns"][1]["events"][0]["direction"], "Down");
        assert_eq!(replay["turns"][1]["events"][1]["event_type"], "Remove");
    }

    #[test]
    fn when_a_turn_has_no_events_an_empty_list_is_recorded() {
        let mut logger = create_replay_logger(true, 2, 2);
        logger.log_turn(3, 2);

        let replay = logger.to_json().unwrap();

        assert_eq!(replay["turns"][0]["turn"], 3);
        assert_eq!(replay["turns"][0]["snakes"], 2);
        assert_eq!(replay["turns"][0]["events"], json!([]));
    }
}

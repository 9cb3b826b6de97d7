use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::enrichment::{ChatRole, ChatTurn};

#[derive(Debug)]
struct Session {
    turns: VecDeque<ChatTurn>,
    last_seen: Instant,
}

/// In-memory conversation history keyed by the widget's session id.
///
/// Idle sessions expire after `ttl`; each keeps at most `max_turns` turns,
/// oldest exchange dropped first, so kept history always opens on a user
/// turn. History is lost on restart.
#[derive(Debug)]
pub struct SessionCache {
    ttl: Duration,
    max_turns: usize,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionCache {
    pub fn new(ttl: Duration, max_turns: usize) -> Self {
        Self {
            ttl,
            max_turns,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Turns recorded so far for a live session, oldest first.
    pub fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        let mut sessions = self.sessions();
        self.prune(&mut sessions, Instant::now());
        sessions
            .get(session_id)
            .map(|session| session.turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn append(&self, session_id: &str, turns: impl IntoIterator<Item = ChatTurn>) {
        let now = Instant::now();
        let mut sessions = self.sessions();
        self.prune(&mut sessions, now);
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                turns: VecDeque::new(),
                last_seen: now,
            });
        session.turns.extend(turns);
        while session.turns.len() > self.max_turns {
            session.turns.pop_front();
            // Drop the rest of the exchange along with its opening turn.
            while session
                .turns
                .front()
                .is_some_and(|turn| turn.role != ChatRole::User)
            {
                session.turns.pop_front();
            }
        }
        session.last_seen = now;
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&self, sessions: &mut HashMap<String, Session>, now: Instant) {
        sessions.retain(|_, session| now.duration_since(session.last_seen) < self.ttl);
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned map still holds usable history.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

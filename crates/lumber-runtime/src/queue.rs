use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use hashbrown::HashSet;

/// Handle of a scheduled task; cancelling it is idempotent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Envelope<T> {
    pub id: TimerId,
    pub tick: u64,
    pub payload: T,
    repeat: Option<u64>,
}

pub struct TaskQueue<T> {
    // map of tick -> FIFO queue of tasks due on that tick
    by_tick: BTreeMap<u64, VecDeque<Envelope<T>>>,
    now: u64,
    next_id: u64,
    // ids still allowed to fire; cancelled envelopes stay queued and are skipped
    live: HashSet<TimerId>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
            live: HashSet::new(),
        }
    }
}

impl<T: Clone> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of tasks that can still fire.
    #[inline]
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.contains(&id)
    }

    #[inline]
    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    fn push(&mut self, tick: u64, payload: T, repeat: Option<u64>) -> TimerId {
        let id = self.alloc_id();
        let env = Envelope {
            id,
            tick,
            payload,
            repeat,
        };
        self.by_tick.entry(tick).or_default().push_back(env);
        self.live.insert(id);
        id
    }

    /// Runs later in the current tick.
    pub fn emit_now(&mut self, payload: T) -> TimerId {
        self.push(self.now, payload, None)
    }

    pub fn emit_at(&mut self, tick: u64, payload: T) -> TimerId {
        self.push(tick.max(self.now), payload, None)
    }

    pub fn emit_after(&mut self, delta: u64, payload: T) -> TimerId {
        self.emit_at(self.now + delta, payload)
    }

    /// Fires every `interval` ticks (first firing one interval from now)
    /// until cancelled.
    pub fn emit_every(&mut self, interval: u64, payload: T) -> TimerId {
        let interval = interval.max(1);
        self.push(self.now + interval, payload, Some(interval))
    }

    /// Returns true if the task was still live.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id)
    }

    /// Next due task for the current tick, skipping cancelled ones. Repeating
    /// tasks are re-queued before they are handed out.
    pub fn pop_ready(&mut self) -> Option<Envelope<T>> {
        loop {
            let q = self.by_tick.get_mut(&self.now)?;
            let Some(env) = q.pop_front() else {
                self.by_tick.remove(&self.now);
                return None;
            };
            if !self.live.contains(&env.id) {
                continue;
            }
            match env.repeat {
                Some(interval) => {
                    let next = Envelope {
                        id: env.id,
                        tick: self.now + interval,
                        payload: env.payload.clone(),
                        repeat: env.repeat,
                    };
                    self.by_tick.entry(next.tick).or_default().push_back(next);
                }
                None => {
                    self.live.remove(&env.id);
                }
            }
            return Some(env);
        }
    }

    /// Moves to the next tick. Live tasks still sitting in the current bucket
    /// (emitted after it was drained) carry over to the front of the next one.
    pub fn advance_tick(&mut self) {
        let next = self.now.wrapping_add(1);
        if let Some(left) = self.by_tick.remove(&self.now) {
            let mut carried: VecDeque<Envelope<T>> = left
                .into_iter()
                .filter(|env| self.live.contains(&env.id))
                .map(|mut env| {
                    env.tick = next;
                    env
                })
                .collect();
            if !carried.is_empty() {
                log::trace!("carrying {} task(s) into tick {}", carried.len(), next);
                if let Some(q) = self.by_tick.remove(&next) {
                    carried.extend(q);
                }
                self.by_tick.insert(next, carried);
            }
        }
        self.now = next;
    }

    /// Drops every queued task. The tick counter keeps running.
    pub fn clear(&mut self) {
        self.by_tick.clear();
        self.live.clear();
    }
}

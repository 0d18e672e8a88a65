use std::time::Duration;

use crate::monitoring::domain::event_key::{EventKey, EventTable};

/// Per-key rate limiter in front of the event log.
///
/// `should_fire` is a check-and-set: a `true` result records `now` as the
/// key's last-fired instant, so the caller has consumed the gate. Keys that
/// never fired always pass.
#[derive(Clone, Debug)]
pub struct CooldownGate {
    last_fired: EventTable<Option<Duration>>,
    cooldowns: EventTable<Duration>,
}

impl CooldownGate {
    pub fn new(cooldowns: EventTable<Duration>) -> Self {
        Self {
            last_fired: EventTable::default(),
            cooldowns,
        }
    }

    /// Fires iff strictly more than `cooldown` has elapsed since the last
    /// successful fire of `key`.
    pub fn should_fire(&mut self, key: EventKey, now: Duration, cooldown: Duration) -> bool {
        let open = match self.last_fired[key] {
            None => true,
            Some(last) => now.saturating_sub(last) > cooldown,
        };
        if open {
            self.last_fired[key] = Some(now);
        }
        open
    }

    /// `should_fire` with the key's configured cooldown.
    pub fn offer(&mut self, key: EventKey, now: Duration) -> bool {
        let cooldown = self.cooldowns[key];
        self.should_fire(key, now, cooldown)
    }

    pub fn last_fired(&self, key: EventKey) -> Option<Duration> {
        self.last_fired[key]
    }

    pub fn cooldown(&self, key: EventKey) -> Duration {
        self.cooldowns[key]
    }

    /// Forgets every last-fired instant; cooldowns are kept.
    pub fn reset(&mut self) {
        self.last_fired = EventTable::default();
    }
}

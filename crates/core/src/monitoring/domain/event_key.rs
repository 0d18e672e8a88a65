use std::fmt;
use std::ops::{Index, IndexMut};

/// Class of loggable condition. Closed set; each key owns one cooldown and
/// one last-fired slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    NoFace,
    LookingAway,
    MultipleFaces,
    Phone,
    Book,
    Device,
}

impl EventKey {
    pub const COUNT: usize = 6;

    pub const ALL: [EventKey; EventKey::COUNT] = [
        EventKey::NoFace,
        EventKey::LookingAway,
        EventKey::MultipleFaces,
        EventKey::Phone,
        EventKey::Book,
        EventKey::Device,
    ];

    fn index(self) -> usize {
        match self {
            EventKey::NoFace => 0,
            EventKey::LookingAway => 1,
            EventKey::MultipleFaces => 2,
            EventKey::Phone => 3,
            EventKey::Book => 4,
            EventKey::Device => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKey::NoFace => "noFace",
            EventKey::LookingAway => "lookingAway",
            EventKey::MultipleFaces => "multipleFaces",
            EventKey::Phone => "phone",
            EventKey::Book => "book",
            EventKey::Device => "device",
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size table with exactly one slot per `EventKey`.
#[derive(Clone, Debug, PartialEq)]
pub struct EventTable<T> {
    slots: [T; EventKey::COUNT],
}

impl<T> EventTable<T> {
    /// Builds a table by evaluating `f` once per key.
    pub fn from_fn(mut f: impl FnMut(EventKey) -> T) -> Self {
        Self {
            slots: EventKey::ALL.map(&mut f),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventKey, &T)> {
        EventKey::ALL.into_iter().zip(self.slots.iter())
    }
}

impl<T: Clone> EventTable<T> {
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T: Default> Default for EventTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<EventKey> for EventTable<T> {
    type Output = T;

    fn index(&self, key: EventKey) -> &T {
        &self.slots[key.index()]
    }
}

impl<T> IndexMut<EventKey> for EventTable<T> {
    fn index_mut(&mut self, key: EventKey) -> &mut T {
        &mut self.slots[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_have_distinct_indices() {
        let mut seen = [false; EventKey::COUNT];
        for key in EventKey::ALL {
            assert!(!seen[key.index()], "duplicate index for {key}");
            seen[key.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_table_slots_are_independent() {
        let mut table: EventTable<u32> = EventTable::default();
        table[EventKey::Phone] = 3;
        table[EventKey::NoFace] += 1;

        assert_eq!(table[EventKey::Phone], 3);
        assert_eq!(table[EventKey::NoFace], 1);
        assert_eq!(table[EventKey::Book], 0);
    }

    #[test]
    fn test_from_fn_and_iter_follow_key_order() {
        let table = EventTable::from_fn(|k| k.as_str().len());
        let keys: Vec<EventKey> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, EventKey::ALL.to_vec());
        assert_eq!(table[EventKey::LookingAway], "lookingAway".len());
    }

    #[test]
    fn test_display_uses_camel_case_names() {
        assert_eq!(EventKey::MultipleFaces.to_string(), "multipleFaces");
        assert_eq!(EventKey::Device.to_string(), "device");
    }
}

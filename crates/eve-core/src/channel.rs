//! Channel identity
//!
//! The page has exactly two video channels, one per persona. They are never
//! created or destroyed, so a channel is a plain two-valued enum and
//! per-channel data lives in a fixed two-slot map.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::{EveError, EveResult};

/// One of the two persona video slots
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Channel {
    /// Eva
    #[default]
    Primary = 0,
    /// Eve
    Secondary = 1,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Primary, Channel::Secondary];

    /// The other channel
    #[inline]
    pub fn other(self) -> Channel {
        match self {
            Channel::Primary => Channel::Secondary,
            Channel::Secondary => Channel::Primary,
        }
    }

    /// Persona key used by playlist documents and the stored preference
    pub fn persona_key(self) -> &'static str {
        match self {
            Channel::Primary => "eva",
            Channel::Secondary => "eve",
        }
    }

    /// Parse a persona key
    pub fn from_persona_key(key: &str) -> EveResult<Self> {
        match key {
            "eva" => Ok(Channel::Primary),
            "eve" => Ok(Channel::Secondary),
            other => Err(EveError::UnknownPersona(other.to_string())),
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.persona_key())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.persona_key())
    }
}

/// Fixed map with one value per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ChannelMap<T> {
    slots: [T; 2],
}

impl<T> ChannelMap<T> {
    pub fn new(primary: T, secondary: T) -> Self {
        ChannelMap {
            slots: [primary, secondary],
        }
    }

    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        ChannelMap {
            slots: [f(Channel::Primary), f(Channel::Secondary)],
        }
    }

    pub fn get(&self, channel: Channel) -> &T {
        &self.slots[channel.slot()]
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.slots[channel.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.slots.iter())
    }
}

impl<T> Index<Channel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        self.get(channel)
    }
}

impl<T> IndexMut<Channel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        self.get_mut(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        for ch in Channel::ALL {
            assert_ne!(ch, ch.other());
            assert_eq!(ch, ch.other().other());
        }
    }

    #[test]
    fn test_persona_key_roundtrip() {
        for ch in Channel::ALL {
            assert_eq!(Channel::from_persona_key(ch.persona_key()).unwrap(), ch);
        }
        assert!(matches!(
            Channel::from_persona_key("adam"),
            Err(EveError::UnknownPersona(_))
        ));
    }

    #[test]
    fn test_channel_map_slots_are_independent() {
        let mut map = ChannelMap::new(0usize, 0usize);
        map[Channel::Secondary] = 3;

        assert_eq!(map[Channel::Primary], 0);
        assert_eq!(map[Channel::Secondary], 3);

        let collected: Vec<_> = map.iter().map(|(c, v)| (c, *v)).collect();
        assert_eq!(collected, vec![(Channel::Primary, 0), (Channel::Secondary, 3)]);
    }
}

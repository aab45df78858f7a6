//! Channel items and the two in-band control signals.

use std::fmt;

/// A control value carried over the same channel as data.
///
/// Exactly one signal is injected per pipeline run, at the head, and every
/// stage forwards it once before terminating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSignal {
    /// No more data will ever arrive on this channel.
    EndOfStream,
    /// An earlier stage aborted; remaining data for this run is void.
    UpstreamFailure,
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlSignal::EndOfStream => write!(f, "end-of-stream"),
            ControlSignal::UpstreamFailure => write!(f, "upstream-failure"),
        }
    }
}

/// One element travelling through a stage channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<T = String> {
    /// A data payload to be transformed by the receiving stage.
    Data(T),
    /// See [`ControlSignal::EndOfStream`].
    EndOfStream,
    /// See [`ControlSignal::UpstreamFailure`].
    UpstreamFailure,
}

impl<T> Item<T> {
    /// Take the payload out, dropping control values.
    pub fn into_data(self) -> Option<T> {
        match self {
            Item::Data(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<ControlSignal> for Item<T> {
    fn from(signal: ControlSignal) -> Self {
        match signal {
            ControlSignal::EndOfStream => Item::EndOfStream,
            ControlSignal::UpstreamFailure => Item::UpstreamFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_lookalike_is_still_data() {
        // A payload that spells out a signal name stays a payload.
        let item = Item::Data("end-of-stream".to_string());
        assert_eq!(item.into_data().as_deref(), Some("end-of-stream"));
        assert_eq!(Item::<String>::EndOfStream.into_data(), None);
    }

    #[test]
    fn test_from_signal() {
        let item: Item<String> = ControlSignal::UpstreamFailure.into();
        assert_eq!(item, Item::UpstreamFailure);
    }
}

//! Push channel connection status.
//!
//! Transitions only move forward: `Connecting -> Connected -> Disconnected`
//! or straight from `Connecting` to `Disconnected`. Once disconnected the
//! status never changes again for the lifetime of a mounted dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// Lifecycle signal observed on the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLifecycle {
    Message,
    Error,
    Close,
}

impl ConnectionStatus {
    /// Returns the status after observing `signal`.
    #[must_use]
    pub fn transition(self, signal: ChannelLifecycle) -> Self {
        match (self, signal) {
            (ConnectionStatus::Disconnected, _) => ConnectionStatus::Disconnected,
            (_, ChannelLifecycle::Message) => ConnectionStatus::Connected,
            (_, ChannelLifecycle::Error | ChannelLifecycle::Close) => {
                ConnectionStatus::Disconnected
            }
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(status: ConnectionStatus) -> u8 {
        match status {
            ConnectionStatus::Connecting => 0,
            ConnectionStatus::Connected => 1,
            ConnectionStatus::Disconnected => 2,
        }
    }

    #[test]
    fn starts_connecting() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Connecting);
    }

    #[test]
    fn first_message_connects() {
        let status = ConnectionStatus::Connecting.transition(ChannelLifecycle::Message);
        assert_eq!(status, ConnectionStatus::Connected);
        assert_eq!(
            status.transition(ChannelLifecycle::Message),
            ConnectionStatus::Connected
        );
    }

    #[test]
    fn error_and_close_disconnect_from_any_live_state() {
        for start in [ConnectionStatus::Connecting, ConnectionStatus::Connected] {
            assert_eq!(
                start.transition(ChannelLifecycle::Error),
                ConnectionStatus::Disconnected
            );
            assert_eq!(
                start.transition(ChannelLifecycle::Close),
                ConnectionStatus::Disconnected
            );
        }
    }

    #[test]
    fn disconnected_is_terminal() {
        for signal in [
            ChannelLifecycle::Message,
            ChannelLifecycle::Error,
            ChannelLifecycle::Close,
        ] {
            assert_eq!(
                ConnectionStatus::Disconnected.transition(signal),
                ConnectionStatus::Disconnected
            );
        }
    }

    #[test]
    fn arbitrary_sequences_never_move_backwards() {
        let signals = [
            ChannelLifecycle::Message,
            ChannelLifecycle::Error,
            ChannelLifecycle::Close,
        ];
        // Every sequence of length 4 over the three signals.
        for code in 0..81u32 {
            let mut status = ConnectionStatus::Connecting;
            let mut n = code;
            for _ in 0..4 {
                let next = status.transition(signals[(n % 3) as usize]);
                assert!(
                    rank(next) >= rank(status),
                    "{status} -> {next} moved backwards"
                );
                assert_ne!(next, ConnectionStatus::Connecting);
                status = next;
                n /= 3;
            }
        }
    }
}

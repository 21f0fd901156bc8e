//! Peer state machine (spec.md §4.6): login/challenge/response authentication and
//! heartbeat-driven liveness tracking for one FNE peer connection.

use crate::edac::sha256;
use crate::util::StopWatch;

/// Lifecycle states a peer connection passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerState {
    Disconnected,
    Connecting,
    Authenticated,
    Active,
    Disconnecting,
}

/// One FNE peer connection's authentication and heartbeat state.
pub struct Peer {
    pub peer_id: u32,
    state: PeerState,
    password: Vec<u8>,
    challenge: Option<[u8; 16]>,
    heartbeat_interval_ms: u32,
    missed_heartbeats: u32,
    max_missed_heartbeats: u32,
    last_heartbeat: StopWatch,
}

impl Peer {
    /// `heartbeat_interval_ms` defaults to 5000 per spec.md §4.6; `max_missed`
    /// heartbeats before the peer is considered dead defaults to 3 if not given.
    pub fn new(peer_id: u32, password: impl Into<Vec<u8>>, heartbeat_interval_ms: u32, max_missed_heartbeats: u32) -> Self {
        let mut sw = StopWatch::new();
        sw.start();
        Peer {
            peer_id,
            state: PeerState::Disconnected,
            password: password.into(),
            challenge: None,
            heartbeat_interval_ms,
            missed_heartbeats: 0,
            max_missed_heartbeats,
            last_heartbeat: sw,
        }
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    /// Begins a login attempt, issuing a fresh 16-byte random challenge to be sent to
    /// the peer.
    pub fn begin_login(&mut self, salt: [u8; 16]) -> [u8; 16] {
        self.state = PeerState::Connecting;
        self.challenge = Some(salt);
        salt
    }

    /// Verifies the peer's `SHA-256(challenge || password)` response. On success the
    /// peer advances to `Authenticated`; on mismatch it returns to `Disconnected` and
    /// the caller should send a NAK (spec.md §4.6).
    pub fn verify_response(&mut self, response: &[u8; 32]) -> bool {
        let Some(challenge) = self.challenge else {
            self.state = PeerState::Disconnected;
            return false;
        };

        let expected = sha256::hash_salted(&challenge, &self.password);
        if &expected == response {
            self.state = PeerState::Authenticated;
            self.challenge = None;
            self.last_heartbeat.start();
            true
        } else {
            self.state = PeerState::Disconnected;
            self.challenge = None;
            false
        }
    }

    /// Marks the peer `Active` once it starts exchanging traffic after authentication.
    pub fn activate(&mut self) {
        if self.state == PeerState::Authenticated {
            self.state = PeerState::Active;
        }
    }

    /// Records a heartbeat received from the peer (or sent to it), resetting the
    /// missed-heartbeat counter.
    pub fn heartbeat(&mut self) {
        self.missed_heartbeats = 0;
        self.last_heartbeat.start();
    }

    /// Advances liveness tracking by `elapsed_ms`; after `max_missed_heartbeats`
    /// consecutive missed intervals the peer transitions to `Disconnecting`.
    pub fn clock(&mut self, elapsed_ms: u32) {
        if self.state != PeerState::Active && self.state != PeerState::Authenticated {
            return;
        }

        if self.last_heartbeat.elapsed() as u64 + elapsed_ms as u64 >= self.heartbeat_interval_ms as u64 {
            self.missed_heartbeats += 1;
            self.last_heartbeat.start();

            if self.missed_heartbeats >= self.max_missed_heartbeats {
                self.state = PeerState::Disconnecting;
            }
        }
    }

    /// Completes an orderly disconnect.
    pub fn disconnect(&mut self) {
        self.state = PeerState::Disconnected;
        self.challenge = None;
        self.missed_heartbeats = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_login_reaches_authenticated() {
        let mut peer = Peer::new(1, b"secret".to_vec(), 5000, 3);
        let challenge = peer.begin_login([7u8; 16]);
        let response = sha256::hash_salted(&challenge, b"secret");
        assert!(peer.verify_response(&response));
        assert_eq!(peer.state(), PeerState::Authenticated);
    }

    #[test]
    fn wrong_password_returns_to_disconnected() {
        let mut peer = Peer::new(1, b"secret".to_vec(), 5000, 3);
        let challenge = peer.begin_login([7u8; 16]);
        let bad_response = sha256::hash_salted(&challenge, b"wrong");
        assert!(!peer.verify_response(&bad_response));
        assert_eq!(peer.state(), PeerState::Disconnected);
    }

    #[test]
    fn activate_requires_authenticated_state() {
        let mut peer = Peer::new(1, b"secret".to_vec(), 5000, 3);
        peer.activate();
        assert_eq!(peer.state(), PeerState::Disconnected);
    }
}

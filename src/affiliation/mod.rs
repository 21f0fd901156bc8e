//! Affiliation & channel-grant engine (spec.md §4.5): unit registration, group
//! affiliation, and single-channel-per-grant voice channel assignment shared by the
//! P25 and NXDN stacks. DMR's two-slot-per-channel variant lives in [`dmr`].
//!
//! Not internally synchronized — per spec.md §5 the owning process guards one instance
//! behind a single reader/writer lock and must not hold it across a socket write.

pub mod dmr;

use std::collections::{BTreeSet, HashMap, HashSet};

/// An active voice channel grant.
#[derive(Clone, Debug)]
pub struct Grant {
    pub ch_no: u32,
    pub src_id: u32,
    pub group: bool,
    pub net_granted: bool,
    remaining_ms: u32,
    timeout_ms: u32,
}

impl Grant {
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }
}

/// Tracks unit registration, group affiliation, and the free/granted channel pool for
/// a conventional or trunked site.
pub struct Affiliation {
    name: &'static str,
    ch_pool: BTreeSet<u32>,
    unit_reg: HashSet<u32>,
    group_aff: HashMap<u32, u32>,
    grants: HashMap<u32, Grant>,
}

impl Affiliation {
    pub fn new(name: &'static str, channels: impl IntoIterator<Item = u32>) -> Self {
        Affiliation {
            name,
            ch_pool: channels.into_iter().collect(),
            unit_reg: HashSet::new(),
            group_aff: HashMap::new(),
            grants: HashMap::new(),
        }
    }

    /// Returns the first free channel, without removing it from the pool.
    fn first_free_channel(&self) -> Option<u32> {
        let granted: HashSet<u32> = self.grants.values().map(|g| g.ch_no).collect();
        self.ch_pool.iter().find(|ch| !granted.contains(ch)).copied()
    }

    /// Assigns a voice channel to `dst_id`. Fails if `dst_id` is zero, already granted,
    /// or the pool has no free channel (spec.md §4.5, Testable Property 6).
    pub fn grant_ch(&mut self, dst_id: u32, src_id: u32, grant_timeout_ms: u32, group: bool, net_granted: bool) -> bool {
        if dst_id == 0 || self.grants.contains_key(&dst_id) {
            return false;
        }

        let Some(ch_no) = self.first_free_channel() else {
            tracing::debug!(subsystem = "affiliation", name = self.name, dst_id, "channel pool exhausted");
            return false;
        };

        self.grants.insert(
            dst_id,
            Grant {
                ch_no,
                src_id,
                group,
                net_granted,
                remaining_ms: grant_timeout_ms,
                timeout_ms: grant_timeout_ms,
            },
        );

        tracing::info!(subsystem = "affiliation", name = self.name, ch_no, dst_id, src_id, group, "channel granted");
        true
    }

    /// Releases the grant for `dst_id`. If `release_all` is set and `dst_id == 0`,
    /// every active grant is released (spec.md §4.5).
    pub fn release_grant(&mut self, dst_id: u32, release_all: bool) -> bool {
        if dst_id == 0 {
            if !release_all {
                return false;
            }
            let targets: Vec<u32> = self.grants.keys().copied().collect();
            for t in targets {
                self.release_grant(t, false);
            }
            return true;
        }

        if self.grants.remove(&dst_id).is_some() {
            tracing::info!(subsystem = "affiliation", name = self.name, dst_id, "channel grant released");
            true
        } else {
            false
        }
    }

    /// True if `ch_no` currently carries an active grant.
    pub fn is_ch_busy(&self, ch_no: u32) -> bool {
        if ch_no == 0 {
            return false;
        }
        self.grants.values().any(|g| g.ch_no == ch_no)
    }

    pub fn is_granted(&self, dst_id: u32) -> bool {
        self.grants.contains_key(&dst_id)
    }

    pub fn grant(&self, dst_id: u32) -> Option<&Grant> {
        self.grants.get(&dst_id)
    }

    pub fn granted_channel(&self, dst_id: u32) -> Option<u32> {
        self.grants.get(&dst_id).map(|g| g.ch_no)
    }

    /// Resets `dst_id`'s grant timer on talker activity.
    pub fn touch(&mut self, dst_id: u32) {
        if let Some(g) = self.grants.get_mut(&dst_id) {
            g.remaining_ms = g.timeout_ms;
        }
    }

    pub fn register_unit(&mut self, src_id: u32) {
        self.unit_reg.insert(src_id);
    }

    pub fn deregister_unit(&mut self, src_id: u32) {
        self.unit_reg.remove(&src_id);
    }

    pub fn is_unit_registered(&self, src_id: u32) -> bool {
        self.unit_reg.contains(&src_id)
    }

    /// Sets `src_id`'s single active group affiliation, replacing any prior one.
    pub fn group_aff(&mut self, src_id: u32, dst_id: u32) {
        self.group_aff.insert(src_id, dst_id);
    }

    pub fn group_deaff(&mut self, src_id: u32) {
        self.group_aff.remove(&src_id);
    }

    pub fn group_for(&self, src_id: u32) -> Option<u32> {
        self.group_aff.get(&src_id).copied()
    }

    /// Advances every active grant timer by `elapsed_ms`. Grants whose timer expires
    /// are released, and `dst_id`/`ch_no` are reported through `on_expire` — this is an
    /// event, not an error (spec.md §7), and runs on the caller's clock-tick thread
    /// without re-entering this instance's grant API (spec.md §5 locking discipline).
    pub fn clock(&mut self, elapsed_ms: u32, mut on_expire: impl FnMut(u32, u32)) {
        let mut expired = Vec::new();
        for (dst_id, grant) in self.grants.iter_mut() {
            grant.remaining_ms = grant.remaining_ms.saturating_sub(elapsed_ms);
            if grant.remaining_ms == 0 {
                expired.push((*dst_id, grant.ch_no));
            }
        }

        for (dst_id, ch_no) in expired {
            self.grants.remove(&dst_id);
            on_expire(ch_no, dst_id);
        }
    }

    pub fn channel_pool(&self) -> &BTreeSet<u32> {
        &self.ch_pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_exclusivity_and_release() {
        let mut aff = Affiliation::new("test", [1]);
        assert!(aff.grant_ch(100, 1000, 10_000, true, false));
        assert!(!aff.grant_ch(101, 1001, 10_000, true, false));
        assert!(aff.release_grant(100, false));
        assert!(aff.grant_ch(101, 1001, 10_000, true, false));
        assert_eq!(aff.granted_channel(101), Some(1));
    }

    #[test]
    fn two_channels_serve_two_grants() {
        let mut aff = Affiliation::new("test", [1, 2]);
        assert!(aff.grant_ch(100, 1000, 10_000, true, false));
        assert!(aff.grant_ch(101, 1001, 10_000, true, false));
        assert!(!aff.grant_ch(102, 1002, 10_000, true, false));
        assert!(aff.is_ch_busy(1));
        assert!(aff.is_ch_busy(2));
    }

    #[test]
    fn clock_expires_and_fires_callback_once() {
        let mut aff = Affiliation::new("test", [1]);
        aff.grant_ch(100, 1000, 500, true, false);

        let mut fired = 0;
        aff.clock(300, |_, _| fired += 1);
        assert_eq!(fired, 0);
        assert!(aff.is_granted(100));

        aff.clock(300, |_, _| fired += 1);
        assert_eq!(fired, 1);
        assert!(!aff.is_granted(100));
    }

    #[test]
    fn touch_resets_timer() {
        let mut aff = Affiliation::new("test", [1]);
        aff.grant_ch(100, 1000, 500, true, false);
        aff.clock(400, |_, _| {});
        aff.touch(100);
        let mut fired = false;
        aff.clock(400, |_, _| fired = true);
        assert!(!fired);
    }

    #[test]
    fn release_all_clears_every_grant() {
        let mut aff = Affiliation::new("test", [1, 2]);
        aff.grant_ch(100, 1000, 10_000, true, false);
        aff.grant_ch(101, 1001, 10_000, true, false);
        assert!(aff.release_grant(0, true));
        assert!(!aff.is_granted(100));
        assert!(!aff.is_granted(101));
    }
}

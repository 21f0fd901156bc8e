//! DMR's two-timeslot-per-channel affiliation variant, grounded on
//! `DMRAffiliationLookup.cpp`'s `grantCh`/`grantChSlot`/`releaseGrant`/`isChBusy`.

use std::collections::{BTreeSet, HashMap, HashSet};

/// An active DMR voice channel + timeslot grant.
#[derive(Clone, Debug)]
pub struct DmrGrant {
    pub ch_no: u32,
    pub slot: u8,
    pub src_id: u32,
    pub group: bool,
    pub net_granted: bool,
    remaining_ms: u32,
    timeout_ms: u32,
}

/// DMR affiliation engine: a channel pool where each channel carries two timeslots,
/// one of which may be permanently reserved as the TSCC (Tier-3 control channel).
pub struct DmrAffiliation {
    ch_pool: BTreeSet<u32>,
    unit_reg: HashSet<u32>,
    group_aff: HashMap<u32, u32>,
    grants: HashMap<u32, DmrGrant>,
    tscc_ch: Option<u32>,
    tscc_slot: u8,
}

impl DmrAffiliation {
    pub fn new(channels: impl IntoIterator<Item = u32>) -> Self {
        DmrAffiliation {
            ch_pool: channels.into_iter().collect(),
            unit_reg: HashSet::new(),
            group_aff: HashMap::new(),
            grants: HashMap::new(),
            tscc_ch: None,
            tscc_slot: 0,
        }
    }

    /// Reserves `(ch_no, slot)` as the TSCC; that slot is never assignable to a call.
    pub fn set_tscc(&mut self, ch_no: u32, slot: u8) {
        self.tscc_ch = Some(ch_no);
        self.tscc_slot = slot;
    }

    fn slots_in_use(&self, ch_no: u32) -> HashSet<u8> {
        self.grants
            .values()
            .filter(|g| g.ch_no == ch_no)
            .map(|g| g.slot)
            .collect()
    }

    /// DMR slot assignment policy (spec.md §4.6): on the TSCC channel, the TSCC slot
    /// itself is never assignable; otherwise slots are tried in order `{1, 2}`.
    /// Returns 0 if no slot is available on `ch_no`.
    pub fn available_slot(&self, ch_no: u32) -> u8 {
        let in_use = self.slots_in_use(ch_no);
        let is_tscc = self.tscc_ch == Some(ch_no);

        for slot in [1u8, 2u8] {
            if is_tscc && slot == self.tscc_slot {
                continue;
            }
            if !in_use.contains(&slot) {
                return slot;
            }
        }

        0
    }

    fn first_available_channel(&self) -> Option<u32> {
        self.ch_pool
            .iter()
            .find(|&&ch| self.available_slot(ch) != 0)
            .copied()
    }

    /// Grants the first channel with a free, assignable slot.
    pub fn grant_ch(&mut self, dst_id: u32, src_id: u32, grant_timeout_ms: u32, group: bool, net_granted: bool) -> bool {
        if dst_id == 0 || self.grants.contains_key(&dst_id) {
            return false;
        }

        let Some(ch_no) = self.first_available_channel() else {
            return false;
        };
        let slot = self.available_slot(ch_no);
        if slot == 0 {
            return false;
        }

        self.insert_grant(dst_id, ch_no, slot, src_id, grant_timeout_ms, group, net_granted);
        true
    }

    /// Grants a specific `(ch_no, slot)` pair, refusing the TSCC's reserved slot.
    pub fn grant_ch_slot(
        &mut self,
        dst_id: u32,
        src_id: u32,
        slot: u8,
        grant_timeout_ms: u32,
        group: bool,
        net_granted: bool,
    ) -> bool {
        if dst_id == 0 || self.grants.contains_key(&dst_id) {
            return false;
        }

        let Some(&ch_no) = self.ch_pool.iter().next() else {
            return false;
        };

        if self.tscc_ch == Some(ch_no) && slot == self.tscc_slot {
            return false;
        }
        if self.slots_in_use(ch_no).contains(&slot) {
            return false;
        }

        self.insert_grant(dst_id, ch_no, slot, src_id, grant_timeout_ms, group, net_granted);
        true
    }

    fn insert_grant(&mut self, dst_id: u32, ch_no: u32, slot: u8, src_id: u32, grant_timeout_ms: u32, group: bool, net_granted: bool) {
        self.grants.insert(
            dst_id,
            DmrGrant {
                ch_no,
                slot,
                src_id,
                group,
                net_granted,
                remaining_ms: grant_timeout_ms,
                timeout_ms: grant_timeout_ms,
            },
        );
        tracing::info!(subsystem = "affiliation", standard = "dmr", ch_no, slot, dst_id, src_id, "channel/slot granted");
    }

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
            tracing::info!(subsystem = "affiliation", standard = "dmr", dst_id, "channel/slot grant released");
            true
        } else {
            false
        }
    }

    /// Busy iff both slots (counting a reserved TSCC slot as permanently occupied) are
    /// in use.
    pub fn is_ch_busy(&self, ch_no: u32) -> bool {
        if ch_no == 0 {
            return false;
        }

        let mut slot_count = self.slots_in_use(ch_no).len();
        if self.tscc_ch == Some(ch_no) {
            slot_count += 1;
        }

        slot_count >= 2
    }

    pub fn is_granted(&self, dst_id: u32) -> bool {
        self.grants.contains_key(&dst_id)
    }

    pub fn granted_slot(&self, dst_id: u32) -> u8 {
        self.grants.get(&dst_id).map(|g| g.slot).unwrap_or(0)
    }

    pub fn granted_channel(&self, dst_id: u32) -> Option<u32> {
        self.grants.get(&dst_id).map(|g| g.ch_no)
    }

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

    pub fn group_aff(&mut self, src_id: u32, dst_id: u32) {
        self.group_aff.insert(src_id, dst_id);
    }

    pub fn group_deaff(&mut self, src_id: u32) {
        self.group_aff.remove(&src_id);
    }

    pub fn clock(&mut self, elapsed_ms: u32, mut on_expire: impl FnMut(u32, u8, u32)) {
        let mut expired = Vec::new();
        for (dst_id, grant) in self.grants.iter_mut() {
            grant.remaining_ms = grant.remaining_ms.saturating_sub(elapsed_ms);
            if grant.remaining_ms == 0 {
                expired.push((*dst_id, grant.ch_no, grant.slot));
            }
        }

        for (dst_id, ch_no, slot) in expired {
            self.grants.remove(&dst_id);
            on_expire(ch_no, slot, dst_id);
        }
    }
}

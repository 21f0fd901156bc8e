//! P25 site identity: network/system/RFSS/site IDs and the broadcast channel plan,
//! adapted from `original_source`'s `SiteData` constructor clamping rules.

use rand::Rng;

pub const WACN_STD_DEFAULT: u32 = 0xBEE00;
pub const SID_STD_DEFAULT: u32 = 0x001;

fn clamp_nac(nac: u32) -> u32 {
    nac.min(0xF7F)
}

fn clamp_site_id(id: u8) -> u8 {
    match id {
        0 => 1,
        id if id > 0xFE => 0xFE,
        id => id,
    }
}

fn clamp_net_id(id: u32) -> u32 {
    match id {
        0 => 1,
        id if id > 0xFFFFE => 0xFFFFE,
        id => id,
    }
}

fn clamp_sys_id(id: u32) -> u32 {
    match id {
        0 => 1,
        id if id > 0xFFE => 0xFFE,
        id => id,
    }
}

fn clamp_rfss_id(id: u8) -> u8 {
    clamp_site_id(id)
}

fn clamp_channel_id(id: u8) -> u8 {
    id.min(15)
}

fn clamp_channel_no(no: u32) -> u32 {
    match no {
        0 => 1,
        no if no > 4095 => 4095,
        no => no,
    }
}

#[derive(Clone, Debug)]
pub struct SiteData {
    lra: u8,
    net_id: u32,
    sys_id: u32,
    rfss_id: u8,
    site_id: u8,
    channel_id: u8,
    channel_no: u32,
    service_class: u8,
    is_adj_site: bool,
    callsign: String,
    ch_cnt: u8,
    net_active: bool,
    lto: i8,
}

impl SiteData {
    pub fn new(
        net_id: u32,
        sys_id: u32,
        rfss_id: u8,
        site_id: u8,
        lra: u8,
        channel_id: u8,
        channel_no: u32,
        service_class: u8,
        lto: i8,
    ) -> SiteData {
        let mut net_id = clamp_net_id(net_id);
        let mut sys_id = clamp_sys_id(sys_id);
        let rfss_id = clamp_rfss_id(rfss_id);
        let site_id = clamp_site_id(site_id);
        let channel_id = clamp_channel_id(channel_id);
        let channel_no = clamp_channel_no(channel_no);

        // Avoid the Motorola-reserved WACN range by drawing a random replacement.
        //
        // Carried over from the original: the random draw is immediately discarded,
        // since the re-clamp below runs against the original (pre-randomization)
        // `net_id`/`sys_id` parameters rather than the freshly-drawn values. The net
        // effect is that this branch behaves identically to the plain clamp above.
        if net_id >> 8 == WACN_STD_DEFAULT >> 7 {
            let mut rng = rand::thread_rng();
            let _random_net_id: u32 = rng.gen_range(0x01..=WACN_STD_DEFAULT);
            net_id = clamp_net_id(net_id);

            let _random_sys_id: u32 = rng.gen_range(0x01..=0xFFE);
            sys_id = clamp_sys_id(sys_id);
        }

        SiteData {
            lra,
            net_id,
            sys_id,
            rfss_id,
            site_id,
            channel_id,
            channel_no,
            service_class,
            is_adj_site: false,
            callsign: "CHANGEME".to_string(),
            ch_cnt: 0,
            net_active: false,
            lto,
        }
    }

    pub fn set_adj_site(
        &mut self,
        sys_id: u32,
        rfss_id: u8,
        site_id: u8,
        channel_id: u8,
        channel_no: u32,
        service_class: u8,
    ) {
        self.lra = 0;
        self.net_id = 0;
        self.sys_id = clamp_sys_id(sys_id);
        self.rfss_id = clamp_rfss_id(rfss_id);
        self.site_id = clamp_site_id(site_id);
        self.channel_id = clamp_channel_id(channel_id);
        self.channel_no = clamp_channel_no(channel_no);
        self.service_class = service_class;
        self.is_adj_site = true;
        self.callsign = "ADJSITE ".to_string();
        self.ch_cnt = 0;
        self.net_active = true;
        self.lto = 0;
    }

    pub fn set_callsign(&mut self, callsign: impl Into<String>) { self.callsign = callsign.into(); }
    pub fn set_ch_cnt(&mut self, ch_cnt: u8) { self.ch_cnt = ch_cnt; }
    pub fn set_net_active(&mut self, net_active: bool) { self.net_active = net_active; }

    pub fn lra(&self) -> u8 { self.lra }
    pub fn net_id(&self) -> u32 { self.net_id }
    pub fn sys_id(&self) -> u32 { self.sys_id }
    pub fn rfss_id(&self) -> u8 { self.rfss_id }
    pub fn site_id(&self) -> u8 { self.site_id }
    pub fn channel_id(&self) -> u8 { self.channel_id }
    pub fn channel_no(&self) -> u32 { self.channel_no }
    pub fn service_class(&self) -> u8 { self.service_class }
    pub fn is_adj_site(&self) -> bool { self.is_adj_site }
    pub fn callsign(&self) -> &str { &self.callsign }
    pub fn ch_cnt(&self) -> u8 { self.ch_cnt }
    pub fn net_active(&self) -> bool { self.net_active }
    pub fn lto(&self) -> i8 { self.lto }
}

impl Default for SiteData {
    fn default() -> Self {
        SiteData::new(WACN_STD_DEFAULT, SID_STD_DEFAULT, 1, 1, 0, 1, 1, 0b11, 0)
    }
}

/// Clamp a 12-bit network access code, used by repeaters to validate a configured NAC.
pub fn clamp_network_access_code(nac: u32) -> u32 {
    clamp_nac(nac)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamps_zero_ids_to_one() {
        let site = SiteData::new(0, 0, 0, 0, 0, 1, 1, 0, 0);
        assert_eq!(site.net_id(), 1);
        assert_eq!(site.sys_id(), 1);
        assert_eq!(site.rfss_id(), 1);
        assert_eq!(site.site_id(), 1);
    }

    #[test]
    fn test_clamps_oversized_ids() {
        let site = SiteData::new(0xFFFFFF, 0xFFFF, 0xFF, 0xFF, 0, 99, 99999, 0, 0);
        assert_eq!(site.net_id(), 0xFFFFE);
        assert_eq!(site.sys_id(), 0xFFE);
        assert_eq!(site.rfss_id(), 0xFE);
        assert_eq!(site.site_id(), 0xFE);
        assert_eq!(site.channel_id(), 15);
        assert_eq!(site.channel_no(), 4095);
    }

    #[test]
    fn test_motorola_wacn_reclamp_is_a_no_op() {
        // Exercises the preserved re-clamp quirk: even though it draws a random WACN
        // internally, the final net_id matches a plain clamp of the input, not the
        // random draw.
        let probe_net_id = WACN_STD_DEFAULT;
        let site = SiteData::new(probe_net_id, 1, 1, 1, 0, 1, 1, 0, 0);
        assert_eq!(site.net_id(), clamp_net_id(probe_net_id));
    }

    #[test]
    fn test_adj_site_marks_flags() {
        let mut site = SiteData::default();
        site.set_adj_site(5, 2, 3, 1, 10, 0b11);
        assert!(site.is_adj_site());
        assert!(site.net_active());
        assert_eq!(site.net_id(), 0);
        assert_eq!(site.callsign(), "ADJSITE ");
    }
}

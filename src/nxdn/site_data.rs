//! NXDN site identity: location ID, channel plan, and site information bytes,
//! grounded on `original_source/src/common/nxdn/SiteData.h`.

#[derive(Clone, Debug)]
pub struct SiteData {
    loc_id: u32,
    channel_id: u8,
    channel_no: u32,
    site_info1: u8,
    site_info2: u8,
    is_adj_site: bool,
    callsign: String,
    require_reg: bool,
    net_active: bool,
}

const VOICE_CALL_SVC: u8 = 0x01;
const DATA_CALL_SVC: u8 = 0x02;

impl SiteData {
    pub fn new(loc_id: u32, channel_id: u8, channel_no: u32, site_info1: u8, site_info2: u8, require_reg: bool) -> SiteData {
        let loc_id = loc_id.min(0xFF_FFFF);
        let channel_id = channel_id.min(15);
        let channel_no = match channel_no {
            0 => 1,
            n if n > 1023 => 1023,
            n => n,
        };

        SiteData {
            loc_id,
            channel_id,
            channel_no,
            site_info1,
            site_info2,
            is_adj_site: false,
            callsign: "CHANGEME".to_string(),
            require_reg,
            net_active: false,
        }
    }

    pub fn set_adj_site(&mut self, loc_id: u32, channel_id: u8, channel_no: u32, site_info1: u8, site_info2: u8) {
        self.loc_id = loc_id.min(0xFF_FFFF);
        self.channel_id = channel_id.min(15);
        self.channel_no = match channel_no {
            0 => 1,
            n if n > 1023 => 1023,
            n => n,
        };
        self.site_info1 = site_info1;
        self.site_info2 = site_info2;
        self.is_adj_site = true;
        self.callsign = "ADJSITE ".to_string();
        self.net_active = true;
    }

    pub fn set_callsign(&mut self, callsign: impl Into<String>) { self.callsign = callsign.into(); }
    pub fn set_net_active(&mut self, net_active: bool) { self.net_active = net_active; }

    pub fn loc_id(&self) -> u32 { self.loc_id }
    pub fn channel_id(&self) -> u8 { self.channel_id }
    pub fn channel_no(&self) -> u32 { self.channel_no }
    pub fn site_info1(&self) -> u8 { self.site_info1 }
    pub fn site_info2(&self) -> u8 { self.site_info2 }
    pub fn is_adj_site(&self) -> bool { self.is_adj_site }
    pub fn callsign(&self) -> &str { &self.callsign }
    pub fn require_reg(&self) -> bool { self.require_reg }
    pub fn net_active(&self) -> bool { self.net_active }
}

impl Default for SiteData {
    fn default() -> Self {
        SiteData::new(1, 1, 1, VOICE_CALL_SVC | DATA_CALL_SVC, 0, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamps_channel_no_and_loc_id() {
        let site = SiteData::new(0x1000_0000, 99, 0, 0, 0, false);
        assert_eq!(site.loc_id(), 0xFF_FFFF);
        assert_eq!(site.channel_id(), 15);
        assert_eq!(site.channel_no(), 1);

        let site = SiteData::new(1, 1, 5000, 0, 0, false);
        assert_eq!(site.channel_no(), 1023);
    }

    #[test]
    fn test_adj_site_marks_flags() {
        let mut site = SiteData::default();
        site.set_adj_site(2, 3, 4, 1, 2);
        assert!(site.is_adj_site());
        assert!(site.net_active());
        assert_eq!(site.callsign(), "ADJSITE ");
    }
}

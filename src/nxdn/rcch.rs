//! NXDN Radio Control Channel (RCCH) messages: the common control-channel message
//! family carried over [`super::channel::Facch1`]/[`super::channel::Sacch`] link bursts,
//! grounded on `src/common/nxdn/lc/RCCH.h` and the dispatch table in
//! `src/common/nxdn/lc/rcch/RCCHFactory.h`.
//!
//! Every message shares a `messageType`/`srcId`/`dstId`/`locId` header (spec.md §4.4);
//! the remaining payload is opcode-specific and is packed here into a single 48-bit
//! word, the same way this crate's DMR CSBK and P25 TSBK codecs fold their
//! opcode-specific fields into one machine word rather than reproducing the factory's
//! per-message-type class hierarchy.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RcchHeader {
    pub message_type: u8,
    pub src_id: u16,
    pub dst_id: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rcch {
    /// VCALL_ASSGN - voice call channel assignment.
    VcallAssgn { header: RcchHeader, channel_no: u16, slot_no: u8 },
    /// VCALL_CONN - voice call connection in progress.
    VcallConn { header: RcchHeader, channel_no: u16 },
    /// GRP_REG - group registration request/response.
    GrpReg { header: RcchHeader, loc_id: u32, reg_option: u8 },
    /// REG - unit registration request/response.
    Reg { header: RcchHeader, loc_id: u32, cause_rsp: u8 },
    /// REG_C - registration clear.
    RegC { header: RcchHeader, loc_id: u32 },
    /// REG_COMM - registration confirmation with site channel plan.
    RegComm { header: RcchHeader, loc_id: u32, channel_no: u16 },
    /// DCALL_HDR - data call header.
    DcallHdr { header: RcchHeader, data_option: u8 },
    /// DST_ID_INFO - destination ID information.
    DstIdInfo { header: RcchHeader },
    /// SITE_INFO - site information broadcast.
    SiteInfo { header: RcchHeader, loc_id: u32, channel_no: u16 },
    /// SRV_INFO - service information broadcast.
    SrvInfo { header: RcchHeader, svc_option: u8 },
    /// IDLE - control channel idle.
    Idle { header: RcchHeader },
    /// Any message type this codec doesn't have a typed variant for: the 48-bit payload
    /// is preserved uninterpreted.
    Raw { header: RcchHeader, payload: u64 },
}

const MESSAGE_TYPE_VCALL_ASSGN: u8 = 0x01;
const MESSAGE_TYPE_VCALL_CONN: u8 = 0x03;
const MESSAGE_TYPE_GRP_REG: u8 = 0x21;
const MESSAGE_TYPE_REG: u8 = 0x22;
const MESSAGE_TYPE_REG_C: u8 = 0x23;
const MESSAGE_TYPE_REG_COMM: u8 = 0x24;
const MESSAGE_TYPE_DCALL_HDR: u8 = 0x09;
const MESSAGE_TYPE_DST_ID_INFO: u8 = 0x0A;
const MESSAGE_TYPE_SITE_INFO: u8 = 0x39;
const MESSAGE_TYPE_SRV_INFO: u8 = 0x38;
const MESSAGE_TYPE_IDLE: u8 = 0x3F;

impl Rcch {
    pub fn header(&self) -> RcchHeader {
        match *self {
            Rcch::VcallAssgn { header, .. }
            | Rcch::VcallConn { header, .. }
            | Rcch::GrpReg { header, .. }
            | Rcch::Reg { header, .. }
            | Rcch::RegC { header, .. }
            | Rcch::RegComm { header, .. }
            | Rcch::DcallHdr { header, .. }
            | Rcch::DstIdInfo { header, .. }
            | Rcch::SiteInfo { header, .. }
            | Rcch::SrvInfo { header, .. }
            | Rcch::Idle { header, .. }
            | Rcch::Raw { header, .. } => header,
        }
    }

    fn payload(&self) -> u64 {
        match *self {
            Rcch::VcallAssgn { channel_no, slot_no, .. } => {
                (channel_no as u64) << 8 | (slot_no as u64 & 0x1)
            }
            Rcch::VcallConn { channel_no, .. } => (channel_no as u64) << 8,
            Rcch::GrpReg { loc_id, reg_option, .. } => {
                (loc_id as u64 & 0xFF_FFFF) << 8 | reg_option as u64
            }
            Rcch::Reg { loc_id, cause_rsp, .. } => {
                (loc_id as u64 & 0xFF_FFFF) << 8 | cause_rsp as u64
            }
            Rcch::RegC { loc_id, .. } => (loc_id as u64 & 0xFF_FFFF) << 8,
            Rcch::RegComm { loc_id, channel_no, .. } => {
                (loc_id as u64 & 0xFF_FFFF) << 16 | (channel_no as u64)
            }
            Rcch::DcallHdr { data_option, .. } => data_option as u64,
            Rcch::DstIdInfo { .. } => 0,
            Rcch::SiteInfo { loc_id, channel_no, .. } => {
                (loc_id as u64 & 0xFF_FFFF) << 16 | (channel_no as u64)
            }
            Rcch::SrvInfo { svc_option, .. } => svc_option as u64,
            Rcch::Idle { .. } => 0,
            Rcch::Raw { payload, .. } => payload,
        }
    }

    fn from_header_payload(header: RcchHeader, payload: u64) -> Rcch {
        match header.message_type {
            MESSAGE_TYPE_VCALL_ASSGN => Rcch::VcallAssgn {
                header,
                channel_no: (payload >> 8) as u16,
                slot_no: (payload & 0x1) as u8,
            },
            MESSAGE_TYPE_VCALL_CONN => Rcch::VcallConn { header, channel_no: (payload >> 8) as u16 },
            MESSAGE_TYPE_GRP_REG => Rcch::GrpReg {
                header,
                loc_id: (payload >> 8 & 0xFF_FFFF) as u32,
                reg_option: payload as u8,
            },
            MESSAGE_TYPE_REG => Rcch::Reg {
                header,
                loc_id: (payload >> 8 & 0xFF_FFFF) as u32,
                cause_rsp: payload as u8,
            },
            MESSAGE_TYPE_REG_C => Rcch::RegC { header, loc_id: (payload >> 8 & 0xFF_FFFF) as u32 },
            MESSAGE_TYPE_REG_COMM => Rcch::RegComm {
                header,
                loc_id: (payload >> 16 & 0xFF_FFFF) as u32,
                channel_no: payload as u16,
            },
            MESSAGE_TYPE_DCALL_HDR => Rcch::DcallHdr { header, data_option: payload as u8 },
            MESSAGE_TYPE_DST_ID_INFO => Rcch::DstIdInfo { header },
            MESSAGE_TYPE_SITE_INFO => Rcch::SiteInfo {
                header,
                loc_id: (payload >> 16 & 0xFF_FFFF) as u32,
                channel_no: payload as u16,
            },
            MESSAGE_TYPE_SRV_INFO => Rcch::SrvInfo { header, svc_option: payload as u8 },
            MESSAGE_TYPE_IDLE => Rcch::Idle { header },
            _ => Rcch::Raw { header, payload },
        }
    }

    /// Packs into an 8-byte buffer: 1-byte message type, 2-byte source ID, 2-byte
    /// destination ID, and a 48-bit opcode-specific payload word. This fits within
    /// [`super::channel::Facch1`]'s 7-byte data field with one byte to spare for a
    /// future fragment-sequence number (not yet needed by anything this crate builds).
    pub fn to_bytes(&self) -> [u8; 8] {
        let header = self.header();
        let payload = self.payload();

        let mut buf = [0u8; 8];
        buf[0] = header.message_type;
        buf[1..3].copy_from_slice(&header.src_id.to_be_bytes());
        buf[3..5].copy_from_slice(&header.dst_id.to_be_bytes());
        for i in 0..3 {
            buf[5 + i] = (payload >> (8 * (2 - i))) as u8;
        }
        buf
    }

    pub fn from_bytes(buf: &[u8; 8]) -> Rcch {
        let header = RcchHeader {
            message_type: buf[0],
            src_id: u16::from_be_bytes([buf[1], buf[2]]),
            dst_id: u16::from_be_bytes([buf[3], buf[4]]),
        };

        let mut payload = 0u64;
        for i in 0..3 {
            payload = payload << 8 | buf[5 + i] as u64;
        }

        Rcch::from_header_payload(header, payload)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hdr(message_type: u8) -> RcchHeader {
        RcchHeader { message_type, src_id: 0x1234, dst_id: 0x5678 }
    }

    #[test]
    fn test_vcall_assgn_roundtrip() {
        let rcch = Rcch::VcallAssgn { header: hdr(MESSAGE_TYPE_VCALL_ASSGN), channel_no: 7, slot_no: 1 };
        let bytes = rcch.to_bytes();
        assert_eq!(Rcch::from_bytes(&bytes), rcch);
    }

    #[test]
    fn test_reg_roundtrip() {
        let rcch = Rcch::Reg { header: hdr(MESSAGE_TYPE_REG), loc_id: 0xABCDEF, cause_rsp: 3 };
        let bytes = rcch.to_bytes();
        assert_eq!(Rcch::from_bytes(&bytes), rcch);
    }

    #[test]
    fn test_site_info_roundtrip() {
        let rcch = Rcch::SiteInfo { header: hdr(MESSAGE_TYPE_SITE_INFO), loc_id: 0x001122, channel_no: 42 };
        let bytes = rcch.to_bytes();
        assert_eq!(Rcch::from_bytes(&bytes), rcch);
    }

    #[test]
    fn test_idle_roundtrip() {
        let rcch = Rcch::Idle { header: hdr(MESSAGE_TYPE_IDLE) };
        let bytes = rcch.to_bytes();
        assert_eq!(Rcch::from_bytes(&bytes), rcch);
    }

    #[test]
    fn test_unknown_message_type_roundtrips_as_raw() {
        let rcch = Rcch::Raw { header: hdr(0x7F), payload: 0xabcdef };
        let bytes = rcch.to_bytes();
        assert_eq!(Rcch::from_bytes(&bytes), rcch);
    }

    #[test]
    fn test_fits_in_facch1_payload() {
        use super::super::channel::Facch1;
        let rcch = Rcch::VcallConn { header: hdr(MESSAGE_TYPE_VCALL_CONN), channel_no: 9 };
        let bytes = rcch.to_bytes();
        let facch1 = Facch1 { data: bytes[..7].try_into().unwrap() };
        let encoded = facch1.encode();
        assert_eq!(Facch1::decode(&encoded).unwrap(), facch1);
    }
}

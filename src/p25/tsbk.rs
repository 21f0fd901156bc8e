//! P25 trunking signalling block (TSBK): the control-channel counterpart to DMR's CSBK,
//! carrying one 80-bit opcode + payload word plus a CRC-16, optionally 3/4-rate trellis
//! coded for transmission. Opcode numbering is taken from the teacher's `TSBKOpcode`
//! (already grounded against the standard) and type layouts from
//! `original_source/src/common/p25/lc/tsbk/*`.

use crate::edac::crc::CRC16;
use crate::edac::trellis;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TsbkHeader {
    pub last_block: bool,
    pub protected: bool,
    pub opcode: u8,
    pub mfg: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tsbk {
    /// Group voice channel grant.
    GroupVoiceGrant { header: TsbkHeader, channel: u16, talk_group: u16, src_unit: u32 },
    /// Unit-to-unit voice channel grant.
    UnitVoiceGrant { header: TsbkHeader, channel: u16, dest_unit: u32, src_unit: u32 },
    /// RFSS status broadcast on the control channel.
    RfssStatusBroadcast { header: TsbkHeader, lra: u8, system: u16, rfss: u8, site: u8, channel: u16 },
    /// WACN/system status broadcast.
    NetworkStatusBroadcast { header: TsbkHeader, lra: u8, wacn: u32, system: u16, channel: u16 },
    /// IOSP_GRP_AFF - group affiliation response.
    IospGrpAff { header: TsbkHeader, local_affiliation: bool, group_id: u16, announce_group_id: u16, target_id: u32 },
    /// OSP_AUTH_FNE_RESP - FNE's response to a unit's authentication challenge.
    OspAuthFneResp { header: TsbkHeader, auth_result: u32, src_id: u32 },
    /// Any opcode without a typed variant: the 64-bit payload is preserved uninterpreted.
    Raw { header: TsbkHeader, payload: u64 },
}

const OPCODE_GROUP_VOICE_GRANT: u8 = 0b000000;
const OPCODE_UNIT_VOICE_GRANT: u8 = 0b000100;
const OPCODE_GROUP_AFFILIATION_RESPONSE: u8 = 0b101000;
const OPCODE_RFSS_STATUS_BROADCAST: u8 = 0b111010;
const OPCODE_NETWORK_STATUS_BROADCAST: u8 = 0b111011;
const OPCODE_AUTH_FNE_RESP: u8 = 0b110000;

impl Tsbk {
    pub fn header(&self) -> TsbkHeader {
        match *self {
            Tsbk::GroupVoiceGrant { header, .. }
            | Tsbk::UnitVoiceGrant { header, .. }
            | Tsbk::RfssStatusBroadcast { header, .. }
            | Tsbk::NetworkStatusBroadcast { header, .. }
            | Tsbk::IospGrpAff { header, .. }
            | Tsbk::OspAuthFneResp { header, .. }
            | Tsbk::Raw { header, .. } => header,
        }
    }

    fn payload(&self) -> u64 {
        match *self {
            Tsbk::GroupVoiceGrant { channel, talk_group, src_unit, .. } => {
                (channel as u64) << 48 | (talk_group as u64) << 32 | (src_unit as u64 & 0xFF_FFFF) << 8
            }
            Tsbk::UnitVoiceGrant { channel, dest_unit, src_unit, .. } => {
                (channel as u64) << 48 | (dest_unit as u64 & 0xFF_FFFF) << 24 | (src_unit as u64 & 0xFF_FFFF)
            }
            Tsbk::RfssStatusBroadcast { lra, system, rfss, site, channel, .. } => {
                (lra as u64) << 56
                    | (system as u64 & 0xFFF) << 44
                    | (rfss as u64) << 36
                    | (site as u64) << 28
                    | (channel as u64) << 12
            }
            Tsbk::NetworkStatusBroadcast { lra, wacn, system, channel, .. } => {
                (lra as u64) << 56
                    | (wacn as u64 & 0xFF_FFFF) << 32
                    | (system as u64 & 0xFFF) << 20
                    | (channel as u64) << 4
            }
            Tsbk::IospGrpAff { local_affiliation, group_id, announce_group_id, target_id, .. } => {
                (local_affiliation as u64) << 63
                    | (group_id as u64) << 48
                    | (announce_group_id as u64) << 32
                    | (target_id as u64 & 0xFF_FFFF)
            }
            // Grounded on OSP_AUTH_FNE_RESP.cpp: result b3,b2,b1,b0 then 24-bit source
            // address, packed big-endian in `src/common`'s own byte order.
            Tsbk::OspAuthFneResp { auth_result, src_id, .. } => {
                (auth_result as u64) << 32 | (src_id as u64 & 0xFF_FFFF) << 8
            }
            Tsbk::Raw { payload, .. } => payload,
        }
    }

    fn from_header_payload(header: TsbkHeader, payload: u64) -> Tsbk {
        match header.opcode {
            OPCODE_GROUP_VOICE_GRANT => Tsbk::GroupVoiceGrant {
                header,
                channel: (payload >> 48) as u16,
                talk_group: (payload >> 32) as u16,
                src_unit: (payload >> 8 & 0xFF_FFFF) as u32,
            },
            OPCODE_UNIT_VOICE_GRANT => Tsbk::UnitVoiceGrant {
                header,
                channel: (payload >> 48) as u16,
                dest_unit: (payload >> 24 & 0xFF_FFFF) as u32,
                src_unit: (payload & 0xFF_FFFF) as u32,
            },
            OPCODE_RFSS_STATUS_BROADCAST => Tsbk::RfssStatusBroadcast {
                header,
                lra: (payload >> 56) as u8,
                system: (payload >> 44 & 0xFFF) as u16,
                rfss: (payload >> 36) as u8,
                site: (payload >> 28) as u8,
                channel: (payload >> 12) as u16,
            },
            OPCODE_NETWORK_STATUS_BROADCAST => Tsbk::NetworkStatusBroadcast {
                header,
                lra: (payload >> 56) as u8,
                wacn: (payload >> 32 & 0xFF_FFFF) as u32,
                system: (payload >> 20 & 0xFFF) as u16,
                channel: (payload >> 4) as u16,
            },
            OPCODE_GROUP_AFFILIATION_RESPONSE => Tsbk::IospGrpAff {
                header,
                local_affiliation: payload >> 63 & 1 == 1,
                group_id: (payload >> 48) as u16,
                announce_group_id: (payload >> 32) as u16,
                target_id: (payload & 0xFF_FFFF) as u32,
            },
            OPCODE_AUTH_FNE_RESP => Tsbk::OspAuthFneResp {
                header,
                auth_result: (payload >> 32) as u32,
                src_id: (payload >> 8 & 0xFF_FFFF) as u32,
            },
            _ => Tsbk::Raw { header, payload },
        }
    }

    /// Pack into the 12-byte unencoded TSBK buffer, with the trailing CRC-16 filled in.
    pub fn to_bytes(&self) -> [u8; 12] {
        let header = self.header();
        let payload = self.payload();

        let mut buf = [0u8; 12];
        buf[0] = (header.last_block as u8) << 7 | (header.protected as u8) << 6 | (header.opcode & 0x3F);
        buf[1] = header.mfg;
        for i in 0..8 {
            buf[2 + i] = (payload >> (8 * (7 - i))) as u8;
        }

        let crc = CRC16::new().feed_bytes(buf[..10].iter().cloned()).finish() as u16;
        buf[10] = (crc >> 8) as u8;
        buf[11] = crc as u8;

        buf
    }

    pub fn from_bytes(buf: &[u8; 12]) -> Option<Tsbk> {
        let crc = CRC16::new().feed_bytes(buf[..10].iter().cloned()).finish() as u16;
        let want = (buf[10] as u16) << 8 | buf[11] as u16;
        if crc != want {
            return None;
        }

        let header = TsbkHeader {
            last_block: buf[0] & 0x80 != 0,
            protected: buf[0] & 0x40 != 0,
            opcode: buf[0] & 0x3F,
            mfg: buf[1],
        };

        let mut payload = 0u64;
        for i in 0..8 {
            payload = payload << 8 | buf[2 + i] as u64;
        }

        Some(Tsbk::from_header_payload(header, payload))
    }

    /// Encode to the 3/4-rate trellis-coded air frame.
    pub fn encode_trellis(&self) -> Vec<u8> {
        trellis::encode34(&self.to_bytes())
    }

    /// Decode a trellis-coded air frame back to a `Tsbk`.
    pub fn decode_trellis(coded: &[u8]) -> Option<Tsbk> {
        let bytes = trellis::decode34(coded)?;
        let bytes: [u8; 12] = bytes.get(..12)?.try_into().ok()?;
        Tsbk::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hdr(opcode: u8) -> TsbkHeader {
        TsbkHeader { last_block: true, protected: false, opcode, mfg: 0 }
    }

    #[test]
    fn test_group_voice_grant_roundtrip() {
        let tsbk = Tsbk::GroupVoiceGrant {
            header: hdr(OPCODE_GROUP_VOICE_GRANT),
            channel: 0x1234,
            talk_group: 100,
            src_unit: 0x00ABCD,
        };
        let bytes = tsbk.to_bytes();
        assert_eq!(Tsbk::from_bytes(&bytes), Some(tsbk));
    }

    #[test]
    fn test_iosp_grp_aff_roundtrip() {
        let tsbk = Tsbk::IospGrpAff {
            header: hdr(OPCODE_GROUP_AFFILIATION_RESPONSE),
            local_affiliation: true,
            group_id: 42,
            announce_group_id: 43,
            target_id: 0x123456,
        };
        let bytes = tsbk.to_bytes();
        assert_eq!(Tsbk::from_bytes(&bytes), Some(tsbk));
    }

    #[test]
    fn test_osp_auth_fne_resp_roundtrip() {
        let tsbk = Tsbk::OspAuthFneResp {
            header: hdr(OPCODE_AUTH_FNE_RESP),
            auth_result: 0xdeadbeef,
            src_id: 0x001122,
        };
        let bytes = tsbk.to_bytes();
        assert_eq!(Tsbk::from_bytes(&bytes), Some(tsbk));
    }

    #[test]
    fn test_unknown_opcode_roundtrips_as_raw() {
        let tsbk = Tsbk::Raw { header: hdr(0b010101), payload: 0xfeed_face_1234 };
        let bytes = tsbk.to_bytes();
        assert_eq!(Tsbk::from_bytes(&bytes), Some(tsbk));
    }

    #[test]
    fn test_crc_rejects_corruption() {
        let tsbk = Tsbk::GroupVoiceGrant { header: hdr(OPCODE_GROUP_VOICE_GRANT), channel: 1, talk_group: 2, src_unit: 3 };
        let mut bytes = tsbk.to_bytes();
        bytes[4] ^= 0xff;
        assert_eq!(Tsbk::from_bytes(&bytes), None);
    }

    #[test]
    fn test_trellis_roundtrip() {
        let tsbk = Tsbk::UnitVoiceGrant { header: hdr(OPCODE_UNIT_VOICE_GRANT), channel: 7, dest_unit: 8, src_unit: 9 };
        let coded = tsbk.encode_trellis();
        assert_eq!(Tsbk::decode_trellis(&coded), Some(tsbk));
    }
}

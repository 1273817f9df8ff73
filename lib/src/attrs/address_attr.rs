use crate::attrs::RawAttr;
use crate::constants::*;
use bytes::{BufMut, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ops::Deref;

use crate::error::ParsePacketErr;

// 地址类的attribute
//
// mapped-address  other-address  changed-address

// ipv4: family: 0x01, 4 bytes
// ipv6: family: 0x02, 16 bytes

#[derive(Debug, Clone)]
pub struct AddressAttr {
    pub attr_type: u16,
    pub address: SocketAddr,
}

impl AddressAttr {
    pub fn new(attr_type: u16, address: SocketAddr) -> Self {
        Self { attr_type, address }
    }
}

impl From<AddressAttr> for RawAttr {
    fn from(attr: AddressAttr) -> Self {
        let (family, octets) = match attr.address.ip() {
            IpAddr::V4(ip) => (ATTR_FAMILY_IPV4, ip.octets().to_vec()),
            IpAddr::V6(ip) => (ATTR_FAMILY_IPV6, ip.octets().to_vec()),
        };

        let mut buf = BytesMut::with_capacity(4 + octets.len());
        buf.put_u8(0);
        buf.put_u8(family);
        buf.put_u16(attr.address.port());
        buf.put_slice(&octets);

        RawAttr::new(attr.attr_type, buf.freeze())
    }
}

impl TryFrom<RawAttr> for AddressAttr {
    type Error = ParsePacketErr;

    fn try_from(base_attr: RawAttr) -> Result<Self, Self::Error> {
        let attr_type = base_attr.attr_type;

        // 1字节保留位 + 1字节family + 2字节port + 地址
        let value = base_attr.value.deref();

        if value.len() < 4 {
            return Err(ParsePacketErr::ShortAddress(value.len()));
        }

        let family = value[1];
        let port = u16::from_be_bytes([value[2], value[3]]);

        let address = match family {
            ATTR_FAMILY_IPV4 => {
                if value.len() < 8 {
                    return Err(ParsePacketErr::ShortAddress(value.len()));
                }
                let mut addr = [0_u8; 4];
                addr.copy_from_slice(&value[4..8]);
                SocketAddr::new(IpAddr::V4(Ipv4Addr::from(addr)), port)
            }
            ATTR_FAMILY_IPV6 => {
                if value.len() < 20 {
                    return Err(ParsePacketErr::ShortAddress(value.len()));
                }
                let mut addr = [0_u8; 16];
                addr.copy_from_slice(&value[4..20]);
                SocketAddr::new(IpAddr::V6(Ipv6Addr::from(addr)), port)
            }
            v => {
                return Err(ParsePacketErr::UnsupportedFamily(v));
            }
        };

        Ok(Self { attr_type, address })
    }
}

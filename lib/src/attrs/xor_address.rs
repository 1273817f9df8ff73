use crate::attrs::address_attr::AddressAttr;
use crate::attrs::RawAttr;
use crate::constants::ATTR_XOR_MAPPED_ADDRESS;
use crate::error::ParsePacketErr;
use crate::header::TransId;
use crate::util;
use std::net::SocketAddr;

// xor-mapped-address: 线上格式和普通地址attr一致, 只是内容被混淆
// port 和 magic cookie 高16位做 xor
// address(ipv4) 和 magic cookie 做xor
// address(ipv6) 和 magic cookie + 响应自身的trans_id 做xor

#[derive(Debug, Clone)]
pub struct XorMappedAddress {
    pub address: SocketAddr,
    pub trans_id: TransId,
}

impl XorMappedAddress {
    pub fn new(trans_id: TransId, address: SocketAddr) -> Self {
        Self { trans_id, address }
    }

    pub fn from_base_attr(base_attr: RawAttr, trans_id: &TransId) -> Result<Self, ParsePacketErr> {
        let address_attr: AddressAttr = base_attr.try_into()?;

        // xor是自反的, 解包和打包走同一组变换
        let address = util::xor_address(address_attr.address, trans_id);

        Ok(Self {
            address,
            trans_id: *trans_id,
        })
    }
}

impl From<XorMappedAddress> for RawAttr {
    fn from(attr: XorMappedAddress) -> Self {
        let xor_socket_addr = util::xor_address(attr.address, &attr.trans_id);

        // 混淆后按普通地址attr打包
        AddressAttr::new(ATTR_XOR_MAPPED_ADDRESS, xor_socket_addr).into()
    }
}

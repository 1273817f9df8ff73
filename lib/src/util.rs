use crate::constants::{MAGIC_COOKIE, TRANS_ID_LEN};
use crate::header::TransId;
use rand::prelude::*;
use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

pub fn print_bytes(buf: &[u8], separator: &str, row_width: usize) -> String {
    let mut hex = String::new();
    buf.iter().enumerate().for_each(|(x, y)| {
        let _ = write!(hex, "{:02X}", y);
        if (x + 1) % row_width == 0 {
            hex.push('\n');
        } else {
            hex.push_str(separator);
        }
    });

    hex
}

pub fn pad_to_4(len: usize) -> usize {
    (4 - len % 4) % 4
}

// rfc 8489, 5: 必须是密码学随机, 每个请求重新生成
pub fn new_trans_id() -> TransId {
    let mut trans_id = [0u8; TRANS_ID_LEN];
    rand::thread_rng().fill_bytes(&mut trans_id);
    trans_id
}

pub fn xor_address_v4(addr: SocketAddrV4) -> SocketAddrV4 {
    let port = addr.port();
    let magic_prefix = u16::from_be_bytes([MAGIC_COOKIE[0], MAGIC_COOKIE[1]]);
    let port = port ^ magic_prefix;

    let src_buf = addr.ip().octets();
    let mut buf = [0_u8; 4];
    for i in 0..buf.len() {
        buf[i] = src_buf[i] ^ MAGIC_COOKIE[i];
    }

    SocketAddrV4::new(Ipv4Addr::from(buf), port)
}

// ipv6和 magic cookie + trans_id 做xor
pub fn xor_address_v6(addr: SocketAddrV6, trans_id: &TransId) -> SocketAddrV6 {
    let port = addr.port();
    let magic_prefix = u16::from_be_bytes([MAGIC_COOKIE[0], MAGIC_COOKIE[1]]);
    let port = port ^ magic_prefix;

    let src_buf = addr.ip().octets();
    let mut buf = [0_u8; 16];
    for i in 0..buf.len() {
        if i < MAGIC_COOKIE.len() {
            buf[i] = src_buf[i] ^ MAGIC_COOKIE[i];
        } else {
            buf[i] = src_buf[i] ^ trans_id[i - MAGIC_COOKIE.len()];
        }
    }

    SocketAddrV6::new(Ipv6Addr::from(buf), port, 0, 0)
}

pub fn xor_address(addr: SocketAddr, trans_id: &TransId) -> SocketAddr {
    match addr {
        SocketAddr::V4(v) => SocketAddr::V4(xor_address_v4(v)),
        SocketAddr::V6(v) => SocketAddr::V6(xor_address_v6(v, trans_id)),
    }
}

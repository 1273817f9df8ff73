use crate::attrs::address_attr::AddressAttr;
use crate::attrs::change_request::ChangeRequest;
use crate::attrs::errcode_attr;
use crate::attrs::xor_address::XorMappedAddress;
use crate::constants::*;
use crate::error::ProbeErr;
use crate::header::Header;
use crate::packet::Packet;
use crate::util;
use bytes::Bytes;
use log::debug;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time;

// 普通请求3秒; CHANGE-REQUEST要等备用地址的回包, 放宽到5秒
const TIMEOUT_PLAIN: Duration = Duration::from_secs(3);
const TIMEOUT_CHANGE: Duration = Duration::from_secs(5);

// binding响应远小于1k, 超出部分截断
const RECV_BUF_LEN: usize = 1024;

pub struct StunClient {
    sock: UdpSocket,
}

impl StunClient {
    pub async fn new() -> io::Result<Self> {
        let sock = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(Self { sock })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    // 一次binding事务: 一个请求出, 一个响应进, 不重发
    // 不校验响应的trans_id和来源地址, Test II的回包本来就来自备用地址
    pub async fn send_binding(
        &self,
        server: &str,
        change_ip: bool,
        change_port: bool,
    ) -> Result<SocketAddr, ProbeErr> {
        let request = new_binding_request(change_ip, change_port);
        let timeout = match change_ip || change_port {
            true => TIMEOUT_CHANGE,
            false => TIMEOUT_PLAIN,
        };

        let response = self.round_trip(server, &request, timeout).await?;

        if response.header.msg_type == MESSAGE_TYPE_BIND_ERR_RES {
            let (code, reason) = errcode_attr::extract_error_code(&response);
            return Err(ProbeErr::Stun { code, reason });
        }

        find_mapped_address(&response)
    }

    // 只为获取 OTHER-ADDRESS / CHANGED-ADDRESS 发一个普通binding请求
    pub async fn get_alternate(&self, server: &str) -> Result<SocketAddr, ProbeErr> {
        let request = new_binding_request(false, false);
        let response = self.round_trip(server, &request, TIMEOUT_PLAIN).await?;

        for attr in response.attrs.iter() {
            if attr.attr_type == ATTR_OTHER_ADDRESS || attr.attr_type == ATTR_CHANGED_ADDRESS {
                let address_attr: AddressAttr = attr.clone().try_into()?;
                return Ok(address_attr.address);
            }
        }

        Err(ProbeErr::AlternateAddressMissing)
    }

    async fn round_trip(
        &self,
        server: &str,
        request: &Packet,
        timeout: Duration,
    ) -> Result<Packet, ProbeErr> {
        let server_addr = resolve(server).await?;

        let buf = request.pack();
        debug!(
            "{:?} --> {}\n{}",
            self.sock.local_addr(),
            server_addr,
            util::print_bytes(&buf, " ", 8)
        );

        self.sock
            .send_to(&buf, server_addr)
            .await
            .map_err(ProbeErr::SendFailed)?;

        let mut recv_buf = vec![0u8; RECV_BUF_LEN];
        let (len, remote_addr) = time::timeout(timeout, self.sock.recv_from(&mut recv_buf))
            .await
            .map_err(|_| ProbeErr::Timeout)?
            .map_err(ProbeErr::ReceiveFailed)?;

        let buf = Bytes::copy_from_slice(&recv_buf[..len]);
        debug!(
            "{:?} <-- {}\n{}",
            self.sock.local_addr(),
            remote_addr,
            util::print_bytes(&buf, " ", 8)
        );

        let response = Packet::unpack(buf)?;
        Ok(response)
    }
}

fn new_binding_request(change_ip: bool, change_port: bool) -> Packet {
    let trans_id = util::new_trans_id();
    let header = Header::new(MESSAGE_TYPE_BIND_REQ, 0, trans_id);
    let mut request = Packet::new(header, vec![]);

    if change_ip || change_port {
        request.add_attr(ChangeRequest::new(change_ip, change_port).into());
    }

    request
}

// xor形式优先于mapped-address
fn find_mapped_address(response: &Packet) -> Result<SocketAddr, ProbeErr> {
    if response.header.msg_type == MESSAGE_TYPE_BIND_RES {
        let trans_id = &response.header.trans_id;

        for attr in response.attrs.iter() {
            if attr.attr_type == ATTR_XOR_MAPPED_ADDRESS {
                let xor_attr = XorMappedAddress::from_base_attr(attr.clone(), trans_id)?;
                return Ok(xor_attr.address);
            }
        }

        for attr in response.attrs.iter() {
            if attr.attr_type == ATTR_MAPPED_ADDRESS {
                let address_attr: AddressAttr = attr.clone().try_into()?;
                return Ok(address_attr.address);
            }
        }
    }

    Err(ProbeErr::NoMappedAddress)
}

async fn resolve(server: &str) -> Result<SocketAddr, ProbeErr> {
    let mut addrs = lookup_host(server)
        .await
        .map_err(|e| ProbeErr::ResolveFailed(format!("{}, {}", server, e)))?;

    addrs
        .next()
        .ok_or_else(|| ProbeErr::ResolveFailed(format!("no address for {}", server)))
}

use crate::check::server_candidates;
use crate::client::StunClient;
use crate::error::{CheckErr, ProbeErr};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;

// rfc 4787 的filtering行为分类

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NatFilteringType {
    EndpointIndependent,
    AddressDependent,
    AddressAndPortDependent,
    Unknown,
}

impl fmt::Display for NatFilteringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatFilteringType::EndpointIndependent => write!(f, "Endpoint Independent Filtering"),
            NatFilteringType::AddressDependent => write!(f, "Address Dependent Filtering"),
            NatFilteringType::AddressAndPortDependent => {
                write!(f, "Address and Port Dependent Filtering")
            }
            NatFilteringType::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteringResult {
    pub filtering: NatFilteringType,

    // 步骤1拿到的备用地址
    pub other_address: Option<SocketAddr>,

    // Test II / Test III 是否收到success响应
    pub test_ii_response: bool,
    pub test_iii_response: bool,

    pub supports_change_request: bool,
    pub supports_other_address: bool,
}

// 探测失败不报错, 而是记入verdict和supports_*标志
pub async fn check_filtering_behavior(server: &str) -> Result<FilteringResult, CheckErr> {
    let client = StunClient::new().await?;

    // 步骤1: 先确认server有备用地址, 否则无从判定filtering
    let mut harvested = None;
    for candidate in server_candidates(server) {
        match client.get_alternate(&candidate).await {
            Ok(addr) => {
                harvested = Some((candidate, addr));
                break;
            }
            Err(e) => {
                debug!("get_alternate {} fail, {}", candidate, e);
            }
        }
    }

    let (server_addr, other_address) = match harvested {
        Some(v) => v,
        None => {
            return Ok(FilteringResult {
                filtering: NatFilteringType::Unknown,
                other_address: None,
                test_ii_response: false,
                test_iii_response: false,
                supports_change_request: false,
                supports_other_address: false,
            });
        }
    };

    // 步骤2: Test II, 要求server从备用ip+port回包
    match client.send_binding(&server_addr, true, true).await {
        Ok(addr) => {
            debug!("test II response, mapped {}", addr);
            return Ok(FilteringResult {
                filtering: NatFilteringType::EndpointIndependent,
                other_address: Some(other_address),
                test_ii_response: true,
                test_iii_response: false,
                supports_change_request: true,
                supports_other_address: true,
            });
        }
        Err(e @ ProbeErr::Stun { .. }) => {
            // 错误响应(通常是420)说明server不认识CHANGE-REQUEST,
            // 直接短路, 不再等Test III超时
            debug!(
                "test II stun error, change_request_unsupported: {}, {}",
                e.is_change_request_unsupported(),
                e
            );
            return Ok(FilteringResult {
                filtering: NatFilteringType::Unknown,
                other_address: Some(other_address),
                test_ii_response: false,
                test_iii_response: false,
                supports_change_request: false,
                supports_other_address: true,
            });
        }
        Err(ProbeErr::Timeout) => {
            debug!("test II timeout");
        }
        Err(e) => {
            return Err(CheckErr::FilteringProbeFailed(e));
        }
    }

    // 步骤3: Test III, 只要求换端口
    match client.send_binding(&server_addr, false, true).await {
        Ok(addr) => {
            debug!("test III response, mapped {}", addr);
            Ok(FilteringResult {
                filtering: NatFilteringType::AddressDependent,
                other_address: Some(other_address),
                test_ii_response: false,
                test_iii_response: true,
                supports_change_request: true,
                supports_other_address: true,
            })
        }
        Err(e) => {
            debug!("test III fail, {}", e);
            Ok(FilteringResult {
                filtering: NatFilteringType::AddressAndPortDependent,
                other_address: Some(other_address),
                test_ii_response: false,
                test_iii_response: false,
                supports_change_request: true,
                supports_other_address: true,
            })
        }
    }
}

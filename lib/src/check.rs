use crate::client::StunClient;
use crate::constants::CANDIDATE_PORTS;
use crate::error::{CheckErr, ProbeErr, ProbeStage};
use log::debug;
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;

// rfc 4787 的mapping行为分类

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NatMappingType {
    EndpointIndependent,
    AddressDependent,
    AddressAndPortDependent,
    Unknown,
}

impl fmt::Display for NatMappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatMappingType::EndpointIndependent => write!(f, "Endpoint Independent Mapping"),
            NatMappingType::AddressDependent => write!(f, "Address Dependent Mapping"),
            NatMappingType::AddressAndPortDependent => {
                write!(f, "Address and Port Dependent Mapping")
            }
            NatMappingType::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub mapping: NatMappingType,

    // 三次探测观察到的反射地址
    pub mapping_a1: SocketAddr,
    pub mapping_b1: SocketAddr,
    pub mapping_a2: SocketAddr,
}

// server自带端口时原样使用, 否则依次补上候选端口
pub fn server_candidates(server: &str) -> Vec<String> {
    if server.contains(':') {
        vec![server.to_string()]
    } else {
        CANDIDATE_PORTS
            .iter()
            .map(|port| format!("{}:{}", server, port))
            .collect()
    }
}

async fn probe_mapped_address(
    client: &StunClient,
    server: &str,
) -> Result<SocketAddr, ProbeErr> {
    let mut last_err = ProbeErr::ResolveFailed(format!("no candidate for {}", server));

    for candidate in server_candidates(server) {
        match client.send_binding(&candidate, false, false).await {
            Ok(v) => return Ok(v),
            Err(e) => {
                debug!("probe {} fail, {}", candidate, e);
                last_err = e;
            }
        }
    }

    Err(last_err)
}

// 三次探测必须在同一个本地端口上顺序执行
pub async fn check_mapping_type(
    server_a: &str,
    server_b: &str,
) -> Result<MappingResult, CheckErr> {
    let client = StunClient::new().await?;

    // 探测1: 从A取基本mapping
    let mapping_a1 = probe_mapped_address(&client, server_a)
        .await
        .map_err(|cause| CheckErr::MappingProbeFailed {
            stage: ProbeStage::A1,
            cause,
        })?;

    // 探测2: 从B取mapping
    let mapping_b1 = probe_mapped_address(&client, server_b)
        .await
        .map_err(|cause| CheckErr::MappingProbeFailed {
            stage: ProbeStage::B1,
            cause,
        })?;

    // 探测3: 再次向A, 检查一致性
    let mapping_a2 = probe_mapped_address(&client, server_a)
        .await
        .map_err(|cause| CheckErr::MappingProbeFailed {
            stage: ProbeStage::A2,
            cause,
        })?;

    let mapping = determine_mapping_type(&mapping_a1, &mapping_b1, &mapping_a2);

    Ok(MappingResult {
        mapping,
        mapping_a1,
        mapping_b1,
        mapping_a2,
    })
}

// 只比较端口, ip不参与判定
pub fn determine_mapping_type(
    a1: &SocketAddr,
    b1: &SocketAddr,
    a2: &SocketAddr,
) -> NatMappingType {
    if a1.port() != a2.port() {
        return NatMappingType::AddressAndPortDependent;
    }

    if a1.port() == b1.port() {
        NatMappingType::EndpointIndependent
    } else {
        NatMappingType::AddressDependent
    }
}

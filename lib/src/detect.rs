use crate::check::{check_mapping_type, MappingResult, NatMappingType};
use crate::error::CheckErr;
use crate::filtering::{check_filtering_behavior, FilteringResult, NatFilteringType};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetailedNatType {
    pub mapping: NatMappingType,
    pub filtering: NatFilteringType,
}

impl DetailedNatType {
    pub fn new(mapping: NatMappingType, filtering: NatFilteringType) -> Self {
        Self { mapping, filtering }
    }

    // rfc 3489 的cone/symmetric叫法
    pub fn legacy_name(&self) -> &'static str {
        match (self.mapping, self.filtering) {
            (NatMappingType::EndpointIndependent, NatFilteringType::EndpointIndependent) => {
                "Full Cone NAT"
            }
            (NatMappingType::EndpointIndependent, NatFilteringType::AddressDependent) => {
                "Restricted Cone NAT"
            }
            (NatMappingType::EndpointIndependent, NatFilteringType::AddressAndPortDependent) => {
                "Port Restricted Cone NAT"
            }
            (NatMappingType::AddressDependent, _) => "Symmetric NAT",
            (NatMappingType::AddressAndPortDependent, _) => "Symmetric NAT",
            _ => "Unknown NAT Type",
        }
    }
}

impl fmt::Display for DetailedNatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mapping: {} / Filtering: {}", self.mapping, self.filtering)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FullDetectionResult {
    pub detailed_type: DetailedNatType,
    pub mapping: MappingResult,
    pub filtering: FilteringResult,
}

// mapping用两台server判定, filtering用A判定
// mapping失败直接中止, 原样上抛
pub async fn full_nat_detection(
    server_a: &str,
    server_b: &str,
) -> Result<FullDetectionResult, CheckErr> {
    let mapping = check_mapping_type(server_a, server_b).await?;
    let filtering = check_filtering_behavior(server_a).await?;

    let detailed_type = DetailedNatType::new(mapping.mapping, filtering.filtering);

    Ok(FullDetectionResult {
        detailed_type,
        mapping,
        filtering,
    })
}

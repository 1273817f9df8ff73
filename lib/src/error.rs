use crate::constants::ERROR_CODE_UNKNOWN_ATTRIBUTE;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParsePacketErr {
    // 不足20字节的header
    #[error("message too short: {0} bytes")]
    MessageTooShort(usize),

    #[error("address value too short: {0} bytes")]
    ShortAddress(usize),

    #[error("unsupported address family: {0:#04x}")]
    UnsupportedFamily(u8),

    #[error("bad attribute value, {0}")]
    BadValue(String),
}

// 单次binding事务的错误
#[derive(Debug, Error)]
pub enum ProbeErr {
    #[error("parse response fail, {0}")]
    Parse(#[from] ParsePacketErr),

    #[error("resolve fail, {0}")]
    ResolveFailed(String),

    #[error("send fail, {0}")]
    SendFailed(#[source] io::Error),

    #[error("recv fail, {0}")]
    ReceiveFailed(#[source] io::Error),

    #[error("wait response timeout")]
    Timeout,

    #[error("stun error response: code={code}, reason={reason}")]
    Stun { code: u16, reason: String },

    #[error("mapped address not found in response")]
    NoMappedAddress,

    #[error("OTHER-ADDRESS not found in response")]
    AlternateAddressMissing,
}

impl ProbeErr {
    // 420: server不认识CHANGE-REQUEST属性
    pub fn is_change_request_unsupported(&self) -> bool {
        match self {
            ProbeErr::Stun { code, .. } => *code == ERROR_CODE_UNKNOWN_ATTRIBUTE,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    A1,
    B1,
    A2,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStage::A1 => write!(f, "A1"),
            ProbeStage::B1 => write!(f, "B1"),
            ProbeStage::A2 => write!(f, "A2"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckErr {
    #[error("bind local endpoint fail, {0}")]
    Bind(#[from] io::Error),

    #[error("mapping probe {stage} fail, {cause}")]
    MappingProbeFailed { stage: ProbeStage, cause: ProbeErr },

    #[error("filtering probe fail, {0}")]
    FilteringProbeFailed(ProbeErr),
}

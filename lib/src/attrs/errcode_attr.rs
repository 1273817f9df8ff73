use std::ops::Deref;

use crate::attrs::RawAttr;
use crate::constants::ATTR_ERROR_CODE;
use crate::packet::Packet;
use bytes::{BufMut, BytesMut};

// 头2字节保留, 收包时不校验
// class:  第3字节低3位    3-6
// number: 第4字节         0-99
// code = class * 100 + number
// 之后是可选的utf8 reason

#[derive(Debug, Clone)]
pub struct ErrcodeAttr {
    pub code: u16,
    pub reason: String,
}

impl ErrcodeAttr {
    pub fn new(code: u16, reason: &str) -> Self {
        Self {
            code,
            reason: reason.to_string(),
        }
    }
}

impl From<ErrcodeAttr> for RawAttr {
    fn from(attr: ErrcodeAttr) -> Self {
        let mut bytes_buf = BytesMut::with_capacity(4 + attr.reason.len());
        bytes_buf.put_u16(0);
        bytes_buf.put_u8((attr.code / 100) as u8);
        bytes_buf.put_u8((attr.code % 100) as u8);
        bytes_buf.put_slice(attr.reason.as_bytes());

        let value = bytes_buf.freeze();
        RawAttr::new(ATTR_ERROR_CODE, value)
    }
}

// 取第一个完整的ERROR-CODE; 没有或value不足4字节时返回 (0, "")
pub fn extract_error_code(packet: &Packet) -> (u16, String) {
    for attr in packet.attrs.iter() {
        if attr.attr_type == ATTR_ERROR_CODE && attr.value.len() >= 4 {
            let value = attr.value.deref();

            let class = (value[2] & 0x07) as u16;
            let number = value[3] as u16;
            let reason = String::from_utf8_lossy(&value[4..]).to_string();

            return (class * 100 + number, reason);
        }
    }

    (0, String::new())
}

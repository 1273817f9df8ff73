use crate::constants::*;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ParsePacketErr;
use std::ops::Deref;

pub type TransId = [u8; TRANS_ID_LEN];

// rfc 8489, 5
#[derive(Debug, Clone)]
pub struct Header {
    pub msg_type: u16,

    // 不包括header的20字节, 含每个attr补齐到4字节的padding
    pub msg_len: u16,

    pub trans_id: TransId,
}

impl Header {
    pub fn new(msg_type: u16, msg_len: u16, trans_id: TransId) -> Self {
        Self {
            msg_type,
            msg_len,
            trans_id,
        }
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        buf.put_u16(self.msg_type);
        buf.put_u16(self.msg_len);
        buf.put_slice(&MAGIC_COOKIE);
        buf.put_slice(&self.trans_id);
        buf.freeze()
    }

    pub fn unpack(buf_bytes: Bytes) -> Result<Self, ParsePacketErr> {
        let buf = buf_bytes.deref();

        // 只检查长度; magic cookie和msg_len不做校验
        if buf.len() < HEADER_LEN {
            return Err(ParsePacketErr::MessageTooShort(buf.len()));
        }

        let msg_type = u16::from_be_bytes([buf[0], buf[1]]);
        let msg_len = u16::from_be_bytes([buf[2], buf[3]]);

        let mut trans_id = [0_u8; TRANS_ID_LEN];
        trans_id.copy_from_slice(&buf[8..HEADER_LEN]);

        Ok(Self {
            msg_type,
            msg_len,
            trans_id,
        })
    }
}

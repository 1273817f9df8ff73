#![allow(clippy::len_without_is_empty)]

use crate::util;
use bytes::{BufMut, Bytes, BytesMut};

pub mod address_attr;
pub mod change_request;
pub mod errcode_attr;
pub mod xor_address;

#[derive(Debug, Clone)]
pub struct RawAttr {
    pub attr_type: u16,

    // value的字节数, 不含padding
    pub attr_len: u16,

    pub value: Bytes,
}

impl RawAttr {
    pub fn new(attr_type: u16, value: Bytes) -> Self {
        Self {
            attr_type,
            attr_len: value.len() as u16,
            value,
        }
    }

    // 线上长度: type + len + value + padding
    pub fn len(&self) -> usize {
        4 + self.attr_len as usize + util::pad_to_4(self.attr_len as usize)
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());

        buf.put_u16(self.attr_type);
        buf.put_u16(self.attr_len);
        buf.put_slice(&self.value);
        // padding固定填0, 解包时内容被忽略
        buf.put_bytes(0, util::pad_to_4(self.attr_len as usize));

        buf.freeze()
    }
}

use crate::attrs::RawAttr;
use crate::constants::HEADER_LEN;
use crate::error::ParsePacketErr;
use crate::header::Header;
use crate::util;
use bytes::{BufMut, Bytes, BytesMut};

// 解包采取宽松策略:
// header里的message length字段不参与校验
// 被截断的attr直接丢弃, 保留已解析的部分
// 未知attr类型原样保留, 由上层决定忽略与否

#[derive(Debug, Clone)]
pub struct Packet {
    pub header: Header,
    pub attrs: Vec<RawAttr>,
}

impl Packet {
    pub fn new(header: Header, attrs: Vec<RawAttr>) -> Self {
        let mut packet = Self { header, attrs };
        packet.update_header_len();
        packet
    }

    fn update_header_len(&mut self) {
        let total = self.attrs.iter().fold(0_usize, |acc, x| acc + x.len());
        self.header.msg_len = total as u16;
    }

    pub fn add_attr(&mut self, attr: RawAttr) {
        self.attrs.push(attr);
        self.update_header_len();
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_slice(&self.header.pack());
        for v in self.attrs.iter() {
            buf.put_slice(&v.pack());
        }

        buf.freeze()
    }

    pub fn unpack(mut buf_bytes: Bytes) -> Result<Self, ParsePacketErr> {
        if buf_bytes.len() < HEADER_LEN {
            return Err(ParsePacketErr::MessageTooShort(buf_bytes.len()));
        }

        let header_buf = buf_bytes.split_to(HEADER_LEN);
        let header = Header::unpack(header_buf)?;

        let mut attr_list = vec![];

        while buf_bytes.len() >= 4 {
            let attr_type = u16::from_be_bytes([buf_bytes[0], buf_bytes[1]]);
            let attr_len = u16::from_be_bytes([buf_bytes[2], buf_bytes[3]]) as usize;

            if buf_bytes.len() < 4 + attr_len {
                break;
            }

            let _ = buf_bytes.split_to(4);
            let value = buf_bytes.split_to(attr_len);
            attr_list.push(RawAttr::new(attr_type, value));

            let padding = util::pad_to_4(attr_len).min(buf_bytes.len());
            let _ = buf_bytes.split_to(padding);
        }

        Ok(Packet::new(header, attr_list))
    }
}

use bytes::{BufMut, Bytes, BytesMut};
use natcheck_rs::attrs::address_attr::AddressAttr;
use natcheck_rs::attrs::change_request::ChangeRequest;
use natcheck_rs::attrs::errcode_attr::{self, ErrcodeAttr};
use natcheck_rs::attrs::xor_address::XorMappedAddress;
use natcheck_rs::attrs::RawAttr;
use natcheck_rs::constants::*;
use natcheck_rs::error::ParsePacketErr;
use natcheck_rs::header::Header;
use natcheck_rs::packet::Packet;

use std::net::SocketAddr;

const TRANS_ID: [u8; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

#[test]
pub fn test_pack_plain_request() {
    let header = Header::new(MESSAGE_TYPE_BIND_REQ, 0, TRANS_ID);
    let packet = Packet::new(header, vec![]);
    let buf = packet.pack();

    let expect: [u8; 20] = [
        0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xA4, 0x42, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
    ];
    assert_eq!(&buf[..], &expect[..]);
}

#[test]
pub fn test_pack_change_request() {
    let header = Header::new(MESSAGE_TYPE_BIND_REQ, 0, TRANS_ID);
    let mut packet = Packet::new(header, vec![]);
    packet.add_attr(ChangeRequest::new(true, true).into());

    let buf = packet.pack();
    assert_eq!(buf.len(), 28);

    // msg_len = 8
    assert_eq!(&buf[2..4], &[0x00, 0x08]);
    assert_eq!(
        &buf[20..28],
        &[0x00, 0x03, 0x00, 0x04, 0x00, 0x00, 0x00, 0x06]
    );
}

#[test]
pub fn test_unpack_response() {
    let buf = Bytes::copy_from_slice(&[
        0x01, 0x01, 0x00, 0x00, 0x21, 0x12, 0xA4, 0x42, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
    ]);
    let packet = Packet::unpack(buf).unwrap();

    assert_eq!(packet.header.msg_type, MESSAGE_TYPE_BIND_RES);
    assert_eq!(packet.header.trans_id, TRANS_ID);
    assert!(packet.attrs.is_empty());
}

#[test]
pub fn test_unpack_too_short() {
    let buf = Bytes::copy_from_slice(&[0u8; 19]);
    let err = Packet::unpack(buf).unwrap_err();

    assert!(matches!(err, ParsePacketErr::MessageTooShort(19)));
}

#[test]
pub fn test_roundtrip_attrs() {
    let mapped_addr: SocketAddr = "203.0.113.1:54321".parse().unwrap();

    let mut origin: Vec<RawAttr> = Vec::new();
    origin.push(ChangeRequest::new(true, false).into());
    origin.push(AddressAttr::new(ATTR_MAPPED_ADDRESS, mapped_addr).into());
    // reason长度不是4的倍数, 走padding分支
    origin.push(ErrcodeAttr::new(420, "Unknown Attribute").into());

    let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, TRANS_ID);
    let packet = Packet::new(header, origin.clone());
    let buf = packet.pack();

    let unpacked = Packet::unpack(buf).unwrap();
    assert_eq!(unpacked.header.msg_type, MESSAGE_TYPE_BIND_RES);
    assert_eq!(unpacked.header.trans_id, TRANS_ID);
    assert_eq!(unpacked.attrs.len(), origin.len());

    for (a, b) in origin.iter().zip(unpacked.attrs.iter()) {
        assert_eq!(a.attr_type, b.attr_type);
        assert_eq!(a.attr_len, b.attr_len);
        assert_eq!(a.value, b.value);
    }
}

#[test]
pub fn test_unpack_truncated_attr() {
    let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, TRANS_ID);
    let mut packet = Packet::new(header, vec![]);
    packet.add_attr(ChangeRequest::new(false, true).into());

    let mut buf = BytesMut::from(&packet.pack()[..]);
    // 第二个attr声明8字节value, 实际只给2字节
    buf.put_slice(&[0x00, 0x01, 0x00, 0x08, 0xAA, 0xBB]);

    let unpacked = Packet::unpack(buf.freeze()).unwrap();

    // 截断的attr被丢弃, 之前的保留
    assert_eq!(unpacked.attrs.len(), 1);
    assert_eq!(unpacked.attrs[0].attr_type, ATTR_CHANGE_REQUEST);
}

#[test]
pub fn test_unpack_unknown_attr_kept() {
    // 0x8022 SOFTWARE, 本库不认识, 应原样保留
    let unknown = RawAttr::new(0x8022, Bytes::copy_from_slice(b"abc"));

    let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, TRANS_ID);
    let packet = Packet::new(header, vec![unknown]);
    let buf = packet.pack();

    // value 3字节 + 1字节padding
    assert_eq!(buf.len(), 28);

    let unpacked = Packet::unpack(buf).unwrap();
    assert_eq!(unpacked.attrs.len(), 1);
    assert_eq!(unpacked.attrs[0].attr_type, 0x8022);
    assert_eq!(unpacked.attrs[0].attr_len, 3);
    assert_eq!(&unpacked.attrs[0].value[..], b"abc");
}

#[test]
pub fn test_xor_mapped_roundtrip() {
    let addr: SocketAddr = "203.0.113.1:54321".parse().unwrap();

    let raw: RawAttr = XorMappedAddress::new(TRANS_ID, addr).into();
    assert_eq!(raw.attr_type, ATTR_XOR_MAPPED_ADDRESS);

    let decoded = XorMappedAddress::from_base_attr(raw, &TRANS_ID).unwrap();
    assert_eq!(decoded.address, addr);
}

#[test]
pub fn test_xor_mapped_roundtrip_v6() {
    let addr: SocketAddr = "[2001:db8::1]:9876".parse().unwrap();

    let raw: RawAttr = XorMappedAddress::new(TRANS_ID, addr).into();
    let decoded = XorMappedAddress::from_base_attr(raw, &TRANS_ID).unwrap();

    assert_eq!(decoded.address, addr);
}

#[test]
pub fn test_errcode_attr_wire_format() {
    let raw: RawAttr = ErrcodeAttr::new(420, "Unknown Attribute").into();

    assert_eq!(raw.attr_type, ATTR_ERROR_CODE);
    assert_eq!(&raw.value[..4], &[0x00, 0x00, 0x04, 0x14]);
    assert_eq!(&raw.value[4..], b"Unknown Attribute");
}

#[test]
pub fn test_extract_error_code() {
    let header = Header::new(MESSAGE_TYPE_BIND_ERR_RES, 0, TRANS_ID);
    let mut packet = Packet::new(header, vec![]);
    packet.add_attr(ErrcodeAttr::new(420, "Unknown Attribute").into());

    let (code, reason) = errcode_attr::extract_error_code(&packet);
    assert_eq!(code, 420);
    assert_eq!(reason, "Unknown Attribute");
}

#[test]
pub fn test_extract_error_code_reserved_bits_ignored() {
    // 头2字节和class高位是保留位, 解码时只看低3位
    let mut value = BytesMut::new();
    value.put_slice(&[0xFF, 0xFF, 0xFC, 0x14]);

    let header = Header::new(MESSAGE_TYPE_BIND_ERR_RES, 0, TRANS_ID);
    let packet = Packet::new(
        header,
        vec![RawAttr::new(ATTR_ERROR_CODE, value.freeze())],
    );

    let (code, reason) = errcode_attr::extract_error_code(&packet);
    assert_eq!(code, 420);
    assert_eq!(reason, "");
}

#[test]
pub fn test_extract_error_code_absent() {
    let header = Header::new(MESSAGE_TYPE_BIND_ERR_RES, 0, TRANS_ID);
    let packet = Packet::new(header, vec![]);

    let (code, reason) = errcode_attr::extract_error_code(&packet);
    assert_eq!(code, 0);
    assert_eq!(reason, "");
}

#[test]
pub fn test_extract_error_code_short_value() {
    let short = RawAttr::new(ATTR_ERROR_CODE, Bytes::copy_from_slice(&[0x00, 0x00]));

    let header = Header::new(MESSAGE_TYPE_BIND_ERR_RES, 0, TRANS_ID);
    let packet = Packet::new(header, vec![short]);

    let (code, reason) = errcode_attr::extract_error_code(&packet);
    assert_eq!(code, 0);
    assert_eq!(reason, "");
}

#[test]
pub fn test_address_attr_short() {
    let raw = RawAttr::new(
        ATTR_MAPPED_ADDRESS,
        Bytes::copy_from_slice(&[0x00, 0x01, 0x30, 0x39, 0xC0, 0x00]),
    );

    let err = AddressAttr::try_from(raw).unwrap_err();
    assert!(matches!(err, ParsePacketErr::ShortAddress(6)));
}

#[test]
pub fn test_address_attr_unknown_family() {
    let raw = RawAttr::new(
        ATTR_MAPPED_ADDRESS,
        Bytes::copy_from_slice(&[0x00, 0x03, 0x30, 0x39, 0xC0, 0x00, 0x02, 0x01]),
    );

    let err = AddressAttr::try_from(raw).unwrap_err();
    assert!(matches!(err, ParsePacketErr::UnsupportedFamily(0x03)));
}

#[test]
pub fn test_address_attr_roundtrip() {
    let addr: SocketAddr = "192.168.8.100:5678".parse().unwrap();

    let raw: RawAttr = AddressAttr::new(ATTR_OTHER_ADDRESS, addr).into();
    assert_eq!(raw.attr_len, 8);

    let decoded = AddressAttr::try_from(raw).unwrap();
    assert_eq!(decoded.attr_type, ATTR_OTHER_ADDRESS);
    assert_eq!(decoded.address, addr);
}

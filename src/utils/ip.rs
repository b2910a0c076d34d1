//! IP 地址处理工具

use std::net::IpAddr;

/// 点分十进制 IPv4 校验
///
/// 每段 1~3 位数字且不超过 255，允许前导零（如 `010`），不接受首尾空白。
pub fn is_valid_ipv4(input: &str) -> bool {
    let mut count = 0;
    for part in input.split('.') {
        count += 1;
        if count > 4
            || part.is_empty()
            || part.len() > 3
            || !part.bytes().all(|b| b.is_ascii_digit())
        {
            return false;
        }
        match part.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return false,
        }
    }
    count == 4
}

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA) 与 fe80::/10 (link-local)
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// 可转发给上游的对端地址
///
/// 私有或本地地址返回 None，由上游自行推断出口地址。
pub fn forwardable_peer_ip(peer: Option<IpAddr>) -> Option<String> {
    peer.filter(|ip| !is_private_or_local(ip))
        .map(|ip| ip.to_string())
}

//! Multiaddr endpoint handling
//!
//! The demo transport is plain TCP; endpoints are still spelled as
//! multiaddrs (`/ip4/127.0.0.1/tcp/9555`) so the surface matches the
//! host environment this protocol plugs into.

use multiaddr::{Multiaddr, Protocol};
use std::net::{IpAddr, SocketAddr};

use crate::error::{ExchangeError, ExchangeResult};

/// Extract a TCP socket address from a multiaddr.
///
/// Accepts `/ip4/../tcp/..` and `/ip6/../tcp/..`; anything else is a
/// schema error (the demo transport does not dial other stacks).
pub fn multiaddr_to_socketaddr(addr: &Multiaddr) -> ExchangeResult<SocketAddr> {
    let mut ip: Option<IpAddr> = None;
    let mut port: Option<u16> = None;

    for protocol in addr.iter() {
        match protocol {
            Protocol::Ip4(v4) => ip = Some(IpAddr::V4(v4)),
            Protocol::Ip6(v6) => ip = Some(IpAddr::V6(v6)),
            Protocol::Tcp(p) => port = Some(p),
            other => {
                return Err(ExchangeError::Schema(format!(
                    "unsupported multiaddr component: {other}"
                )))
            }
        }
    }

    match (ip, port) {
        (Some(ip), Some(port)) => Ok(SocketAddr::new(ip, port)),
        _ => Err(ExchangeError::Schema(format!(
            "multiaddr {addr} lacks ip/tcp components"
        ))),
    }
}

/// Render a socket address as a TCP multiaddr
pub fn socketaddr_to_multiaddr(addr: &SocketAddr) -> Multiaddr {
    let mut out = Multiaddr::empty();
    match addr.ip() {
        IpAddr::V4(v4) => out.push(Protocol::Ip4(v4)),
        IpAddr::V6(v6) => out.push(Protocol::Ip6(v6)),
    }
    out.push(Protocol::Tcp(addr.port()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip4_round_trip() {
        let ma: Multiaddr = "/ip4/127.0.0.1/tcp/9555".parse().unwrap();
        let sa = multiaddr_to_socketaddr(&ma).unwrap();
        assert_eq!(sa.to_string(), "127.0.0.1:9555");
        assert_eq!(socketaddr_to_multiaddr(&sa), ma);
    }

    #[test]
    fn ip6_is_supported() {
        let ma: Multiaddr = "/ip6/::1/tcp/80".parse().unwrap();
        let sa = multiaddr_to_socketaddr(&ma).unwrap();
        assert!(sa.is_ipv6());
    }

    #[test]
    fn missing_tcp_is_rejected() {
        let ma: Multiaddr = "/ip4/10.0.0.1".parse().unwrap();
        assert!(multiaddr_to_socketaddr(&ma).is_err());
    }

    #[test]
    fn unsupported_stack_is_rejected() {
        let ma: Multiaddr = "/ip4/10.0.0.1/udp/53".parse().unwrap();
        assert!(multiaddr_to_socketaddr(&ma).is_err());
    }
}

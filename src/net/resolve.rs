use std::ffi::CString;
use std::io::{Error, ErrorKind, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ptr::null;

/// Resolves `host` to an IP address. Dotted-quad and colon-hex literals are
/// parsed directly; anything else goes through a DNS lookup.
///
/// The lookup uses the system resolver and blocks the calling thread, so it
/// is best done at startup rather than inside hot handler code.
pub fn lookup_host(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    getaddrinfo(host)
}

/// Resolves `host` and pairs it with `port`.
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    Ok(SocketAddr::new(lookup_host(host)?, port))
}

fn getaddrinfo(host: &str) -> Result<IpAddr> {
    let host = CString::new(host)
        .map_err(|_| Error::new(ErrorKind::InvalidInput, "host name contains a nul byte"))?;

    // Safety: addrinfo is a plain struct; zeroed means "no constraints"
    // for every field except the ones set below.
    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_family = libc::AF_UNSPEC;
    hints.ai_socktype = libc::SOCK_STREAM;

    let mut res: *mut libc::addrinfo = std::ptr::null_mut();
    // Safety: host is a valid C string, hints and res are valid pointers.
    let code = unsafe { libc::getaddrinfo(host.as_ptr(), null(), &hints, &mut res) };
    if code != 0 {
        return Err(gai_error(code));
    }

    let mut found = None;
    let mut cursor = res;
    while !cursor.is_null() && found.is_none() {
        // Safety: the resolver returned a valid linked list.
        let info = unsafe { &*cursor };
        match info.ai_family {
            libc::AF_INET => {
                // Safety: ai_addr points at a sockaddr_in for AF_INET.
                let addr = unsafe { &*(info.ai_addr as *const libc::sockaddr_in) };
                found = Some(IpAddr::V4(Ipv4Addr::from(addr.sin_addr.s_addr.to_ne_bytes())));
            }
            libc::AF_INET6 => {
                // Safety: ai_addr points at a sockaddr_in6 for AF_INET6.
                let addr = unsafe { &*(info.ai_addr as *const libc::sockaddr_in6) };
                found = Some(IpAddr::V6(Ipv6Addr::from(addr.sin6_addr.s6_addr)));
            }
            _ => {}
        }
        cursor = info.ai_next;
    }
    // Safety: res came from getaddrinfo and is freed exactly once.
    unsafe { libc::freeaddrinfo(res) };

    found.ok_or_else(|| {
        Error::new(
            ErrorKind::NotFound,
            "the host name did not resolve to any address",
        )
    })
}

fn gai_error(code: i32) -> Error {
    // Safety: gai_strerror returns a pointer to a static message.
    let msg = unsafe { std::ffi::CStr::from_ptr(libc::gai_strerror(code)) };
    Error::new(ErrorKind::Other, msg.to_string_lossy().into_owned())
}

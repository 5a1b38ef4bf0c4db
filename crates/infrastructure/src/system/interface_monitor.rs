use ferrous_named_application::ports::InterfaceMonitor;
use ferrous_named_domain::DomainError;
use std::ffi::CStr;
use std::net::Ipv4Addr;
use tracing::debug;

/// Asks the kernel for the interface's IPv4 address via `getifaddrs(3)`.
///
/// An interface is reported only while `IFF_UP` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaceMonitor;

impl SystemInterfaceMonitor {
    pub fn new() -> Self {
        Self
    }
}

impl InterfaceMonitor for SystemInterfaceMonitor {
    fn interface_address(&self, name: &str) -> Result<Option<Ipv4Addr>, DomainError> {
        let mut ifap: *mut libc::ifaddrs = std::ptr::null_mut();

        if unsafe { libc::getifaddrs(&mut ifap) } != 0 {
            return Err(DomainError::IoError(format!(
                "getifaddrs failed: {}",
                std::io::Error::last_os_error()
            )));
        }

        let mut found = None;
        let mut seen = false;
        // The list stays valid until freeifaddrs.
        let mut cursor = ifap;
        while !cursor.is_null() {
            let ifa = unsafe { &*cursor };
            cursor = ifa.ifa_next;

            if ifa.ifa_name.is_null() || ifa.ifa_addr.is_null() {
                continue;
            }

            let ifa_name = unsafe { CStr::from_ptr(ifa.ifa_name) };
            if ifa_name.to_bytes() != name.as_bytes() {
                continue;
            }
            seen = true;

            let family = unsafe { (*ifa.ifa_addr).sa_family };
            if i32::from(family) != libc::AF_INET {
                continue;
            }
            if ifa.ifa_flags & (libc::IFF_UP as libc::c_uint) == 0 {
                break;
            }

            let sin = unsafe { &*(ifa.ifa_addr as *const libc::sockaddr_in) };
            found = Some(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)));
            break;
        }

        unsafe { libc::freeifaddrs(ifap) };

        if found.is_none() {
            debug!(interface = name, present = seen, "Interface has no usable IPv4 address");
        }
        Ok(found)
    }
}

/// Reports a fixed address for every interface name.
///
/// Stands in for the kernel when the referral interface is known to be up,
/// e.g. on hosts where it does not exist under the configured name.
#[derive(Debug, Clone, Copy)]
pub struct StaticInterfaceMonitor {
    address: Ipv4Addr,
}

impl StaticInterfaceMonitor {
    pub fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }
}

impl InterfaceMonitor for StaticInterfaceMonitor {
    fn interface_address(&self, _name: &str) -> Result<Option<Ipv4Addr>, DomainError> {
        Ok(Some(self.address))
    }
}

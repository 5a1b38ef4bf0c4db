use std::net::Ipv4Addr;

/// Upstream servers kept per group, matching the classic resolver limit.
pub const MAX_SERVERS_PER_GROUP: usize = 3;

/// Upstream resolvers used while the referral interface sits on a given
/// subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerGroup {
    pub if_addr: Ipv4Addr,
    pub if_mask: Ipv4Addr,
    pub servers: Vec<Ipv4Addr>,
}

impl ServerGroup {
    /// Builds a group, keeping at most `MAX_SERVERS_PER_GROUP` servers.
    pub fn new(if_addr: Ipv4Addr, if_mask: Ipv4Addr, mut servers: Vec<Ipv4Addr>) -> Self {
        servers.truncate(MAX_SERVERS_PER_GROUP);
        Self {
            if_addr,
            if_mask,
            servers,
        }
    }

    /// Group that matches every interface address.
    pub fn wildcard(servers: Vec<Ipv4Addr>) -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED, Ipv4Addr::UNSPECIFIED, servers)
    }

    /// `(if_addr & if_mask) == (addr & if_mask)`
    pub fn matches(&self, addr: Ipv4Addr) -> bool {
        let mask = u32::from(self.if_mask);
        u32::from(self.if_addr) & mask == u32::from(addr) & mask
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Server groups in match order.
///
/// Configured groups are consulted newest first, followed by the fallback
/// group built from the system resolver, which matches any address and is
/// therefore always the last candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerGroups {
    groups: Vec<ServerGroup>,
}

impl ServerGroups {
    pub fn new(configured: Vec<ServerGroup>, fallback_servers: Vec<Ipv4Addr>) -> Self {
        let mut groups: Vec<ServerGroup> = configured.into_iter().rev().collect();
        groups.push(ServerGroup::wildcard(fallback_servers));
        Self { groups }
    }

    /// First group whose subnet contains the interface address.
    pub fn select(&self, interface_addr: Ipv4Addr) -> Option<&ServerGroup> {
        self.groups.iter().find(|group| group.matches(interface_addr))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

use crate::errors::{Result, StoreError};

/// A coordination store connect string split into the host list and the chroot.
///
/// `zk1:2181,zk2:2181/kafka` connects to `zk1:2181,zk2:2181` and relocates
/// every path under `/kafka`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAddress {
    pub hosts: String,
    pub chroot: Option<String>,
}

impl StoreAddress {
    pub fn parse(addr: &str) -> Result<Self> {
        let addr = addr.trim();

        let (hosts, chroot) = match addr.find('/') {
            Some(pos) => (&addr[..pos], Some(&addr[pos..])),
            None => (addr, None),
        };

        if hosts.is_empty() {
            return Err(StoreError::InvalidPath(format!(
                "missing host in store address: {}",
                addr
            )));
        }

        // "/" alone or a trailing slash must not produce "//topicmappr"
        let chroot = chroot
            .map(|c| c.trim_end_matches('/'))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(StoreAddress {
            hosts: hosts.to_string(),
            chroot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_without_chroot() {
        let addr = StoreAddress::parse("zookeeper:2181").unwrap();
        assert_eq!(addr.hosts, "zookeeper:2181");
        assert_eq!(addr.chroot, None);
    }

    #[test]
    fn address_with_chroot() {
        let addr = StoreAddress::parse("zk1:2181,zk2:2181/my-chroot").unwrap();
        assert_eq!(addr.hosts, "zk1:2181,zk2:2181");
        assert_eq!(addr.chroot.as_deref(), Some("/my-chroot"));
    }

    #[test]
    fn nested_chroot_is_kept_whole() {
        let addr = StoreAddress::parse("zk:2181/clusters/east/").unwrap();
        assert_eq!(addr.chroot.as_deref(), Some("/clusters/east"));
    }

    #[test]
    fn bare_slash_is_no_chroot() {
        let addr = StoreAddress::parse("zk:2181/").unwrap();
        assert_eq!(addr.hosts, "zk:2181");
        assert_eq!(addr.chroot, None);
    }

    #[test]
    fn missing_host_is_rejected() {
        assert!(matches!(
            StoreAddress::parse("/my-chroot"),
            Err(StoreError::InvalidPath(_))
        ));
        assert!(StoreAddress::parse("").is_err());
    }
}

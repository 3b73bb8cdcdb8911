use crate::{
    acl::{Acl, Permission},
    address::StoreAddress,
    errors::{Result, StoreError},
    store::CoordinationStore,
};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use zookeeper::{CreateMode, KeeperState, WatchedEvent, Watcher, ZkError, ZooKeeper};

/// Logs session state transitions of the ZooKeeper client.
struct SessionLogger;

impl Watcher for SessionLogger {
    fn handle(&self, event: WatchedEvent) {
        match event.keeper_state {
            KeeperState::Disconnected | KeeperState::Expired | KeeperState::AuthFailed => {
                warn!(logger = "zk", state = ?event.keeper_state, "zookeeper session event")
            }
            state => debug!(logger = "zk", state = ?state, path = ?event.path, "zookeeper event"),
        }
    }
}

/// ZooKeeper-backed CoordinationStore.
///
/// The client is connected to the bare host list; chroot prefixes are applied
/// by the caller on every path. Blocking client calls run on tokio's blocking pool.
#[derive(Clone)]
pub struct ZooKeeperStore {
    client: Arc<ZooKeeper>,
}

impl std::fmt::Debug for ZooKeeperStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZooKeeperStore").finish_non_exhaustive()
    }
}

impl ZooKeeperStore {
    pub async fn connect(address: &StoreAddress, session_timeout: Duration) -> Result<Self> {
        let hosts = address.hosts.clone();
        info!(hosts = %hosts, "connecting to zookeeper");

        let client = tokio::task::spawn_blocking(move || {
            ZooKeeper::connect(&hosts, session_timeout, SessionLogger)
        })
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?
        .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        Ok(ZooKeeperStore {
            client: Arc::new(client),
        })
    }

    pub async fn close(&self) -> Result<()> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || client.close())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map_err(|e| map_zk_error(e, ""))
    }

    async fn run<T, F>(&self, path: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ZooKeeper) -> std::result::Result<T, ZkError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map_err(|e| map_zk_error(e, path))
    }
}

fn map_zk_error(err: ZkError, path: &str) -> StoreError {
    match err {
        ZkError::NoNode => StoreError::NoNode(path.to_string()),
        ZkError::NodeExists => StoreError::NodeExists(path.to_string()),
        ZkError::ConnectionLoss | ZkError::SessionExpired | ZkError::OperationTimeout => {
            StoreError::Unavailable(format!("{:?} ({})", err, path))
        }
        other => StoreError::Backend(format!("{:?} ({})", other, path)),
    }
}

/// Each permission bit paired with the client's constant for it.
fn permission_pairs() -> [(Permission, zookeeper::Permission); 5] {
    [
        (Permission::READ, zookeeper::Permission::READ),
        (Permission::WRITE, zookeeper::Permission::WRITE),
        (Permission::CREATE, zookeeper::Permission::CREATE),
        (Permission::DELETE, zookeeper::Permission::DELETE),
        (Permission::ADMIN, zookeeper::Permission::ADMIN),
    ]
}

fn to_zk_acl(acl: &Acl) -> zookeeper::Acl {
    let perms = permission_pairs()
        .into_iter()
        .filter(|(ours, _)| acl.perms.contains(*ours))
        .fold(zookeeper::Permission::NONE, |perms, (_, zk)| perms | zk);

    zookeeper::Acl {
        perms,
        scheme: acl.scheme.clone(),
        id: acl.id.clone(),
    }
}

fn from_zk_acl(acl: zookeeper::Acl) -> Acl {
    let bits = permission_pairs()
        .into_iter()
        .filter(|(_, zk)| acl.perms.can(*zk))
        .fold(0, |bits, (ours, _)| bits | ours.bits());

    Acl {
        perms: Permission::from_bits(bits),
        scheme: acl.scheme,
        id: acl.id,
    }
}

#[async_trait]
impl CoordinationStore for ZooKeeperStore {
    async fn delete(&self, path: &str) -> Result<()> {
        let owned = path.to_string();
        self.run(path, move |zk| zk.delete(&owned, None)).await
    }

    async fn get_acl(&self, path: &str) -> Result<Vec<Acl>> {
        let owned = path.to_string();
        let (acl, _stat) = self.run(path, move |zk| zk.get_acl(&owned)).await?;
        Ok(acl.into_iter().map(from_zk_acl).collect())
    }

    async fn create(&self, path: &str, data: &[u8], acl: &[Acl]) -> Result<()> {
        let owned = path.to_string();
        let data = data.to_vec();
        let acl: Vec<zookeeper::Acl> = acl.iter().map(to_zk_acl).collect();

        self.run(path, move |zk| {
            zk.create(&owned, data, acl, CreateMode::Persistent)
        })
        .await
        .map(|_| ())
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>> {
        let owned = path.to_string();
        let (data, _stat) = self.run(path, move |zk| zk.get_data(&owned, false)).await?;
        Ok(data)
    }
}

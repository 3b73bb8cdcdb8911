pub(crate) mod in_memory;
pub(crate) mod zookeeper;

//! Cell presence: the record a worker node keeps alive while it can take work.

use bbs_format::{ModelError, Validation, Versioner};

#[derive(Clone, PartialEq, prost::Message)]
pub struct CellCapacity {
    #[prost(int32, tag = "1")]
    pub memory_mb: i32,
    #[prost(int32, tag = "2")]
    pub disk_mb: i32,
    #[prost(int32, tag = "3")]
    pub containers: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Provider {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub properties: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CellPresence {
    #[prost(string, tag = "1")]
    pub cell_id: String,
    #[prost(string, tag = "2")]
    pub rep_address: String,
    #[prost(string, tag = "3")]
    pub zone: String,
    #[prost(message, optional, tag = "4")]
    pub capacity: Option<CellCapacity>,
    #[prost(message, repeated, tag = "5")]
    pub rootfs_providers: Vec<Provider>,
    #[prost(string, repeated, tag = "6")]
    pub placement_tags: Vec<String>,
    #[prost(string, repeated, tag = "7")]
    pub optional_placement_tags: Vec<String>,
    #[prost(string, tag = "8")]
    pub rep_url: String,
}

impl CellPresence {
    pub fn new(
        cell_id: &str,
        rep_address: &str,
        rep_url: &str,
        zone: &str,
        capacity: CellCapacity,
    ) -> Self {
        Self {
            cell_id: cell_id.to_string(),
            rep_address: rep_address.to_string(),
            rep_url: rep_url.to_string(),
            zone: zone.to_string(),
            capacity: Some(capacity),
            ..Default::default()
        }
    }
}

impl Versioner for CellPresence {
    fn validate(&self) -> Result<(), ModelError> {
        let mut validation = Validation::new();
        validation
            .check(!self.cell_id.is_empty(), "cell_id", "must be present")
            .check(!self.rep_address.is_empty(), "rep_address", "must be present");

        match &self.capacity {
            None => {
                validation.check(false, "capacity", "must be present");
            }
            Some(capacity) => {
                validation
                    .check(capacity.memory_mb > 0, "capacity.memory_mb", "must be positive")
                    .check(capacity.disk_mb >= 0, "capacity.disk_mb", "must not be negative")
                    .check(capacity.containers > 0, "capacity.containers", "must be positive");
            }
        }

        for provider in &self.rootfs_providers {
            validation.check(
                !provider.name.is_empty(),
                "rootfs_providers",
                "provider name must be present",
            );
        }
        validation.finish()
    }
}

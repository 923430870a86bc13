/// Meta keys used in the meta database
pub mod meta_keys {
    pub const SCHEMA_VERSION: &str = "schema_version";
    pub const CURSOR: &str = "cursor";
}

/// Current on-disk layout version
pub const SCHEMA_VERSION: u32 = 1;

// Stable error codes attached to log events and CLI output

pub mod validation {
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const OUT_OF_RANGE: &str = "VALIDATION_1004";
    pub const MALFORMED_PAYLOAD: &str = "VALIDATION_1005";
}

pub mod model {
    pub const NOT_TRAINED: &str = "RNA_5001";
    pub const STATUS_STORE_FAILED: &str = "RNA_5002";
}

pub mod upstream {
    pub const UNREACHABLE: &str = "UPSTREAM_6001";
    pub const FAILED_STATUS: &str = "UPSTREAM_6002";
    pub const UNDECODABLE_REPLY: &str = "UPSTREAM_6003";
}

pub mod transport {
    pub const PROXY_UNREACHABLE: &str = "TRANSPORT_7001";
}

pub mod system {
    pub const INTERNAL: &str = "SYS_9000";
    pub const CONFIGURATION: &str = "SYS_9001";
    pub const BIND_FAILED: &str = "SYS_9002";
}

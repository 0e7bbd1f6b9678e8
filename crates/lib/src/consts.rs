/// Application name, used for data directories and environment variables.
pub const APP_NAME: &str = "pkisync";

/// Environment variable overriding the local device state file.
pub const DEVICE_ENV: &str = "PKISYNC_DEVICE";

/// File name of the local device state within the data directory.
pub const DEVICE_FILENAME: &str = "device.json";

/// Root of the openconfig PKI resource tree.
pub const DEFAULT_PATH_ROOT: &str = "data/openconfig-pki:pki";

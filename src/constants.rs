//! Constants and fixed host conventions used by debsvc.
//!
//! The legacy exit statuses and the start-link threshold below are platform policy
//! (`invoke-rc.d(8)` and the Debian policy manual). They are not tunables.

// ============================================================================
// Legacy Query Contract
// ============================================================================

/// `invoke-rc.d --query` status: the action would run, the service is enabled.
pub const INVOKE_RC_QUERY_ENABLED: i32 = 104;

/// `invoke-rc.d --query` status: the script cannot answer the query.
pub const INVOKE_RC_QUERY_UNKNOWN: i32 = 105;

/// `invoke-rc.d --query` status: the policy layer supplied a fallback action.
pub const INVOKE_RC_QUERY_FALLBACK: i32 = 106;

/// Minimum number of `S??<name>` links across the run-level directories for a
/// script that cannot answer the query to count as enabled. Matches the four
/// default multi-user run levels (2, 3, 4, 5).
pub const START_LINK_THRESHOLD: usize = 4;

/// Prefix of start links inside a run-level directory (`S` + two-digit sequence).
pub const START_LINK_PREFIX: &str = "S??";

// ============================================================================
// Unit Manager
// ============================================================================

/// Runtime directory whose presence means systemd is the running init.
pub const DEFAULT_UNIT_RUNTIME_DIR: &str = "/run/systemd/system";

/// Unit type enumerated by the inventory.
pub const DEFAULT_UNIT_TYPE: &str = "service";

/// Property reported by `systemctl show` for generator-produced units.
pub const SOURCE_PATH_PROPERTY: &str = "SourcePath";

/// Character systemd reserves for template instances.
pub const INSTANCE_SEPARATOR: char = '@';

// ============================================================================
// Legacy Layout
// ============================================================================

/// Directory holding legacy init scripts.
pub const DEFAULT_INIT_SCRIPT_DIR: &str = "/etc/init.d";

/// Glob matching every run-level directory.
pub const DEFAULT_RC_DIRS: &str = "/etc/rc*.d";

/// Upstart compatibility wrapper; scripts linked to it are not real init scripts.
pub const UPSTART_JOB_WRAPPER: &str = "/lib/init/upstart-job";

/// Entries of the init script directory that are helpers, not services, or that
/// need parameters no caller can supply.
pub const DEFAULT_SCRIPT_EXCLUDES: &[&str] = &[
    "functions.sh",
    "reboot.sh",
    "shutdown.sh",
    "functions",
    "halt",
    "killall",
    "single",
    "linuxconf",
    "reboot",
    "boot",
    "wait-for-state",
    "portmap-wait",
    "rcS",
    "module-init-tools",
    "plymouth-ready",
    "idmapd-mounting",
    "startpar-bridge",
];

// ============================================================================
// Commands
// ============================================================================

/// Default location of the systemd control CLI.
pub const DEFAULT_SYSTEMCTL_PATH: &str = "/bin/systemctl";

/// Default location of the legacy enable/disable front end.
pub const DEFAULT_UPDATE_RC_PATH: &str = "/usr/sbin/update-rc.d";

/// Default location of the legacy policy-aware query front end.
pub const DEFAULT_INVOKE_RC_PATH: &str = "/usr/sbin/invoke-rc.d";

/// Default location of the generic service front end.
pub const DEFAULT_SERVICE_PATH: &str = "/usr/sbin/service";

// ============================================================================
// Configuration
// ============================================================================

/// Config schema version understood by this build.
pub const CONFIG_VERSION: &str = "1";

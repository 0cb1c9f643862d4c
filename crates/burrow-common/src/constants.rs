//! System-wide constants and default paths.

use std::ffi::CStr;

/// Default directory used as the isolated root filesystem.
pub const DEFAULT_ROOTFS_DIR: &str = "/var/lib/burrow/rootfs";

/// Environment variable overriding the root filesystem directory.
pub const ROOTFS_ENV: &str = "BURROW_ROOTFS";

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "BURROW_CONFIG";

/// Path through which the running binary re-executes itself.
pub const SELF_EXE: &CStr = c"/proc/self/exe";

/// Marker subcommand selecting the isolated init phase.
pub const INIT_SUBCOMMAND: &str = "child";

/// Mount point of the process-information filesystem inside the new root.
pub const PROC_MOUNT_POINT: &str = "/proc";

/// Host proc directory holding per-process id map files.
pub const HOST_PROC_DIR: &str = "/proc";

/// Stack size handed to `clone(2)` for the pre-exec child.
pub const CLONE_STACK_SIZE: usize = 1024 * 1024;

/// Maximum hostname length accepted by `sethostname(2)`.
pub const MAX_HOSTNAME_LEN: usize = 64;

/// Exit status reported when the target command cannot be found.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Exit status reported when the target command cannot be executed.
pub const EXIT_COMMAND_NOT_EXECUTABLE: i32 = 126;

/// Exit status of the pre-exec child when the re-exec could not start.
pub const EXIT_REEXEC_FAILED: i32 = 125;

/// Base added to a signal number to form an exit status.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "burrow";

/// Permission model for generated files.
///
/// A capability model rather than Unix bits: the filesystem adapter maps it
/// onto whatever the host supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    writable: bool,
    executable: bool,
}

impl Permissions {
    /// Generated sources and templates (`0644`).
    pub const fn read_write() -> Self {
        Self {
            writable: true,
            executable: false,
        }
    }

    /// Files the user should not edit by hand (`0444`).
    pub const fn read_only() -> Self {
        Self {
            writable: false,
            executable: false,
        }
    }

    /// Scripts (`0755`).
    pub const fn executable() -> Self {
        Self {
            writable: true,
            executable: true,
        }
    }

    pub const fn writable(&self) -> bool {
        self.writable
    }

    pub const fn executable_flag(&self) -> bool {
        self.executable
    }

    /// Equivalent Unix mode bits.
    pub const fn unix_mode(&self) -> u32 {
        match (self.writable, self.executable) {
            (true, true) => 0o755,
            (false, true) => 0o555,
            (true, false) => 0o644,
            (false, false) => 0o444,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

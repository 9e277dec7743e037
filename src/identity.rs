//! Host identity lookups (user database, group database, process environment).
//!
//! Extensions never call the OS directly; they go through an [`IdentityProvider`]
//! so tests can substitute a stub.

use crate::error::{ExtensionError, Result};
use std::ffi::{CStr, CString};
use std::io;
use std::os::raw::c_char;
use std::path::PathBuf;

/// One entry of the password database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub gecos: String,
    pub dir: String,
    pub shell: String,
}

pub trait IdentityProvider: Send + Sync {
    /// Real user id of the current process
    fn uid(&self) -> u32;

    /// Login name of the invoking user
    fn username(&self) -> Result<String>;

    /// Password database entry for the current uid
    fn current_user(&self) -> Result<UserEntry>;

    /// Numeric id of the named group
    fn group_id(&self, group: &str) -> Result<u32>;

    fn env_var(&self, name: &str) -> Option<String>;

    fn home_dir(&self) -> Result<PathBuf>;
}

/// Variables consulted, in order, before falling back to the password database
const LOGIN_NAME_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

const FALLBACK_BUFFER_SIZE: usize = 1024;

/// Reads identity information from the running host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdentity;

impl SystemIdentity {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityProvider for SystemIdentity {
    fn uid(&self) -> u32 {
        // SAFETY: getuid has no preconditions and cannot fail
        unsafe { libc::getuid() }
    }

    fn username(&self) -> Result<String> {
        for var in LOGIN_NAME_VARS {
            if let Some(name) = self.env_var(var).filter(|v| !v.is_empty()) {
                return Ok(name);
            }
        }
        Ok(self.current_user()?.name)
    }

    fn current_user(&self) -> Result<UserEntry> {
        let uid = self.uid();
        let mut buf: Vec<c_char> = vec![0; initial_buffer_size(libc::_SC_GETPW_R_SIZE_MAX)];
        // SAFETY: passwd is a plain C struct; all-zero is a valid (empty) value
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::passwd = std::ptr::null_mut();

        loop {
            // SAFETY: every pointer refers to live, correctly sized storage owned by this frame
            let rc = unsafe {
                libc::getpwuid_r(uid, &mut pwd, buf.as_mut_ptr(), buf.len(), &mut found)
            };
            match rc {
                0 => break,
                libc::ERANGE => {
                    let grown = buf.len() * 2;
                    buf.resize(grown, 0);
                }
                // Some libcs report "no such entry" through errno instead of a null result
                libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM => {
                    found = std::ptr::null_mut();
                    break;
                }
                errno => {
                    return Err(ExtensionError::Lookup {
                        entity: format!("uid {}", uid),
                        source: io::Error::from_raw_os_error(errno),
                    })
                }
            }
        }

        if found.is_null() {
            return Err(ExtensionError::MissingUser { uid });
        }

        // SAFETY: on success the string fields point into `buf`, which is still alive
        unsafe {
            Ok(UserEntry {
                name: c_string(pwd.pw_name),
                uid: pwd.pw_uid,
                gid: pwd.pw_gid,
                gecos: c_string(pwd.pw_gecos),
                dir: c_string(pwd.pw_dir),
                shell: c_string(pwd.pw_shell),
            })
        }
    }

    fn group_id(&self, group: &str) -> Result<u32> {
        let c_name = CString::new(group).map_err(|_| ExtensionError::MissingGroup {
            group: group.to_string(),
        })?;
        let mut buf: Vec<c_char> = vec![0; initial_buffer_size(libc::_SC_GETGR_R_SIZE_MAX)];
        // SAFETY: group is a plain C struct; all-zero is a valid (empty) value
        let mut grp: libc::group = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::group = std::ptr::null_mut();

        loop {
            // SAFETY: every pointer refers to live, correctly sized storage owned by this frame
            let rc = unsafe {
                libc::getgrnam_r(
                    c_name.as_ptr(),
                    &mut grp,
                    buf.as_mut_ptr(),
                    buf.len(),
                    &mut found,
                )
            };
            match rc {
                0 => break,
                libc::ERANGE => {
                    let grown = buf.len() * 2;
                    buf.resize(grown, 0);
                }
                // Some libcs report "no such entry" through errno instead of a null result
                libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM => {
                    found = std::ptr::null_mut();
                    break;
                }
                errno => {
                    return Err(ExtensionError::Lookup {
                        entity: format!("group {}", group),
                        source: io::Error::from_raw_os_error(errno),
                    })
                }
            }
        }

        if found.is_null() {
            return Err(ExtensionError::MissingGroup {
                group: group.to_string(),
            });
        }
        Ok(grp.gr_gid)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().ok_or(ExtensionError::MissingHome)
    }
}

fn initial_buffer_size(name: libc::c_int) -> usize {
    // SAFETY: sysconf only reads a configuration value
    let size = unsafe { libc::sysconf(name) };
    if size > 0 {
        size as usize
    } else {
        FALLBACK_BUFFER_SIZE
    }
}

/// # Safety
/// `ptr` must be null or point at a NUL-terminated string.
unsafe fn c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

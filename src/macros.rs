/**
 A helper macro to access the fields of a `libc::dirent`/`libc::dirent64`
 ("dirent-type") struct without caring which platform we are on.

 # Safety
 - The caller must ensure that the pointer is valid and points to a dirent-type struct.
 - Must be expanded inside an `unsafe` context.

 # Field Aliases
 - `d_type` expands to `libc::DT_UNKNOWN` when the build script found no
   `d_type` field in `struct dirent` (the caller then falls back to lstat).
 - `d_name` yields a pointer, never a value, the array is not guaranteed to be
   256 bytes long.
*/
macro_rules! access_dirent {
    ($entry_ptr:expr, d_name) => {{
        //see reference https://github.com/rust-lang/rust/blob/8712e4567551a2714efa66dac204ec7137bc5605/library/std/src/sys/fs/unix.rs#L740
        (&raw const (*$entry_ptr).d_name).cast::<u8>()
    }};

    ($entry_ptr:expr, d_type) => {{
        #[cfg(has_d_type)]
        {
            (*$entry_ptr).d_type
        }
        #[cfg(not(has_d_type))]
        {
            let _ = $entry_ptr;
            libc::DT_UNKNOWN
        }
    }};
}

///A macro to access stat entries in a filesystem independent way
macro_rules! access_stat {
    ($stat_struct:expr, st_atime_nsec) => {{
        #[cfg(target_os = "netbsd")]
        {
            $stat_struct.st_atimensec as i64
        }
        #[cfg(not(target_os = "netbsd"))]
        {
            $stat_struct.st_atime_nsec as i64
        }
    }};

    ($stat_struct:expr, st_mtime_nsec) => {{
        #[cfg(target_os = "netbsd")]
        {
            $stat_struct.st_mtimensec as i64
        }
        #[cfg(not(target_os = "netbsd"))]
        {
            $stat_struct.st_mtime_nsec as i64
        }
    }};

    ($stat_struct:expr, st_ctime_nsec) => {{
        #[cfg(target_os = "netbsd")]
        {
            $stat_struct.st_ctimensec as i64
        }
        #[cfg(not(target_os = "netbsd"))]
        {
            $stat_struct.st_ctime_nsec as i64
        }
    }};

    ($stat_struct:expr, $field:ident) => {{ $stat_struct.$field as _ }};
}

/// Macro for calling stat-like functions on a NUL-terminated path pointer
macro_rules! stat_syscall {
    ($syscall:ident, $path_ptr:expr) => {{
        let mut stat_buf = core::mem::MaybeUninit::<libc::stat>::uninit();
        // SAFETY: the path pointer comes from a live `CString`
        let res = unsafe { libc::$syscall($path_ptr, stat_buf.as_mut_ptr()) };

        if res == 0 {
            // SAFETY: If the return code is 0, we know it's been initialised properly
            Ok(unsafe { stat_buf.assume_init() })
        } else {
            Err(std::io::Error::last_os_error())
        }
    }};
}

/**
 Skips the "." and ".." entries every directory stream starts with.

 "." and ".." are always directories (or unknown on unusual filesystems), so
 when `d_type` is available we only look at the name for those entries,
 which is roughly one in ten.
 The name bytes are read lazily so we never look past the terminating NUL.
*/
macro_rules! skip_dot_or_dot_dot_entries {
    ($entry:expr, $action:expr) => {{
        #[allow(unused_unsafe)]
        /*
        SAFETY: when calling this macro, the pointer has already been ensured to be non-null
        and to point at a dirent returned by readdir
        */
        unsafe {
            match access_dirent!($entry, d_type) {
                libc::DT_DIR | libc::DT_UNKNOWN => {
                    let name_ptr: *const u8 = access_dirent!($entry, d_name);
                    if *name_ptr == b'.' {
                        match *name_ptr.add(1) {
                            0 => $action,
                            b'.' if *name_ptr.add(2) == 0 => $action,
                            _ => (),
                        }
                    }
                }
                _ => (),
            }
        };
    }};
}

/// Extremely simple macro for getting rid of boiler plates
macro_rules! return_os_error {
    () => {{
        return Err(std::io::Error::last_os_error());
    }};
}

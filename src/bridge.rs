//! One-shot virtual-serial-port bridge backed by the vendor VSP kit.
//!
//! The vendor ships a native library that pairs two virtual COM ports so
//! everything written to one appears on the other. We only need a single
//! call at setup time; without the library (or off Windows) bridging is
//! reported as unavailable and the app still works against real ports.

use anyhow::{anyhow, Result};

#[cfg(windows)]
mod vendor {
    use super::*;
    use anyhow::Context;
    use libloading::Library;
    use once_cell::sync::OnceCell;
    use std::os::raw::c_int;

    pub struct VspApi {
        #[allow(dead_code)]
        lib: Library,
        create_bridge: unsafe extern "C" fn(c_int, c_int) -> c_int,
    }

    impl VspApi {
        fn load() -> Result<Self> {
            // hhdvspkit.dll must be installed alongside the VSP driver.
            let lib = unsafe { Library::new("hhdvspkit.dll") }
                .context("hhdvspkit.dll not found; is the VSP kit installed?")?;
            unsafe {
                Ok(Self {
                    create_bridge: *lib.get(b"vsp_create_bridge\0")?,
                    lib,
                })
            }
        }

        pub fn instance() -> Result<&'static VspApi> {
            static API: OnceCell<VspApi> = OnceCell::new();
            API.get_or_try_init(Self::load)
        }

        pub fn create_bridge(&self, com_a: u8, com_b: u8) -> Result<()> {
            let code = unsafe { (self.create_bridge)(com_a as c_int, com_b as c_int) };
            if code == 0 {
                Ok(())
            } else {
                Err(anyhow!("vsp_create_bridge failed (code {code})"))
            }
        }
    }
}

/// Pairs COM`a` and COM`b` so they loop back into each other.
#[cfg(windows)]
pub fn create_local_bridge(com_a: u8, com_b: u8) -> Result<()> {
    vendor::VspApi::instance()?.create_bridge(com_a, com_b)
}

#[cfg(not(windows))]
pub fn create_local_bridge(_com_a: u8, _com_b: u8) -> Result<()> {
    Err(anyhow!(
        "virtual port bridging requires the Windows VSP kit; use socat or a null-modem cable instead"
    ))
}

//! Thin objc2 bridge shared by the adapter modules.
//!
//! Only the handful of runtime helpers the adapter needs: a dynamic object
//! pointer type, class lookup and NSString construction.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

use std::ffi::CString;

pub use block2::RcBlock;
pub use objc2::msg_send;
pub use objc2::rc::Retained;
pub use objc2::runtime::{AnyClass, AnyObject};
pub use objc2_foundation::NSString;

use crate::error::{FilterPaneError, Result};

/// Objective-C object pointer for dynamically typed receivers.
pub type id = *mut AnyObject;

/// Null object pointer.
pub const nil: id = std::ptr::null_mut();

/// Look up a class by name.
pub fn get_class(name: &str) -> Result<&'static AnyClass> {
    let c_name = CString::new(name)
        .map_err(|_| FilterPaneError::Platform(format!("invalid class name '{name}'")))?;
    AnyClass::get(&c_name)
        .ok_or_else(|| FilterPaneError::Platform(format!("class '{name}' not found")))
}

#[inline]
pub fn nsstring(s: &str) -> Retained<NSString> {
    NSString::from_str(s)
}

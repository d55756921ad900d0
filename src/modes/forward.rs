//! The forward-mode transform
//!
//! A forward-mode derivative keeps the calling shape of the source callable:
//! same parameters, same return type, same qualifiers. One derivative
//! component is produced per call.

use crate::types::CallableSignature;

pub fn derive(sig: &CallableSignature) -> CallableSignature {
    sig.clone()
}

//! The Hessian/Jacobian transform
//!
//! Both modes hand their full result back through a single trailing output
//! slot sized for the return type, so they share one transform. It must not
//! be used for forward- or reverse-mode derivatives.

use syn::ReturnType;

use super::shadow_type;
use crate::types::CallableSignature;

pub fn derive(sig: &CallableSignature) -> CallableSignature {
    let ret = match &sig.output {
        ReturnType::Type(_, ty) => ty.as_ref().clone(),
        ReturnType::Default => {
            panic!("hessian/jacobian requests need a value-returning source callable")
        }
    };
    let mut derived = sig.clone();
    derived.inputs.push(shadow_type(&ret));
    derived.output = ReturnType::Default;
    derived
}

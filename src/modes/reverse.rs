//! The reverse-mode (gradient) transform

use syn::ReturnType;

use super::shadow_type;
use crate::types::CallableSignature;

/// Derive the signature a generated gradient must have.
///
/// The original parameters stay first, in their original order. Behind them,
/// one output slot per parameter is appended, in the same order as the inputs
/// they shadow. The gradient writes all partials through those slots, so the
/// return type collapses to `()`. The receiver and every qualifier carry over
/// untouched.
pub fn derive(sig: &CallableSignature) -> CallableSignature {
    let mut derived = sig.clone();
    let shadows: Vec<syn::Type> = sig.inputs.iter().map(shadow_type).collect();
    derived.inputs.extend(shadows);
    derived.output = ReturnType::Default;
    derived
}

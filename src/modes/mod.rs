//! The signature transforms for the AD modes which we support
pub mod extract;
#[doc(hidden)]
pub mod forward;
pub mod reverse;

#[doc(hidden)]
pub use forward as FwdMode;
#[doc(hidden)]
pub use reverse as RevMode;

use syn::{Type, TypePtr};

/// Build the output slot injected for a value of type `ty`.
///
/// The slot is a mutable pointer so the generated derivative can accumulate
/// into it.
#[doc(hidden)]
pub(crate) fn shadow_type(ty: &Type) -> Type {
    Type::Ptr(TypePtr {
        star_token: Default::default(),
        const_token: None,
        mutability: Some(Default::default()),
        elem: Box::new(ty.clone()),
    })
}

use diffrt::{helper, CallableSignature, Mode, ParamKind, QualifierSet, RefQual, SignatureError};
use quote::quote;
use syn::{ReturnType, Type};

fn ty(s: &str) -> Type {
    syn::parse_str(s).unwrap()
}

fn source_sig() -> CallableSignature {
    CallableSignature::parse_str("fn(f64, f64) -> f64").unwrap()
}

/// One signature per point of the qualifier space, free and member.
fn all_shapes() -> Vec<CallableSignature> {
    let mut shapes = Vec::new();
    for quals in QualifierSet::enumerate() {
        shapes.push(source_sig().with_quals(quals));
        shapes.push(
            source_sig()
                .with_quals(quals)
                .with_receiver(ty("SimpleFunctions")),
        );
    }
    shapes
}

#[test]
fn qualifier_space_is_complete() {
    let combos = QualifierSet::enumerate();
    assert_eq!(combos.len(), 48);
    // spot-check the corners
    assert!(combos.contains(&QualifierSet::default()));
    assert!(combos.contains(&QualifierSet {
        is_const: true,
        is_volatile: true,
        ref_qual: RefQual::RValue,
        is_variadic: true,
        may_throw: true,
    }));
}

#[test]
fn gradient_transform_preserves_every_qualifier_combination() {
    for sig in all_shapes() {
        let grad = Mode::Gradient.derive(&sig);
        assert_eq!(grad.param_count(), 2 * sig.param_count());
        assert_eq!(&grad.inputs[..2], &sig.inputs[..]);
        assert_eq!(grad.inputs[2], ty("*mut f64"));
        assert_eq!(grad.inputs[3], ty("*mut f64"));
        assert_eq!(grad.output, ReturnType::Default);
        assert_eq!(grad.quals, sig.quals);
        assert_eq!(grad.receiver, sig.receiver);
    }
}

#[test]
fn extract_transform_appends_one_result_slot() {
    for sig in all_shapes() {
        let hess = Mode::Hessian.derive(&sig);
        assert_eq!(hess.param_count(), sig.param_count() + 1);
        assert_eq!(&hess.inputs[..2], &sig.inputs[..]);
        assert_eq!(hess.inputs[2], ty("*mut f64"));
        assert_eq!(hess.output, ReturnType::Default);
        assert_eq!(hess.quals, sig.quals);
        assert_eq!(hess.receiver, sig.receiver);
        // Jacobian requests share the transform.
        assert_eq!(Mode::Jacobian.derive(&sig), hess);
    }
}

#[test]
fn forward_transform_keeps_the_calling_shape() {
    for sig in all_shapes() {
        assert_eq!(Mode::Forward.derive(&sig), sig);
    }
}

#[test]
#[should_panic(expected = "value-returning")]
fn extract_transform_rejects_void_sources() {
    let sig = CallableSignature::parse_str("fn(f64)").unwrap();
    Mode::Hessian.derive(&sig);
}

#[test]
fn return_type_projects_uniformly() {
    let free = source_sig();
    let member = source_sig().with_receiver(ty("SimpleFunctions"));
    for sig in [free, member] {
        match sig.return_type() {
            ReturnType::Type(_, t) => assert_eq!(**t, ty("f64")),
            ReturnType::Default => panic!("expected a value-returning signature"),
        }
    }
}

#[test]
fn drop_trailing_yields_prefixes() {
    let grad = Mode::Gradient.derive(&source_sig());
    assert_eq!(grad.drop_trailing(0), grad);
    let two = grad.drop_trailing(2);
    assert_eq!(two.inputs, grad.inputs[..2]);
    assert_eq!(two.quals, grad.quals);
    assert!(grad.drop_trailing(4).inputs.is_empty());
}

#[test]
#[should_panic(expected = "cannot drop")]
fn drop_trailing_rejects_overlong_suffixes() {
    source_sig().drop_trailing(3);
}

#[test]
fn parameter_kinds_classify_pointers_and_scalars() {
    assert_eq!(CallableSignature::param_kind(&ty("f64")), ParamKind::Scalar);
    assert_eq!(CallableSignature::param_kind(&ty("u32")), ParamKind::Scalar);
    assert_eq!(
        CallableSignature::param_kind(&ty("*mut f64")),
        ParamKind::Pointer
    );
    assert_eq!(
        CallableSignature::param_kind(&ty("&mut f64")),
        ParamKind::Pointer
    );
}

#[test]
fn bare_fn_parsing_handles_variadics() {
    let sig = CallableSignature::parse_str("fn(f64, ...) -> f64").unwrap();
    assert!(sig.quals.is_variadic);
    assert_eq!(sig.param_count(), 1);
    assert!(!sig.is_member());
}

#[test]
fn non_function_types_are_rejected() {
    match CallableSignature::parse_str("f64") {
        Err(SignatureError::NotAFunction(_)) => {}
        other => panic!("expected NotAFunction, got {:?}", other.map(|_| ())),
    }
    assert!(CallableSignature::parse_str("fn(").is_err());
}

#[test]
fn mode_markers_match_the_request_tags() {
    assert_eq!(Mode::Forward.marker(), "D");
    assert_eq!(Mode::Gradient.marker(), "G");
    assert_eq!(Mode::Hessian.marker(), "H");
    assert_eq!(Mode::Jacobian.marker(), "J");
}

#[test]
fn modes_parse_from_names_and_markers() {
    assert_eq!(syn::parse_str::<Mode>("Gradient").unwrap(), Mode::Gradient);
    assert_eq!(syn::parse_str::<Mode>("G").unwrap(), Mode::Gradient);
    assert_eq!(syn::parse_str::<Mode>("J").unwrap(), Mode::Jacobian);
    assert!(syn::parse_str::<Mode>("Curl").is_err());
}

#[test]
fn declaration_renders_the_gradient_shape() {
    let grad = Mode::Gradient.derive(&source_sig());
    let decl = helper::declaration(&grad, "f_grad");
    let expected = quote! { fn f_grad(x0: f64, x1: f64, x2: *mut f64, x3: *mut f64); };
    assert_eq!(decl, expected.to_string());
}

#[test]
fn declaration_renders_members_with_an_explicit_receiver() {
    let sig = source_sig().with_receiver(ty("SimpleFunctions"));
    let decl = helper::declaration(&Mode::Hessian.derive(&sig), "f_hess");
    let expected =
        quote! { fn f_hess(this: &mut SimpleFunctions, x0: f64, x1: f64, x2: *mut f64); };
    assert_eq!(decl, expected.to_string());

    let const_sig = sig.with_quals(QualifierSet {
        is_const: true,
        ..QualifierSet::default()
    });
    let decl = helper::declaration(&const_sig, "f");
    let expected = quote! { fn f(this: &SimpleFunctions, x0: f64, x1: f64) -> f64; };
    assert_eq!(decl, expected.to_string());
}

#[test]
fn declaration_renders_variadics() {
    let sig = CallableSignature::parse_str("fn(f64, ...) -> f64").unwrap();
    let decl = helper::declaration(&sig, "v");
    let expected = quote! { fn v(x0: f64, ...) -> f64; };
    assert_eq!(decl, expected.to_string());
}

//! Annotation-driven classification of declarations.

use inject_common::Options;
use inject_model::annotations::{self, javax};
use inject_model::{AstAnnotated, AstAnnotation, AstClass, AstMethod, AstType, MethodKind};

/// The scope annotation on `element`, if any. Legacy scopes win when they
/// are enabled and present.
pub fn scope_type<A: AstAnnotated + ?Sized>(element: &A, options: &Options) -> Option<AstType> {
    if options.enable_javax_annotations {
        if let Some(annotation) = element.annotation_annotated_with(javax::SCOPE) {
            return Some(annotation.ty);
        }
    }
    element
        .annotation_annotated_with(annotations::SCOPE)
        .map(|a| a.ty)
}

/// The qualifier on `element`, if any.
pub fn qualifier<A: AstAnnotated + ?Sized>(element: &A, options: &Options) -> Option<AstAnnotation> {
    if let Some(annotation) = element.annotation_annotated_with(annotations::QUALIFIER) {
        return Some(annotation);
    }
    if options.enable_javax_annotations {
        return element.annotation_annotated_with(javax::QUALIFIER);
    }
    None
}

pub fn is_component<A: AstAnnotated + ?Sized>(element: &A) -> bool {
    element.has_annotation(annotations::COMPONENT)
}

pub fn is_provides(method: &dyn AstMethod) -> bool {
    method.has_annotation(annotations::PROVIDES)
}

pub fn is_into_set(method: &dyn AstMethod) -> bool {
    method.has_annotation(annotations::INTO_SET)
}

pub fn is_into_map(method: &dyn AstMethod) -> bool {
    method.has_annotation(annotations::INTO_MAP)
}

/// Whether `class` can be created through its primary constructor.
pub fn is_inject_class(class: &dyn AstClass, options: &Options) -> bool {
    if class.has_annotation(annotations::INJECT) {
        return true;
    }
    let Some(constructor) = class.primary_constructor() else {
        return false;
    };
    if constructor.has_annotation(annotations::INJECT) {
        return true;
    }
    options.enable_javax_annotations && constructor.has_annotation(javax::INJECT)
}

pub fn is_inject_function(function: &dyn AstMethod) -> bool {
    function.has_annotation(annotations::INJECT)
}

/// An abstract member the generated component has to implement: a property
/// or a function without parameters, no receiver, returning something.
pub fn is_provider(method: &dyn AstMethod) -> bool {
    !is_provides(method)
        && method.is_abstract()
        && match method.kind() {
            MethodKind::Function => method.parameters().is_empty(),
            MethodKind::Property => true,
        }
        && method.receiver_parameter_type().is_none()
        && !method.return_type().is_unit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inject_model::memory::{ClassDecl, ConstructorDecl, MemberDecl, ModelFile, ParamDecl};
    use inject_model::{MemoryModel, TypeModel};

    fn model() -> MemoryModel {
        MemoryModel::new(
            ModelFile::new()
                .annotation("com.example.Singleton", &[annotations::SCOPE])
                .annotation("com.example.Legacy", &[javax::SCOPE])
                .annotation("com.example.Named", &[annotations::QUALIFIER])
                .annotation("com.example.Old", &[javax::QUALIFIER])
                .class(
                    ClassDecl::new("com.example", "Native")
                        .annotated(annotations::INJECT)
                        .annotated("com.example.Singleton")
                        .constructor(ConstructorDecl::new()),
                )
                .class(
                    ClassDecl::new("com.example", "Legacy")
                        .annotated("com.example.Legacy")
                        .annotated("com.example.Old")
                        .constructor(ConstructorDecl::new().annotated(javax::INJECT)),
                )
                .class(
                    ClassDecl::new("com.example", "Shapes")
                        .abstract_class()
                        .member(MemberDecl::val("foo", "com.example.Foo").abstract_member())
                        .member(MemberDecl::fun("bar", "com.example.Bar").abstract_member())
                        .member(
                            MemberDecl::fun("withArg", "com.example.Bar")
                                .param(ParamDecl::new("name", "kotlin.String"))
                                .abstract_member(),
                        )
                        .member(MemberDecl::fun("unit", "kotlin.Unit").abstract_member())
                        .member(MemberDecl::fun("concrete", "com.example.Bar"))
                        .member(
                            MemberDecl::fun("ext", "com.example.Bar")
                                .receiver("com.example.Foo")
                                .abstract_member(),
                        ),
                ),
        )
    }

    fn class(model: &MemoryModel, name: &str) -> inject_model::ClassRef {
        model.class_of(&AstType::named(name)).unwrap()
    }

    #[test]
    fn legacy_annotations_need_the_flag() {
        let model = model();
        let legacy = class(&model, "com.example.Legacy");
        let off = Options::default();
        let on = Options {
            enable_javax_annotations: true,
            ..Options::default()
        };
        assert!(!is_inject_class(legacy.as_ref(), &off));
        assert!(is_inject_class(legacy.as_ref(), &on));
        assert_eq!(scope_type(legacy.as_ref(), &off), None);
        assert_eq!(
            scope_type(legacy.as_ref(), &on),
            Some(AstType::named("com.example.Legacy"))
        );
        assert!(qualifier(legacy.as_ref(), &off).is_none());
        assert!(qualifier(legacy.as_ref(), &on).is_some());
    }

    #[test]
    fn native_annotations_always_apply() {
        let model = model();
        let native = class(&model, "com.example.Native");
        let options = Options::default();
        assert!(is_inject_class(native.as_ref(), &options));
        assert_eq!(
            scope_type(native.as_ref(), &options),
            Some(AstType::named("com.example.Singleton"))
        );
    }

    #[test]
    fn provider_shapes() {
        let model = model();
        let shapes = class(&model, "com.example.Shapes");
        let providers: Vec<String> = shapes
            .methods()
            .iter()
            .filter(|m| is_provider(m.as_ref()))
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(providers, vec!["foo", "bar"]);
    }
}

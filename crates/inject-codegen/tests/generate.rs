//! Generated source for small component graphs.

use inject_codegen::{process, Generated, InjectGenerator};
use inject_common::Options;
use inject_model::annotations::{COMPONENT, INJECT, INTO_SET, PROVIDES, SCOPE};
use inject_model::memory::{ClassDecl, ConstructorDecl, MemberDecl, ModelFile, ParamDecl};
use inject_model::{AstType, CollectingMessenger, KnownType, MemoryModel, TypeModel};

const SINGLETON: &str = "com.example.Singleton";

fn ty(name: &str) -> AstType {
    AstType::named(&format!("com.example.{}", name))
}

fn inject_class(name: &str, params: &[(&str, &str)]) -> ClassDecl {
    let mut constructor = ConstructorDecl::new();
    for (param, param_ty) in params {
        constructor = constructor.param(ParamDecl::new(param, *param_ty));
    }
    ClassDecl::new("com.example", name)
        .annotated(INJECT)
        .constructor(constructor)
}

fn component(name: &str) -> ClassDecl {
    ClassDecl::new("com.example", name)
        .abstract_class()
        .annotated(COMPONENT)
}

fn generate_with(file: ModelFile, options: Options) -> Generated {
    let model = MemoryModel::new(file);
    let class = model
        .class_of(&ty("MyComponent"))
        .expect("component class is declared");
    InjectGenerator::new(&model, options).generate(&class)
}

fn generate(file: ModelFile) -> Generated {
    generate_with(file, Options::default())
}

#[test]
fn constructor_injection() {
    let generated = generate(
        ModelFile::new()
            .class(inject_class("Foo", &[]))
            .class(inject_class("Bar", &[("foo", "com.example.Foo")]))
            .class(
                component("MyComponent")
                    .member(MemberDecl::val("bar", "com.example.Bar").abstract_member())
                    .member(MemberDecl::fun("foo", "com.example.Foo").abstract_member()),
            ),
    );
    assert!(generated.diagnostics.is_empty());
    assert!(!generated.failed);
    assert_eq!(generated.file.name, "InjectMyComponent");
    insta::assert_snapshot!(generated.file.contents, @r"
    package com.example

    class InjectMyComponent : com.example.MyComponent() {
        override val bar: com.example.Bar
            get() = com.example.Bar(com.example.Foo())

        override fun foo(): com.example.Foo = com.example.Foo()
    }

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(): com.example.MyComponent = InjectMyComponent()
    ");
}

#[test]
fn scoped_component_with_default_arguments() {
    let file = ModelFile::new()
        .annotation(SINGLETON, &[SCOPE])
        .class(
            inject_class("Repo", &[("client", "com.example.Client")]).annotated(SINGLETON),
        )
        .class(
            component("MyComponent")
                .annotated(SINGLETON)
                .with_companion()
                .constructor(
                    ConstructorDecl::new()
                        .param(ParamDecl::new("name", "kotlin.String"))
                        .param(ParamDecl::new("debug", "kotlin.Boolean").with_default()),
                )
                .member(MemberDecl::val("repo", "com.example.Repo").abstract_member())
                .member(
                    MemberDecl::fun("client", "com.example.Client")
                        .annotated(PROVIDES)
                        .annotated(SINGLETON),
                ),
        );
    let generated = generate_with(
        file,
        Options {
            generate_companion_extensions: true,
            ..Options::default()
        },
    );
    assert!(generated.diagnostics.is_empty());
    insta::assert_snapshot!(generated.file.contents, @r#"
    package com.example

    class InjectMyComponent : com.example.MyComponent, me.tatarka.inject.internal.ScopedComponent {
        constructor(name: kotlin.String, debug: kotlin.Boolean) : super(name, debug)

        constructor(name: kotlin.String) : super(name = name)

        override val _scoped: me.tatarka.inject.internal.LazyMap = me.tatarka.inject.internal.LazyMap()

        override val repo: com.example.Repo
            get() = _scoped.get("com.example.Repo") {
                com.example.Repo(
                    _scoped.get("com.example.Client") {
                        client()
                    }
                )
            }
    }

    fun com.example.MyComponent.Companion.create(name: kotlin.String, debug: kotlin.Boolean): com.example.MyComponent = InjectMyComponent(name, debug)

    fun com.example.MyComponent.Companion.create(name: kotlin.String): com.example.MyComponent = InjectMyComponent(name)
    "#);
}

fn parent_graph() -> ModelFile {
    ModelFile::new()
        .class(
            component("ParentComponent")
                .member(MemberDecl::fun("foo", "com.example.Foo").annotated(PROVIDES)),
        )
        .class(
            component("MyComponent")
                .constructor(
                    ConstructorDecl::new().param(
                        ParamDecl::new("parent", "com.example.ParentComponent")
                            .annotated(COMPONENT)
                            .val(),
                    ),
                )
                .member(MemberDecl::val("foo", "com.example.Foo").abstract_member()),
        )
}

#[test]
fn parent_component_bindings_go_through_the_accessor() {
    let generated = generate(parent_graph());
    assert!(generated.diagnostics.is_empty());
    insta::assert_snapshot!(generated.file.contents, @r"
    package com.example

    class InjectMyComponent(parent: com.example.ParentComponent) : com.example.MyComponent(parent) {
        override val foo: com.example.Foo
            get() = parent.foo()
    }

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(parent: com.example.ParentComponent): com.example.MyComponent = InjectMyComponent(parent)
    ");
}

#[test]
fn nested_parent_receiver_enters_the_parent_scope() {
    let generated = generate(
        ModelFile::new()
            .class(
                component("GrandComponent")
                    .member(MemberDecl::fun("foo", "com.example.Foo").annotated(PROVIDES)),
            )
            .class(
                component("ParentComponent")
                    .constructor(
                        ConstructorDecl::new().param(
                            ParamDecl::new("grand", "com.example.GrandComponent")
                                .annotated(COMPONENT)
                                .val(),
                        ),
                    )
                    .member(
                        MemberDecl::fun("qux", "com.example.Qux")
                            .receiver("com.example.Foo")
                            .annotated(PROVIDES),
                    ),
            )
            .class(
                component("MyComponent")
                    .constructor(
                        ConstructorDecl::new().param(
                            ParamDecl::new("parent", "com.example.ParentComponent")
                                .annotated(COMPONENT)
                                .val(),
                        ),
                    )
                    .member(MemberDecl::val("qux", "com.example.Qux").abstract_member()),
            ),
    );
    assert!(generated.diagnostics.is_empty());
    insta::assert_snapshot!(generated.file.contents, @r"
    package com.example

    class InjectMyComponent(parent: com.example.ParentComponent) : com.example.MyComponent(parent) {
        override val qux: com.example.Qux
            get() = with(parent) {
                grand.foo().qux()
            }
    }

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(parent: com.example.ParentComponent): com.example.MyComponent = InjectMyComponent(parent)
    ");
}

#[test]
fn scoped_multibinding_is_cached_as_one_collection() {
    let string = AstType::named("kotlin.String");
    let generated = generate(
        ModelFile::new()
            .annotation(SINGLETON, &[SCOPE])
            .class(
                component("MyComponent")
                    .annotated(SINGLETON)
                    .member(
                        MemberDecl::val("items", AstType::known(KnownType::Set, vec![string.clone()]))
                            .abstract_member(),
                    )
                    .member(
                        MemberDecl::fun("one", string.clone())
                            .annotated(PROVIDES)
                            .annotated(INTO_SET)
                            .annotated(SINGLETON),
                    )
                    .member(
                        MemberDecl::fun("two", string)
                            .annotated(PROVIDES)
                            .annotated(INTO_SET),
                    ),
            ),
    );
    assert!(generated.diagnostics.is_empty());
    insta::assert_snapshot!(generated.file.contents, @r#"
    package com.example

    class InjectMyComponent : com.example.MyComponent(), me.tatarka.inject.internal.ScopedComponent {
        override val _scoped: me.tatarka.inject.internal.LazyMap = me.tatarka.inject.internal.LazyMap()

        override val items: kotlin.collections.Set<kotlin.String>
            get() = _scoped.get("kotlin.collections.Set<kotlin.String>") {
                setOf(one(), two())
            }
    }

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(): com.example.MyComponent = InjectMyComponent()
    "#);
}

#[test]
fn lambdas_lazy_and_suspend_providers() {
    let generated = generate(
        ModelFile::new()
            .class(inject_class("Foo", &[("name", "kotlin.String")]))
            .class(inject_class("Bar", &[]))
            .class(
                component("MyComponent")
                    .member(
                        MemberDecl::val(
                            "factory",
                            AstType::function(vec![AstType::named("kotlin.String")], ty("Foo")),
                        )
                        .abstract_member(),
                    )
                    .member(MemberDecl::val("lazyBar", AstType::lazy(ty("Bar"))).abstract_member())
                    .member(
                        MemberDecl::fun("bar", "com.example.Bar")
                            .abstract_member()
                            .suspend(),
                    ),
            ),
    );
    assert!(generated.diagnostics.is_empty());
    insta::assert_snapshot!(generated.file.contents, @r"
    package com.example

    class InjectMyComponent : com.example.MyComponent() {
        override val factory: (kotlin.String) -> com.example.Foo
            get() = { arg0 ->
                com.example.Foo(arg0)
            }

        override val lazyBar: kotlin.Lazy<com.example.Bar>
            get() = lazy {
                com.example.Bar()
            }

        override suspend fun bar(): com.example.Bar = com.example.Bar()
    }

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(): com.example.MyComponent = InjectMyComponent()
    ");
}

#[test]
fn failed_component_generates_a_stub() {
    let generated = generate(
        ModelFile::new().class(
            component("MyComponent")
                .member(MemberDecl::val("foo", "com.example.Foo").abstract_member()),
        ),
    );
    assert!(generated.failed);
    let messages: Vec<&str> = generated
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        ["Cannot find an @Inject constructor or provider for: com.example.Foo"]
    );
    insta::assert_snapshot!(generated.file.contents, @r"
    package com.example

    class InjectMyComponent : com.example.MyComponent()

    fun kotlin.reflect.KClass<com.example.MyComponent>.create(): com.example.MyComponent = InjectMyComponent()
    ");
}

#[test]
fn missing_companion_falls_back_to_class_receiver() {
    let generated = generate_with(
        ModelFile::new().class(component("MyComponent")),
        Options {
            generate_companion_extensions: true,
            ..Options::default()
        },
    );
    assert!(!generated.failed);
    assert_eq!(generated.diagnostics.len(), 1);
    let diagnostic = &generated.diagnostics[0];
    assert!(diagnostic.is_error());
    assert_eq!(diagnostic.code, Some("E0010"));
    assert!(diagnostic
        .message
        .starts_with("Missing companion for class: com.example.MyComponent."));
    assert!(diagnostic.message.contains("inject.generateCompanionExtensions=true"));
    assert!(generated
        .file
        .contents
        .contains("fun kotlin.reflect.KClass<com.example.MyComponent>.create()"));
}

#[test]
fn interface_components_have_no_super_call() {
    let generated = generate(
        ModelFile::new()
            .class(inject_class("Foo", &[]))
            .class(
                ClassDecl::new("com.example", "MyComponent")
                    .interface()
                    .annotated(COMPONENT)
                    .member(MemberDecl::val("foo", "com.example.Foo").abstract_member()),
            ),
    );
    assert!(generated
        .file
        .contents
        .contains("class InjectMyComponent : com.example.MyComponent {"));
}

#[test]
fn process_generates_every_component() {
    let model = MemoryModel::new(parent_graph());
    let messenger = CollectingMessenger::new();
    let files = process(&model, &Options::default(), &messenger);

    assert!(!messenger.has_errors(), "{:?}", messenger.diagnostics());
    let paths: Vec<String> = files
        .iter()
        .map(|f| f.relative_path().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        paths,
        [
            "com/example/InjectParentComponent.kt",
            "com/example/InjectMyComponent.kt"
        ]
    );
    insta::assert_snapshot!(files[0].contents, @r"
    package com.example

    class InjectParentComponent : com.example.ParentComponent()

    fun kotlin.reflect.KClass<com.example.ParentComponent>.create(): com.example.ParentComponent = InjectParentComponent()
    ");
}

#[test]
fn process_reports_failures_to_the_messenger() {
    let model = MemoryModel::new(
        ModelFile::new().class(
            component("MyComponent")
                .member(MemberDecl::val("foo", "com.example.Foo").abstract_member()),
        ),
    );
    let messenger = CollectingMessenger::new();
    let files = process(&model, &Options::default(), &messenger);

    assert_eq!(files.len(), 1);
    assert!(messenger.has_errors());
    assert_eq!(messenger.diagnostics()[0].code, Some("E0002"));
}

use indexmap::IndexMap;
use kolib::{
    Keyword, KeywordClass, KeywordError, KwdArg, MethodBuilder, MethodInfo, NumberKind,
    ParamBuilder, RobotArgument, TypeHandle, Value, ValueType, Visibility,
};
use kolib_dynamic::protocol::{INIT, INTRO};
use kolib_dynamic::{
    ArgumentSpecSupport, ArgumentTypesSupport, DynamicLibrary, KwArgsSupport, LibdocSupport,
    LibraryConfig, LibraryContext, LibraryScope, MinimalDynamicLibrary, SourceSupport, TagSupport,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Inventory {
    stock: AtomicI64,
}

impl KeywordClass for Inventory {
    fn type_handle() -> TypeHandle {
        TypeHandle::of::<Self>().with_source("src/inventory.rs")
    }

    fn methods() -> Vec<MethodInfo> {
        vec![
            MethodBuilder::function("addStock")
                .with_declaring_type(Self::type_handle())
                .with_keyword(
                    Keyword::named("Add Stock")
                        .with_summary("Adds items to the stock.")
                        .with_tag(" stock   write "),
                )
                .with_param(
                    ParamBuilder::new("amount", ValueType::Number(NumberKind::I64))
                        .with_kwd_arg(KwdArg::new().with_doc("Number of items")),
                )
                .with_source_line(12)
                .with_invoker(|this: &Inventory, args| {
                    let amount: i64 = args.get(0)?;
                    Ok(Value::Long(this.stock.fetch_add(amount, Ordering::SeqCst) + amount))
                })
                .build(),
            MethodBuilder::function("stock")
                .with_declaring_type(Self::type_handle())
                .with_keyword(Keyword::named("Get Stock"))
                .with_invoker(|this: &Inventory, _| {
                    Ok(Value::Long(this.stock.load(Ordering::SeqCst)))
                })
                .build(),
            MethodBuilder::function("describe")
                .with_declaring_type(Self::type_handle())
                .with_keyword(Keyword::named("Describe"))
                .with_param(ParamBuilder::new("label", ValueType::String))
                .with_param(
                    ParamBuilder::new("extra", ValueType::string_map_of(ValueType::String))
                        .with_kwd_arg(KwdArg::kwarg()),
                )
                .with_invoker(|_: &Inventory, args| {
                    let label: String = args.get(0)?;
                    let extra: IndexMap<String, String> = args.get(1)?;
                    let pairs: Vec<String> =
                        extra.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    Ok(Value::from(format!("{}({})", label, pairs.join(","))))
                })
                .build(),
        ]
    }
}

struct Shadow;

impl KeywordClass for Shadow {
    fn methods() -> Vec<MethodInfo> {
        vec![
            MethodBuilder::member_of::<Shadow>("stock")
                .with_keyword(Keyword::named("Get Stock"))
                .with_invoker(|_: &Shadow, _| Ok(Value::Long(-1)))
                .build(),
            MethodBuilder::member_of::<Shadow>("secret")
                .with_keyword(Keyword::new())
                .with_visibility(Visibility::Internal)
                .with_invoker(|_: &Shadow, _| Ok(Value::Nil))
                .build(),
        ]
    }
}

fn library() -> DynamicLibrary {
    let context = LibraryContext::new()
        .register(Inventory::default())
        .register_lazy(|| Ok(Shadow));
    DynamicLibrary::new(Arc::new(context))
}

#[test]
fn test_keyword_names_in_discovery_order() {
    assert_eq!(
        library().get_keyword_names(),
        vec!["Add Stock".to_string(), "Get Stock".to_string(), "Describe".to_string()]
    );
}

#[test]
fn test_keywords_share_the_component_instance() {
    let lib = library();
    assert_eq!(lib.run_keyword("Add Stock", vec![Value::from("5")]), Ok(Value::Long(5)));
    let mut kwargs = IndexMap::new();
    kwargs.insert("amount".to_string(), Value::Int(2));
    assert_eq!(
        lib.run_keyword_with_kwargs("Add Stock", vec![], kwargs),
        Ok(Value::Long(7))
    );
    assert_eq!(lib.run_keyword("Get Stock", vec![]), Ok(Value::Long(7)));
}

#[test]
fn test_overflow_named_arguments_reach_kwarg() {
    let mut kwargs = IndexMap::new();
    kwargs.insert("color".to_string(), Value::from("red"));
    kwargs.insert("size".to_string(), Value::Int(3));
    let result = library()
        .run_keyword_with_kwargs("Describe", vec![Value::from("box")], kwargs)
        .unwrap();
    assert_eq!(result, Value::from("box(color=red,size=3)"));
}

#[test]
fn test_argument_introspection() {
    let lib = library();
    assert_eq!(
        lib.get_keyword_arguments("Describe").unwrap(),
        vec![
            RobotArgument::Required("label".to_string()),
            RobotArgument::Required("**extra".to_string()),
        ]
    );
    let types: Vec<(String, String)> = lib
        .get_keyword_types("Add Stock")
        .unwrap()
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    assert_eq!(types, vec![("amount".to_string(), "int".to_string())]);
}

#[test]
fn test_documentation_tags_and_source() {
    let lib = library();
    assert_eq!(
        lib.get_keyword_documentation("Add Stock").unwrap(),
        "Adds items to the stock.\n\n*Parameters*\n\namount [Long] Number of items"
    );
    assert_eq!(lib.get_keyword_tags("Add Stock").unwrap(), vec!["stock write".to_string()]);
    assert_eq!(
        lib.get_keyword_source("Add Stock").unwrap(),
        Some("src/inventory.rs:12".to_string())
    );
    assert_eq!(
        lib.get_keyword_source("Get Stock").unwrap(),
        Some("src/inventory.rs".to_string())
    );
    assert_eq!(lib.get_keyword_source("Describe").unwrap(), Some("src/inventory.rs".to_string()));
}

#[test]
fn test_unknown_keyword_in_every_lookup() {
    let lib = library();
    let unknown = KeywordError::UnknownKeyword("Nope".to_string());
    assert_eq!(lib.run_keyword("Nope", vec![]).unwrap_err(), unknown);
    assert_eq!(lib.get_keyword_arguments("Nope").unwrap_err(), unknown);
    assert_eq!(lib.get_keyword_documentation("Nope").unwrap_err(), unknown);
    assert_eq!(lib.get_keyword_source("Nope").unwrap_err(), unknown);
}

#[test]
fn test_library_documentation_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
name = "Inventory"
scope = "TEST_SUITE"
intro = """
    Keywords for the inventory.

    Stock is kept per library instance.
    """
init = "Takes no arguments."
"#
    )
    .unwrap();

    let config = LibraryConfig::from_file(file.path()).unwrap();
    let lib = library().with_config(config);
    assert_eq!(lib.scope(), LibraryScope::Suite);
    assert_eq!(lib.config().name, "Inventory");
    assert_eq!(
        lib.get_keyword_documentation(INTRO).unwrap(),
        "Keywords for the inventory.\n\nStock is kept per library instance."
    );
    assert_eq!(lib.get_keyword_documentation(INIT).unwrap(), "Takes no arguments.");
}

#[test]
fn test_missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = LibraryConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, KeywordError::Config(_)));
}

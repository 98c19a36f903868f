use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use kolib::{
    EnumType, EnumValue, Keyword, KeywordDescriptor, KeywordError, KwdArg, MethodBuilder,
    NumberKind, ParamBuilder, TemporalKind, Value, ValueType,
};
use pretty_assertions::assert_eq;

struct Sample;

fn descriptor(method: MethodBuilder) -> KeywordDescriptor {
    KeywordDescriptor::new(&method.build()).unwrap()
}

fn int(name: &str) -> ParamBuilder {
    ParamBuilder::new(name, ValueType::Number(NumberKind::I32))
}

fn named(entries: &[(&str, Value)]) -> IndexMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn add() -> KeywordDescriptor {
    descriptor(
        MethodBuilder::member_of::<Sample>("add")
            .with_keyword(Keyword::new())
            .with_param(int("a"))
            .with_param(int("b"))
            .with_invoker(|_: &Sample, args| {
                Ok(Value::Int(args.get::<i32>(0)? + args.get::<i32>(1)?))
            }),
    )
}

#[test]
fn test_add_positional() {
    let result = add()
        .invoke(&Sample, vec![Value::Int(3), Value::Int(4)], IndexMap::new())
        .unwrap();
    assert_eq!(result, Value::Int(7));
}

#[test]
fn test_add_by_name_and_from_strings() {
    let result = add()
        .invoke(
            &Sample,
            vec![Value::from("3")],
            named(&[("b", Value::from("4"))]),
        )
        .unwrap();
    assert_eq!(result, Value::Int(7));
}

#[test]
fn test_missing_required_argument_fails_at_call() {
    let err = add()
        .invoke(&Sample, vec![Value::Int(3)], IndexMap::new())
        .unwrap_err();
    assert_eq!(
        err,
        KeywordError::MissingArgument {
            keyword: "add".to_string(),
            parameter: "b".to_string(),
        }
    );
}

#[test]
fn test_wrong_receiver_is_rejected() {
    struct Other;
    let err = add()
        .invoke(&Other, vec![Value::Int(3), Value::Int(4)], IndexMap::new())
        .unwrap_err();
    assert!(matches!(err, KeywordError::ReceiverMismatch { .. }));
}

#[test]
fn test_greet_without_tags_binds_empty_list() {
    let greet = descriptor(
        MethodBuilder::member_of::<Sample>("greet")
            .with_keyword(Keyword::new())
            .with_param(ParamBuilder::new("name", ValueType::String))
            .with_param(
                ParamBuilder::new("tags", ValueType::list_of(ValueType::String))
                    .with_kwd_arg(KwdArg::vararg()),
            )
            .with_invoker(|_: &Sample, args| {
                let name: String = args.get(0)?;
                let tags: Vec<String> = args.get(1)?;
                Ok(Value::from(format!("{} {:?}", name, tags)))
            }),
    );
    let result = greet
        .invoke(&Sample, vec![Value::from("Ann")], IndexMap::new())
        .unwrap();
    assert_eq!(result, Value::from("Ann []"));

    let call = greet
        .prepare_call(
            vec![Value::from("Ann"), Value::from("a"), Value::Int(2)],
            IndexMap::new(),
        )
        .unwrap();
    assert_eq!(
        call.raw(1),
        Some(&Value::List(vec![Value::from("a"), Value::from("2")]))
    );
}

#[test]
fn test_configure_collects_named_arguments() {
    let configure = descriptor(
        MethodBuilder::member_of::<Sample>("configure")
            .with_keyword(Keyword::new())
            .with_param(
                ParamBuilder::new("opts", ValueType::string_map_of(ValueType::Any))
                    .with_kwd_arg(KwdArg::kwarg()),
            )
            .with_invoker(|_: &Sample, args| args.get::<Value>(0)),
    );
    let opts = named(&[("verbose", Value::from("true")), ("level", Value::from("3"))]);
    let result = configure.invoke(&Sample, vec![], opts.clone()).unwrap();
    assert_eq!(result, Value::Map(opts));
}

#[test]
fn test_set_flag_literals() {
    let set = descriptor(
        MethodBuilder::member_of::<Sample>("set")
            .with_keyword(Keyword::new())
            .with_param(ParamBuilder::new("flag", ValueType::Bool))
            .with_invoker(|_: &Sample, args| args.get::<bool>(0).map(Value::Bool)),
    );
    assert_eq!(
        set.invoke(&Sample, vec![Value::from("ok")], IndexMap::new()),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        set.invoke(&Sample, vec![Value::from("nok")], IndexMap::new()),
        Ok(Value::Bool(false))
    );

    let err = set
        .invoke(&Sample, vec![Value::from("maybe")], IndexMap::new())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("maybe"), "{}", message);
    let source = match err {
        KeywordError::ArgumentConversion { source, .. } => source.to_string(),
        other => panic!("unexpected error {:?}", other),
    };
    assert!(source.contains("'yes', 'true', 'on', 'ok'"), "{}", source);
}

#[test]
fn test_schedule_local_date_time() {
    let schedule = descriptor(
        MethodBuilder::member_of::<Sample>("schedule")
            .with_keyword(Keyword::new())
            .with_param(ParamBuilder::new(
                "at",
                ValueType::Temporal(TemporalKind::LocalDateTime),
            ))
            .with_invoker(|_: &Sample, args| {
                let at: NaiveDateTime = args.get(0)?;
                Ok(Value::from(at.to_string()))
            }),
    );
    let expected = NaiveDate::from_ymd_opt(2021, 9, 12)
        .unwrap()
        .and_hms_milli_opt(15, 47, 5, 123)
        .unwrap();
    let result = schedule
        .invoke(&Sample, vec![Value::from("2021-09-12T15:47:05.123")], IndexMap::new())
        .unwrap();
    assert_eq!(result, Value::from(expected.to_string()));
}

#[test]
fn test_enum_parameter_narrowing() {
    let color = EnumType::new("Color", ["RED", "GREEN", "DARK_GREEN"]);
    let paint = descriptor(
        MethodBuilder::member_of::<Sample>("paint")
            .with_keyword(Keyword::new())
            .with_param(ParamBuilder::new("color", ValueType::enumeration(color)))
            .with_invoker(|_: &Sample, args| args.get::<Value>(0)),
    );
    assert_eq!(
        paint.invoke(&Sample, vec![Value::from("dark green")], IndexMap::new()),
        Ok(Value::Enum(EnumValue::new("Color", "DARK_GREEN")))
    );
    assert!(paint
        .invoke(&Sample, vec![Value::from("blue")], IndexMap::new())
        .is_err());
}

#[test]
fn test_mapping_errors_are_aggregated() {
    let err = add()
        .invoke(
            &Sample,
            vec![Value::Int(1), Value::Int(2)],
            named(&[("a", Value::Int(1)), ("c", Value::Int(5))]),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "When calling the keyword 'add', following argument mapping errors occurred:\n\t\
         The parameter with name 'a' was already set from positional arguments\n\t\
         No kwArg-Parameter found but arguments left! The following kwArgs are left over: [c]"
    );
}

#[test]
fn test_documentation_sections() {
    let keyword = Keyword::named("Add Numbers")
        .with_summary("Adds two numbers.")
        .with_details("Both values are converted to Int first.");
    let desc = descriptor(
        MethodBuilder::member_of::<Sample>("add")
            .with_keyword(keyword)
            .with_param(int("a").with_kwd_arg(KwdArg::new().with_doc("first")))
            .with_param(int("b"))
            .with_invoker(|_: &Sample, _| Ok(Value::Nil)),
    );
    assert_eq!(
        desc.documentation(),
        "Adds two numbers.\n\nBoth values are converted to Int first.\n\n\
         *Parameters*\n\na [Int] first\n\nb [Int]"
    );
}

use chrono::TimeDelta;
use flagconv::{BoundOption, Dynamic, ErrorKind, OptionValue, Tag, decode, encode};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

#[test]
fn test_decode_primitives() {
    let tag = Tag::new();

    let mut s = String::new();
    decode("hello world", &mut s, &tag).unwrap();
    assert_eq!(s, "hello world");

    let mut i = 0i8;
    decode("-128", &mut i, &tag).unwrap();
    assert_eq!(i, -128);

    let mut u = 0u64;
    decode("18446744073709551615", &mut u, &tag).unwrap();
    assert_eq!(u, u64::MAX);

    let mut f = 0f64;
    decode("-1.5e3", &mut f, &tag).unwrap();
    assert_eq!(f, -1500.0);

    let mut b = false;
    decode("True", &mut b, &tag).unwrap();
    assert!(b);

    let mut d = Duration::ZERO;
    decode("1h2m4s", &mut d, &tag).unwrap();
    assert_eq!(d, Duration::from_secs(3724));
}

#[test]
fn test_decode_string_is_verbatim() {
    let mut s = String::from("old");
    decode("  [a, b]: {c}  ", &mut s, &Tag::new()).unwrap();
    assert_eq!(s, "  [a, b]: {c}  ");
}

#[test]
fn test_decode_in_base() {
    let tag = Tag::new().with("base", "16");

    let mut i = 0i32;
    decode("-16bf", &mut i, &tag).unwrap();
    assert_eq!(i, -5823);

    let mut u = 0u32;
    decode("1088", &mut u, &tag).unwrap();
    assert_eq!(u, 4232);

    let mut bits = 0u8;
    decode("1010", &mut bits, &Tag::new().with("base", "2")).unwrap();
    assert_eq!(bits, 10);
}

#[test]
fn test_decode_invalid_base() {
    let tag = Tag::new().with("base", "no");

    let mut i = 7i32;
    let err = decode("2", &mut i, &tag).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidBase);
    assert!(err.message().contains("\"no\""));
    assert_eq!(i, 7);

    let mut u = 7u32;
    assert!(decode("2", &mut u, &tag).is_err());
}

#[test]
fn test_decode_invalid_literals() {
    let tag = Tag::new();

    let mut i = 0i32;
    let err = decode("4.5", &mut i, &tag).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);
    assert_eq!(err.message(), "parsing \"4.5\": invalid digit found in string");

    let mut u = 0u8;
    let err = decode("-1", &mut u, &tag).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);

    let mut f = 0f32;
    let err = decode("one point five", &mut f, &tag).unwrap_err();
    assert_eq!(
        err.message(),
        "parsing \"one point five\": invalid float literal"
    );

    let mut b = false;
    let err = decode("yes", &mut b, &tag).unwrap_err();
    assert_eq!(err.message(), "invalid boolean literal \"yes\"");

    let mut d = Duration::ZERO;
    let err = decode("90", &mut d, &tag).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidDuration);
}

#[test]
fn test_decode_out_of_range() {
    let mut i = 0i8;
    let err = decode("128", &mut i, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::OutOfRange);
    assert_eq!(i, 0);

    let mut u = 0u16;
    let err = decode("10000", &mut u, &Tag::new().with("base", "16")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::OutOfRange);
}

#[test]
fn test_decode_sequence() {
    let mut ints: Vec<i32> = Vec::new();
    decode("[-3, 4, -2]", &mut ints, &Tag::new()).unwrap();
    assert_eq!(ints, vec![-3, 4, -2]);
}

#[test]
fn test_decode_sequence_replaces_contents() {
    let mut ints = vec![9, 9, 9, 9];
    decode("1,2", &mut ints, &Tag::new()).unwrap();
    assert_eq!(ints, vec![1, 2]);

    decode("[]", &mut ints, &Tag::new()).unwrap();
    assert!(ints.is_empty());
}

#[test]
fn test_decode_sequence_single_element_without_brackets() {
    let mut names: Vec<String> = Vec::new();
    decode("solo", &mut names, &Tag::new()).unwrap();
    assert_eq!(names, vec!["solo".to_string()]);
}

#[test]
fn test_decode_sequence_is_atomic() {
    let mut ints = vec![1, 2, 3];
    let err = decode("[4, five, 6]", &mut ints, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);
    assert!(err.message().contains("five"));
    assert_eq!(ints, vec![1, 2, 3]);
}

#[test]
fn test_decode_sequence_custom_delimiter() {
    let tag = Tag::new().with("element-delimiter", "|");
    let mut words: Vec<String> = Vec::new();
    decode("a,b|c", &mut words, &tag).unwrap();
    assert_eq!(words, vec!["a,b".to_string(), "c".to_string()]);
}

#[test]
fn test_decode_string_elements_split_on_every_delimiter() {
    let mut words: Vec<String> = Vec::new();
    decode("a[,b", &mut words, &Tag::new()).unwrap();
    assert_eq!(words, vec!["a[".to_string(), "b".to_string()]);

    decode("[{x, y}]", &mut words, &Tag::new()).unwrap();
    assert_eq!(words, vec!["{x".to_string(), "y}".to_string()]);
}

#[test]
fn test_decode_string_keys_split_on_first_delimiter() {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    decode("k{:v", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["k{"], "v");

    decode("{[a:b, c]:d}", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["[a"], "b");
    assert_eq!(map["c]"], "d");
}

#[test]
fn test_decode_nested_sequences_through_pointers() {
    let mut grid: Vec<Option<Vec<u8>>> = Vec::new();
    decode("[[1, 2], [3]]", &mut grid, &Tag::new()).unwrap();
    assert_eq!(grid, vec![Some(vec![1, 2]), Some(vec![3])]);
}

#[test]
fn test_decode_nested_sequences() {
    let mut grid: Vec<Vec<u8>> = Vec::new();
    decode("[[1, 2], [], [3]]", &mut grid, &Tag::new()).unwrap();
    assert_eq!(grid, vec![vec![1, 2], vec![], vec![3]]);
}

#[test]
fn test_decode_fixed_array() {
    let mut rgb = [0u8; 3];
    decode("[ff, 80, 0]", &mut rgb, &Tag::new().with("base", "16")).unwrap();
    assert_eq!(rgb, [255, 128, 0]);

    let err = decode("[1, 2]", &mut rgb, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::LengthMismatch);
    assert_eq!(rgb, [255, 128, 0]);
}

#[test]
fn test_decode_mapping() {
    let mut map: HashMap<i32, f64> = HashMap::new();
    decode("{-2:4.5}", &mut map, &Tag::new()).unwrap();
    assert_eq!(map, HashMap::from([(-2, 4.5)]));
}

#[test]
fn test_decode_mapping_with_delimiter() {
    let tag = Tag::new().with("key-value-delimiter", "=");
    let mut map: HashMap<String, String> = HashMap::new();

    decode("key=value", &mut map, &tag).unwrap();
    assert_eq!(map["key"], "value");
}

#[test]
fn test_decode_mapping_splits_on_first_delimiter() {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    decode("url:http://localhost:8080", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["url"], "http://localhost:8080");
}

#[test]
fn test_decode_mapping_without_delimiter_uses_empty_value() {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    decode("flag", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["flag"], "");

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let err = decode("flag", &mut counts, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);
}

#[test]
fn test_decode_mapping_keeps_existing_entries() {
    let mut map = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
    decode("{b:20, c:30}", &mut map, &Tag::new()).unwrap();
    assert_eq!(
        map,
        BTreeMap::from([
            ("a".to_string(), 1),
            ("b".to_string(), 20),
            ("c".to_string(), 30),
        ])
    );
}

#[test]
fn test_decode_mapping_later_duplicate_wins() {
    let mut map: IndexMap<String, i32> = IndexMap::new();
    decode("{x:1, y:2, x:3}", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["x"], 3);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_decode_mapping_is_atomic() {
    let mut map = HashMap::from([(1u8, true)]);
    let err = decode("{2:true, 3:maybe}", &mut map, &Tag::new()).unwrap_err();
    assert!(err.message().contains("maybe"));
    assert_eq!(map, HashMap::from([(1u8, true)]));
}

#[test]
fn test_decode_mapping_of_sequences() {
    let mut map: BTreeMap<String, Vec<i32>> = BTreeMap::new();
    decode("{odd:[1, 3], even:[2, 4]}", &mut map, &Tag::new()).unwrap();
    assert_eq!(map["odd"], vec![1, 3]);
    assert_eq!(map["even"], vec![2, 4]);
}

#[test]
fn test_decode_pointer_allocates() {
    let mut ptr: Option<bool> = None;
    decode("true", &mut ptr, &Tag::new()).unwrap();
    assert_eq!(ptr, Some(true));
}

#[test]
fn test_decode_pointer_failure_leaves_null() {
    let mut ptr: Option<u32> = None;
    assert!(decode("nope", &mut ptr, &Tag::new()).is_err());
    assert_eq!(ptr, None);
}

#[test]
fn test_decode_pointer_reuses_pointee() {
    let mut ptr = Some(vec![1, 2]);
    decode("[3]", &mut ptr, &Tag::new()).unwrap();
    assert_eq!(ptr, Some(vec![3]));
}

#[test]
fn test_decode_empty_text_nulls_pointer() {
    let mut sparse: Vec<Option<u8>> = Vec::new();
    decode("[1, , 3]", &mut sparse, &Tag::new()).unwrap();
    assert_eq!(sparse, vec![Some(1), None, Some(3)]);

    let mut ptr = Some(5u32);
    decode("", &mut ptr, &Tag::new()).unwrap();
    assert_eq!(ptr, None);
}

#[test]
fn test_decode_empty_text_keeps_accepting_pointee() {
    let mut name: Option<String> = None;
    decode("", &mut name, &Tag::new()).unwrap();
    assert_eq!(name, Some(String::new()));
}

#[test]
fn test_decode_empty_text_still_reports_bad_base() {
    let mut ptr: Option<i32> = Some(1);
    let err = decode("", &mut ptr, &Tag::new().with("base", "no")).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidBase);
    assert_eq!(ptr, Some(1));
}

#[test]
fn test_decode_signed_duration() {
    let mut delta = TimeDelta::zero();
    decode("-1h2m4s", &mut delta, &Tag::new()).unwrap();
    assert_eq!(delta, TimeDelta::seconds(-3724));

    let err = decode("2562048h", &mut delta, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::OutOfRange);
    assert_eq!(delta, TimeDelta::seconds(-3724));

    let mut elapsed = Duration::ZERO;
    let err = decode("-1h2m4s", &mut elapsed, &Tag::new()).unwrap_err();
    assert_eq!(err.message(), "negative duration \"-1h2m4s\"");
}

#[test]
fn test_decode_box_is_transparent() {
    let mut boxed = Box::new(0i64);
    decode("-42", &mut boxed, &Tag::new()).unwrap();
    assert_eq!(*boxed, -42);
}

#[test]
fn test_decode_dynamic_uses_contained_type() {
    let mut held = Dynamic::new(0u16);
    decode("65535", &mut held, &Tag::new()).unwrap();
    assert_eq!(encode(&held, &Tag::new()).unwrap(), "65535");

    let err = decode("65536", &mut held, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::OutOfRange);
}

#[test]
fn test_decode_empty_dynamic_stores_text() {
    let mut held = Dynamic::empty();
    decode("[1, 2]", &mut held, &Tag::new()).unwrap();
    assert!(!held.is_empty());
    assert_eq!(encode(&held, &Tag::new()).unwrap(), "[1, 2]");
}

#[test]
fn test_dynamic_holder_replacement() {
    let mut held = Dynamic::new(true);
    held.set(0i8);
    let err = decode("true", &mut held, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);

    if let Some(inner) = held.get_mut() {
        decode("-7", inner, &Tag::new()).unwrap();
    }
    assert_eq!(encode(&held, &Tag::new()).unwrap(), "-7");

    let taken = held.take().unwrap();
    assert!(held.is_empty());
    assert_eq!(encode(&*taken, &Tag::new()).unwrap(), "-7");

    let restored = Dynamic::from(taken);
    assert_eq!(format!("{restored:?}"), "Dynamic(\"-7\")");
}

#[derive(Default)]
struct Channel;

impl OptionValue for Channel {}

#[test]
fn test_decode_unsupported_kind() {
    let mut value = Channel;
    let err = decode("anything", &mut value, &Tag::new()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Unsupported);
    assert!(err.message().contains("Channel"));

    let mut values: Vec<Channel> = Vec::new();
    assert!(decode("[a]", &mut values, &Tag::new()).is_err());
    assert!(decode("[]", &mut values, &Tag::new()).is_ok());
}

#[test]
fn test_bound_option_reports_name() {
    let mut weights: HashMap<String, f64> = HashMap::new();
    let tag: Tag = r#"long:"weight" key-value-delimiter:"=""#.parse().unwrap();
    let mut opt = BoundOption::new("--weight", &mut weights, tag);

    opt.decode("alpha=0.5").unwrap();
    assert_eq!(opt.encode().unwrap(), "{alpha=0.5}");

    let err = opt.decode("beta=heavy").unwrap_err();
    assert_eq!(err.option(), Some("--weight"));
    assert_eq!(
        err.to_string(),
        "invalid argument for flag `--weight': parsing \"heavy\": invalid float literal"
    );

    assert_eq!(encode(opt.value(), opt.tag()).unwrap(), "{alpha=0.5}");
    assert_eq!(opt.name(), "--weight");
    assert_eq!(opt.tag().get("long"), Some("weight"));
    drop(opt);
    assert_eq!(weights.len(), 1);
}

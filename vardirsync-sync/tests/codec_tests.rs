use proptest::prelude::*;
use vardirsync_sync::codec::{encode_key, is_key_char, normalize_root, sanitize};

// ── Sanitization ────────────────────────────────────────────────

#[test]
fn allowed_characters_pass_through() {
    assert_eq!(sanitize("Az09-_~/x"), "Az09-_~/x");
}

#[test]
fn dots_and_spaces_are_replaced() {
    assert_eq!(sanitize("cfg/app.conf"), "cfg/app_conf");
    assert_eq!(sanitize("my file.txt"), "my_file_txt");
}

#[test]
fn each_multibyte_char_becomes_one_underscore() {
    assert_eq!(sanitize("café/naïve"), "caf_/na_ve");
    assert_eq!(sanitize("🦀"), "_");
}

#[test]
fn key_alphabet() {
    for c in ['a', 'Z', '5', '-', '_', '~', '/'] {
        assert!(is_key_char(c), "{c:?} should be allowed");
    }
    for c in ['.', ' ', '!', '\\', ':', 'é', '+'] {
        assert!(!is_key_char(c), "{c:?} should be replaced");
    }
}

// ── Joining ─────────────────────────────────────────────────────

#[test]
fn root_normalization() {
    assert_eq!(normalize_root("myapp"), "myapp");
    assert_eq!(normalize_root("/myapp/"), "myapp");
    assert_eq!(normalize_root("./a//b/."), "a/b");
    assert_eq!(normalize_root("a/.."), "");
    assert_eq!(normalize_root("/"), "");
}

#[test]
fn encode_key_agrees_with_normalized_root() {
    for root in ["/myapp", "./myapp", "myapp/", "myapp"] {
        assert_eq!(encode_key(root, "a"), encode_key(&normalize_root(root), "a"));
    }
}

#[test]
fn joins_under_root() {
    assert_eq!(encode_key("myapp", "cfg/app.conf"), "myapp/cfg/app_conf");
}

#[test]
fn doubled_and_trailing_separators_are_collapsed() {
    assert_eq!(encode_key("myapp/", "a//b/"), "myapp/a/b");
    assert_eq!(encode_key("nomad/jobs", "x"), "nomad/jobs/x");
}

#[test]
fn absolute_path_stays_under_root() {
    assert_eq!(encode_key("myapp", "/etc/hosts"), "myapp/etc/hosts");
}

#[test]
fn dot_dot_in_path_cannot_escape_root() {
    // `.` is replaced before joining, so `..` turns into a literal segment.
    assert_eq!(encode_key("myapp", "../secret"), "myapp/__/secret");
}

#[test]
fn deterministic() {
    assert_eq!(encode_key("r", "a b/c.d"), encode_key("r", "a b/c.d"));
}

// ── Collisions ──────────────────────────────────────────────────

#[test]
fn distinct_paths_can_collide() {
    assert_ne!("a.txt", "a!txt");
    assert_eq!(encode_key("root", "a.txt"), encode_key("root", "a!txt"));
    assert_eq!(encode_key("root", "a.txt"), "root/a_txt");
}

proptest! {
    #[test]
    fn output_only_contains_key_chars(path in "\\PC{0,40}") {
        let key = encode_key("root", &path);
        prop_assert!(key.chars().all(is_key_char), "bad key {key:?}");
    }

    #[test]
    fn sanitize_preserves_char_count(path in "\\PC{0,40}") {
        prop_assert_eq!(sanitize(&path).chars().count(), path.chars().count());
    }

    #[test]
    fn sanitize_replaces_exactly_disallowed_chars(path in "\\PC{0,40}") {
        for (original, out) in path.chars().zip(sanitize(&path).chars()) {
            if is_key_char(original) {
                prop_assert_eq!(out, original);
            } else {
                prop_assert_eq!(out, '_');
            }
        }
    }

    #[test]
    fn allowed_relative_paths_keep_their_shape(
        segments in prop::collection::vec("[a-zA-Z0-9_~-]{1,8}", 1..5)
    ) {
        let path = segments.join("/");
        prop_assert_eq!(encode_key("root", &path), format!("root/{path}"));
    }
}

//! `NonCopyable` can't be duplicated, neither by cloning it nor by reusing it after a move.

#[test]
fn non_copyable_compile_fail_tests() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}

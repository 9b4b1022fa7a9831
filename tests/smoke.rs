//! Basic smoke test to verify the public surface is exported.

#[test]
fn crate_compiles() {
    // If this test runs, the crate skeleton is valid.
    let _ = std::any::type_name::<fakedate::FakeDateConfig>();
    let _ = std::any::type_name::<fakedate::FakeDateType>();
    let _ = std::any::type_name::<fakedate::FakeDate>();
    let _ = std::any::type_name::<fakedate::FakeDateError>();
}

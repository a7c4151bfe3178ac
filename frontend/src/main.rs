#[cfg(target_arch = "wasm32")]
fn main() {
    leavedesk_frontend::start();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    // Browser-only crate; host builds exist for the test suite.
}

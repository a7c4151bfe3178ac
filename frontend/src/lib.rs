mod api;
mod components;
pub mod config;
mod notify;
mod pages;
pub mod router;
mod session;
mod state;
pub mod utils;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_support;

/// Browser entry point: install logging, resolve the runtime config, then
/// mount the app.
#[cfg(target_arch = "wasm32")]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("starting leavedesk frontend");

    leptos::spawn_local(async {
        config::init().await;
        log::info!("runtime config initialized");
        router::mount_app();
    });
}

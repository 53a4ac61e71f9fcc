mod app;

fn main() {
    dioxus::logger::initialize_default();
    tracing::info!("chip tracker web frontend starting");
    dioxus::launch(app::App);
}

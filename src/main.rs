mod aggregate;
mod api;
mod app;
mod enrichment;
mod session;
mod views;

use app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
